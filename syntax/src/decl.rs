//! Type and member declarations.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use unionize_errors::Span;

use crate::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Struct,
    Class,
    Interface,
}

impl TypeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Struct => "struct",
            Self::Class => "class",
            Self::Interface => "interface",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    #[serde(rename = "public")]
    Public,
    #[default]
    #[serde(rename = "internal")]
    Internal,
    #[serde(rename = "protected")]
    Protected,
    #[serde(rename = "private")]
    Private,
    #[serde(rename = "protected internal")]
    ProtectedInternal,
    #[serde(rename = "private protected")]
    PrivateProtected,
}

impl Accessibility {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::ProtectedInternal => "protected internal",
            Self::PrivateProtected => "private protected",
        }
    }
}

impl fmt::Display for Accessibility {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Declaration modifiers relevant to re-opening a type.
///
/// Serialized as a list of keywords, e.g. `["readonly", "partial"]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Modifiers {
    pub partial: bool,
    pub readonly: bool,
    pub is_static: bool,
}

impl TryFrom<Vec<String>> for Modifiers {
    type Error = String;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        let mut modifiers = Self::default();
        for keyword in value {
            match keyword.as_str() {
                "partial" => modifiers.partial = true,
                "readonly" => modifiers.readonly = true,
                "static" => modifiers.is_static = true,
                other => return Err(format!("unknown modifier '{other}'")),
            }
        }
        Ok(modifiers)
    }
}

impl From<Modifiers> for Vec<String> {
    fn from(value: Modifiers) -> Self {
        [
            (value.is_static, "static"),
            (value.readonly, "readonly"),
            (value.partial, "partial"),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .map(|(_, keyword)| keyword.to_string())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, AttributeValue>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(
        mut self,
        name: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        self.args.insert(name.into(), value);
        self
    }

    /// Matches `name` with or without the conventional `Attribute` suffix,
    /// ignoring any namespace qualification on the written name.
    pub fn is_named(
        &self,
        name: &str,
    ) -> bool {
        let written = self
            .name
            .rsplit('.')
            .next()
            .unwrap_or(&self.name);
        let written = written
            .strip_suffix("Attribute")
            .unwrap_or(written);
        let name = name
            .strip_suffix("Attribute")
            .unwrap_or(name);
        written == name
    }

    pub fn bool_arg(
        &self,
        name: &str,
    ) -> Option<bool> {
        match self.args.get(name)? {
            AttributeValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub accessibility: Accessibility,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl TypeDecl {
    pub fn new(
        name: impl Into<String>,
        kind: TypeKind,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            accessibility: Accessibility::default(),
            modifiers: Modifiers::default(),
            type_parameters: vec![],
            attributes: vec![],
            members: vec![],
            span: None,
        }
    }

    pub fn arity(&self) -> usize {
        self.type_parameters.len()
    }

    pub fn attribute(
        &self,
        name: &str,
    ) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attr| attr.is_named(name))
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members
            .iter()
            .filter_map(|member| {
                match member {
                    Member::Type(decl) => Some(decl),
                    Member::Method(..) => None,
                }
            })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members
            .iter()
            .filter_map(|member| {
                match member {
                    Member::Method(method) => Some(method),
                    Member::Type(..) => None,
                }
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum Member {
    Type(TypeDecl),
    Method(MethodDecl),
}

fn void() -> TypeRef {
    TypeRef::simple("void")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default = "void")]
    pub returns: TypeRef,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl MethodDecl {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<ParameterDecl>,
    ) -> Self {
        Self {
            name: name.into(),
            returns: void(),
            parameters,
            span: None,
        }
    }
}

/// A parameter of a declared method.
///
/// `ty` is `None` when the host could not bind the parameter's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
}

impl ParameterDecl {
    pub fn new(
        name: impl Into<String>,
        ty: TypeRef,
    ) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_case::test_case("DiscriminatedUnion"; "bare")]
    #[test_case::test_case("DiscriminatedUnionAttribute"; "suffixed")]
    #[test_case::test_case("Unions.DiscriminatedUnion"; "qualified")]
    fn marker_names_match(written: &str) {
        let attr = Attribute::new(written);
        assert!(attr.is_named("DiscriminatedUnion"));
        assert!(!attr.is_named("Serializable"));
    }

    #[test]
    fn bool_args() {
        let attr = Attribute::new("DiscriminatedUnion")
            .with_arg("AllowDefault", AttributeValue::Bool(true))
            .with_arg("Name", AttributeValue::Str("x".into()));
        assert_eq!(attr.bool_arg("AllowDefault"), Some(true));
        assert_eq!(attr.bool_arg("Name"), None);
        assert_eq!(attr.bool_arg("Missing"), None);
    }

    #[test]
    fn modifiers_from_keywords() {
        let modifiers =
            Modifiers::try_from(vec!["partial".to_string(), "readonly".to_string()]).unwrap();
        assert!(modifiers.partial);
        assert!(modifiers.readonly);
        assert!(!modifiers.is_static);

        assert!(Modifiers::try_from(vec!["sealed".to_string()]).is_err());
        assert_eq!(
            Vec::<String>::from(modifiers),
            vec!["readonly".to_string(), "partial".to_string()]
        );
    }

    #[test]
    fn declaration_from_toml() {
        let decl: TypeDecl = toml::from_str(
            r#"
            name = "Shape"
            kind = "struct"
            accessibility = "public"
            modifiers = ["partial"]

            [[attributes]]
            name = "DiscriminatedUnion"
            args = { AllowDefault = true }

            [[members]]
            member = "type"
            name = "Cases"
            kind = "interface"

            [[members.members]]
            member = "method"
            name = "Circle"
            parameters = [{ name = "radius", type = "double" }]

            [[members.members]]
            member = "method"
            name = "Unbound"
            parameters = [{ name = "value" }]
            "#,
        )
        .unwrap();

        assert_eq!(decl.accessibility, Accessibility::Public);
        assert_eq!(
            decl.attribute("DiscriminatedUnion")
                .and_then(|a| a.bool_arg("AllowDefault")),
            Some(true)
        );

        let cases = decl.nested_types().next().unwrap();
        assert_eq!(cases.kind, TypeKind::Interface);

        let methods = cases.methods().collect::<Vec<_>>();
        assert_eq!(methods.len(), 2);
        assert!(methods[0].returns.is_void());
        assert_eq!(
            methods[0].parameters[0].ty,
            Some(TypeRef::simple("double"))
        );
        assert_eq!(methods[1].parameters[0].ty, None);
    }

    #[test]
    fn accessibility_keywords() {
        let access: Accessibility = serde_json::from_str(r#""protected internal""#).unwrap();
        assert_eq!(access, Accessibility::ProtectedInternal);
        assert_eq!(access.to_string(), "protected internal");
    }
}
