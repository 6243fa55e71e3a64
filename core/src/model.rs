//! The canonical union model shared by every stage of the pipeline.

use std::hash::{Hash, Hasher};

use unionize_errors::{CompilerError, InternalError};
use unionize_syntax::{Accessibility, DeclaredType, Modifiers, TypeDecl, TypeKind, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Backed by a declaration that can be re-opened.
    Declared(TypeKind),
    /// A concrete type used by reference only.
    Referenced,
    /// A generic parameter in scope at the use site.
    TypeParameter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub name: String,
    /// Fully qualified display name, e.g. `Demo.Outer<T>.Shape<U>` or `double`.
    pub qualified: String,
    pub namespace: Option<String>,
    pub origin: Origin,
    pub accessibility: Accessibility,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<String>,
    /// Enclosing declarations, outermost first.
    pub parents: Vec<TypeDescriptor>,
}

fn generic_suffix(type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        String::new()
    } else {
        format!("<{}>", type_parameters.join(", "))
    }
}

impl TypeDescriptor {
    fn from_decl(
        decl: &TypeDecl,
        namespace: Option<&str>,
        parents: Vec<TypeDescriptor>,
    ) -> Self {
        let prefix = parents
            .last()
            .map(|parent| parent.qualified.clone())
            .or_else(|| namespace.map(String::from));
        let simple = format!("{}{}", decl.name, generic_suffix(&decl.type_parameters));
        let qualified = match prefix {
            Some(prefix) => format!("{prefix}.{simple}"),
            None => simple,
        };

        Self {
            name: decl.name.clone(),
            qualified,
            namespace: namespace.map(String::from),
            origin: Origin::Declared(decl.kind),
            accessibility: decl.accessibility,
            modifiers: decl.modifiers,
            type_parameters: decl.type_parameters.clone(),
            parents,
        }
    }

    /// Describes a declaration and its enclosing chain.
    pub fn declared(declared: &DeclaredType<'_>) -> Self {
        let mut chain: Vec<TypeDescriptor> = Vec::with_capacity(declared.parents.len());
        for parent in &declared.parents {
            let descriptor = Self::from_decl(parent, declared.namespace, chain.clone());
            chain.push(descriptor);
        }
        Self::from_decl(declared.decl, declared.namespace, chain)
    }

    /// Describes a type as written at a use site. Single-segment references naming an
    /// in-scope generic parameter become [`Origin::TypeParameter`].
    pub fn resolve(
        ty: &TypeRef,
        in_scope: &[&str],
    ) -> Self {
        let text = ty.to_string();
        let origin = match ty.as_simple() {
            Some(name) if in_scope.contains(&name) => Origin::TypeParameter,
            _ => Origin::Referenced,
        };

        Self {
            name: text.clone(),
            qualified: text,
            namespace: None,
            origin,
            accessibility: Accessibility::Public,
            modifiers: Modifiers::default(),
            type_parameters: vec![],
            parents: vec![],
        }
    }

    pub fn is_type_parameter(&self) -> bool {
        self.origin == Origin::TypeParameter
    }

    pub fn kind(&self) -> Option<TypeKind> {
        match self.origin {
            Origin::Declared(kind) => Some(kind),
            Origin::Referenced | Origin::TypeParameter => None,
        }
    }

    /// `Shape<T>`, the name by which the type refers to itself.
    pub fn self_reference(&self) -> String {
        format!("{}{}", self.name, generic_suffix(&self.type_parameters))
    }

    /// Header re-opening the declaration, e.g. `public readonly partial struct Shape<T>`.
    pub fn declaration_header(&self) -> Result<String, CompilerError> {
        let Some(kind) = self.kind() else {
            return Err(InternalError::not_declarable(&self.qualified).into());
        };

        let mut header = format!("{} ", self.accessibility);
        if self.modifiers.is_static {
            header.push_str("static ");
        }
        if self.modifiers.readonly {
            header.push_str("readonly ");
        }
        header.push_str("partial ");
        header.push_str(kind.keyword());
        header.push(' ');
        header.push_str(&self.self_reference());
        Ok(header)
    }

    /// The qualified name as a legal file name stem.
    pub fn file_stem(&self) -> String {
        self.qualified
            .chars()
            .filter(|ch| *ch != ' ')
            .map(|ch| {
                match ch {
                    '<' | '>' | ',' => '_',
                    other => other,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionCaseParameter {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// A named alternative. Identity within a union is the case name alone.
#[derive(Debug, Clone)]
pub struct UnionCase {
    pub name: String,
    pub parameters: Vec<UnionCaseParameter>,
}

impl UnionCase {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_nullary(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl PartialEq for UnionCase {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.name == other.name
    }
}

impl Eq for UnionCase {}

impl Hash for UnionCase {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.name.hash(state);
    }
}

/// Smallest integral representation able to hold a tag for every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRepr {
    Byte,
    UShort,
    UInt,
}

impl TagRepr {
    pub fn for_case_count(count: usize) -> Self {
        if count <= 1 << 8 {
            Self::Byte
        } else if count <= 1 << 16 {
            Self::UShort
        } else {
            Self::UInt
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::UShort => "ushort",
            Self::UInt => "uint",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Union {
    pub name: String,
    pub descriptor: TypeDescriptor,
    /// Declaration order is preserved through tag, factory and dispatch emission.
    pub cases: Vec<UnionCase>,
    /// `AllowDefault` on the marker.
    pub allow_default: bool,
}

impl Union {
    pub fn case(
        &self,
        name: &str,
    ) -> Option<&UnionCase> {
        self.cases
            .iter()
            .find(|case| case.name == name)
    }

    pub fn position(
        &self,
        name: &str,
    ) -> Option<usize> {
        self.cases
            .iter()
            .position(|case| case.name == name)
    }

    pub fn has_default_dispatch(&self) -> bool {
        self.cases.len() > 1
    }

    pub fn tag_repr(&self) -> TagRepr {
        TagRepr::for_case_count(self.cases.len())
    }

    pub fn is_class(&self) -> bool {
        self.descriptor.kind() == Some(TypeKind::Class)
    }
}
