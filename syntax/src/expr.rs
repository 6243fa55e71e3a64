//! Expressions, call sites and host diagnostics.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use unionize_errors::{HasSpan, Span};

use crate::TypeRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    /// `default(T)`
    DefaultExpression,
    /// target-typed `default`
    DefaultLiteral,
    /// `new T(...)`
    ObjectCreation,
    /// target-typed `new()`
    ImplicitObjectCreation,
}

/// An initialization expression together with its bound static type, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeRef>,
    pub span: Span,
}

impl HasSpan for Expression {
    fn span(&self) -> Span {
        self.span
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub expression: String,
}

impl Argument {
    pub fn positional(expression: impl Into<String>) -> Self {
        Self {
            name: None,
            expression: expression.into(),
        }
    }

    pub fn named(
        name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            expression: expression.into(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}: {}", self.expression),
            None => f.write_str(&self.expression),
        }
    }
}

/// A method call site such as `shape.Match(Circle: r => r * r)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub callee: String,
    pub method: String,
    /// Static type of the receiver expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<TypeRef>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    pub span: Span,
}

impl Invocation {
    pub fn positional_count(&self) -> usize {
        self.arguments
            .iter()
            .filter(|arg| arg.name.is_none())
            .count()
    }

    pub fn named_arguments(&self) -> BTreeSet<&str> {
        self.arguments
            .iter()
            .filter_map(|arg| arg.name.as_deref())
            .collect()
    }
}

impl HasSpan for Invocation {
    fn span(&self) -> Span {
        self.span
    }
}

/// A diagnostic reported by the host compiler, e.g. `CS7036`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDiagnostic {
    pub id: String,
    pub span: Span,
}

impl HasSpan for HostDiagnostic {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn argument_partition() {
        let call = Invocation {
            callee: "u.Match".into(),
            method: "Match".into(),
            receiver: Some(TypeRef::simple("Shape")),
            arguments: vec![
                Argument::positional("() => 1"),
                Argument::named("C", "(a, b) => a"),
            ],
            span: Span::new(0, 32),
        };
        assert_eq!(call.positional_count(), 1);
        assert_eq!(
            call.named_arguments()
                .into_iter()
                .collect::<Vec<_>>(),
            vec!["C"]
        );
        assert_eq!(call.arguments[1].to_string(), "C: (a, b) => a");
        assert_eq!(call.arguments[0].to_string(), "() => 1");
    }

    #[test]
    fn expression_from_json() {
        let expr: Expression =
            serde_json::from_str(r#"{ "kind": "default_expression", "type": "Demo.Shape", "span": [4, 19] }"#)
                .unwrap();
        assert_eq!(expr.kind, ExpressionKind::DefaultExpression);
        assert_eq!(expr.ty.unwrap().to_string(), "Demo.Shape");
        assert_eq!(expr.span, Span::new(4, 19));
    }
}
