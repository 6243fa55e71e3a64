//! Internal errors (IN). Violated preconditions, never user mistakes.
//!
//! These skip the builder: convert with `.into()`.

define_domain_errors! {
    pub enum InternalError(IN) => Internal {
        Internal = 1 { reason: String }
            => "internal error: {reason}",
            help: "this is a bug, please report it";

        /// IN2: a type parameter was asked for its declaration
        NotDeclarable = 2 { name: String }
            => "type '{name}' is not a declared type and has no declaration",
            help: "this is a bug, please report it";

        Unreachable = 3 { location: String }
            => "internal error: reached unreachable code: {location}",
            help: "this is a bug, please report it";
    }
}

impl InternalError {
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
            span: None,
        }
    }

    pub fn not_declarable(name: impl Into<String>) -> Self {
        Self::NotDeclarable {
            name: name.into(),
            span: None,
        }
    }

    pub fn unreachable(location: impl Into<String>) -> Self {
        Self::Unreachable {
            location: location.into(),
            span: None,
        }
    }
}
