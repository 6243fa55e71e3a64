#![allow(clippy::result_large_err)]

//! Host-agnostic front-end IR.
//!
//! A host compiler (or anything standing in for one) describes the declarations,
//! expressions and call sites of a compilation with these types. The union pipeline
//! in `unionize-core` only ever sees this IR.

pub mod compilation;
pub mod decl;
pub mod document;
pub mod edit;
pub mod expr;
pub mod type_ref;

pub use compilation::{Compilation, DeclId, DeclaredType};
pub use decl::{
    Accessibility, Attribute, AttributeValue, Member, MethodDecl, Modifiers, ParameterDecl,
    TypeDecl, TypeKind,
};
pub use document::SourceDocument;
pub use edit::TextEdit;
pub use expr::{Argument, Expression, ExpressionKind, HostDiagnostic, Invocation};
pub use type_ref::{TypeRef, TypeSegment};

pub use unionize_errors::Span;

use unionize_errors::{CompilerError, DocumentError, FilesystemError, InternalError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("toml error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Compiler(#[from] CompilerError),

    #[error("[{src}] {error}")]
    SourceFile { error: Box<Self>, src: String },
}

impl Error {
    pub fn with_source(
        self,
        src: String,
    ) -> Self {
        Self::SourceFile {
            error: Box::new(self),
            src,
        }
    }

    pub fn from_with_source_init<E: Into<Self>>(src: String) -> impl FnOnce(E) -> Self {
        |err| err.into().with_source(src)
    }
}

impl From<Error> for CompilerError {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => {
                FilesystemError::io_error(e.to_string())
                    .unlocated()
                    .build()
            },
            Error::TomlDe(e) => malformed("<toml>", e),
            Error::TomlSer(e) => InternalError::internal(e.to_string()).into(),
            Error::Json(e) => malformed("<json>", e),
            Error::Yaml(e) => malformed("<yaml>", e),
            Error::Compiler(e) => e,
            Error::SourceFile { error, src } => {
                match *error {
                    Error::TomlDe(e) => malformed(&src, e),
                    Error::Json(e) => malformed(&src, e),
                    Error::Yaml(e) => malformed(&src, e),
                    other => other.into(),
                }
            },
        }
    }
}

fn malformed(
    path: &str,
    reason: impl ToString,
) -> CompilerError {
    DocumentError::malformed(path, reason.to_string())
        .unlocated()
        .build()
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
