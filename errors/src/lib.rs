//! Diagnostics shared by every stage of the union pipeline.
//!
//! Every diagnostic carries a code of the form `{Domain}{Sequence}`. The only
//! diagnostic reported against user code is `DU1`; the remaining domains cover
//! extraction failures, value contract violations, front-end documents and bugs.
//!
//! ```
//! use unionize_errors::{CompilerError, Span, UsageError};
//!
//! let err: CompilerError = UsageError::default_initialization()
//!     .at(Span::new(10, 24))
//!     .build();
//!
//! assert_eq!(err.error_code().to_string(), "DU1");
//! ```

#![allow(clippy::large_enum_variant)]

#[macro_use]
mod macros;
mod builder;
mod code;
mod report;
mod span;

pub mod domains;

pub use builder::{ErrorBuilder, Locate, Spanned, Unlocated, Unspanned};
pub use code::{Domain, ErrorCode, Severity};
pub use domains::{
    DocumentError, ExtractionError, FilesystemError, InternalError, UsageError, ValueError,
};
pub use report::Report;
pub use span::{HasSpan, Span};

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Behaviour every domain enum derives through [`define_domain_errors!`].
pub trait DomainError: std::error::Error {
    fn code(&self) -> ErrorCode;
    fn message(&self) -> String;
    fn help(&self) -> Option<&'static str>;
    fn severity(&self) -> Severity;
    fn span(&self) -> Option<Span>;
}

#[derive(Debug, Clone)]
pub enum CompilerError {
    Usage(UsageError),
    Extraction(ExtractionError),
    Value(ValueError),
    Document(DocumentError),
    Filesystem(FilesystemError),
    Internal(InternalError),

    /// An error annotated with the document it was found in and extra labels.
    Context {
        inner: Box<CompilerError>,
        file: Option<(PathBuf, Arc<String>)>,
        labels: Vec<(Span, String)>,
    },

    Multiple(Vec<CompilerError>),
}

impl CompilerError {
    /// The domain error at the bottom of any context wrapping. `Multiple` answers
    /// for its first member.
    fn leaf(&self) -> Option<&dyn DomainError> {
        match self {
            Self::Usage(e) => Some(e),
            Self::Extraction(e) => Some(e),
            Self::Value(e) => Some(e),
            Self::Document(e) => Some(e),
            Self::Filesystem(e) => Some(e),
            Self::Internal(e) => Some(e),
            Self::Context { inner, .. } => inner.leaf(),
            Self::Multiple(errs) => errs.first().and_then(Self::leaf),
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.leaf()
            .map(DomainError::code)
            .unwrap_or(ErrorCode::new(Domain::IN, 1))
    }

    pub fn message(&self) -> String {
        match self {
            Self::Multiple(errs) if errs.len() != 1 => format!("{} errors occurred", errs.len()),
            other => {
                other
                    .leaf()
                    .map(DomainError::message)
                    .unwrap_or_default()
            },
        }
    }

    /// `Multiple` is fatal as soon as one member is.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Multiple(errs) if errs.iter().any(CompilerError::is_fatal) => Severity::Error,
            Self::Multiple(errs) if !errs.is_empty() => Severity::Warning,
            other => {
                other
                    .leaf()
                    .map(DomainError::severity)
                    .unwrap_or_default()
            },
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity().is_fatal()
    }

    pub fn help(&self) -> Option<&'static str> {
        match self {
            Self::Multiple(_) => None,
            other => other.leaf().and_then(DomainError::help),
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.leaf().and_then(DomainError::span)
    }

    fn into_context(self) -> (Box<CompilerError>, Option<(PathBuf, Arc<String>)>, Vec<(Span, String)>) {
        match self {
            Self::Context {
                inner,
                file,
                labels,
            } => (inner, file, labels),
            other => (Box::new(other), None, Vec::new()),
        }
    }

    /// Attaches the document the error's spans point into. The first document attached wins.
    pub fn with_source(
        self,
        path: impl Into<PathBuf>,
        text: impl Into<String>,
    ) -> Self {
        let (inner, file, labels) = self.into_context();
        Self::Context {
            inner,
            file: file.or_else(|| Some((path.into(), Arc::new(text.into())))),
            labels,
        }
    }

    pub fn with_secondary_label(
        self,
        span: Span,
        label: impl Into<String>,
    ) -> Self {
        let (inner, file, mut labels) = self.into_context();
        labels.push((span, label.into()));
        Self::Context {
            inner,
            file,
            labels,
        }
    }

    pub fn extract_source(&self) -> Option<(&Path, &str)> {
        match self {
            Self::Context {
                inner,
                file,
                ..
            } => {
                inner.extract_source().or_else(|| {
                    file.as_ref()
                        .map(|(path, text)| (path.as_path(), text.as_str()))
                })
            },
            _ => None,
        }
    }

    pub fn extract_secondary_labels(&self) -> Vec<(Span, String)> {
        match self {
            Self::Context { inner, labels, .. } => {
                let mut all = inner.extract_secondary_labels();
                all.extend(labels.iter().cloned());
                all
            },
            _ => Vec::new(),
        }
    }

    /// Flattens nested `Multiple` wrappers into a list of leaf errors.
    pub fn into_flat(self) -> Vec<CompilerError> {
        match self {
            Self::Multiple(errs) => {
                errs.into_iter()
                    .flat_map(Self::into_flat)
                    .collect()
            },
            other => vec![other],
        }
    }

    pub fn to_report(&self) -> miette::Report {
        miette::Report::new(Report::from(self))
    }
}

impl std::fmt::Display for CompilerError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message())
    }
}

impl std::error::Error for CompilerError {}

impl From<std::io::Error> for CompilerError {
    fn from(e: std::io::Error) -> Self {
        FilesystemError::io_error(e.to_string())
            .unlocated()
            .build()
    }
}

impl From<glob::PatternError> for CompilerError {
    fn from(e: glob::PatternError) -> Self {
        FilesystemError::invalid_glob(e.to_string())
            .unlocated()
            .build()
    }
}

impl From<glob::GlobError> for CompilerError {
    fn from(e: glob::GlobError) -> Self {
        FilesystemError::io_error(e.to_string())
            .unlocated()
            .build()
    }
}

impl From<std::convert::Infallible> for CompilerError {
    fn from(e: std::convert::Infallible) -> Self {
        match e {}
    }
}

pub type Result<T, E = CompilerError> = std::result::Result<T, E>;
