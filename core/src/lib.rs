#![allow(clippy::result_large_err)]

//! The union compilation pipeline.
//!
//! [`extract`] turns marked declarations into [`model::Union`]s, [`synth`] emits their
//! implementation, [`analyze`] flags initializations that bypass the generated factories
//! and [`assist`] completes partially written `Match` calls. [`value`] is an executable
//! model of the generated value representation.

pub mod analyze;
pub mod assist;
pub mod config;
pub mod extract;
pub mod generate;
pub mod model;
pub mod synth;
pub mod value;
pub(crate) mod utils;

pub use paste::paste;

use unionize_errors::{CompilerError, FilesystemError, InternalError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("[{src}] {error}")]
    SourceFile { error: Box<Self>, src: String },

    #[error("{0}")]
    Validation(#[from] validator::ValidationError),

    #[error("{0}")]
    Validations(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Syntax(#[from] unionize_syntax::Error),

    #[error("{0}")]
    Compiler(#[from] CompilerError),
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

    /// For `map_err`: converts and tags the error with the file it came from.
    pub fn from_with_source_init<E: Into<Self>>(src: String) -> impl FnOnce(E) -> Self {
        |err| err.into().with_source(src)
    }
}

impl From<Error> for CompilerError {
    fn from(err: Error) -> Self {
        match err {
            Error::Io(e) => e.into(),
            Error::Config(e) => {
                FilesystemError::io_error(format!("configuration: {e}"))
                    .unlocated()
                    .build()
            },
            Error::SourceFile { error, src } => {
                match *error {
                    Error::Config(e) => {
                        FilesystemError::io_error(format!("configuration '{src}': {e}"))
                            .unlocated()
                            .build()
                    },
                    Error::Validations(e) => {
                        FilesystemError::io_error(format!("invalid configuration '{src}': {e}"))
                            .unlocated()
                            .build()
                    },
                    other => other.into(),
                }
            },
            Error::Validation(e) => InternalError::internal(e.to_string()).into(),
            Error::Validations(e) => InternalError::internal(e.to_string()).into(),
            Error::Syntax(e) => e.into(),
            Error::Compiler(e) => e,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
