//! Filesystem errors (FS)

use crate::{ErrorBuilder, Unspanned};

define_domain_errors! {
    pub enum FilesystemError(FS) => Filesystem {
        InvalidGlobPattern = 1 { reason: String }
            => "glob pattern error: {reason}",
            help: "fix the glob pattern syntax";

        FileNotFound = 2 { path: String }
            => "file not found: {path}",
            help: "check that the file exists at the specified path";

        IoError = 3 { reason: String } => "io error: {reason}";
    }
}

impl FilesystemError {
    pub fn invalid_glob(reason: impl Into<String>) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::InvalidGlobPattern {
            reason: reason.into(),
            span: None,
        })
    }

    pub fn not_found(path: impl Into<String>) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::FileNotFound {
            path: path.into(),
            span: None,
        })
    }

    pub fn io_error(reason: impl Into<String>) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::IoError {
            reason: reason.into(),
            span: None,
        })
    }
}
