//! Front-end document errors (DF): loading and editing serialized source documents.

use crate::{ErrorBuilder, Unspanned};

define_domain_errors! {
    pub enum DocumentError(DF) => Document {
        UnsupportedFormat = 1 { path: String }
            => "unsupported document format: {path}",
            help: "source documents must be .toml, .json, .yaml or .yml";

        InvalidTypeRef = 2 { text: String, reason: String }
            => "invalid type reference '{text}': {reason}";

        /// DF3: a text edit that does not fit the document
        SpanOutOfRange = 3 { start: usize, end: usize, len: usize }
            => "span {start}..{end} does not fit a document of {len} bytes";

        Malformed = 4 { path: String, reason: String }
            => "malformed document '{path}': {reason}";
    }
}

impl DocumentError {
    pub fn unsupported_format(path: impl Into<String>) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::UnsupportedFormat {
            path: path.into(),
            span: None,
        })
    }

    pub fn invalid_type_ref(
        text: impl Into<String>,
        reason: impl Into<String>,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::InvalidTypeRef {
            text: text.into(),
            reason: reason.into(),
            span: None,
        })
    }

    pub fn span_out_of_range(
        start: usize,
        end: usize,
        len: usize,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::SpanOutOfRange {
            start,
            end,
            len,
            span: None,
        })
    }

    pub fn malformed(
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::Malformed {
            path: path.into(),
            reason: reason.into(),
            span: None,
        })
    }
}
