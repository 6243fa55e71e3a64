//! Value contract errors (DR)
//!
//! Raised by the reference value model when a case factory or a dispatch is used
//! against the shape of the union.

use crate::{ErrorBuilder, Unspanned};

define_domain_errors! {
    pub enum ValueError(DR) => Value {
        UnknownCase = 1 { union_name: String, case_name: String }
            => "union '{union_name}' has no case named '{case_name}'";

        ArityMismatch = 2 { union_name: String, case_name: String, expected: usize, found: usize }
            => "case '{case_name}' of union '{union_name}' takes {expected} argument(s), found {found}";

        /// DR3: `cases` is the comma separated list of unhandled case names
        MissingHandlers = 3 { union_name: String, cases: String }
            => "dispatch over '{union_name}' is missing handlers for: {cases}",
            help: "supply one handler per case, or dispatch with a default handler";

        DefaultDispatchUnavailable = 4 { union_name: String }
            => "union '{union_name}' has a single case and no default dispatch";

        DuplicateHandler = 5 { union_name: String, case_name: String }
            => "dispatch over '{union_name}' has more than one handler for '{case_name}'";
    }
}

impl ValueError {
    pub fn unknown_case(
        union_name: impl Into<String>,
        case_name: impl Into<String>,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::UnknownCase {
            union_name: union_name.into(),
            case_name: case_name.into(),
            span: None,
        })
    }

    pub fn arity_mismatch(
        union_name: impl Into<String>,
        case_name: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::ArityMismatch {
            union_name: union_name.into(),
            case_name: case_name.into(),
            expected,
            found,
            span: None,
        })
    }

    pub fn missing_handlers<I, S>(
        union_name: impl Into<String>,
        cases: I,
    ) -> ErrorBuilder<Unspanned, Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>, {
        let cases = cases
            .into_iter()
            .map(|it| it.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        ErrorBuilder::new(Self::MissingHandlers {
            union_name: union_name.into(),
            cases,
            span: None,
        })
    }

    pub fn default_unavailable(union_name: impl Into<String>) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::DefaultDispatchUnavailable {
            union_name: union_name.into(),
            span: None,
        })
    }

    pub fn duplicate_handler(
        union_name: impl Into<String>,
        case_name: impl Into<String>,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::DuplicateHandler {
            union_name: union_name.into(),
            case_name: case_name.into(),
            span: None,
        })
    }
}
