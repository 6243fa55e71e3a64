//! Every domain error passes through an [`ErrorBuilder`] that only offers `build` once a
//! location decision was made: a span via [`ErrorBuilder::at`], or an explicit
//! [`ErrorBuilder::unlocated`].

use crate::{CompilerError, HasSpan, Span};

/// No location decided yet.
pub struct Unspanned;

/// Points at a span.
pub struct Spanned(Span);

/// Has no location by nature, e.g. filesystem and configuration errors.
pub struct Unlocated;

/// Domain errors whose location can be set after construction.
pub trait Locate {
    fn locate(
        self,
        at: Span,
    ) -> Self;
}

#[must_use = "call `at` or `unlocated`, then `build`"]
pub struct ErrorBuilder<S, E> {
    error: E,
    location: S,
}

impl<E: Locate + Into<CompilerError>> ErrorBuilder<Unspanned, E> {
    pub fn new(error: E) -> Self {
        Self {
            error,
            location: Unspanned,
        }
    }

    pub fn at(
        self,
        span: impl Into<Span>,
    ) -> ErrorBuilder<Spanned, E> {
        ErrorBuilder {
            error: self.error,
            location: Spanned(span.into()),
        }
    }

    pub fn at_node<T: HasSpan>(
        self,
        node: &T,
    ) -> ErrorBuilder<Spanned, E> {
        self.at(node.span())
    }

    /// Builds immediately, located when `span` is present.
    pub fn at_opt(
        self,
        span: Option<Span>,
    ) -> CompilerError {
        match span {
            Some(span) => self.at(span).build(),
            None => self.unlocated().build(),
        }
    }

    pub fn unlocated(self) -> ErrorBuilder<Unlocated, E> {
        ErrorBuilder {
            error: self.error,
            location: Unlocated,
        }
    }
}

impl<E: Locate + Into<CompilerError>> ErrorBuilder<Spanned, E> {
    pub fn build(self) -> CompilerError {
        self.error
            .locate(self.location.0)
            .into()
    }
}

impl<E: Into<CompilerError>> ErrorBuilder<Unlocated, E> {
    pub fn build(self) -> CompilerError {
        self.error.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Domain, ExtractionError, UsageError};

    #[test]
    fn located() {
        let err = UsageError::default_initialization()
            .at(8..22)
            .build();

        assert_eq!(err.error_code().domain, Domain::DU);
        assert_eq!(err.span(), Some(Span::new(8, 22)));
    }

    #[test]
    fn unlocated() {
        let err = ExtractionError::duplicate_case("Shape", "Circle")
            .unlocated()
            .build();

        assert_eq!(err.error_code().to_string(), "DX2");
        assert_eq!(err.span(), None);
    }

    #[test]
    fn optional_location() {
        let located = ExtractionError::duplicate_case("Shape", "Circle").at_opt(Some(Span::new(1, 2)));
        let missing = ExtractionError::duplicate_case("Shape", "Circle").at_opt(None);

        assert_eq!(located.span(), Some(Span::new(1, 2)));
        assert_eq!(missing.span(), None);
    }
}
