//! Union model extraction errors (DX)
//!
//! A declaration that passed eligibility but whose case list cannot be turned into a
//! well-formed model. These abort generation for that one declaration.

use crate::{ErrorBuilder, Unspanned};

define_domain_errors! {
    pub enum ExtractionError(DX) => Extraction {
        /// DX1: the front-end left a case parameter unbound
        UnresolvedParameter = 1 { union_name: String, case_name: String, parameter: String }
            => "failed to resolve the type of parameter '{parameter}' of case '{case_name}' in union '{union_name}'",
            help: "the front-end did not bind this parameter; this is a front-end bug";

        DuplicateCase = 2 { union_name: String, case_name: String }
            => "union '{union_name}' declares case '{case_name}' more than once",
            help: "case names must be unique within a union";

        DuplicateParameter = 3 { union_name: String, case_name: String, parameter: String }
            => "case '{case_name}' of union '{union_name}' declares parameter '{parameter}' more than once",
            help: "parameter names must be unique within a case";
    }
}

impl ExtractionError {
    pub fn unresolved_parameter(
        union_name: impl Into<String>,
        case_name: impl Into<String>,
        parameter: impl Into<String>,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::UnresolvedParameter {
            union_name: union_name.into(),
            case_name: case_name.into(),
            parameter: parameter.into(),
            span: None,
        })
    }

    pub fn duplicate_case(
        union_name: impl Into<String>,
        case_name: impl Into<String>,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::DuplicateCase {
            union_name: union_name.into(),
            case_name: case_name.into(),
            span: None,
        })
    }

    pub fn duplicate_parameter(
        union_name: impl Into<String>,
        case_name: impl Into<String>,
        parameter: impl Into<String>,
    ) -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::DuplicateParameter {
            union_name: union_name.into(),
            case_name: case_name.into(),
            parameter: parameter.into(),
            span: None,
        })
    }
}
