//! Union usage errors (DU)
//!
//! Reported against user code that bypasses the synthesized case factories.

use crate::{ErrorBuilder, Unspanned};

define_domain_errors! {
    pub enum UsageError(DU) => Usage {
        /// DU1: a union created by `default(T)`, `default` or `new T()`
        DefaultInitialization = 1 {}
            => "discriminated union types are not allowed to be initialized by a default expression or by a constructor",
            help: "create the value through one of the union's case factories, or set AllowDefault = true on the marker";
    }
}

impl UsageError {
    pub fn default_initialization() -> ErrorBuilder<Unspanned, Self> {
        ErrorBuilder::new(Self::DefaultInitialization { span: None })
    }
}
