/// Declares the errors of one diagnostic domain.
///
/// ```ignore
/// define_domain_errors! {
///     pub enum UsageError(DU) => Usage {
///         DefaultInitialization = 1 {} => "message", help: "help";
///     }
/// }
/// ```
///
/// Each variant gains a trailing `span` field. Every field must appear in the message.
/// With `=> $wrapper` the enum also converts into that variant of [`crate::CompilerError`].
#[macro_export]
macro_rules! define_domain_errors {
    (@help) => { None };
    (@help $help:literal) => { Some($help) };
    (@severity) => { $crate::Severity::Error };
    (@severity $severity:ident) => { $crate::Severity::$severity };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($domain:ident) $(=> $wrapper:ident)? {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $seq:literal {
                    $($field:ident: $ftype:ty),* $(,)?
                } => $msg:literal
                $(, help: $help:literal)?
                $(, severity: $severity:ident)?
                ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant {
                    $($field: $ftype,)*
                    span: Option<$crate::Span>,
                },
            )*
        }

        impl $crate::DomainError for $name {
            fn code(&self) -> $crate::ErrorCode {
                let sequence = match self {
                    $(Self::$variant { .. } => $seq,)*
                };
                $crate::ErrorCode::new($crate::Domain::$domain, sequence)
            }

            fn message(&self) -> String {
                match self {
                    $(Self::$variant { $($field,)* .. } => format!($msg $(, $field = $field)*),)*
                }
            }

            fn help(&self) -> Option<&'static str> {
                match self {
                    $(Self::$variant { .. } => $crate::define_domain_errors!(@help $($help)?),)*
                }
            }

            fn severity(&self) -> $crate::Severity {
                match self {
                    $(Self::$variant { .. } => $crate::define_domain_errors!(@severity $($severity)?),)*
                }
            }

            fn span(&self) -> Option<$crate::Span> {
                match self {
                    $(Self::$variant { span, .. } => *span,)*
                }
            }
        }

        impl $crate::Locate for $name {
            fn locate(
                mut self,
                at: $crate::Span,
            ) -> Self {
                match &mut self {
                    $(Self::$variant { span, .. } => *span = Some(at),)*
                }
                self
            }
        }

        $(
            impl From<$name> for $crate::CompilerError {
                fn from(err: $name) -> Self {
                    Self::$wrapper(err)
                }
            }
        )?

        impl std::fmt::Display for $name {
            fn fmt(
                &self,
                f: &mut std::fmt::Formatter<'_>,
            ) -> std::fmt::Result {
                f.write_str(&$crate::DomainError::message(self))
            }
        }

        impl std::error::Error for $name {}
    };
}
