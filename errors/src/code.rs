use std::fmt;

/// Two-letter domain prefix of a diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// Union usage in user code
    DU,
    /// Union model extraction
    DX,
    /// Value contract: construction and dispatch
    DR,
    /// Front-end documents
    DF,
    /// Filesystem
    FS,
    /// Internal
    IN,
}

impl Domain {
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::DU => "DU",
            Self::DX => "DX",
            Self::DR => "DR",
            Self::DF => "DF",
            Self::FS => "FS",
            Self::IN => "IN",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Rendered as `{domain}{sequence}`, e.g. `DU1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode {
    pub domain: Domain,
    pub sequence: u16,
}

impl ErrorCode {
    pub const fn new(
        domain: Domain,
        sequence: u16,
    ) -> Self {
        Self { domain, sequence }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}{}", self.domain, self.sequence)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Blocks compilation.
    #[default]
    Error,
    Warning,
}

impl Severity {
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl From<Severity> for miette::Severity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        }
    }
}
