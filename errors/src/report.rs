//! Rendering of a [`CompilerError`] through miette.

use miette::{Diagnostic, LabeledSpan, NamedSource};

use crate::{CompilerError, Severity, Span};

/// A snapshot of one error, detached from the error tree so miette can own it.
#[derive(Debug)]
pub struct Report {
    code: String,
    message: String,
    severity: Severity,
    help: Option<&'static str>,
    source: Option<NamedSource<String>>,
    primary: Option<Span>,
    secondary: Vec<(Span, String)>,
}

impl Report {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&CompilerError> for Report {
    fn from(err: &CompilerError) -> Self {
        let source = err
            .extract_source()
            .map(|(path, text)| NamedSource::new(path.display().to_string(), text.to_string()));

        Self {
            code: err.error_code().to_string(),
            message: err.message(),
            severity: err.severity(),
            help: err.help(),
            source,
            primary: err.span(),
            secondary: err.extract_secondary_labels(),
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Report {}

impl Diagnostic for Report {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(&self.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity.into())
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help
            .map(|help| Box::new(help) as Box<dyn std::fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source
            .as_ref()
            .map(|it| it as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        // labels without source text would point at nothing
        self.source.as_ref()?;

        let primary = self
            .primary
            .map(|span| LabeledSpan::new_primary_with_span(Some(self.message.clone()), span));
        let secondary = self
            .secondary
            .iter()
            .map(|(span, label)| LabeledSpan::new_with_span(Some(label.clone()), *span));

        Some(Box::new(primary.into_iter().chain(secondary)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractionError, UsageError};

    #[test]
    fn labels_need_source() {
        let err = UsageError::default_initialization()
            .at(8..22)
            .build();
        let report = Report::from(&err);

        assert_eq!(report.code(), "DU1");
        assert!(report.labels().is_none());
        assert_eq!(report.severity(), Some(miette::Severity::Error));
    }

    #[test]
    fn primary_and_secondary_labels() {
        let err = UsageError::default_initialization()
            .at(8..22)
            .build()
            .with_secondary_label(Span::new(0, 5), "union 'Shape' declared here")
            .with_source("Program.cs", "Shape s = default(Shape);");
        let report = Report::from(&err);

        let labels = report
            .labels()
            .unwrap()
            .collect::<Vec<_>>();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 8);
        assert_eq!(labels[0].len(), 14);
        assert_eq!(labels[1].label(), Some("union 'Shape' declared here"));
        assert!(report.help().is_some());
    }

    #[test]
    fn unlocated_errors_render() {
        let err = ExtractionError::duplicate_case("Shape", "Circle")
            .unlocated()
            .build();
        let rendered = format!("{:?}", err.to_report());

        assert!(rendered.contains("DX2"));
        assert!(rendered.contains("declares case 'Circle' more than once"));
    }
}
