//! Initialization Safety Analyzer (`DU1`).

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use unionize_errors::{CompilerError, UsageError};
use unionize_syntax::{Compilation, Expression, SourceDocument};

use crate::{config::UnionizeConfig, extract::Extractor};

#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'c> {
    config: &'c UnionizeConfig,
    extractor: Extractor<'c>,
}

impl<'c> Analyzer<'c> {
    pub fn new(config: &'c UnionizeConfig) -> Self {
        Self {
            config,
            extractor: Extractor::new(config),
        }
    }

    /// Scans every document, returning diagnostics ordered by file then position.
    pub fn analyze(
        &self,
        compilation: &Compilation<'_>,
    ) -> Vec<CompilerError> {
        let mut found = compilation
            .documents()
            .par_iter()
            .flat_map_iter(|doc| {
                let name = doc.source_name();
                self.analyze_document(compilation, doc)
                    .into_iter()
                    .map(move |err| (name.clone(), err.span(), err))
            })
            .collect::<Vec<_>>();

        found.sort_by(|(a_name, a_span, _), (b_name, b_span, _)| {
            a_name
                .cmp(b_name)
                .then(a_span.cmp(b_span))
        });
        found
            .into_iter()
            .map(|(_, _, err)| err)
            .collect()
    }

    pub fn analyze_document(
        &self,
        compilation: &Compilation<'_>,
        doc: &SourceDocument,
    ) -> Vec<CompilerError> {
        if self.config.is_generated(doc.source_name()) {
            tracing::trace!(document = %doc.source_name(), "skipping generated document");
            return vec![];
        }

        doc.expressions
            .iter()
            .filter_map(|expr| self.check(compilation, doc, expr))
            .collect()
    }

    fn check(
        &self,
        compilation: &Compilation<'_>,
        doc: &SourceDocument,
        expr: &Expression,
    ) -> Option<CompilerError> {
        let ty = expr.ty.as_ref()?;

        let union = compilation
            .declarations_of(ty, doc.namespace.as_deref())
            .into_iter()
            .find_map(|id| {
                let eligible = self
                    .extractor
                    .eligible(compilation.decl(id))?;
                (!eligible.allow_default()).then_some(id)
            })?;

        tracing::debug!(
            document = %doc.source_name(),
            ty = %ty,
            kind = ?expr.kind,
            "disallowed union initialization"
        );

        let mut err = UsageError::default_initialization()
            .at_node(expr)
            .build();
        let decl = compilation.decl(union);
        if std::ptr::eq(compilation.document(union), doc)
            && let Some(span) = decl.span
        {
            err = err.with_secondary_label(span, format!("union '{}' declared here", decl.name));
        }
        Some(err.with_source(doc.source_name(), doc.text.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use unionize_errors::Span;

    const UNIONS: &str = r#"
file = "Unions.cs"
namespace = "Demo"
text = ""

[[types]]
name = "Shape"
kind = "struct"
modifiers = ["partial"]
attributes = [{ name = "DiscriminatedUnion" }]
members = [{ member = "type", name = "Cases", kind = "interface" }]

[[types]]
name = "Lenient"
kind = "class"
modifiers = ["partial"]
attributes = [{ name = "DiscriminatedUnion", args = { AllowDefault = true } }]
members = [{ member = "type", name = "Cases", kind = "interface" }]

[[types]]
name = "Plain"
kind = "struct"
"#;

    const PROGRAM: &str = r#"
file = "Program.cs"
namespace = "Demo"
text = "var a = default(Shape); Shape b = default; var c = new Shape(); var d = default(Lenient); var e = default(Plain); Shape f = new();"

[[expressions]]
kind = "default_expression"
type = "Shape"
span = [8, 22]

[[expressions]]
kind = "default_literal"
type = "Demo.Shape"
span = [34, 41]

[[expressions]]
kind = "object_creation"
type = "Shape"
span = [51, 62]

[[expressions]]
kind = "default_expression"
type = "Lenient"
span = [72, 88]

[[expressions]]
kind = "default_expression"
type = "Plain"
span = [98, 112]

[[expressions]]
kind = "implicit_object_creation"
type = "Shape"
span = [124, 129]

[[expressions]]
kind = "default_literal"
span = [0, 0]
"#;

    fn documents(program: &str) -> Vec<SourceDocument> {
        vec![
            SourceDocument::parse("unions.toml", UNIONS).unwrap(),
            SourceDocument::parse("program.toml", program).unwrap(),
        ]
    }

    #[test]
    fn flags_default_and_construction() {
        let docs = documents(PROGRAM);
        let config = UnionizeConfig::default();
        let compilation = Compilation::new(&docs);

        let found = Analyzer::new(&config).analyze(&compilation);
        assert_eq!(
            found
                .iter()
                .map(|err| err.span())
                .collect::<Vec<_>>(),
            vec![
                Some(Span::new(8, 22)),
                Some(Span::new(34, 41)),
                Some(Span::new(51, 62)),
                Some(Span::new(124, 129)),
            ]
        );

        for err in &found {
            assert_eq!(err.error_code().to_string(), "DU1");
            assert!(err.is_fatal());
            assert_eq!(
                err.message(),
                "discriminated union types are not allowed to be initialized by a default expression or by a constructor"
            );
            let (path, _) = err.extract_source().unwrap();
            assert_eq!(path.to_str(), Some("Program.cs"));
        }
    }

    #[test]
    fn generated_documents_are_exempt() {
        let generated = PROGRAM.replace("Program.cs", "Demo.Shape.g.cs");
        let docs = documents(&generated);
        let config = UnionizeConfig::default();
        let compilation = Compilation::new(&docs);

        assert!(
            Analyzer::new(&config)
                .analyze(&compilation)
                .is_empty()
        );
    }

    #[test]
    fn same_document_declaration_is_labelled() {
        let docs = vec![
            SourceDocument::parse(
                "inline.toml",
                r#"
text = "partial struct S {} var s = new S();"

[[types]]
name = "S"
kind = "struct"
modifiers = ["partial"]
attributes = [{ name = "DiscriminatedUnion" }]
members = [{ member = "type", name = "Cases", kind = "interface" }]
span = [0, 19]

[[expressions]]
kind = "object_creation"
type = "S"
span = [28, 35]
"#,
            )
            .unwrap(),
        ];
        let config = UnionizeConfig::default();
        let compilation = Compilation::new(&docs);

        let found = Analyzer::new(&config).analyze(&compilation);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].extract_secondary_labels(),
            vec![(Span::new(0, 19), "union 'S' declared here".to_string())]
        );
    }
}
