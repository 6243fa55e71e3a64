//! Exhaustiveness Assist: completes `Match` calls the host reports as missing arguments.

use unionize_errors::{CompilerError, InternalError};
use unionize_syntax::{Argument, Compilation, HostDiagnostic, Invocation, SourceDocument, TextEdit};

use crate::{config::UnionizeConfig, extract::Extractor, model::Union};

pub const FIX_TITLE: &str = "Implement missing union cases.";

const DISPATCH: &str = "Match";
const NOT_IMPLEMENTED: &str = "throw new System.NotImplementedException()";

/// Callback for a case of the given arity whose body always throws.
pub fn placeholder(arity: usize) -> String {
    let inputs = match arity {
        0 => "()".to_string(),
        1 => "arg".to_string(),
        n => {
            let names = (1..=n)
                .map(|i| format!("arg{i}"))
                .collect::<Vec<_>>();
            format!("({})", names.join(", "))
        },
    };
    format!("{inputs} => {NOT_IMPLEMENTED}")
}

/// A single offered fix. Applying it never touches the original document.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeFix {
    pub title: &'static str,
    pub document: String,
    /// Index of the completed call in [`SourceDocument::invocations`].
    pub invocation: usize,
    pub resolves: HostDiagnostic,
    pub appended: Vec<Argument>,
    pub edit: TextEdit,
}

impl CodeFix {
    pub fn apply(
        &self,
        doc: &SourceDocument,
    ) -> Result<SourceDocument, CompilerError> {
        let mut fixed = doc.clone();
        fixed
            .diagnostics
            .retain(|diag| diag != &self.resolves);

        let Some(call) = fixed.invocations.get_mut(self.invocation) else {
            return Err(InternalError::internal(format!(
                "invocation {} is not part of '{}'",
                self.invocation,
                doc.source_name()
            ))
            .into());
        };
        call.arguments
            .extend(self.appended.iter().cloned());

        fixed.apply_edit(&self.edit)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Assist<'c> {
    extractor: Extractor<'c>,
    diagnostic_id: &'c str,
}

impl<'c> Assist<'c> {
    pub fn new(config: &'c UnionizeConfig) -> Self {
        Self {
            extractor: Extractor::new(config),
            diagnostic_id: &config.assist.diagnostic_id,
        }
    }

    /// Every fix offered for the host diagnostics of `doc`.
    pub fn fixes(
        &self,
        compilation: &Compilation<'_>,
        doc: &SourceDocument,
    ) -> Vec<CodeFix> {
        doc.diagnostics
            .iter()
            .filter_map(|diag| self.fix_for(compilation, doc, diag))
            .collect()
    }

    pub fn fix_for(
        &self,
        compilation: &Compilation<'_>,
        doc: &SourceDocument,
        diag: &HostDiagnostic,
    ) -> Option<CodeFix> {
        if diag.id != self.diagnostic_id {
            return None;
        }

        let (index, call) = doc
            .invocations
            .iter()
            .enumerate()
            .filter(|(_, call)| call.method == DISPATCH && call.span.contains(&diag.span))
            .min_by_key(|(_, call)| call.span.len())?;

        let union = self.union_of(compilation, doc, call)?;
        let appended = missing_arguments(&union, call);
        if appended.is_empty() {
            tracing::debug!(call = %call.callee, "dispatch call already covers every case");
            return None;
        }

        let edit = completion_edit(doc, call, &appended)?;
        tracing::debug!(
            document = %doc.source_name(),
            union = %union.descriptor.qualified,
            appended = appended.len(),
            "offering union case completion"
        );

        Some(CodeFix {
            title: FIX_TITLE,
            document: doc.source_name(),
            invocation: index,
            resolves: diag.clone(),
            appended,
            edit,
        })
    }

    fn union_of(
        &self,
        compilation: &Compilation<'_>,
        doc: &SourceDocument,
        call: &Invocation,
    ) -> Option<Union> {
        let receiver = call.receiver.as_ref()?;
        let id = compilation
            .declarations_of(receiver, doc.namespace.as_deref())
            .into_iter()
            .find(|id| {
                self.extractor
                    .eligible(compilation.decl(*id))
                    .is_some()
            })?;

        match self.extractor.extract(compilation, id) {
            Ok(union) => union,
            Err(err) => {
                tracing::warn!(
                    receiver = %receiver,
                    error = %err,
                    "declining fix, receiver union could not be extracted"
                );
                None
            },
        }
    }
}

fn missing_arguments(
    union: &Union,
    call: &Invocation,
) -> Vec<Argument> {
    let positional = call.positional_count();
    let named = call.named_arguments();

    union
        .cases
        .iter()
        .enumerate()
        .filter(|(i, case)| *i >= positional && !named.contains(case.name.as_str()))
        .map(|(_, case)| Argument::named(&case.name, placeholder(case.arity())))
        .collect()
}

/// Insertion of `appended` just before the closing parenthesis of `call`.
fn completion_edit(
    doc: &SourceDocument,
    call: &Invocation,
    appended: &[Argument],
) -> Option<TextEdit> {
    let Some(text) = doc.slice(call.span) else {
        tracing::warn!(
            document = %doc.source_name(),
            span = ?call.span,
            "declining fix, call span is outside the document text"
        );
        return None;
    };

    let trimmed = text.trim_end();
    if !trimmed.ends_with(')') {
        tracing::warn!(call = %text, "declining fix, call text does not end with ')'");
        return None;
    }
    let close = call.span.start + trimmed.len() - 1;

    let list = appended
        .iter()
        .map(Argument::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let text = if call.arguments.is_empty() {
        list
    } else {
        format!(", {list}")
    };
    Some(TextEdit::insert(close, text))
}

#[cfg(test)]
mod test {
    use super::*;
    use unionize_errors::Span;
    use unionize_syntax::TypeRef;

    const UNIONS: &str = r#"
file = "Shape.cs"
namespace = "Demo"

[[types]]
name = "Shape"
kind = "struct"
modifiers = ["partial"]
attributes = [{ name = "DiscriminatedUnion" }]

[[types.members]]
member = "type"
name = "Cases"
kind = "interface"
members = [
    { member = "method", name = "A" },
    { member = "method", name = "B", parameters = [{ name = "value", type = "int" }] },
    { member = "method", name = "C", parameters = [{ name = "x", type = "int" }, { name = "y", type = "int" }] },
]

[[types]]
name = "Plain"
kind = "class"
"#;

    const THROW: &str = "throw new System.NotImplementedException()";

    fn program(
        call: &str,
        receiver: &str,
        arguments: &[(Option<&str>, &str)],
    ) -> SourceDocument {
        let text = format!("var n = {call};");
        let span = Span::new(8, 8 + call.len());
        SourceDocument {
            file: Some("Program.cs".into()),
            namespace: Some("Demo".into()),
            text,
            invocations: vec![Invocation {
                callee: "s.Match".into(),
                method: call[2..]
                    .split('(')
                    .next()
                    .unwrap()
                    .into(),
                receiver: Some(TypeRef::simple(receiver)),
                arguments: arguments
                    .iter()
                    .map(|(name, expr)| {
                        match name {
                            Some(name) => Argument::named(*name, *expr),
                            None => Argument::positional(*expr),
                        }
                    })
                    .collect(),
                span,
            }],
            diagnostics: vec![HostDiagnostic {
                id: "CS7036".into(),
                span: Span::new(10, 15),
            }],
            ..Default::default()
        }
    }

    fn fixed(doc: SourceDocument) -> Option<SourceDocument> {
        let docs = vec![SourceDocument::parse("shape.toml", UNIONS).unwrap(), doc];
        let config = UnionizeConfig::default();
        let compilation = Compilation::new(&docs);

        let mut fixes = Assist::new(&config).fixes(&compilation, &docs[1]);
        assert!(fixes.len() <= 1);
        let fix = fixes.pop()?;
        assert_eq!(fix.title, "Implement missing union cases.");
        Some(fix.apply(&docs[1]).unwrap())
    }

    #[test]
    fn placeholders_follow_arity() {
        assert_eq!(placeholder(0), format!("() => {THROW}"));
        assert_eq!(placeholder(1), format!("arg => {THROW}"));
        assert_eq!(placeholder(3), format!("(arg1, arg2, arg3) => {THROW}"));
    }

    #[test]
    fn completes_named_call() {
        let original = program("s.Match(A: () => 1)", "Shape", &[(Some("A"), "() => 1")]);
        let doc = fixed(original.clone()).unwrap();

        assert_eq!(
            doc.text,
            format!("var n = s.Match(A: () => 1, B: arg => {THROW}, C: (arg1, arg2) => {THROW});")
        );
        assert_eq!(doc.slice(doc.invocations[0].span), doc.text.get(8..doc.text.len() - 1));
        assert_eq!(
            doc.invocations[0]
                .arguments
                .iter()
                .map(|arg| arg.name.as_deref())
                .collect::<Vec<_>>(),
            vec![Some("A"), Some("B"), Some("C")]
        );
        assert!(doc.diagnostics.is_empty());

        assert_eq!(original.text, "var n = s.Match(A: () => 1);");
        assert_eq!(original.diagnostics.len(), 1);
    }

    #[test_case::test_case(
        "s.Match(() => 1, x => x)", &[(None, "() => 1"), (None, "x => x")],
        "s.Match(() => 1, x => x, C: (arg1, arg2) => throw new System.NotImplementedException())";
        "positional arguments cover leading cases"
    )]
    #[test_case::test_case(
        "s.Match(C: (a, b) => a)", &[(Some("C"), "(a, b) => a")],
        "s.Match(C: (a, b) => a, A: () => throw new System.NotImplementedException(), B: arg => throw new System.NotImplementedException())";
        "missing cases keep declared order"
    )]
    #[test_case::test_case(
        "s.Match( )", &[],
        "s.Match( A: () => throw new System.NotImplementedException(), B: arg => throw new System.NotImplementedException(), C: (arg1, arg2) => throw new System.NotImplementedException())";
        "empty call"
    )]
    fn completes_call(
        call: &str,
        arguments: &[(Option<&str>, &str)],
        expected: &str,
    ) {
        let doc = fixed(program(call, "Shape", arguments)).unwrap();
        assert_eq!(doc.text, format!("var n = {expected};"));
    }

    #[test]
    fn declines_unrelated_calls() {
        let complete = program(
            "s.Match(() => 1, x => x, (a, b) => a)",
            "Shape",
            &[(None, "() => 1"), (None, "x => x"), (None, "(a, b) => a")],
        );
        assert!(fixed(complete).is_none());

        assert!(fixed(program("s.Match()", "Plain", &[])).is_none());
        assert!(fixed(program("s.Other()", "Shape", &[])).is_none());

        let mut other_id = program("s.Match()", "Shape", &[]);
        other_id.diagnostics[0].id = "CS1501".into();
        assert!(fixed(other_id).is_none());

        let mut outside = program("s.Match()", "Shape", &[]);
        outside.diagnostics[0].span = Span::new(0, 3);
        assert!(fixed(outside).is_none());

        let mut malformed = program("s.Match()", "Shape", &[]);
        malformed.text = "var n = s.Match(;".into();
        assert!(fixed(malformed).is_none());
    }

    #[test]
    fn innermost_call_is_completed() {
        let text = "var n = s.Match(A: () => t.Match(A: () => 1), B: b => 2, C: (x, y) => 3);";
        let outer = Span::new(8, 72);
        let inner = Span::new(25, 44);

        let call = |span: Span, callee: &str, arguments: Vec<Argument>| Invocation {
            callee: callee.into(),
            method: "Match".into(),
            receiver: Some(TypeRef::simple("Shape")),
            arguments,
            span,
        };
        let doc = SourceDocument {
            file: Some("Program.cs".into()),
            namespace: Some("Demo".into()),
            text: text.into(),
            invocations: vec![
                call(outer, "s.Match", vec![
                    Argument::named("A", "() => t.Match(A: () => 1)"),
                    Argument::named("B", "b => 2"),
                    Argument::named("C", "(x, y) => 3"),
                ]),
                call(inner, "t.Match", vec![Argument::named("A", "() => 1")]),
            ],
            diagnostics: vec![HostDiagnostic {
                id: "CS7036".into(),
                span: Span::new(27, 32),
            }],
            ..Default::default()
        };
        assert_eq!(doc.slice(inner), Some("t.Match(A: () => 1)"));
        assert_eq!(doc.slice(outer), text.get(8..text.len() - 1));

        let doc = fixed(doc).unwrap();
        assert_eq!(doc.invocations[0].arguments.len(), 3);
        assert_eq!(doc.invocations[1].arguments.len(), 3);
        assert!(doc.text.starts_with(&format!(
            "var n = s.Match(A: () => t.Match(A: () => 1, B: arg => {THROW}, C: (arg1, arg2) => {THROW}), B: b => 2"
        )));
        assert_eq!(doc.slice(doc.invocations[0].span), doc.text.get(8..doc.text.len() - 1));
    }
}
