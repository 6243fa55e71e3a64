use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unionize_errors::{CompilerError, DocumentError, Span};

use crate::{Error, Expression, HostDiagnostic, Invocation, TextEdit, TypeDecl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// One host source file as seen by the union pipeline.
///
/// `text` is the host source; every span in the document indexes into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceDocument {
    #[serde(skip)]
    pub path: PathBuf,
    /// Host file name, e.g. `Program.cs`. Defaults to the document path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<TypeDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expressions: Vec<Expression>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invocations: Vec<Invocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<HostDiagnostic>,
}

impl SourceDocument {
    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let src = path.display().to_string();
        let data =
            std::fs::read_to_string(path).map_err(Error::from_with_source_init(src.clone()))?;
        tracing::trace!(path = %src, "loading source document");
        Self::parse(path, &data)
    }

    /// Deserializes a document, choosing the format by the extension of `path`.
    pub fn parse(
        path: impl Into<PathBuf>,
        data: &str,
    ) -> crate::Result<Self> {
        let path = path.into();
        let src = path.display().to_string();
        let format = Format::of(&path).ok_or_else(|| {
            Error::Compiler(
                DocumentError::unsupported_format(src.clone())
                    .unlocated()
                    .build(),
            )
        })?;

        let mut document: Self = match format {
            Format::Toml => toml::from_str(data).map_err(Error::from_with_source_init(src))?,
            Format::Json => serde_json::from_str(data).map_err(Error::from_with_source_init(src))?,
            Format::Yaml => serde_yaml::from_str(data).map_err(Error::from_with_source_init(src))?,
        };
        document.path = path;
        Ok(document)
    }

    /// Serializes the document back into the format of its path.
    pub fn render(&self) -> crate::Result<String> {
        let src = self.path.display().to_string();
        match Format::of(&self.path) {
            Some(Format::Toml) => Ok(toml::to_string_pretty(self)?),
            Some(Format::Json) => Ok(serde_json::to_string_pretty(self)?),
            Some(Format::Yaml) => Ok(serde_yaml::to_string(self)?),
            None => {
                Err(Error::Compiler(
                    DocumentError::unsupported_format(src)
                        .unlocated()
                        .build(),
                ))
            },
        }
    }

    pub fn source_name(&self) -> String {
        self.file
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn slice(
        &self,
        span: Span,
    ) -> Option<&str> {
        self.text.get(span.start..span.end)
    }

    /// Returns a copy of the document with `edit` applied to its text.
    ///
    /// Every span in the copy is remapped onto the edited text. `self` is left untouched.
    pub fn apply_edit(
        &self,
        edit: &TextEdit,
    ) -> Result<Self, CompilerError> {
        let text = edit.apply(&self.text)?;
        let mut edited = self.clone();
        edited.text = text;
        edited.remap_spans(edit);
        Ok(edited)
    }

    pub fn replace_span(
        &self,
        span: Span,
        text: impl Into<String>,
    ) -> Result<Self, CompilerError> {
        self.apply_edit(&TextEdit::replace(span, text))
    }

    fn remap_spans(
        &mut self,
        edit: &TextEdit,
    ) {
        fn remap_decl(
            decl: &mut TypeDecl,
            edit: &TextEdit,
        ) {
            decl.span = decl.span.map(|span| edit.remap(span));
            for member in &mut decl.members {
                match member {
                    crate::Member::Type(nested) => remap_decl(nested, edit),
                    crate::Member::Method(method) => {
                        method.span = method.span.map(|span| edit.remap(span));
                    },
                }
            }
        }

        for decl in &mut self.types {
            remap_decl(decl, edit);
        }
        for expr in &mut self.expressions {
            expr.span = edit.remap(expr.span);
        }
        for call in &mut self.invocations {
            call.span = edit.remap(call.span);
        }
        for diag in &mut self.diagnostics {
            diag.span = edit.remap(diag.span);
        }
    }
}
