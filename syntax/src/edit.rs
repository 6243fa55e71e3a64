use serde::{Deserialize, Serialize};
use unionize_errors::{CompilerError, DocumentError, Span};

/// Replacement of a byte range of document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(
        span: Span,
        new_text: impl Into<String>,
    ) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(
        offset: usize,
        new_text: impl Into<String>,
    ) -> Self {
        Self::replace(Span::new(offset, offset), new_text)
    }

    /// Applies the edit to `text`, returning the edited copy.
    pub fn apply(
        &self,
        text: &str,
    ) -> Result<String, CompilerError> {
        let Span { start, end } = self.span;
        if start > end
            || end > text.len()
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return Err(DocumentError::span_out_of_range(start, end, text.len())
                .at(self.span)
                .build());
        }

        let mut edited = String::with_capacity(text.len() - (end - start) + self.new_text.len());
        edited.push_str(&text[..start]);
        edited.push_str(&self.new_text);
        edited.push_str(&text[end..]);
        Ok(edited)
    }

    /// Maps a span of the original text onto the edited text.
    ///
    /// Offsets before the edit are kept, offsets after it shift by the length delta,
    /// and offsets strictly inside the replaced range clamp to the end of the new text.
    /// Text inserted exactly at a span boundary lands outside the span: a span starting
    /// there moves past it, a span ending there keeps its end.
    pub fn remap(
        &self,
        span: Span,
    ) -> Span {
        let start = self.remap_offset(span.start, true);
        let end = self.remap_offset(span.end, false);
        Span::new(start, end.max(start))
    }

    fn remap_offset(
        &self,
        offset: usize,
        is_start: bool,
    ) -> usize {
        let replaced_end = self.span.start + self.new_text.len();
        if offset > self.span.end || (offset == self.span.end && (is_start || !self.span.is_empty())) {
            offset - self.span.end + replaced_end
        } else if offset > self.span.start {
            replaced_end
        } else {
            offset
        }
    }
}
