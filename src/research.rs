//! Research page document with footnotes.
//!
//! The page is Markdown with `[^id]` references. Definitions are pulled out of
//! the body at parse time and shown one at a time in a footnotes panel.

use std::collections::HashMap;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use ratatui::text::{Line, Span};

use crate::theme::StyleMap;

/// Research page shipped with the binary.
pub const EMBEDDED_RESEARCH: &str = include_str!("../assets/research.md");

fn parser_options() -> Options {
    Options::ENABLE_FOOTNOTES
}

// ============================================================================
// Document
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub id: String,
    /// 1-based number in order of first reference.
    pub number: usize,
    pub text: String,
}

/// Parsed research page.
#[derive(Debug, Clone)]
pub struct ResearchDocument {
    source: String,
    footnotes: Vec<Footnote>,
    /// Footnote id of each reference in the body, in reading order.
    references: Vec<String>,
}

impl ResearchDocument {
    pub fn embedded() -> Self {
        Self::parse(EMBEDDED_RESEARCH)
    }

    pub fn parse(md: &str) -> Self {
        let mut references = Vec::new();
        let mut definitions: HashMap<String, String> = HashMap::new();
        let mut current: Option<(String, String)> = None;

        for event in Parser::new_ext(md, parser_options()) {
            match event {
                Event::Start(Tag::FootnoteDefinition(label)) => {
                    current = Some((label.into_string(), String::new()));
                }
                Event::End(TagEnd::FootnoteDefinition) => {
                    if let Some((id, text)) = current.take() {
                        definitions.insert(id, text.trim().to_string());
                    }
                }
                Event::FootnoteReference(label) => {
                    if current.is_none() {
                        references.push(label.into_string());
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push(' ');
                    }
                }
                _ => {}
            }
        }

        let mut footnotes: Vec<Footnote> = Vec::new();
        for id in &references {
            if footnotes.iter().any(|f| &f.id == id) {
                continue;
            }
            match definitions.remove(id) {
                Some(text) => footnotes.push(Footnote {
                    id: id.clone(),
                    number: footnotes.len() + 1,
                    text,
                }),
                None => tracing::warn!(footnote = %id, "Footnote referenced but never defined"),
            }
        }
        // Drop references to undefined notes so every trigger resolves.
        references.retain(|id| footnotes.iter().any(|f| &f.id == id));

        Self {
            source: md.to_string(),
            footnotes,
            references,
        }
    }

    pub fn footnotes(&self) -> &[Footnote] {
        &self.footnotes
    }

    pub fn footnote(&self, id: &str) -> Option<&Footnote> {
        self.footnotes.iter().find(|f| f.id == id)
    }

    /// Footnote ids of the body's references, in reading order.
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Styled body lines. `active` highlights that reference (by position).
    pub fn render_lines(&self, styles: &StyleMap, active: Option<usize>) -> DocumentLines {
        let mut lines: Vec<Line<'static>> = Vec::with_capacity(self.source.lines().count());
        let mut spans: Vec<Span<'static>> = Vec::with_capacity(4);
        let mut in_heading = false;
        let mut in_emphasis = false;
        let mut in_strong = false;
        let mut in_definition = false;
        let mut reference_idx = 0;
        let mut active_line = None;

        let flush = |spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
            if !spans.is_empty() {
                lines.push(Line::from(std::mem::take(spans)));
            }
        };

        for event in Parser::new_ext(&self.source, parser_options()) {
            if in_definition {
                if let Event::End(TagEnd::FootnoteDefinition) = event {
                    in_definition = false;
                }
                continue;
            }
            match event {
                Event::Start(Tag::FootnoteDefinition(_)) => in_definition = true,
                Event::Start(Tag::Heading { .. }) => in_heading = true,
                Event::End(TagEnd::Heading(_)) => {
                    flush(&mut spans, &mut lines);
                    lines.push(Line::from(""));
                    in_heading = false;
                }
                Event::End(TagEnd::Paragraph) => {
                    flush(&mut spans, &mut lines);
                    lines.push(Line::from(""));
                }
                Event::Start(Tag::Emphasis) => in_emphasis = true,
                Event::End(TagEnd::Emphasis) => in_emphasis = false,
                Event::Start(Tag::Strong) => in_strong = true,
                Event::End(TagEnd::Strong) => in_strong = false,
                Event::Start(Tag::Item) => spans.push(Span::raw("  \u{2022} ")),
                Event::End(TagEnd::Item) => flush(&mut spans, &mut lines),
                Event::Text(text) => {
                    let style = if in_heading {
                        styles.resolve("doc_heading")
                    } else if in_strong {
                        styles.resolve("doc_strong")
                    } else if in_emphasis {
                        styles.resolve("doc_emphasis")
                    } else {
                        styles.resolve("text")
                    };
                    spans.push(Span::styled(text.into_string(), style));
                }
                Event::Code(code) => {
                    spans.push(Span::styled(code.into_string(), styles.resolve("doc_code")));
                }
                Event::FootnoteReference(label) => {
                    let Some(note) = self.footnote(&label) else {
                        continue;
                    };
                    let role = if active == Some(reference_idx) {
                        // Pending spans become the next pushed line.
                        active_line = Some(lines.len());
                        "footnote_active"
                    } else {
                        "footnote_ref"
                    };
                    spans.push(Span::styled(format!("[{}]", note.number), styles.resolve(role)));
                    reference_idx += 1;
                }
                Event::SoftBreak => spans.push(Span::raw(" ")),
                Event::HardBreak => flush(&mut spans, &mut lines),
                _ => {}
            }
        }
        flush(&mut spans, &mut lines);

        while lines.last().is_some_and(|l| l.width() == 0) {
            lines.pop();
        }
        DocumentLines { lines, active_line }
    }
}

/// Output of [`ResearchDocument::render_lines`].
#[derive(Debug, Clone, Default)]
pub struct DocumentLines {
    pub lines: Vec<Line<'static>>,
    /// Index into `lines` of the highlighted reference.
    pub active_line: Option<usize>,
}

// ============================================================================
// Footnote navigation
// ============================================================================

/// Which reference is highlighted and which footnote the panel shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteState {
    cursor: Option<usize>,
    open: Option<String>,
}

impl FootnoteState {
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Id of the footnote shown in the panel, if open.
    pub fn open_id(&self) -> Option<&str> {
        self.open.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Move the highlight to the next reference, wrapping.
    pub fn next(&mut self, doc: &ResearchDocument) {
        let len = doc.references().len();
        if len == 0 {
            return;
        }
        self.cursor = Some(self.cursor.map_or(0, |c| (c + 1) % len));
    }

    /// Move the highlight to the previous reference, wrapping.
    pub fn prev(&mut self, doc: &ResearchDocument) {
        let len = doc.references().len();
        if len == 0 {
            return;
        }
        self.cursor = Some(self.cursor.map_or(len - 1, |c| (c + len - 1) % len));
    }

    /// Open the panel on the highlighted reference. Returns `false` when
    /// nothing is highlighted.
    pub fn open_selected(&mut self, doc: &ResearchDocument) -> bool {
        let Some(id) = self.cursor.and_then(|c| doc.references().get(c)).cloned() else {
            return false;
        };
        self.show(doc, &id)
    }

    /// Open the panel on footnote `id`. Unknown ids leave the state untouched.
    pub fn show(&mut self, doc: &ResearchDocument, id: &str) -> bool {
        if doc.footnote(id).is_none() {
            tracing::debug!(footnote = %id, "Ignoring unknown footnote");
            return false;
        }
        self.open = Some(id.to_string());
        true
    }

    pub fn close(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeVariant;

    const DOC: &str = "# Title\n\nFirst claim.[^a] Second claim.[^b]\n\nAgain.[^a]\n\n\
[^a]: Note A.\n\n[^b]: Note *B*.\n";

    #[test]
    fn test_embedded_document_has_footnotes() {
        let doc = ResearchDocument::embedded();
        assert_eq!(doc.footnotes().len(), 3);
        assert_eq!(doc.footnotes()[0].id, "forecast");
        assert_eq!(doc.footnotes()[0].number, 1);
    }

    #[test]
    fn test_definitions_extracted_in_reference_order() {
        let doc = ResearchDocument::parse(DOC);
        let ids: Vec<_> = doc.footnotes().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(doc.footnote("b").map(|f| f.text.as_str()), Some("Note B."));
        assert_eq!(doc.references(), &["a", "b", "a"]);
    }

    #[test]
    fn test_undefined_reference_dropped() {
        let doc = ResearchDocument::parse("Claim.[^x] Other.[^y]\n\n[^y]: Defined.\n");
        assert_eq!(doc.references(), &["y"]);
        assert!(doc.footnote("x").is_none());
    }

    #[test]
    fn test_body_excludes_definitions() {
        let doc = ResearchDocument::parse(DOC);
        let styles = StyleMap::for_variant(ThemeVariant::Dark);
        let text: String = doc
            .render_lines(&styles, None)
            .lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("First claim.[1]"));
        assert!(text.contains("Again.[1]"));
        assert!(!text.contains("Note A."));
    }

    #[test]
    fn test_active_reference_highlighted() {
        let doc = ResearchDocument::parse(DOC);
        let styles = StyleMap::for_variant(ThemeVariant::Dark);
        let rendered = doc.render_lines(&styles, Some(1));
        let marker = rendered
            .lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.content == "[2]")
            .unwrap();
        assert_eq!(marker.style, styles.resolve("footnote_active"));
    }

    #[test]
    fn test_active_line_points_at_reference() {
        let doc = ResearchDocument::parse(DOC);
        let styles = StyleMap::for_variant(ThemeVariant::Dark);
        assert_eq!(doc.render_lines(&styles, None).active_line, None);

        // "# Title", blank, "First claim.[1] Second claim.[2]", blank, "Again.[1]"
        let second = doc.render_lines(&styles, Some(1));
        assert_eq!(second.active_line, Some(2));
        let third = doc.render_lines(&styles, Some(2));
        assert_eq!(third.active_line, Some(4));
        let line = &third.lines[4];
        assert!(line.spans.iter().any(|s| s.content == "[1]"));
    }

    #[test]
    fn test_cursor_cycles_and_wraps() {
        let doc = ResearchDocument::parse(DOC);
        let mut state = FootnoteState::default();
        state.prev(&doc);
        assert_eq!(state.cursor(), Some(2));
        state.next(&doc);
        assert_eq!(state.cursor(), Some(0));
        state.next(&doc);
        state.next(&doc);
        state.next(&doc);
        assert_eq!(state.cursor(), Some(0));
    }

    #[test]
    fn test_open_and_close_panel() {
        let doc = ResearchDocument::parse(DOC);
        let mut state = FootnoteState::default();
        assert!(!state.open_selected(&doc));

        state.next(&doc);
        state.next(&doc);
        assert!(state.open_selected(&doc));
        assert_eq!(state.open_id(), Some("b"));

        state.close();
        assert!(!state.is_open());
    }

    #[test]
    fn test_unknown_footnote_ignored() {
        let doc = ResearchDocument::parse(DOC);
        let mut state = FootnoteState::default();
        assert!(state.show(&doc, "a"));
        assert!(!state.show(&doc, "zzz"));
        assert_eq!(state.open_id(), Some("a"));
    }

    #[test]
    fn test_empty_document() {
        let doc = ResearchDocument::parse("");
        let mut state = FootnoteState::default();
        state.next(&doc);
        assert_eq!(state.cursor(), None);
        assert!(doc
            .render_lines(&StyleMap::for_variant(ThemeVariant::Light), None)
            .lines
            .is_empty());
    }
}
