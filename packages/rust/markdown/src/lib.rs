//! Lesson markdown segmentation.
//!
//! Scans raw lesson markdown for embed directives and splits it into an
//! ordered sequence of prose and embed segments. The grammar is a closed
//! mini-language (`<!-- kind:id -->`); everything else is prose. Segmenting
//! is pure computation and cannot fail.

mod grammar;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use grammar::{EmbedKind, EmbedReference};

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// A contiguous piece of a parsed lesson document, in source order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentSegment {
    /// Markdown between directives, trimmed of surrounding whitespace.
    Prose { text: String },
    /// A directive, carried verbatim together with its parsed reference.
    Embed {
        text: String,
        reference: EmbedReference,
    },
}

/// The ordered document model produced by [`segment`].
///
/// `embeds` is exactly the ordered projection of the embed segments'
/// references; the rendering layer can walk either view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// All segments, in source order.
    pub segments: Vec<ContentSegment>,
    /// References of the embed segments, in the same order.
    pub embeds: Vec<EmbedReference>,
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// Split raw lesson markdown into ordered prose and embed segments.
///
/// Scans left to right for non-overlapping directive matches. Text between
/// matches becomes a trimmed prose segment unless it is entirely whitespace;
/// each match becomes an embed segment carrying its exact matched text.
/// Input with no matches yields a single prose segment (or none when blank).
pub fn segment(markdown: &str) -> ParsedDocument {
    let mut segments: Vec<ContentSegment> = Vec::new();
    let mut embeds: Vec<EmbedReference> = Vec::new();
    let mut cursor = 0;

    for found in grammar::find_directives(markdown) {
        push_prose(&mut segments, &markdown[cursor..found.start]);
        embeds.push(found.reference.clone());
        segments.push(ContentSegment::Embed {
            text: found.reference.raw.clone(),
            reference: found.reference,
        });
        cursor = found.end;
    }
    push_prose(&mut segments, &markdown[cursor..]);

    debug!(
        segments = segments.len(),
        embeds = embeds.len(),
        "segmented lesson markdown"
    );

    ParsedDocument { segments, embeds }
}

/// True iff [`segment`] would yield at least one embed for this input.
///
/// Carries no matcher state between calls.
pub fn contains_embeds(markdown: &str) -> bool {
    grammar::has_directive(markdown)
}

/// Emit a prose segment for `span` unless it is entirely whitespace.
fn push_prose(segments: &mut Vec<ContentSegment>, span: &str) {
    let trimmed = span.trim();
    if !trimmed.is_empty() {
        segments.push(ContentSegment::Prose {
            text: trimmed.to_string(),
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn embed_ids(doc: &ParsedDocument) -> Vec<&str> {
        doc.embeds.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn plain_markdown_is_one_prose_segment() {
        let doc = segment("  # Intro\n\nJust text.\n");
        assert_eq!(
            doc.segments,
            vec![ContentSegment::Prose {
                text: "# Intro\n\nJust text.".into()
            }]
        );
        assert!(doc.embeds.is_empty());
    }

    #[test]
    fn blank_input_yields_no_segments() {
        assert_eq!(segment(""), ParsedDocument::default());
        assert_eq!(segment("   \n\t\n"), ParsedDocument::default());
    }

    #[test]
    fn interleaves_prose_and_embeds_in_source_order() {
        let doc = segment(
            "Intro text\n<!-- exercise:ex-01 -->\nMore text\n<!-- dataset:ds-1 -->",
        );

        assert_eq!(doc.segments.len(), 4);
        assert_eq!(
            doc.segments[0],
            ContentSegment::Prose {
                text: "Intro text".into()
            }
        );
        match &doc.segments[1] {
            ContentSegment::Embed { text, reference } => {
                assert_eq!(text, "<!-- exercise:ex-01 -->");
                assert_eq!(reference.kind, EmbedKind::Exercise);
                assert_eq!(reference.id, "ex-01");
            }
            other => panic!("expected embed, got {other:?}"),
        }
        assert_eq!(
            doc.segments[2],
            ContentSegment::Prose {
                text: "More text".into()
            }
        );
        assert_eq!(embed_ids(&doc), vec!["ex-01", "ds-1"]);
        assert_eq!(doc.embeds[1].kind, EmbedKind::Dataset);
    }

    #[test]
    fn adjacent_directives_produce_no_empty_prose() {
        let doc = segment("<!-- exercise:a --><!-- exercise:b -->\n  \n<!-- colab:c -->");
        assert_eq!(doc.segments.len(), 3);
        assert!(doc
            .segments
            .iter()
            .all(|s| matches!(s, ContentSegment::Embed { .. })));
        assert_eq!(embed_ids(&doc), vec!["a", "b", "c"]);
    }

    #[test]
    fn inline_directive_splits_surrounding_prose() {
        let doc = segment("see <!-- colab:nb-1 --> for the notebook");
        assert_eq!(doc.segments.len(), 3);
        assert_eq!(
            doc.segments[0],
            ContentSegment::Prose { text: "see".into() }
        );
        assert_eq!(
            doc.segments[2],
            ContentSegment::Prose {
                text: "for the notebook".into()
            }
        );
    }

    #[test]
    fn misspelled_kind_stays_prose() {
        let doc = segment("before <!-- excercise:ex-01 --> after");
        assert_eq!(doc.segments.len(), 1);
        assert!(doc.embeds.is_empty());
    }

    #[test]
    fn embeds_match_ordered_projection_of_segments() {
        let doc = segment("a <!-- exercise:x --> b <!-- dataset:y --> c <!-- colab:z -->");
        let projected: Vec<_> = doc
            .segments
            .iter()
            .filter_map(|s| match s {
                ContentSegment::Embed { reference, .. } => Some(reference.clone()),
                ContentSegment::Prose { .. } => None,
            })
            .collect();
        assert_eq!(projected, doc.embeds);
    }

    #[test]
    fn raw_text_survives_odd_spacing() {
        let doc = segment("x <!--exercise:tight--> y");
        assert_eq!(doc.embeds[0].raw, "<!--exercise:tight-->");
        match &doc.segments[1] {
            ContentSegment::Embed { text, .. } => assert_eq!(text, "<!--exercise:tight-->"),
            other => panic!("expected embed, got {other:?}"),
        }
    }

    #[test]
    fn contains_embeds_agrees_with_segment() {
        let with = "intro <!-- exercise:ex-01 -->";
        let without = "intro only";

        assert!(contains_embeds(with));
        assert!(!contains_embeds(without));

        // No scan state leaks into a subsequent segment() call.
        let doc = segment(with);
        assert_eq!(doc.embeds.len(), 1);
        assert_eq!(doc.embeds[0].id, "ex-01");
        assert!(segment(without).embeds.is_empty());
    }

    #[test]
    fn repeated_segmentation_is_stable() {
        let input = "a <!-- exercise:x --> b";
        assert_eq!(segment(input), segment(input));
    }

    #[test]
    fn document_model_json_shape() {
        let doc = segment("intro <!-- exercise:ex-01 -->");
        let json = serde_json::to_string(&doc).expect("serialize");
        assert!(json.contains("\"kind\":\"prose\""));
        assert!(json.contains("\"kind\":\"embed\""));
        assert!(json.contains("\"kind\":\"exercise\""));
        let back: ParsedDocument = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, doc);
    }

    #[test]
    fn lesson_fixture_segments() {
        let markdown = std::fs::read_to_string("../../../fixtures/lessons/lesson-01.md")
            .expect("read fixture");
        let doc = segment(&markdown);

        assert_eq!(doc.embeds.len(), 3);
        assert_eq!(doc.embeds[0].kind, EmbedKind::Exercise);
        assert_eq!(doc.embeds[0].id, "ex-hello");
        assert_eq!(doc.embeds[1].kind, EmbedKind::Exercise);
        assert_eq!(doc.embeds[1].id, "quiz-ownership");
        assert_eq!(doc.embeds[2].kind, EmbedKind::Colab);
        // Prose and embeds interleave in source order
        assert!(matches!(doc.segments[0], ContentSegment::Prose { .. }));
    }
}
