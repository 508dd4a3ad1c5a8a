//! Directive grammar for embedded-content references.
//!
//! A directive is a single comment-style token `<!-- kind:id -->` occurring
//! anywhere in lesson markdown, on its own line or inline. The kind set is
//! closed; a token with an unknown kind is not a directive and stays prose.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Kinds of embedded content a directive can point to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedKind {
    /// A practice exercise, resolvable through the content repository.
    Exercise,
    /// A shared dataset, fetched by the rendering layer on demand.
    Dataset,
    /// An external Colab notebook.
    Colab,
}

impl EmbedKind {
    /// The kind token as written in a directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::Dataset => "dataset",
            Self::Colab => "colab",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "exercise" => Some(Self::Exercise),
            "dataset" => Some(Self::Dataset),
            "colab" => Some(Self::Colab),
            _ => None,
        }
    }
}

impl std::fmt::Display for EmbedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed reference to external content, extracted from a directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedReference {
    /// What the directive points at.
    pub kind: EmbedKind,
    /// Opaque identifier, `[A-Za-z0-9_-]+`.
    pub id: String,
    /// The exact matched directive text, kept for diagnostics and
    /// round-trip reconstruction.
    pub raw: String,
}

/// Matches `<!-- kind:id -->` with the closed kind set.
///
/// `Regex` carries no cursor between calls, so matching is stateless
/// per invocation.
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*(exercise|dataset|colab):([A-Za-z0-9_-]+)\s*-->").expect("valid regex")
});

/// A directive match with its byte span in the source.
pub(crate) struct DirectiveMatch {
    pub reference: EmbedReference,
    pub start: usize,
    pub end: usize,
}

/// Iterate all well-formed directives in source order, non-overlapping.
pub(crate) fn find_directives(markdown: &str) -> impl Iterator<Item = DirectiveMatch> + '_ {
    DIRECTIVE_RE.captures_iter(markdown).filter_map(|caps| {
        let matched = caps.get(0)?;
        let kind = EmbedKind::from_token(caps.get(1)?.as_str())?;
        Some(DirectiveMatch {
            reference: EmbedReference {
                kind,
                id: caps[2].to_string(),
                raw: matched.as_str().to_string(),
            },
            start: matched.start(),
            end: matched.end(),
        })
    })
}

/// True when the text contains at least one well-formed directive.
pub(crate) fn has_directive(markdown: &str) -> bool {
    DIRECTIVE_RE.is_match(markdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(markdown: &str) -> EmbedReference {
        let mut matches: Vec<_> = find_directives(markdown).collect();
        assert_eq!(matches.len(), 1, "expected exactly one directive");
        matches.remove(0).reference
    }

    #[test]
    fn matches_all_kinds() {
        assert_eq!(single("<!-- exercise:ex-01 -->").kind, EmbedKind::Exercise);
        assert_eq!(single("<!-- dataset:ds_1 -->").kind, EmbedKind::Dataset);
        assert_eq!(single("<!-- colab:nb42 -->").kind, EmbedKind::Colab);
    }

    #[test]
    fn id_allows_word_chars_and_hyphen() {
        let reference = single("<!-- exercise:Ex_01-b -->");
        assert_eq!(reference.id, "Ex_01-b");
    }

    #[test]
    fn unknown_kind_does_not_match() {
        assert!(find_directives("<!-- essay:ex-01 -->").next().is_none());
        assert!(!has_directive("<!-- excercise:ex-01 -->"));
    }

    #[test]
    fn whitespace_around_token_is_optional() {
        assert_eq!(single("<!--exercise:ex-01-->").id, "ex-01");
        assert_eq!(single("<!--   exercise:ex-01   -->").id, "ex-01");
    }

    #[test]
    fn raw_is_exact_matched_text() {
        let reference = single("before <!--  exercise:ex-01 --> after");
        assert_eq!(reference.raw, "<!--  exercise:ex-01 -->");
    }

    #[test]
    fn id_with_illegal_chars_does_not_match() {
        assert!(find_directives("<!-- exercise:ex 01 -->").next().is_none());
        assert!(find_directives("<!-- exercise: -->").next().is_none());
    }

    #[test]
    fn spans_cover_the_match() {
        let markdown = "ab <!-- dataset:d1 --> cd";
        let m = find_directives(markdown).next().expect("one match");
        assert_eq!(&markdown[m.start..m.end], m.reference.raw);
    }
}
