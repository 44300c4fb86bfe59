//! Display models for the passages that back an answer.
//!
//! Two presentations exist. The inline list is always visible, shows the
//! score as a one-decimal percentage and cuts long passages. The collapsible
//! list sits behind a toggle, shows the raw score to four decimals and the
//! full passage.

use crate::api::{Reference, ResourceId};
use serde::{Deserialize, Serialize};

pub const TRUNCATE_CHARS: usize = 200;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReferenceStyle {
    Inline,
    #[default]
    Collapsible,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub chunk_id: Option<ResourceId>,
    pub file_id: Option<ResourceId>,
    pub similarity: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineReferences {
    pub entries: Vec<ReferenceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollapsibleReferences {
    pub toggle_label: String,
    pub expanded: bool,
    /// Empty while collapsed.
    pub entries: Vec<ReferenceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "style", rename_all = "camelCase")]
pub enum ReferencesView {
    Inline(InlineReferences),
    Collapsible(CollapsibleReferences),
}

/// `0.8765` → `87.7%`, rounded once to tenths of a percent, halves away
/// from zero.
pub fn percent_label(score: f64) -> String {
    let score = if score.is_finite() { score } else { 0.0 };
    let tenths = (score * 1000.0).round();
    format!("{:.1}%", tenths / 10.0)
}

/// `0.8765` → `0.8765`.
pub fn fraction_label(score: f64) -> String {
    let score = if score.is_finite() { score } else { 0.0 };
    format!("{:.4}", score)
}

/// Keep the first `max_chars` characters and mark the cut.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

pub fn toggle_label(count: usize) -> String {
    format!("참고 문서 ({})", count)
}

/// Inline list. Nothing to render for an empty input.
pub fn inline_references(refs: &[Reference]) -> Option<InlineReferences> {
    if refs.is_empty() {
        return None;
    }
    let entries = refs
        .iter()
        .map(|r| ReferenceEntry {
            chunk_id: r.chunk_id.clone(),
            file_id: r.file_id.clone(),
            similarity: percent_label(r.similarity_score),
            text: truncate_text(&r.chunk_text, TRUNCATE_CHARS),
        })
        .collect();
    Some(InlineReferences { entries })
}

/// Collapsible list. The toggle is always present, labelled with the count.
pub fn collapsible_references(refs: &[Reference], expanded: bool) -> CollapsibleReferences {
    let entries = if expanded {
        refs.iter()
            .map(|r| ReferenceEntry {
                chunk_id: r.chunk_id.clone(),
                file_id: r.file_id.clone(),
                similarity: fraction_label(r.similarity_score),
                text: r.chunk_text.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };
    CollapsibleReferences {
        toggle_label: toggle_label(refs.len()),
        expanded,
        entries,
    }
}

pub fn render(style: ReferenceStyle, refs: &[Reference], expanded: bool) -> Option<ReferencesView> {
    match style {
        ReferenceStyle::Inline => inline_references(refs).map(ReferencesView::Inline),
        ReferenceStyle::Collapsible => Some(ReferencesView::Collapsible(collapsible_references(
            refs, expanded,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(text: &str, score: f64) -> Reference {
        Reference {
            chunk_id: Some(ResourceId::Number(1)),
            chunk_text: text.to_string(),
            similarity_score: score,
            file_id: None,
        }
    }

    #[test]
    fn test_score_labels() {
        assert_eq!(percent_label(0.8765), "87.7%");
        assert_eq!(percent_label(1.0), "100.0%");
        assert_eq!(percent_label(0.0), "0.0%");
        assert_eq!(percent_label(0.123), "12.3%");
        assert_eq!(percent_label(0.87649), "87.6%");
        assert_eq!(fraction_label(0.8765), "0.8765");
        assert_eq!(fraction_label(0.5), "0.5000");
        assert_eq!(fraction_label(f64::NAN), "0.0000");
    }

    #[test]
    fn test_inline_truncates_long_passages() {
        let long = "가".repeat(250);
        let view = inline_references(&[reference(&long, 0.8765)]).unwrap();
        let entry = &view.entries[0];
        assert_eq!(entry.similarity, "87.7%");
        assert_eq!(entry.text.chars().count(), TRUNCATE_CHARS + ELLIPSIS.len());
        assert!(entry.text.ends_with(ELLIPSIS));
        assert!(entry.text.starts_with(&"가".repeat(200)));
    }

    #[test]
    fn test_inline_keeps_short_passages() {
        let exact = "a".repeat(200);
        let view = inline_references(&[reference(&exact, 0.1)]).unwrap();
        assert_eq!(view.entries[0].text, exact);
    }

    #[test]
    fn test_empty_references() {
        assert_eq!(inline_references(&[]), None);
        assert_eq!(render(ReferenceStyle::Inline, &[], true), None);

        let collapsible = collapsible_references(&[], true);
        assert_eq!(collapsible.toggle_label, "참고 문서 (0)");
        assert!(collapsible.entries.is_empty());
    }

    #[test]
    fn test_collapsible_shows_full_text_only_when_expanded() {
        let long = "x".repeat(250);
        let refs = vec![reference(&long, 0.8765)];

        let collapsed = collapsible_references(&refs, false);
        assert_eq!(collapsed.toggle_label, "참고 문서 (1)");
        assert!(collapsed.entries.is_empty());

        let expanded = collapsible_references(&refs, true);
        assert_eq!(expanded.entries[0].text.len(), 250);
        assert_eq!(expanded.entries[0].similarity, "0.8765");
    }
}
