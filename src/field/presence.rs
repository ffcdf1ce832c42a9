//! Text-presence classification

use crate::dom::DocumentAccess;
use crate::dom::NodeId;

#[inline]
fn counts(text: &str, spacing: bool) -> bool {
    !text.is_empty() && (spacing || !text.trim().is_empty())
}

/// Whether `element` has text.
///
/// The element's own text counts when it is non-empty and either `spacing`
/// is set or it is not all whitespace. With `recursive`, every text fragment
/// below the element (descendant text and the text following nested
/// elements) is tested the same way.
pub fn has_text<D: DocumentAccess>(doc: &D, element: NodeId, spacing: bool, recursive: bool) -> bool {
    if doc.text(element).is_some_and(|text| counts(&text, spacing)) {
        return true;
    }
    if !recursive {
        return false;
    }

    doc.descendants_vec(element).into_iter().any(|id| {
        doc.get_node(id).is_some_and(|n| n.is_text())
            && doc.text_content(id).is_some_and(|text| counts(text, spacing))
    })
}
