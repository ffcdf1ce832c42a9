//! Leaf resolution: the most deeply nested element with a given tag

use super::{has_text, tag_matches, PresencePolicy};
use crate::dom::{DocumentAccess, NodeId};
use crate::error::{FormError, Result};
use tracing::debug;

/// Find the element with `tag` that is a leaf or closest to one below `root`.
///
/// The search is depth-first in document order. An element is a candidate
/// when its tag matches and either (`skip_empty` is off and it has no child
/// with the same tag) or it has its own text. The innermost candidate on the
/// first branch that yields one wins; a branch without candidates hands back
/// the nearest matching ancestor. `root` itself may be the result.
pub fn resolve_leaf<D: DocumentAccess>(doc: &D, root: NodeId, tag: &str, policy: PresencePolicy) -> Result<Option<NodeId>> {
    if !doc.is_element(root) {
        return Err(FormError::invalid_node("resolve_leaf", root));
    }
    Ok(search(doc, root, tag, policy, None))
}

fn search<D: DocumentAccess>(
    doc: &D,
    el: NodeId,
    tag: &str,
    policy: PresencePolicy,
    mut matching_ancestor: Option<NodeId>,
) -> Option<NodeId> {
    let el_tag = doc.node_name(el).unwrap_or_default();
    let children = doc.element_children_vec(el);

    if tag_matches(el_tag, tag) {
        // An empty wrapper that holds same-tag children is not a leaf
        let wraps_same_tag = children
            .iter()
            .any(|&child| doc.node_name(child).is_some_and(|name| tag_matches(name, tag)));
        if (!policy.skip_empty && !wraps_same_tag) || has_text(doc, el, policy.spacing, false) {
            matching_ancestor = Some(el);
        }
    } else {
        debug!(tag = el_tag, wanted = tag, "element is not the wanted tag");
    }

    for child in children {
        if let Some(found) = search(doc, child, tag, policy, matching_ancestor) {
            return Some(found);
        }
    }
    matching_ancestor
}
