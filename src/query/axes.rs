//! Axis navigation for chained selector steps

use super::Selector;
use crate::dom::{NodeId, XmlDocument};

/// How a step reaches its nodes from the context node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/`
    Child,
    /// `//`
    Descendant,
}

fn navigate(doc: &XmlDocument, context: NodeId, axis: Axis, selector: &Selector<'_>, out: &mut Vec<NodeId>) {
    match axis {
        Axis::Child => out.extend(doc.children(context).filter(|&id| selector.matches(doc, id))),
        Axis::Descendant => out.extend(doc.descendants(context).filter(|&id| selector.matches(doc, id))),
    }
}

/// Nodes matching `selector` along `axis` from `context`, in document order
pub fn select(doc: &XmlDocument, context: NodeId, axis: Axis, selector: &Selector<'_>) -> Vec<NodeId> {
    let mut out = Vec::new();
    navigate(doc, context, axis, selector, &mut out);
    out
}

/// Evaluate a chain of steps, e.g. `.//text[@id]/tspan`.
///
/// Results are unique and in document order. Elements are allocated in
/// parse order and never created afterwards, so node ids order them.
pub fn select_path(doc: &XmlDocument, context: NodeId, steps: &[(Axis, Selector<'_>)]) -> Vec<NodeId> {
    let mut current = vec![context];
    for (axis, selector) in steps {
        let mut next = Vec::new();
        for &node in &current {
            navigate(doc, node, *axis, selector, &mut next);
        }
        next.sort_unstable();
        next.dedup();
        current = next;
        if current.is_empty() {
            break;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"<svg><g id="f"><g id="f"><text><tspan id="t1"/></text></g><tspan id="t2"/></g><text id="f"><tspan id="t3"/><g><tspan id="t4"/></g></text></svg>"#;

    fn ids(doc: &XmlDocument, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|&n| doc.get_attribute(n, "id"))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_child_step() {
        let doc = XmlDocument::parse(NESTED.as_bytes()).unwrap();
        let root = doc.root_element_id().unwrap();
        let steps = [
            (Axis::Descendant, Selector::tag("text").with_id("f")),
            (Axis::Child, Selector::tag("tspan")),
        ];
        assert_eq!(ids(&doc, &select_path(&doc, root, &steps)), ["t3"]);
    }

    #[test]
    fn test_descendant_step_dedups() {
        let doc = XmlDocument::parse(NESTED.as_bytes()).unwrap();
        let root = doc.root_element_id().unwrap();
        let steps = [
            (Axis::Descendant, Selector::tag("g").with_id("f")),
            (Axis::Descendant, Selector::tag("tspan")),
        ];
        assert_eq!(ids(&doc, &select_path(&doc, root, &steps)), ["t1", "t2"]);
    }

    #[test]
    fn test_select_excludes_context() {
        let doc = XmlDocument::parse(b"<g><g/></g>").unwrap();
        let root = doc.root_element_id().unwrap();
        assert_eq!(select(&doc, root, Axis::Descendant, &Selector::tag("g")).len(), 1);
    }
}
