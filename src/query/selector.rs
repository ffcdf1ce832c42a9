//! One location step: an element name test plus attribute predicates

use super::inkscape_attribute;
use crate::dom::{NodeId, XmlDocument};
use crate::field::tag_matches;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate<'s> {
    /// `[@id='value']`
    Id(&'s str),
    /// `[@inkscape:local='value']`
    Inkscape(&'s str, &'s str),
}

/// Element test of a fixed query, e.g. `g[@inkscape:groupmode='layer']`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector<'s> {
    /// Local name, `None` for `*`
    tag: Option<&'s str>,
    predicates: Vec<Predicate<'s>>,
}

impl<'s> Selector<'s> {
    /// `*`
    pub fn any() -> Self {
        Selector::default()
    }

    /// Elements with this local name, in any case
    pub fn tag(tag: &'s str) -> Self {
        Selector {
            tag: Some(tag),
            predicates: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: &'s str) -> Self {
        self.predicates.push(Predicate::Id(id));
        self
    }

    pub fn with_inkscape(mut self, local: &'s str, value: &'s str) -> Self {
        self.predicates.push(Predicate::Inkscape(local, value));
        self
    }

    /// `g[@inkscape:groupmode='layer']`
    pub fn layer() -> Self {
        Selector::tag("g").with_inkscape("groupmode", "layer")
    }

    pub fn matches(&self, doc: &XmlDocument, node: NodeId) -> bool {
        if !doc.get_node(node).is_some_and(|n| n.is_element()) {
            return false;
        }
        if let Some(tag) = self.tag {
            if !doc.node_local_name(node).is_some_and(|name| tag_matches(name, tag)) {
                return false;
            }
        }
        self.predicates.iter().all(|p| match *p {
            Predicate::Id(id) => doc.get_attribute(node, "id") == Some(id),
            Predicate::Inkscape(local, value) => inkscape_attribute(doc, node, local) == Some(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_and_predicates() {
        let doc = XmlDocument::parse(
            br#"<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"><g id="a" inkscape:groupmode="layer"/><svg:g xmlns:svg="http://www.w3.org/2000/svg" id="b"/></svg>"#,
        )
        .unwrap();
        let root = doc.root_element_id().unwrap();
        let groups: Vec<NodeId> = doc.element_children(root).collect();

        assert!(Selector::tag("g").matches(&doc, groups[1]));
        assert!(Selector::layer().matches(&doc, groups[0]));
        assert!(!Selector::layer().matches(&doc, groups[1]));
        assert!(Selector::any().with_id("b").matches(&doc, groups[1]));
        assert!(!Selector::tag("g").with_id("b").matches(&doc, groups[0]));
        assert!(Selector::tag("G").matches(&doc, groups[0]));
        assert!(Selector::tag("G").matches(&doc, groups[1]));
        assert!(!Selector::tag("rect").matches(&doc, groups[0]));
    }

    #[test]
    fn test_text_nodes_never_match() {
        let doc = XmlDocument::parse(b"<svg>x</svg>").unwrap();
        let root = doc.root_element_id().unwrap();
        let text = doc.children(root).next().unwrap();
        assert!(!Selector::any().matches(&doc, text));
    }
}
