//! Groups (`<g>`) and layers (`<g inkscape:groupmode="layer">`)

use super::Canvas;
use crate::dom::NodeId;
use crate::error::{FormError, Result};
use crate::query::{inkscape_attribute, select, Axis, Selector};

/// Handle to a group element
///
/// Two lookups of the same element give equal handles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Group {
    pub node: NodeId,
    pub parent: Option<NodeId>,
    pub id: Option<String>,
    /// `inkscape:label`, the name shown in the layers panel
    pub label: Option<String>,
}

impl Group {
    pub fn is_named(&self) -> bool {
        self.label.as_deref().is_some_and(|label| !label.is_empty())
    }
}

fn group_selector(layer_only: bool) -> Selector<'static> {
    if layer_only {
        Selector::layer()
    } else {
        Selector::tag("g")
    }
}

impl Canvas {
    fn build_group(&self, node: NodeId) -> Group {
        Group {
            node,
            parent: self.doc.get_node(node).and_then(|n| n.parent),
            id: self.doc.get_attribute(node, "id").map(str::to_string),
            label: inkscape_attribute(&self.doc, node, "label").map(str::to_string),
        }
    }

    fn first_group(&self, selector: &Selector<'_>) -> Option<Group> {
        select(&self.doc, self.root, Axis::Descendant, selector)
            .first()
            .map(|&node| self.build_group(node))
    }

    /// All groups (or only layers), in document order
    pub fn groups(&self, layer_only: bool) -> Vec<Group> {
        select(&self.doc, self.root, Axis::Descendant, &group_selector(layer_only))
            .into_iter()
            .map(|node| self.build_group(node))
            .collect()
    }

    /// First group labelled `name`.
    ///
    /// Groups that Inkscape never labelled go by their id instead, so an id
    /// match is accepted when that group has no label.
    pub fn group(&self, name: &str, layer_only: bool) -> Option<Group> {
        self.first_group(&group_selector(layer_only).with_inkscape("label", name))
            .or_else(|| self.group_by_id(name, layer_only).filter(|g| !g.is_named()))
    }

    pub fn group_by_id(&self, id: &str, layer_only: bool) -> Option<Group> {
        self.first_group(&group_selector(layer_only).with_id(id))
    }

    pub fn layers(&self) -> Vec<Group> {
        self.groups(true)
    }

    /// First layer named `name`; layer names are not unique
    pub fn layer(&self, name: &str) -> Option<Group> {
        self.group(name, true)
    }

    pub fn layer_by_id(&self, id: &str) -> Option<Group> {
        self.group_by_id(id, true)
    }

    /// Remove the group and its content from the drawing
    pub fn delete_group(&mut self, group: &Group) -> Result<()> {
        if !self.doc.is_attached(group.node) {
            return Err(FormError::InvalidInput(format!(
                "group {} is no longer part of {:?}",
                group.id.as_deref().unwrap_or("<unnamed>"),
                self.source
            )));
        }
        if self.doc.get_node(group.node).and_then(|n| n.parent) != group.parent {
            return Err(FormError::InvalidInput("group was moved since it was looked up".to_string()));
        }
        self.doc.detach(group.node)?;
        self.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn test_blank_has_one_layer() {
        let canvas = Canvas::blank().unwrap();
        let layers = canvas.layers();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].id.as_deref(), Some("layer1"));
        assert_eq!(layers[0].label.as_deref(), Some("Layer 1"));
        assert_eq!(layers[0].parent, Some(canvas.root()));
        assert_eq!(canvas.layer("Layer 1"), Some(layers[0].clone()));
        assert_eq!(canvas.layer_by_id("layer1"), Some(layers[0].clone()));
    }

    #[test]
    fn test_group_by_label_and_id_fallback() {
        let canvas = Canvas::parse(testdata::GROUPS_SVG.as_bytes()).unwrap();
        assert_eq!(canvas.groups(false).len(), 4);
        assert_eq!(canvas.layers().len(), 2);

        let named = canvas.group("Fields", false).unwrap();
        assert_eq!(named.id.as_deref(), Some("g10"));

        // unlabelled groups answer to their id
        assert_eq!(canvas.group("g12", false).unwrap().id.as_deref(), Some("g12"));
        // labelled groups do not
        assert_eq!(canvas.group("g10", false), None);
        // a plain group is not a layer
        assert_eq!(canvas.layer("Fields"), None);
        assert_eq!(canvas.group_by_id("g12", true), None);
    }

    #[test]
    fn test_delete_group() {
        let mut canvas = Canvas::parse(testdata::GROUPS_SVG.as_bytes()).unwrap();
        let background = canvas.layer("Background").unwrap();
        assert!(canvas.element_by_id("bg_rect", false, None).unwrap().is_some());

        canvas.delete_group(&background).unwrap();
        assert_eq!(canvas.layer("Background"), None);
        assert_eq!(canvas.layers().len(), 1);
        assert!(canvas.element_by_id("bg_rect", false, None).unwrap().is_none());
        assert!(!canvas.to_xml().contains("bg_rect"));

        assert!(matches!(canvas.delete_group(&background), Err(FormError::InvalidInput(_))));
    }
}
