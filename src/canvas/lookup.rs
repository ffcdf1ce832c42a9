//! Element lookups by tag and identifier

use super::Canvas;
use crate::dom::NodeId;
use crate::error::{FormError, Result};
use crate::field::{pick_one, reduce_candidates, resolve_leaf, PresencePolicy};
use crate::query::{select, select_path, Axis, Selector};
use tracing::{debug, warn};

/// How an identifier lookup found its elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier is on the requested container tag
    Exact,
    /// Only a `<g>` carries the identifier; its descendants were taken
    Speculative,
}

/// Leaf elements found below an identified container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaves {
    pub nodes: Vec<NodeId>,
    pub resolution: Resolution,
}

impl Leaves {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Canvas {
    /// All elements named `tag`.
    ///
    /// `None` when there are none, or [`FormError::TagNotFound`] when
    /// `assert_in` names the document to blame. With `skip_empty` only the
    /// elements with text are returned (possibly none).
    pub fn elements_by_tag(
        &self,
        tag: &str,
        policy: PresencePolicy,
        assert_in: Option<&str>,
    ) -> Result<Option<Vec<NodeId>>> {
        let elements = select(&self.doc, self.root, Axis::Descendant, &Selector::tag(tag));
        if elements.is_empty() {
            return match assert_in {
                Some(document) => Err(FormError::TagNotFound {
                    tag: tag.to_string(),
                    document: document.to_string(),
                }),
                None => Ok(None),
            };
        }
        if policy.skip_empty {
            return reduce_candidates(&self.doc, &elements, policy.spacing).map(Some);
        }
        Ok(Some(elements))
    }

    /// First element carrying `id`; with `skip_empty`, the one element of
    /// those that has text (first if several do, `None` if none do)
    pub fn element_by_id(&self, id: &str, skip_empty: bool, assert_in: Option<&str>) -> Result<Option<NodeId>> {
        let elements = self.elements_with_id(id);
        let Some(&first) = elements.first() else {
            return match assert_in {
                Some(document) => Err(FormError::IdNotFound {
                    id: id.to_string(),
                    document: document.to_string(),
                }),
                None => Ok(None),
            };
        };
        if skip_empty {
            return Ok(pick_one(&self.doc, &elements, false, false)?.map(|pick| pick.node));
        }
        Ok(Some(first))
    }

    /// Leaf `tag` element inside the element carrying `id`
    pub fn leaf_by_id(
        &self,
        tag: &str,
        id: &str,
        policy: PresencePolicy,
        assert_in: Option<&str>,
    ) -> Result<Option<NodeId>> {
        let Some(container) = self.element_by_id(id, policy.skip_empty, None)? else {
            return match assert_in {
                Some(document) => Err(FormError::IdNotFound {
                    id: id.to_string(),
                    document: document.to_string(),
                }),
                None => Ok(None),
            };
        };
        resolve_leaf(&self.doc, container, tag, policy)
    }

    /// `leaf_tag` children of a `tag` element carrying `id`.
    ///
    /// When no such container exists, every `leaf_tag` below a `<g>` with
    /// that id is taken instead and the result is marked
    /// [`Resolution::Speculative`]. With `skip_empty` the leaves are
    /// narrowed to those with text.
    pub fn leaves_by_id(&self, id: &str, tag: &str, leaf_tag: &str, policy: PresencePolicy) -> Result<Option<Leaves>> {
        let exact = select_path(
            &self.doc,
            self.root,
            &[
                (Axis::Descendant, Selector::tag(tag).with_id(id)),
                (Axis::Child, Selector::tag(leaf_tag)),
            ],
        );
        let (nodes, resolution) = if !exact.is_empty() {
            (exact, Resolution::Exact)
        } else {
            let speculative = select_path(
                &self.doc,
                self.root,
                &[
                    (Axis::Descendant, Selector::tag("g").with_id(id)),
                    (Axis::Descendant, Selector::tag(leaf_tag)),
                ],
            );
            if speculative.is_empty() {
                warn!(id, tag, source = %self.source, "missing <{tag} id=\"{id}\"> and <g id=\"{id}\">");
                return Ok(None);
            }
            warn!(id, tag, source = %self.source, "found <g id=\"{id}\"> speculatively since there is no <{tag} id=\"{id}\">");
            (speculative, Resolution::Speculative)
        };

        let nodes = if policy.skip_empty {
            reduce_candidates(&self.doc, &nodes, policy.spacing)?
        } else {
            nodes
        };
        debug!(id, count = nodes.len(), ?resolution, "leaves by id");
        Ok(Some(Leaves { nodes, resolution }))
    }

    /// Paragraphs of a flowed-text box, or the lines of a plain text box
    pub fn flow_text(&self, id: &str) -> Vec<NodeId> {
        let paragraphs = select_path(
            &self.doc,
            self.root,
            &[
                (Axis::Descendant, Selector::tag("flowRoot").with_id(id)),
                (Axis::Child, Selector::tag("flowPara")),
            ],
        );
        if !paragraphs.is_empty() {
            return paragraphs;
        }
        select_path(
            &self.doc,
            self.root,
            &[
                (Axis::Descendant, Selector::tag("text").with_id(id)),
                (Axis::Child, Selector::tag("tspan")),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    fn sheet() -> Canvas {
        Canvas::parse(testdata::FILLABLE_SVG.as_bytes())
            .unwrap()
            .with_source("character_sheet.svg")
    }

    fn texts(canvas: &Canvas, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|&n| canvas.document().text(n).unwrap_or_default().into_owned())
            .collect()
    }

    #[test]
    fn test_elements_by_tag() {
        let canvas = sheet();
        let all = canvas.elements_by_tag("tspan", PresencePolicy::default(), None).unwrap().unwrap();
        let used = canvas.elements_by_tag("tspan", PresencePolicy::new(true, false), None).unwrap().unwrap();
        assert!(used.len() < all.len());
        assert!(used.iter().all(|n| all.contains(n)));

        assert_eq!(canvas.elements_by_tag("circle", PresencePolicy::default(), None).unwrap(), None);
        let err = canvas
            .elements_by_tag("circle", PresencePolicy::default(), Some(canvas.source()))
            .unwrap_err();
        assert!(matches!(err, FormError::TagNotFound { ref tag, .. } if tag == "circle"));
    }

    #[test]
    fn test_element_by_id() {
        let canvas = sheet();
        let el = canvas.element_by_id("name_", false, None).unwrap().unwrap();
        assert_eq!(canvas.document().node_local_name(el), Some("text"));
        assert_eq!(canvas.element_by_id("nope", false, None).unwrap(), None);

        let err = canvas.element_by_id("nope", false, Some("character_sheet.svg")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope") && msg.contains("character_sheet.svg"));
    }

    #[test]
    fn test_element_by_id_skip_empty_prefers_populated_copy() {
        let canvas = Canvas::parse(br#"<svg><text id="dup"><tspan/></text><text id="dup"><tspan>x</tspan></text></svg>"#).unwrap();
        let first = canvas.element_by_id("dup", false, None).unwrap().unwrap();
        let used = canvas.element_by_id("dup", true, None).unwrap().unwrap();
        assert_ne!(first, used);
        assert_eq!(canvas.document().text(canvas.document().element_children(used).next().unwrap()).as_deref(), Some("x"));
    }

    #[test]
    fn test_leaf_by_id() {
        let canvas = sheet();
        let leaf = canvas.leaf_by_id("tspan", "name_", PresencePolicy::default(), None).unwrap().unwrap();
        assert_eq!(canvas.document().get_attribute(leaf, "id"), Some("tspan_name"));
        assert_eq!(canvas.leaf_by_id("tspan", "nope", PresencePolicy::default(), None).unwrap(), None);
        assert!(matches!(
            canvas.leaf_by_id("tspan", "nope", PresencePolicy::default(), Some("x.svg")),
            Err(FormError::IdNotFound { .. })
        ));
    }

    #[test]
    fn test_leaves_exact() {
        let canvas = sheet();
        let leaves = canvas.leaves_by_id("name_", "text", "tspan", PresencePolicy::default()).unwrap().unwrap();
        assert_eq!(leaves.resolution, Resolution::Exact);
        assert_eq!(leaves.len(), 1);
    }

    #[test]
    fn test_leaves_speculative_through_groups() {
        let canvas = Canvas::parse(testdata::MARKED_SVG.as_bytes()).unwrap();
        let leaves = canvas.leaves_by_id("hit_points_", "text", "tspan", PresencePolicy::default()).unwrap().unwrap();
        assert_eq!(leaves.resolution, Resolution::Speculative);
        assert_eq!(texts(&canvas, &leaves.nodes), ["", "12"]);

        let used = canvas.leaves_by_id("hit_points_", "text", "tspan", PresencePolicy::populated()).unwrap().unwrap();
        assert_eq!(used.resolution, Resolution::Speculative);
        assert_eq!(texts(&canvas, &used.nodes), ["12"]);

        let exact = canvas.leaves_by_id("armor_class_", "text", "tspan", PresencePolicy::default()).unwrap().unwrap();
        assert_eq!(exact.resolution, Resolution::Exact);
        assert_eq!(texts(&canvas, &exact.nodes), ["", "B"]);
    }

    #[test]
    fn test_leaves_ignore_tag_case() {
        let canvas = Canvas::parse(br#"<svg><text id="f"><tspan>B</tspan></text></svg>"#).unwrap();
        let leaves = canvas.leaves_by_id("f", "TEXT", "TSPAN", PresencePolicy::default()).unwrap().unwrap();
        assert_eq!(leaves.resolution, Resolution::Exact);
        assert_eq!(texts(&canvas, &leaves.nodes), ["B"]);
    }

    #[test]
    fn test_leaves_missing() {
        let canvas = sheet();
        assert_eq!(canvas.leaves_by_id("nope", "text", "tspan", PresencePolicy::default()).unwrap(), None);
    }

    #[test]
    fn test_flow_text() {
        let canvas = sheet();
        assert_eq!(texts(&canvas, &canvas.flow_text("notes_")), ["first line", "second line"]);
        assert_eq!(texts(&canvas, &canvas.flow_text("name_")), [""]);
        assert!(canvas.flow_text("nope").is_empty());
    }
}
