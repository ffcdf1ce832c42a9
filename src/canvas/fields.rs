//! Reading and filling text fields

use super::Canvas;
use crate::dom::NodeId;
use crate::error::Result;
use crate::field::{pick_one, reduce_candidates, resolve_leaf, write_candidates, PresencePolicy};
use tracing::{info, warn};

/// Every copy of one field's `tspan`s as Inkscape left them
struct FieldCopies {
    /// Innermost `tspan` of each candidate, in document order
    leaves: Vec<NodeId>,
    /// Leaves plus the `tspan` wrappers they were resolved from
    all: Vec<NodeId>,
}

impl Canvas {
    /// `tspan` candidates of `<text id>` (or `<g id>`), each narrowed to
    /// its innermost `tspan` so nested wrappers never shadow the value
    fn field_copies(&self, id: &str) -> Result<Option<FieldCopies>> {
        let Some(found) = self.leaves_by_id(id, "text", "tspan", PresencePolicy::default())? else {
            return Ok(None);
        };
        let mut copies = FieldCopies {
            leaves: Vec::with_capacity(found.len()),
            all: found.nodes.clone(),
        };
        for node in found.nodes {
            let leaf = resolve_leaf(&self.doc, node, "tspan", PresencePolicy::default())?.unwrap_or(node);
            if !copies.leaves.contains(&leaf) {
                copies.leaves.push(leaf);
            }
            if !copies.all.contains(&leaf) {
                copies.all.push(leaf);
            }
        }
        Ok(Some(copies))
    }

    /// Text of the field `id`.
    ///
    /// Reads the same copy [`set_field`](Self::set_field) writes: the
    /// `tspan` holding text, or the first one when all are blank. An id on
    /// some other container is read through its leaf `tspan`. `None` when
    /// the id does not exist or has no `tspan` below it.
    pub fn get_field(&self, id: &str) -> Result<Option<String>> {
        if let Some(copies) = self.field_copies(id)? {
            if let Some(pick) = pick_one(&self.doc, &copies.leaves, false, true)? {
                return Ok(Some(self.doc.text(pick.node).unwrap_or_default().into_owned()));
            }
        }

        let Some(container) = self.element_by_id(id, false, None)? else {
            return Ok(None);
        };
        let leaf = match resolve_leaf(&self.doc, container, "tspan", PresencePolicy::new(true, false))? {
            Some(leaf) => Some(leaf),
            None => resolve_leaf(&self.doc, container, "tspan", PresencePolicy::default())?,
        };
        Ok(leaf.map(|leaf| self.doc.text(leaf).unwrap_or_default().into_owned()))
    }

    /// Write `value` into the field `id`.
    ///
    /// Every `tspan` of the field is a candidate: the one in use (or the
    /// first, if all are blank) gets the value and all others are cleared,
    /// blank or not, so stale copies Inkscape left behind cannot show
    /// through. With `skip_empty` only candidates with text may receive the
    /// value. An id that only names some other container is filled through
    /// its leaf `tspan`. Returns `false` when the id cannot be found.
    pub fn set_field(&mut self, id: &str, value: &str, policy: PresencePolicy) -> Result<bool> {
        if let Some(copies) = self.field_copies(id)? {
            let pool = if policy.skip_empty {
                reduce_candidates(&self.doc, &copies.leaves, policy.spacing)?
            } else {
                copies.leaves
            };
            if let Some(pick) = pick_one(&self.doc, &pool, policy.spacing, true)? {
                write_candidates(self.doc_mut(), &copies.all, pick.node, value)?;
                return Ok(true);
            }
        }

        if let Some(container) = self.element_by_id(id, false, None)? {
            if let Some(leaf) = resolve_leaf(&self.doc, container, "tspan", policy)? {
                self.doc_mut().set_text(leaf, value)?;
                return Ok(true);
            }
        }

        warn!(id, source = %self.source, "no field with this id, cannot set {id}={value:?}");
        Ok(false)
    }

    /// Fill several fields; returns the ids that could not be set
    pub fn set_fields<I, K, V>(&mut self, fields: I, policy: PresencePolicy) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut missing = Vec::new();
        let mut filled = 0usize;
        for (id, value) in fields {
            if self.set_field(id.as_ref(), value.as_ref(), policy)? {
                filled += 1;
            } else {
                missing.push(id.as_ref().to_string());
            }
        }
        info!(filled, missing = missing.len(), source = %self.source, "filled fields");
        Ok(missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    fn sheet() -> Canvas {
        Canvas::parse(testdata::FILLABLE_SVG.as_bytes()).unwrap()
    }

    #[test]
    fn test_get_field() {
        let canvas = sheet();
        assert_eq!(canvas.get_field("level_").unwrap().as_deref(), Some("1"));
        assert_eq!(canvas.get_field("name_").unwrap().as_deref(), Some(""));
        assert_eq!(canvas.get_field("hit_dice_").unwrap().as_deref(), Some("d8"));
        assert_eq!(canvas.get_field("nope").unwrap(), None);
        assert_eq!(canvas.get_field("notes_").unwrap(), None);
    }

    #[test]
    fn test_set_single_leaf() {
        let mut canvas = sheet();
        assert!(canvas.set_field("name_", "John Smith", PresencePolicy::default()).unwrap());
        assert_eq!(canvas.get_field("name_").unwrap().as_deref(), Some("John Smith"));
        assert!(canvas.to_xml().contains(r#"<tspan id="tspan_name" x="10" y="20">John Smith</tspan>"#));
    }

    #[test]
    fn test_set_all_blank_writes_first() {
        let mut canvas = sheet();
        assert!(canvas.set_field("class_", "17", PresencePolicy::default()).unwrap());
        assert_eq!(canvas.get_field("class_").unwrap().as_deref(), Some("17"));
        let xml = canvas.to_xml();
        assert!(xml.contains(r#"<tspan id="tspan_class_a">17</tspan><tspan id="tspan_class_b"></tspan>"#));
    }

    #[test]
    fn test_set_clears_transformed_copies() {
        let mut canvas = sheet();
        assert!(canvas.set_field("strength_", "18", PresencePolicy::default()).unwrap());
        let xml = canvas.to_xml();
        assert!(xml.contains(r#"<tspan id="tspan305">18</tspan>"#));
        assert!(xml.contains(r#"<tspan id="tspan309"></tspan>"#));
        assert_eq!(canvas.get_field("strength_").unwrap().as_deref(), Some("18"));
    }

    #[test]
    fn test_set_through_other_container() {
        let mut canvas = sheet();
        assert!(canvas.set_field("alignment_", "lawful", PresencePolicy::default()).unwrap());
        assert_eq!(canvas.get_field("alignment_").unwrap().as_deref(), Some("lawful"));

        assert!(canvas.set_field("hit_dice_", "d10", PresencePolicy::default()).unwrap());
        assert_eq!(canvas.get_field("hit_dice_").unwrap().as_deref(), Some("d10"));
    }

    #[test]
    fn test_set_missing_is_not_fatal() {
        let mut canvas = sheet();
        let before = canvas.to_xml();
        assert!(!canvas.set_field("nope", "x", PresencePolicy::default()).unwrap());
        assert_eq!(canvas.to_xml(), before);
    }

    #[test]
    fn test_set_fields_reports_missing() {
        let mut canvas = sheet();
        let missing = canvas
            .set_fields([("name_", "Aria"), ("nope", "x"), ("level_", "3")], PresencePolicy::default())
            .unwrap();
        assert_eq!(missing, ["nope"]);
        assert_eq!(canvas.get_field("name_").unwrap().as_deref(), Some("Aria"));
        assert_eq!(canvas.get_field("level_").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn test_marked_sheet_end_to_end() {
        let mut canvas = Canvas::parse(testdata::MARKED_SVG.as_bytes())
            .unwrap()
            .with_source("id_finding_test-MARKED.svg");
        let doc_name = Some("id_finding_test-MARKED.svg");

        let el = canvas.element_by_id("armor_class_", false, doc_name).unwrap();
        assert!(el.is_some());

        let blank = canvas
            .leaf_by_id("tspan", "armor_class_", PresencePolicy::new(false, false), doc_name)
            .unwrap()
            .unwrap();
        assert_eq!(canvas.document().text(blank), None);

        let used = canvas
            .leaf_by_id("tspan", "armor_class_", PresencePolicy::new(true, false), doc_name)
            .unwrap()
            .unwrap();
        assert_eq!(canvas.document().text(used).as_deref(), Some("B"));

        assert_eq!(canvas.get_field("armor_class_").unwrap().as_deref(), Some("B"));
        assert!(canvas.set_field("armor_class_", "17", PresencePolicy::default()).unwrap());
        assert_eq!(canvas.get_field("armor_class_").unwrap().as_deref(), Some("17"));
        assert_eq!(canvas.document().text(blank).as_deref(), Some(""));

        assert!(canvas.set_field("hit_points_", "30", PresencePolicy::default()).unwrap());
        assert_eq!(canvas.get_field("hit_points_").unwrap().as_deref(), Some("30"));
    }

    #[test]
    fn test_duplicate_text_reads_the_written_copy() {
        let mut canvas =
            Canvas::parse(br#"<svg><text id="f"><tspan/></text><text id="f"><tspan>old</tspan></text></svg>"#).unwrap();
        assert_eq!(canvas.get_field("f").unwrap().as_deref(), Some("old"));

        assert!(canvas.set_field("f", "17", PresencePolicy::default()).unwrap());
        assert!(canvas
            .to_xml()
            .contains(r#"<text id="f"><tspan></tspan></text><text id="f"><tspan>17</tspan></text>"#));
        assert_eq!(canvas.get_field("f").unwrap().as_deref(), Some("17"));
    }

    #[test]
    fn test_nested_tspan_gets_the_value() {
        let mut canvas = Canvas::parse(br#"<svg><text id="f"><tspan><tspan>old</tspan></tspan></text></svg>"#).unwrap();
        assert_eq!(canvas.get_field("f").unwrap().as_deref(), Some("old"));

        assert!(canvas.set_field("f", "17", PresencePolicy::default()).unwrap());
        assert!(canvas.to_xml().contains(r#"<text id="f"><tspan><tspan>17</tspan></tspan></text>"#));
        assert_eq!(canvas.get_field("f").unwrap().as_deref(), Some("17"));
    }

    #[test]
    fn test_skip_empty_still_clears_blank_copies() {
        let mut canvas = Canvas::parse(br#"<svg><text id="f"><tspan> </tspan><tspan>old</tspan></text></svg>"#).unwrap();
        assert!(canvas.set_field("f", "17", PresencePolicy::new(true, false)).unwrap());
        assert!(canvas.to_xml().contains(r#"<text id="f"><tspan></tspan><tspan>17</tspan></text>"#));
        assert_eq!(canvas.get_field("f").unwrap().as_deref(), Some("17"));
    }

    #[test]
    fn test_filled_sheet_reloads() {
        let mut canvas = sheet();
        canvas
            .set_fields([("name_", "John Smith"), ("strength_", "17")], PresencePolicy::default())
            .unwrap();
        let reloaded = Canvas::parse(canvas.to_xml().as_bytes()).unwrap();
        assert_eq!(reloaded.get_field("name_").unwrap().as_deref(), Some("John Smith"));
        assert_eq!(reloaded.get_field("strength_").unwrap().as_deref(), Some("17"));
    }
}
