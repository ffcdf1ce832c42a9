//! Shared fixtures for unit tests

/// Leaves at one depth: empty, whitespace-only, populated
pub const SIMPLE_XML: &str = r#"<root>
  <item>
    <subitem>
      <leaf id="l1"/>
      <leaf id="l2">   </leaf>
      <leaf id="l3">Leaf text</leaf>
    </subitem>
  </item>
</root>"#;

pub const NO_TEXT_XML: &str = r#"<root>
  <item>
    <leaf/>
    <leaf/>
  </item>
</root>"#;

/// A field marked the way Inkscape leaves it: the identified `<text>` holds
/// a blank copy before the real one, and a second field is only identified
/// on its wrapping group
pub const MARKED_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:svg="http://www.w3.org/2000/svg" width="210mm" height="297mm" viewBox="0 0 210 297" version="1.1">
  <g id="layer1">
    <text id="armor_class_" x="20" y="40"><tspan x="20" y="40"/><tspan x="20" y="40">B</tspan></text>
    <g id="hit_points_" transform="translate(5,5)">
      <g id="g120">
        <svg:text x="30" y="60"><svg:tspan/><svg:tspan>12</svg:tspan></svg:text>
      </g>
    </g>
  </g>
</svg>"#;

/// A small character sheet with the usual Inkscape text field shapes
pub const FILLABLE_SVG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Created with Inkscape (http://www.inkscape.org/) -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd" width="210mm" height="297mm" viewBox="0 0 210 297" version="1.1" id="svg8" sodipodi:docname="character_sheet.svg">
  <g inkscape:label="Layer 1" inkscape:groupmode="layer" id="layer1">
    <text id="name_" x="10" y="20"><tspan id="tspan_name" x="10" y="20"></tspan></text>
    <text id="level_" x="10" y="30"><tspan id="tspan_level">1</tspan></text>
    <g id="strength_">
      <g id="g301">
        <text id="text303"><tspan id="tspan305">10</tspan></text>
        <text id="text307" transform="scale(-1,1)"><tspan id="tspan309">10</tspan></text>
      </g>
    </g>
    <text id="class_" x="10" y="50"><tspan id="tspan_class_a"> </tspan><tspan id="tspan_class_b"/></text>
    <text x="10" y="60"><tspan id="hit_dice_">d8</tspan></text>
    <switch id="alignment_"><text><tspan id="tspan_alignment">neutral</tspan></text></switch>
    <flowRoot id="notes_"><flowRegion><rect width="100" height="50"/></flowRegion><flowPara>first line</flowPara><flowPara>second line</flowPara></flowRoot>
  </g>
</svg>"#;

/// Two layers, one labelled group and one unlabelled group
pub const GROUPS_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape">
  <g inkscape:label="Background" inkscape:groupmode="layer" id="layer1">
    <rect id="bg_rect" width="10" height="10"/>
  </g>
  <g inkscape:label="Form" inkscape:groupmode="layer" id="layer2">
    <g inkscape:label="Fields" id="g10">
      <g id="g12"><text id="t1"><tspan>x</tspan></text></g>
    </g>
  </g>
</svg>"#;
