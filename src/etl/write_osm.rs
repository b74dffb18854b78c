use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;

use crate::data::feature::format_float;
use crate::data::osm::{CanonicalNode, CanonicalWay, OsmElement, Tag};
use crate::data::OsmDocument;
use crate::errors::Result;

const INDENT_SIZE: usize = 2;

fn write_tags<W: Write>(writer: &mut Writer<W>, tags: &[Tag]) -> Result<()> {
    for tag in tags {
        let mut el = BytesStart::new("tag");
        el.push_attribute(("k", tag.key.as_str()));
        el.push_attribute(("v", tag.value.as_str()));
        writer.write_event(Event::Empty(el))?;
    }
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &CanonicalNode) -> Result<()> {
    let id = node.id.to_string();
    let lat = format_float(node.lat);
    let lon = format_float(node.lon);
    let mut el = BytesStart::new("node");
    el.push_attribute(("id", id.as_str()));
    el.push_attribute(("visible", "true"));
    el.push_attribute(("lat", lat.as_str()));
    el.push_attribute(("lon", lon.as_str()));

    if node.tags.is_empty() {
        writer.write_event(Event::Empty(el))?;
    } else {
        writer.write_event(Event::Start(el))?;
        write_tags(writer, &node.tags)?;
        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }
    Ok(())
}

fn write_way<W: Write>(writer: &mut Writer<W>, way: &CanonicalWay) -> Result<()> {
    let id = way.id.to_string();
    let mut el = BytesStart::new("way");
    el.push_attribute(("id", id.as_str()));
    el.push_attribute(("visible", "true"));
    writer.write_event(Event::Start(el))?;

    for node_ref in &way.node_refs {
        let node_ref = node_ref.to_string();
        let mut nd = BytesStart::new("nd");
        nd.push_attribute(("ref", node_ref.as_str()));
        writer.write_event(Event::Empty(nd))?;
    }
    write_tags(writer, &way.tags)?;

    writer.write_event(Event::End(BytesEnd::new("way")))?;
    Ok(())
}

/// Writes the document as indented OSM XML. Elements keep the order they were created in.
pub fn write_document<W: Write>(inner: W, document: &OsmDocument) -> Result<W> {
    let mut writer = Writer::new_with_indent(inner, b' ', INDENT_SIZE);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("osm");
    root.push_attribute(("version", document.version.as_str()));
    root.push_attribute(("generator", document.generator.as_str()));
    writer.write_event(Event::Start(root))?;

    for element in &document.elements {
        match element {
            OsmElement::Node(node) => write_node(&mut writer, node)?,
            OsmElement::Way(way) => write_way(&mut writer, way)?,
        }
    }

    writer.write_event(Event::End(BytesEnd::new("osm")))?;
    let mut inner = writer.into_inner();
    inner.write_all(b"\n")?;
    Ok(inner)
}

pub fn write_osm_file(path: &Path, document: &OsmDocument) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut buffered = write_document(BufWriter::new(file), document)?;
    buffered.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_document() -> OsmDocument {
        let mut document = OsmDocument::new("shp2osm");
        document.elements = vec![
            OsmElement::Node(CanonicalNode {
                id: -1,
                lat: 37.0,
                lon: 126.5,
                tags: vec![("ref", "1").into(), ("node_type", "1").into()],
            }),
            OsmElement::Node(CanonicalNode {
                id: -2,
                lat: 37.25,
                lon: 126.75,
                tags: vec![("ref", "2").into()],
            }),
            OsmElement::Node(CanonicalNode::synthetic(-3, 126.6, 37.1)),
            OsmElement::Way(CanonicalWay {
                id: 1,
                node_refs: vec![-1, -3, -2],
                tags: vec![("highway", "motorway").into()],
            }),
        ];
        document
    }

    fn render(document: &OsmDocument) -> String {
        String::from_utf8(write_document(Vec::new(), document).unwrap()).unwrap()
    }

    #[test]
    fn renders_nodes_then_way() {
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6" generator="shp2osm">
  <node id="-1" visible="true" lat="37.0" lon="126.5">
    <tag k="ref" v="1"/>
    <tag k="node_type" v="1"/>
  </node>
  <node id="-2" visible="true" lat="37.25" lon="126.75">
    <tag k="ref" v="2"/>
  </node>
  <node id="-3" visible="true" lat="37.1" lon="126.6"/>
  <way id="1" visible="true">
    <nd ref="-1"/>
    <nd ref="-3"/>
    <nd ref="-2"/>
    <tag k="highway" v="motorway"/>
  </way>
</osm>
"#;
        assert_eq!(render(&sample_document()), expected);
    }

    #[test]
    fn escapes_attribute_values() {
        let mut document = OsmDocument::new("shp2osm");
        document.elements.push(OsmElement::Node(CanonicalNode {
            id: -1,
            lat: 0.5,
            lon: 0.5,
            tags: vec![("ref", r#"A&B <"1">"#).into()],
        }));
        let xml = render(&document);
        assert!(xml.contains(r#"<tag k="ref" v="A&amp;B &lt;&quot;1&quot;&gt;"/>"#), "{}", xml);
    }

    #[test]
    fn output_is_deterministic() {
        let document = sample_document();
        assert_eq!(render(&document), render(&document));
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.osm");
        write_osm_file(&path, &sample_document()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), render(&sample_document()));
    }

    #[test]
    fn missing_parent_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("network.osm");
        assert!(write_osm_file(&path, &sample_document()).is_err());
    }
}
