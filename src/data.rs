use self::osm::{CanonicalNode, CanonicalWay, OsmElement};

pub mod codes;
pub mod feature;
pub mod osm;

pub const OSM_SCHEMA_VERSION: &str = "0.6";

/// Converted map data in document order. Explicit nodes come first, then each way
/// preceded by the synthetic nodes it introduced.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmDocument {
    pub version: String,
    pub generator: String,
    pub elements: Vec<OsmElement>,
}

impl OsmDocument {
    pub fn new(generator: &str) -> Self {
        OsmDocument {
            version: OSM_SCHEMA_VERSION.to_string(),
            generator: generator.to_string(),
            elements: Vec::new(),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &CanonicalNode> {
        self.elements.iter().filter_map(|el| match el {
            OsmElement::Node(node) => Some(node),
            OsmElement::Way(_) => None,
        })
    }

    pub fn ways(&self) -> impl Iterator<Item = &CanonicalWay> {
        self.elements.iter().filter_map(|el| match el {
            OsmElement::Way(way) => Some(way),
            OsmElement::Node(_) => None,
        })
    }
}
