pub type OsmId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Tag {
    fn from((key, value): (K, V)) -> Self {
        Tag {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A node of the output graph. Explicit nodes come from point records and carry
/// tags, synthetic nodes stand in for interior line string vertices and carry none.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalNode {
    pub id: OsmId,
    pub lat: f64,
    pub lon: f64,
    pub tags: Vec<Tag>,
}

impl CanonicalNode {
    pub fn synthetic(id: OsmId, lon: f64, lat: f64) -> Self {
        CanonicalNode {
            id,
            lat,
            lon,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalWay {
    pub id: OsmId,
    pub node_refs: Vec<OsmId>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OsmElement {
    Node(CanonicalNode),
    Way(CanonicalWay),
}
