use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::Deserialize;

use crate::data::codes::{self, UnmappedCode};
use crate::data::feature::{FeatureRecord, RecordGeometry};
use crate::data::osm::{CanonicalNode, CanonicalWay, OsmElement, OsmId, Tag};
use crate::data::OsmDocument;

/// Attribute names of the point layer.
pub mod node_fields {
    pub const ID: &str = "ID";
    pub const NODE_TYPE: &str = "NodeType";
    pub const ADMIN_CODE: &str = "AdminCode";
    pub const ITS_NODE_ID: &str = "ITSNodeID";
}

/// Attribute names of the line string layer.
pub mod link_fields {
    pub const ID: &str = "ID";
    pub const FROM_NODE_ID: &str = "FromNodeID";
    pub const TO_NODE_ID: &str = "ToNodeID";
    pub const ROAD_RANK: &str = "RoadRank";
    pub const ROAD_TYPE: &str = "RoadType";
    pub const LINK_TYPE: &str = "LinkType";
    pub const LENGTH: &str = "Length";
    pub const LANE_NO: &str = "LaneNo";
    pub const ADMIN_CODE: &str = "AdminCode";
    pub const ITS_LINK_ID: &str = "ITSLinkID";
    pub const R_LINK_ID: &str = "R_LinkID";
    pub const L_LINK_ID: &str = "L_LinkID";
}

/// How coded attributes are written into tags.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TagVocabulary {
    /// Codes are written as they appear in the attribute table.
    #[default]
    Raw,
    /// Codes are replaced by their labels from the code tables.
    Labelled,
}

/// Hands out node and way ids in creation order. Node ids count down from -1,
/// way ids count up from 1.
#[derive(Debug)]
pub struct IdAllocator {
    next_node: OsmId,
    next_way: OsmId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        IdAllocator {
            next_node: -1,
            next_way: 1,
        }
    }
}

impl IdAllocator {
    pub fn next_node_id(&mut self) -> OsmId {
        let id = self.next_node;
        self.next_node -= 1;
        id
    }

    pub fn next_way_id(&mut self) -> OsmId {
        let id = self.next_way;
        self.next_way += 1;
        id
    }

    pub fn peek_way_id(&self) -> OsmId {
        self.next_way
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Nodes,
    Links,
}

impl Layer {
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Nodes => "nodes",
            Layer::Links => "links",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    NotAPoint { found: String },
    NotALineString { found: String },
    UnresolvedEndpoint { endpoint: Endpoint, node_ref: String },
    UnmappedCode(UnmappedCode),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAPoint { found } => write!(f, "expected Point geometry, found {}", found),
            SkipReason::NotALineString { found } => write!(f, "expected LineString geometry, found {}", found),
            SkipReason::UnresolvedEndpoint { endpoint, node_ref } => {
                let side = match endpoint {
                    Endpoint::From => "from",
                    Endpoint::To => "to",
                };
                write!(f, "{} node {} is not in the node set", side, node_ref)
            },
            SkipReason::UnmappedCode(unmapped) => unmapped.fmt(f),
        }
    }
}

/// Audit entry for a record that produced no output.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub layer: Layer,
    pub index: usize,
    pub record_id: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct BuildOutput {
    pub document: OsmDocument,
    pub skipped: Vec<SkippedRecord>,
    pub explicit_nodes: usize,
    pub synthetic_nodes: usize,
    pub ways: usize,
}

/// Turns point and line string records into one node/way document.
pub struct GraphBuilder {
    vocabulary: TagVocabulary,
    ids: IdAllocator,
    node_ids: HashMap<String, OsmId>,
    document: OsmDocument,
    skipped: Vec<SkippedRecord>,
    explicit_nodes: usize,
    synthetic_nodes: usize,
    ways: usize,
}

impl GraphBuilder {
    pub fn new(generator: &str, vocabulary: TagVocabulary) -> Self {
        GraphBuilder {
            vocabulary,
            ids: IdAllocator::default(),
            node_ids: HashMap::new(),
            document: OsmDocument::new(generator),
            skipped: Vec::new(),
            explicit_nodes: 0,
            synthetic_nodes: 0,
            ways: 0,
        }
    }

    /// Runs both passes. Every node record is converted before any link record is looked at,
    /// since link endpoints are resolved through the node id map.
    pub fn build(mut self, node_records: &[FeatureRecord], link_records: &[FeatureRecord]) -> BuildOutput {
        self.convert_nodes(node_records);
        self.convert_ways(link_records);
        self.finish()
    }

    fn skip(&mut self, layer: Layer, index: usize, record: &FeatureRecord, reason: SkipReason) {
        let record_id = match layer {
            Layer::Nodes => record.attr_string(node_fields::ID),
            Layer::Links => record.attr_string(link_fields::ID),
        };
        let reason_str = reason.to_string();
        debug!(layer = layer.name(), index = index, record_id = record_id.as_str(), reason = reason_str.as_str(); "Skipping record");
        self.skipped.push(SkippedRecord {
            layer,
            index,
            record_id,
            reason,
        });
    }

    fn node_tags(&self, record: &FeatureRecord) -> Vec<Tag> {
        let node_type = match self.vocabulary {
            TagVocabulary::Raw => record.attr_string(node_fields::NODE_TYPE),
            TagVocabulary::Labelled => codes::node_type_label(record.attr(node_fields::NODE_TYPE).as_code()).to_string(),
        };
        vec![
            ("ref", record.attr_string(node_fields::ID)).into(),
            ("node_type", node_type).into(),
            ("admin_code", record.attr_string(node_fields::ADMIN_CODE)).into(),
            ("its_node_id", record.attr_string(node_fields::ITS_NODE_ID)).into(),
        ]
    }

    pub fn convert_nodes(&mut self, records: &[FeatureRecord]) {
        for (index, record) in records.iter().enumerate() {
            let (lon, lat) = match &record.geometry {
                RecordGeometry::Point { lon, lat } => (*lon, *lat),
                other => {
                    let found = other.kind().to_string();
                    self.skip(Layer::Nodes, index, record, SkipReason::NotAPoint { found });
                    continue;
                }
            };

            let id = self.ids.next_node_id();
            let tags = self.node_tags(record);
            self.node_ids.insert(record.attr_string(node_fields::ID), id);
            self.document.elements.push(OsmElement::Node(CanonicalNode { id, lat, lon, tags }));
            self.explicit_nodes += 1;
        }
    }

    fn coded_tag(&self, record: &FeatureRecord, field: &str, label: fn(Option<i64>, &str) -> Result<&'static str, UnmappedCode>) -> Result<String, SkipReason> {
        let value = record.attr(field);
        let raw = value.render();
        if self.vocabulary == TagVocabulary::Raw || value.is_missing() {
            return Ok(raw);
        }
        label(value.as_code(), &raw)
            .map(str::to_string)
            .map_err(SkipReason::UnmappedCode)
    }

    /// Tags of one way, empty and `nan` values left out.
    pub fn way_tags(&self, record: &FeatureRecord) -> Result<Vec<Tag>, SkipReason> {
        let highway = codes::highway_for_rank(record.attr(link_fields::ROAD_RANK).as_code());
        let candidates = [
            ("ref", record.attr_string(link_fields::ID)),
            ("highway", highway.to_string()),
            ("road_type", self.coded_tag(record, link_fields::ROAD_TYPE, codes::road_type_label)?),
            ("link_type", self.coded_tag(record, link_fields::LINK_TYPE, codes::link_type_label)?),
            ("length", record.attr_string(link_fields::LENGTH)),
            ("lanes", record.attr_string(link_fields::LANE_NO)),
            ("admin_code", record.attr_string(link_fields::ADMIN_CODE)),
            ("its_link_id", record.attr_string(link_fields::ITS_LINK_ID)),
            ("r_link_id", record.attr_string(link_fields::R_LINK_ID)),
            ("l_link_id", record.attr_string(link_fields::L_LINK_ID)),
        ];
        Ok(candidates.into_iter()
            .filter(|(_, value)| !value.is_empty() && value != "nan")
            .map(Tag::from)
            .collect())
    }

    fn resolve_endpoint(&self, record: &FeatureRecord, field: &str, endpoint: Endpoint) -> Result<OsmId, SkipReason> {
        let node_ref = record.attr_string(field);
        self.node_ids.get(&node_ref)
            .copied()
            .ok_or(SkipReason::UnresolvedEndpoint { endpoint, node_ref })
    }

    fn convert_way(&mut self, record: &FeatureRecord) -> Result<(), SkipReason> {
        let vertices = match &record.geometry {
            RecordGeometry::LineString(vertices) => vertices,
            other => return Err(SkipReason::NotALineString { found: other.kind().to_string() }),
        };
        let from_id = self.resolve_endpoint(record, link_fields::FROM_NODE_ID, Endpoint::From)?;
        let to_id = self.resolve_endpoint(record, link_fields::TO_NODE_ID, Endpoint::To)?;
        // Nothing may be allocated before the last check that can reject the record.
        let tags = self.way_tags(record)?;

        let interior = if vertices.len() > 2 { &vertices[1..vertices.len() - 1] } else { &[][..] };
        let mut node_refs = Vec::with_capacity(interior.len() + 2);
        node_refs.push(from_id);
        for &(lon, lat) in interior {
            let id = self.ids.next_node_id();
            self.document.elements.push(OsmElement::Node(CanonicalNode::synthetic(id, lon, lat)));
            node_refs.push(id);
            self.synthetic_nodes += 1;
        }
        node_refs.push(to_id);

        let id = self.ids.next_way_id();
        self.document.elements.push(OsmElement::Way(CanonicalWay { id, node_refs, tags }));
        self.ways += 1;
        Ok(())
    }

    pub fn convert_ways(&mut self, records: &[FeatureRecord]) {
        for (index, record) in records.iter().enumerate() {
            if let Err(reason) = self.convert_way(record) {
                self.skip(Layer::Links, index, record, reason);
            }
        }
    }

    pub fn finish(self) -> BuildOutput {
        BuildOutput {
            document: self.document,
            skipped: self.skipped,
            explicit_nodes: self.explicit_nodes,
            synthetic_nodes: self.synthetic_nodes,
            ways: self.ways,
        }
    }
}
