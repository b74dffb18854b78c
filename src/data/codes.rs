//! Code tables of the national road network node/link layers.
//!
//! `HIGHWAY_BY_ROAD_RANK` is what the way converter actually tags with. It differs from
//! `ROAD_RANK_MAP` on rank 9 (`primary` instead of `road`); both are kept so that either
//! can be switched to with a one-line change.

use std::fmt;

pub type CodeTable = &'static [(i64, &'static str)];

pub const NODE_TYPE_MAP: CodeTable = &[
    (1, "flat_intersection"),
    (2, "grade_separated_intersection"),
    (3, "tunnel_terminal"),
    (4, "bridge_terminal"),
    (5, "under_or_overpass_terminal"),
    (7, "lane_change"),
    (8, "tollgate_terminal"),
    (9, "toll_station"),
    (10, "roundabout"),
    (99, "unknown"),
];

pub const ROAD_RANK_MAP: CodeTable = &[
    (1, "motorway"),
    (2, "trunk"),
    (3, "primary"),
    (4, "secondary"),
    (5, "tertiary"),
    (6, "residential"),
    (7, "residential"),
    (8, "residential"),
    (9, "road"),
];

pub const HIGHWAY_BY_ROAD_RANK: CodeTable = &[
    (1, "motorway"),
    (2, "trunk"),
    (3, "primary"),
    (4, "secondary"),
    (5, "tertiary"),
    (6, "residential"),
    (7, "residential"),
    (8, "residential"),
    (9, "primary"),
];

pub const ROAD_TYPE_MAP: CodeTable = &[
    (1, "normal"),
    (2, "tunnel"),
    (3, "bridge"),
    (4, "underpass"),
    (5, "overpass"),
];

pub const LINK_TYPE_MAP: CodeTable = &[
    (1, "intersection_path"),
    (2, "toll_highpass"),
    (3, "toll_non_highpass"),
    (4, "bus_only"),
    (5, "reversible"),
    (6, "main_lane"),
    (7, "rest_area_entry"),
    (8, "rest_area_internal"),
    (9, "rest_area_exit"),
    (10, "nap_area_entry"),
    (11, "nap_area_internal"),
    (12, "nap_area_exit"),
    (13, "intersection_entry"),
    (14, "intersection_exit"),
    (99, "other"),
];

pub const NODE_TYPE_FALLBACK: &str = "unknown";
pub const HIGHWAY_FALLBACK: &str = "primary";

/// A code with no entry in a table that has no fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedCode {
    pub table: &'static str,
    pub code: String,
}

impl fmt::Display for UnmappedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {} is not in {}", self.code, self.table)
    }
}

pub fn lookup(table: CodeTable, code: i64) -> Option<&'static str> {
    table.iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| *label)
}

fn lookup_strict(table: CodeTable, table_name: &'static str, code: Option<i64>, raw: &str) -> Result<&'static str, UnmappedCode> {
    code.and_then(|code| lookup(table, code))
        .ok_or_else(|| UnmappedCode {
            table: table_name,
            code: raw.to_string(),
        })
}

pub fn node_type_label(code: Option<i64>) -> &'static str {
    code.and_then(|code| lookup(NODE_TYPE_MAP, code))
        .unwrap_or(NODE_TYPE_FALLBACK)
}

pub fn highway_for_rank(code: Option<i64>) -> &'static str {
    code.and_then(|code| lookup(HIGHWAY_BY_ROAD_RANK, code))
        .unwrap_or(HIGHWAY_FALLBACK)
}

pub fn road_rank_label(code: Option<i64>, raw: &str) -> Result<&'static str, UnmappedCode> {
    lookup_strict(ROAD_RANK_MAP, "ROAD_RANK_MAP", code, raw)
}

pub fn road_type_label(code: Option<i64>, raw: &str) -> Result<&'static str, UnmappedCode> {
    lookup_strict(ROAD_TYPE_MAP, "ROAD_TYPE_MAP", code, raw)
}

pub fn link_type_label(code: Option<i64>, raw: &str) -> Result<&'static str, UnmappedCode> {
    lookup_strict(LINK_TYPE_MAP, "LINK_TYPE_MAP", code, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highway_table_disagrees_with_road_rank_map_on_rank_nine() {
        assert_eq!(highway_for_rank(Some(9)), "primary");
        assert_eq!(road_rank_label(Some(9), "9"), Ok("road"));
        for rank in 1..=8 {
            assert_eq!(Ok(highway_for_rank(Some(rank))), road_rank_label(Some(rank), ""));
        }
    }

    #[test]
    fn highway_falls_back_to_primary() {
        assert_eq!(highway_for_rank(Some(42)), "primary");
        assert_eq!(highway_for_rank(None), "primary");
        assert_eq!(highway_for_rank(Some(6)), "residential");
    }

    #[test]
    fn node_types_fall_back_to_unknown() {
        assert_eq!(node_type_label(Some(10)), "roundabout");
        assert_eq!(node_type_label(Some(6)), "unknown");
        assert_eq!(node_type_label(None), "unknown");
    }

    #[test]
    fn strict_tables_report_unmapped_codes() {
        assert_eq!(link_type_label(Some(6), "6"), Ok("main_lane"));
        assert_eq!(road_type_label(Some(3), "3"), Ok("bridge"));
        let err = link_type_label(Some(15), "15").unwrap_err();
        assert_eq!(err.table, "LINK_TYPE_MAP");
        assert_eq!(err.to_string(), "code 15 is not in LINK_TYPE_MAP");
        assert!(road_type_label(None, "abc").is_err());
    }
}
