use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use geojson::{Feature, GeoJson, Value};
use log::info;
use xz::bufread::XzDecoder;

use crate::data::feature::{AttrValue, FeatureRecord, RecordGeometry};
use crate::errors::Result;

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if !path.try_exists()? {
        return Err(format!("Input file not found: {}", path.display()).into());
    }
    let file_reader = BufReader::new(fs::File::open(path)?);
    if path.extension().is_some_and(|ext| ext == "xz") {
        Ok(Box::new(BufReader::new(XzDecoder::new(file_reader))))
    } else {
        Ok(Box::new(file_reader))
    }
}

fn convert_geometry(feature: &Feature) -> RecordGeometry {
    let Some(geometry) = &feature.geometry else {
        return RecordGeometry::Missing;
    };
    match &geometry.value {
        Value::Point(position) if position.len() >= 2 => RecordGeometry::Point {
            lon: position[0],
            lat: position[1],
        },
        Value::Point(_) => RecordGeometry::Other("empty Point".to_string()),
        Value::LineString(positions) => RecordGeometry::LineString(
            positions.iter()
                .filter(|position| position.len() >= 2)
                .map(|position| (position[0], position[1]))
                .collect()
        ),
        other => RecordGeometry::Other(geometry_type_name(other).to_string()),
    }
}

fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn convert_value(value: &serde_json::Value) -> AttrValue {
    match value {
        serde_json::Value::Null => AttrValue::Missing,
        serde_json::Value::String(text) => AttrValue::Text(text.clone()),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(integer) => AttrValue::Integer(integer),
            None => number.as_f64().map_or(AttrValue::Missing, AttrValue::Float),
        },
        serde_json::Value::Bool(flag) => AttrValue::Text(if *flag { "True" } else { "False" }.to_string()),
        other => AttrValue::Text(other.to_string()),
    }
}

pub fn convert_feature(feature: &Feature) -> FeatureRecord {
    let attributes: HashMap<String, AttrValue> = feature.properties.iter()
        .flatten()
        .map(|(name, value)| (name.clone(), convert_value(value)))
        .collect();
    FeatureRecord::new(convert_geometry(feature), attributes)
}

pub fn parse_feature_collection<R: Read>(reader: R) -> Result<Vec<FeatureRecord>> {
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match GeoJson::from_json_value(json)? {
        GeoJson::FeatureCollection(collection) => Ok(
            collection.features.iter()
                .map(convert_feature)
                .collect()
        ),
        GeoJson::Feature(feature) => Ok(vec![convert_feature(&feature)]),
        GeoJson::Geometry(_) => Err("Expected a FeatureCollection, found a bare geometry".into()),
    }
}

/// Reads a GeoJSON feature collection whose coordinates are already lon/lat.
pub fn read_records(path: &Path) -> Result<Vec<FeatureRecord>> {
    let reader = open_input(path)?;
    let records = parse_feature_collection(reader)?;
    let path_str = path.display().to_string();
    info!(path = path_str.as_str(), records = records.len(); "Read feature collection");
    Ok(records)
}
