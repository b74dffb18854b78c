use std::collections::HashMap;

/// Geometry of one input record, coordinates in longitude/latitude degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordGeometry {
    Point { lon: f64, lat: f64 },
    LineString(Vec<(f64, f64)>),
    Other(String),
    Missing,
}

impl RecordGeometry {
    pub fn kind(&self) -> &str {
        match self {
            RecordGeometry::Point { .. } => "Point",
            RecordGeometry::LineString(_) => "LineString",
            RecordGeometry::Other(kind) => kind,
            RecordGeometry::Missing => "null",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

impl AttrValue {
    /// Text form used for tag values and id matching.
    pub fn render(&self) -> String {
        match self {
            AttrValue::Text(text) => text.clone(),
            AttrValue::Integer(value) => value.to_string(),
            AttrValue::Float(value) => format_float(*value),
            AttrValue::Missing => "nan".to_string(),
        }
    }

    /// Integer code carried by the value, if it has one. Floats are truncated toward zero.
    pub fn as_code(&self) -> Option<i64> {
        match self {
            AttrValue::Integer(value) => Some(*value),
            AttrValue::Float(value) if value.is_finite() => Some(value.trunc() as i64),
            AttrValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            AttrValue::Missing => true,
            AttrValue::Float(value) => value.is_nan(),
            _ => false,
        }
    }
}

/// Formats a float the way the source tables print them: shortest round-trip digits,
/// integral values keep one decimal place, and magnitudes from 1e16 up or below 1e-4
/// switch to exponent form with a signed two-digit exponent (`1e+16`, `1.5e-05`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if value != 0.0 && (value.abs() >= 1e16 || value.abs() < 1e-4) {
        format_exponent(value)
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn format_exponent(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => {
                let sign = if exponent < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, exponent.abs())
            },
            Err(_) => formatted,
        },
        None => formatted,
    }
}

static MISSING: AttrValue = AttrValue::Missing;

/// One input row. Read-only once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub geometry: RecordGeometry,
    pub attributes: HashMap<String, AttrValue>,
}

impl FeatureRecord {
    pub fn new(geometry: RecordGeometry, attributes: HashMap<String, AttrValue>) -> Self {
        FeatureRecord {
            geometry,
            attributes,
        }
    }

    /// Absent keys read as `Missing`.
    pub fn attr(&self, name: &str) -> &AttrValue {
        self.attributes.get(name).unwrap_or(&MISSING)
    }

    pub fn attr_string(&self, name: &str) -> String {
        self.attr(name).render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_render_like_the_source_tables() {
        assert_eq!(format_float(120.5), "120.5");
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(37.239555), "37.239555");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(-0.0), "-0.0");
    }

    #[test]
    fn extreme_floats_use_exponent_form() {
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(-2.5e20), "-2.5e+20");
        assert_eq!(format_float(1.2345e-100), "1.2345e-100");
        assert_eq!(format_float(9999999999999998.0), "9999999999999998.0");
    }

    #[test]
    fn missing_attribute_renders_as_nan() {
        let record = FeatureRecord::new(RecordGeometry::Missing, HashMap::new());
        assert_eq!(record.attr_string("L_LinkID"), "nan");
        assert!(record.attr("L_LinkID").is_missing());
    }

    #[test]
    fn codes_parse_from_any_numeric_form() {
        assert_eq!(AttrValue::Integer(3).as_code(), Some(3));
        assert_eq!(AttrValue::Float(9.0).as_code(), Some(9));
        assert_eq!(AttrValue::Float(1.5).as_code(), Some(1));
        assert_eq!(AttrValue::Float(-2.7).as_code(), Some(-2));
        assert_eq!(AttrValue::Float(f64::NAN).as_code(), None);
        assert_eq!(AttrValue::Text(" 6 ".to_string()).as_code(), Some(6));
        assert_eq!(AttrValue::Text("x".to_string()).as_code(), None);
        assert_eq!(AttrValue::Missing.as_code(), None);
    }
}
