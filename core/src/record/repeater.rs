use crate::prelude::{RepeaterError, RepeaterResult};
use crate::tone::Tone;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const COORDINATES_KEY: &str = "Coordinates";

static FOOTNOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.+\]").expect("footnote pattern is valid"));

/// Operating mode of a repeater, with any `[n]` footnote removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Fm,
    Nbfm,
    Fusion,
    Dmr,
    DStar,
    Other(String),
}

impl Mode {
    pub fn parse(raw: &str) -> Self {
        let base = FOOTNOTE.replace_all(raw, "");
        match base.trim() {
            "FM" => Mode::Fm,
            "NBFM" => Mode::Nbfm,
            "Fusion" => Mode::Fusion,
            "DMR" => Mode::Dmr,
            "DStar" | "D-Star" => Mode::DStar,
            other => Mode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Mode::Fm => "FM",
            Mode::Nbfm => "NBFM",
            Mode::Fusion => "Fusion",
            Mode::Dmr => "DMR",
            Mode::DStar => "DStar",
            Mode::Other(name) => name,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latitude/longitude pair, stored in the registry as `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parses the literal form `[lat, lon]`. Anything else is rejected.
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
        let (lat, lon) = inner.split_once(',')?;
        let lat = lat.trim().parse::<f64>().ok()?;
        let lon = lon.trim().parse::<f64>().ok()?;
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        Some(Self { lat, lon })
    }
}

impl Serialize for Coordinates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lat, self.lon].serialize(serializer)
    }
}

/// One row of the repeater registry.
///
/// Every attribute is optional at this layer; exporters check for the
/// fields they need and skip records that lack them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepeaterRecord {
    #[serde(
        rename = "Group Name",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub group_name: Option<String>,
    #[serde(
        rename = "Callsign",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub callsign: Option<String>,
    #[serde(
        rename = "Location",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    /// Raw mode text, footnote included.
    #[serde(
        rename = "Mode",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<String>,
    #[serde(
        rename = "Output (MHz)",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_freq_mhz: Option<String>,
    #[serde(
        rename = "Offset (MHz)",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset_mhz: Option<String>,
    #[serde(
        rename = "Tone (Hz)",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub tone: Option<String>,
    #[serde(
        rename = "Coordinates",
        default,
        deserialize_with = "coordinates_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<Coordinates>,
    #[serde(
        rename = "Long Name",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub long_name: Option<String>,
    #[serde(
        rename = "Website",
        default,
        deserialize_with = "text_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub website: Option<String>,
    /// Keys this model does not know about, kept so a rewrite loses nothing.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RepeaterRecord {
    /// Builds a record from a raw field mapping, dropping empty values.
    ///
    /// Coordinates that are not a `[lat, lon]` pair leave the record
    /// unlocated; the raw value is kept in `extra` so a rewrite preserves it.
    pub fn from_value(value: Value) -> RepeaterResult<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(RepeaterError::RegistryCorruption(format!(
                    "expected a repeater object, found {}",
                    other
                )))
            }
        };

        let unusable_coordinates = match fields.get(COORDINATES_KEY) {
            Some(raw) if coordinates_field(raw.clone()).is_err() => {
                fields.remove_entry(COORDINATES_KEY)
            }
            _ => None,
        };

        let mut record: RepeaterRecord = serde_json::from_value(Value::Object(fields))
            .map_err(|err| RepeaterError::RegistryCorruption(err.to_string()))?;
        record.extra.retain(|_, v| !is_empty_value(v));

        if let Some((key, raw)) = unusable_coordinates {
            warn!(
                "{}: unparseable coordinates {}, leaving it off the map",
                record.display_name(),
                raw
            );
            record.extra.insert(key, raw);
        }
        Ok(record)
    }

    /// Right-biased shallow merge: every field present in `overrides` wins.
    pub fn merge(self, overrides: RepeaterRecord) -> RepeaterRecord {
        let mut extra = self.extra;
        extra.extend(overrides.extra);
        RepeaterRecord {
            group_name: overrides.group_name.or(self.group_name),
            callsign: overrides.callsign.or(self.callsign),
            location: overrides.location.or(self.location),
            mode: overrides.mode.or(self.mode),
            output_freq_mhz: overrides.output_freq_mhz.or(self.output_freq_mhz),
            offset_mhz: overrides.offset_mhz.or(self.offset_mhz),
            tone: overrides.tone.or(self.tone),
            coordinates: overrides.coordinates.or(self.coordinates),
            long_name: overrides.long_name.or(self.long_name),
            website: overrides.website.or(self.website),
            extra,
        }
    }

    /// Mode with the footnote stripped. The stored text is left untouched.
    pub fn mode(&self) -> Option<Mode> {
        self.mode.as_deref().map(Mode::parse)
    }

    pub fn tone_code(&self) -> Tone {
        let mode = self.mode().unwrap_or_else(|| Mode::Other(String::new()));
        Tone::classify(&mode, self.tone.as_deref())
    }

    pub fn display_name(&self) -> &str {
        self.callsign.as_deref().unwrap_or("<no callsign>")
    }

    pub fn is_empty(&self) -> bool {
        *self == RepeaterRecord::default()
    }
}

/// Formats a downlink frequency with four decimals, then drops one
/// trailing zero (`146.94` -> `146.940`).
pub fn format_output_freq(mhz: f64) -> String {
    let mut text = format!("{:.4}", mhz);
    if text.ends_with('0') {
        text.pop();
    }
    text
}

/// Formats an offset with one decimal and an explicit sign.
pub fn format_offset(mhz: f64) -> String {
    let text = format!("{:.1}", mhz);
    if text.starts_with('-') {
        text
    } else {
        format!("+{}", text)
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected text, found {}",
            other
        ))),
    }
}

fn coordinates_field<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => match items.as_slice() {
            [] => Ok(None),
            [lat, lon] => match (lat.as_f64(), lon.as_f64()) {
                (Some(lat), Some(lon)) => Ok(Some(Coordinates::new(lat, lon))),
                _ => Err(de::Error::custom("coordinates must be two numbers")),
            },
            _ => Err(de::Error::custom("coordinates must be a [lat, lon] pair")),
        },
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Coordinates::parse(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unparseable coordinates `{}`", text))),
        Some(other) => Err(de::Error::custom(format!(
            "expected coordinates, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn footnote_is_stripped_without_touching_stored_mode() {
        let record = RepeaterRecord {
            mode: Some("FM[1]".into()),
            ..Default::default()
        };
        assert_eq!(record.mode(), Some(Mode::Fm));
        assert_eq!(record.mode.as_deref(), Some("FM[1]"));
        assert_eq!(Mode::parse("DMR[2]"), Mode::Dmr);
        assert_eq!(Mode::parse("P25"), Mode::Other("P25".into()));
    }

    #[test]
    fn empty_values_are_absent() {
        let record = RepeaterRecord::from_value(json!({
            "Callsign": "W1ABC",
            "Group Name": "",
            "Tone (Hz)": null,
            "Website": "   ",
            "Note": ""
        }))
        .unwrap();
        assert_eq!(record.callsign.as_deref(), Some("W1ABC"));
        assert!(record.group_name.is_none());
        assert!(record.tone.is_none());
        assert!(record.website.is_none());
        assert!(record.extra.is_empty());
    }

    #[test]
    fn zero_values_are_kept() {
        let record = RepeaterRecord::from_value(json!({
            "Offset (MHz)": "+0.0",
            "Coordinates": [0.0, -71.0]
        }))
        .unwrap();
        assert_eq!(record.offset_mhz.as_deref(), Some("+0.0"));
        assert_eq!(record.coordinates, Some(Coordinates::new(0.0, -71.0)));
    }

    #[test]
    fn numeric_text_fields_are_kept_as_text() {
        let record = RepeaterRecord::from_value(json!({ "Output (MHz)": 146.94 })).unwrap();
        assert_eq!(record.output_freq_mhz.as_deref(), Some("146.94"));
    }

    #[test]
    fn merge_prefers_overrides() {
        let looked_up = RepeaterRecord {
            callsign: Some("W1ABC".into()),
            output_freq_mhz: Some("146.940".into()),
            tone: Some("146.2".into()),
            ..Default::default()
        };
        let overrides = RepeaterRecord {
            tone: Some("100.0".into()),
            group_name: Some("RRA".into()),
            ..Default::default()
        };
        let merged = looked_up.merge(overrides);
        assert_eq!(merged.callsign.as_deref(), Some("W1ABC"));
        assert_eq!(merged.tone.as_deref(), Some("100.0"));
        assert_eq!(merged.group_name.as_deref(), Some("RRA"));
    }

    #[test]
    fn coordinates_parse_strictly() {
        assert_eq!(
            Coordinates::parse("[42.36, -71.05]"),
            Some(Coordinates::new(42.36, -71.05))
        );
        assert!(Coordinates::parse("42.36, -71.05").is_none());
        assert!(Coordinates::parse("[__import__('os'), 1]").is_none());
    }

    #[test]
    fn unparseable_coordinates_are_kept_as_raw_text() {
        let record = RepeaterRecord::from_value(json!({
            "Callsign": "W1ODD",
            "Coordinates": "{lat: 42.1, lng: -71.1}"
        }))
        .unwrap();
        assert_eq!(record.callsign.as_deref(), Some("W1ODD"));
        assert!(record.coordinates.is_none());
        assert_eq!(record.extra["Coordinates"], "{lat: 42.1, lng: -71.1}");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Coordinates"], "{lat: 42.1, lng: -71.1}");

        let pair = RepeaterRecord::from_value(json!({ "Coordinates": [42.1, -71.1, 3.0] })).unwrap();
        assert!(pair.coordinates.is_none());
        assert_eq!(pair.extra["Coordinates"], json!([42.1, -71.1, 3.0]));
    }

    #[test]
    fn text_coordinates_in_bracket_form_are_parsed() {
        let record = RepeaterRecord::from_value(json!({ "Coordinates": "[42.36, -71.05]" })).unwrap();
        assert_eq!(record.coordinates, Some(Coordinates::new(42.36, -71.05)));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn non_object_entries_are_corruption() {
        let err = RepeaterRecord::from_value(json!(["W1ABC"])).unwrap_err();
        assert!(matches!(err, RepeaterError::RegistryCorruption(_)));
    }

    #[test]
    fn frequency_and_offset_formatting() {
        assert_eq!(format_output_freq(146.94), "146.940");
        assert_eq!(format_output_freq(442.0125), "442.0125");
        assert_eq!(format_offset(-0.6), "-0.6");
        assert_eq!(format_offset(5.0), "+5.0");
        assert_eq!(format_offset(0.0), "+0.0");
    }

    #[test]
    fn serializes_with_registry_keys() {
        let record = RepeaterRecord {
            callsign: Some("W1ABC".into()),
            coordinates: Some(Coordinates::new(42.0, -71.0)),
            ..Default::default()
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({ "Callsign": "W1ABC", "Coordinates": [42.0, -71.0] }));
    }
}
