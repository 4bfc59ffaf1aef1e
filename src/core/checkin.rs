//! Check-in records as the insight engine sees them.
//!
//! Check-ins are created by the submission flow and are read-only here. The
//! symptom mapping arrives in one of two shapes (a keyed object, or a list of
//! `[name, record]` pairs from a serialized map) and is normalized into
//! [`SymptomMap`] at deserialization time.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A single timestamped user submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    /// Opaque unique identifier.
    #[serde(alias = "_id")]
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// The instant this check-in represents.
    pub timestamp: DateTime<Utc>,
    /// Structured data extracted from the transcript.
    #[serde(default, deserialize_with = "null_as_default")]
    pub structured: StructuredData,
    /// Whether the user flagged this entry for their doctor.
    #[serde(default, deserialize_with = "null_as_default")]
    pub flagged_for_doctor: bool,
}

impl CheckIn {
    /// Create a check-in with empty structured data.
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            timestamp,
            structured: StructuredData::default(),
            flagged_for_doctor: false,
        }
    }

    /// Add a symptom with the given severity.
    pub fn with_symptom(mut self, name: impl Into<String>, severity: impl Into<Value>) -> Self {
        self.structured
            .symptoms
            .insert(name, SymptomRecord::with_severity(severity));
        self
    }
}

/// Structured fields extracted from a check-in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructuredData {
    /// Symptom name to record, in natural enumeration order.
    pub symptoms: SymptomMap,
    /// Free-text activities.
    #[serde(deserialize_with = "null_as_default")]
    pub activities: Vec<String>,
    /// Free-text triggers.
    #[serde(deserialize_with = "null_as_default")]
    pub triggers: Vec<String>,
    /// Free-text notes.
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
}

/// Read an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One symptom entry.
///
/// `severity` is kept as raw JSON because upstream extraction does not
/// guarantee a number. Use [`SymptomRecord::severity`] to read it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SymptomRecord {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub severity: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SymptomRecord {
    /// Create a record with only a severity.
    pub fn with_severity(severity: impl Into<Value>) -> Self {
        Self {
            severity: severity.into(),
            location: None,
            notes: None,
        }
    }

    /// The numerically coerced severity, or `None` if it is not a number.
    ///
    /// No clamping happens here.
    pub fn severity(&self) -> Option<f64> {
        coerce_severity(&self.severity)
    }
}

/// Coerce a raw severity into a finite number.
///
/// Numbers and numeric strings are accepted; everything else is absent.
pub fn coerce_severity(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Canonical symptom mapping: unique names in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymptomMap {
    entries: Vec<(String, SymptomRecord)>,
}

impl SymptomMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. An existing name keeps its position and is overwritten.
    pub fn insert(&mut self, name: impl Into<String>, record: SymptomRecord) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = record,
            None => self.entries.push((name, record)),
        }
    }

    /// Look up a symptom by exact name.
    pub fn get(&self, name: &str) -> Option<&SymptomRecord> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in natural order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymptomRecord)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Iterate entries that carry a numeric severity, in natural order.
    pub fn severities(&self) -> impl Iterator<Item = (&str, f64)> {
        self.iter()
            .filter_map(|(name, record)| record.severity().map(|s| (name, s)))
    }

    /// Highest numeric severity, or 0 when none is present.
    pub fn max_severity(&self) -> f64 {
        self.severities().map(|(_, s)| s).fold(0.0, f64::max)
    }
}

impl Serialize for SymptomMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, record) in &self.entries {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SymptomMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SymptomMapVisitor)
    }
}

struct SymptomMapVisitor;

impl<'de> Visitor<'de> for SymptomMapVisitor {
    type Value = SymptomMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a symptom object or a list of [name, record] pairs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SymptomMap, A::Error> {
        let mut symptoms = SymptomMap::new();
        while let Some((name, record)) = access.next_entry::<String, SymptomRecord>()? {
            symptoms.insert(name, record);
        }
        Ok(symptoms)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SymptomMap, A::Error> {
        let mut symptoms = SymptomMap::new();
        while let Some((name, record)) = seq.next_element::<(String, SymptomRecord)>()? {
            symptoms.insert(name, record);
        }
        Ok(symptoms)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<SymptomMap, E> {
        Ok(SymptomMap::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<SymptomMap, E> {
        Ok(SymptomMap::new())
    }
}
