//! In-memory shape of an extracted log table
//!
//! `LogRecord` is the typed row of the `temp_logs` table. `DynamicRecord`
//! is the loosely-shaped record the boundary accepts when previously
//! extracted (and possibly edited) data is handed back for export.

use crate::errors::{Result, TempLogError};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A single cell as the query engine returned it
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Integer(_) => "integer",
            CellValue::Real(_) => "real",
            CellValue::Text(_) => "text",
            CellValue::Blob(_) => "blob",
        }
    }
}

/// Unquoted display form: null is empty, blobs are lowercase hex
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Real(r) => write!(f, "{}", r),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Blob(b) => f.write_str(&hex::encode(b)),
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Real(r) => serializer.serialize_f64(*r),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Blob(b) => serializer.serialize_str(&hex::encode(b)),
        }
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Text(b.to_string()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Integer(i),
                None => CellValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => CellValue::Text(s),
            nested @ (Value::Array(_) | Value::Object(_)) => CellValue::Text(nested.to_string()),
        }
    }
}

/// Timestamp in the representation the source table stored it in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Integer(i64),
    Text(String),
}

impl From<Timestamp> for CellValue {
    fn from(ts: Timestamp) -> Self {
        match ts {
            Timestamp::Integer(i) => CellValue::Integer(i),
            Timestamp::Text(s) => CellValue::Text(s),
        }
    }
}

/// Temperature reading as stored; sensors may log text such as `N/A`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Temperature {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Temperature {
    /// Numeric value of the reading, `None` for text readings
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Temperature::Integer(i) => Some(*i as f64),
            Temperature::Real(r) => Some(*r),
            Temperature::Text(_) => None,
        }
    }
}

impl From<Temperature> for CellValue {
    fn from(t: Temperature) -> Self {
        match t {
            Temperature::Integer(i) => CellValue::Integer(i),
            Temperature::Real(r) => CellValue::Real(r),
            Temperature::Text(s) => CellValue::Text(s),
        }
    }
}

/// Why a result row could not be mapped onto a `LogRecord`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("result set has no '{0}' column")]
    MissingColumn(&'static str),

    #[error("column 'sl' holds a {found} value where an integer was expected")]
    NonIntegerKey { found: &'static str },

    #[error("row has {cells} cells but the result set has {columns} columns")]
    Width { cells: usize, columns: usize },
}

/// One row of the `temp_logs` table
///
/// Only `sl` is typed strictly. The other columns keep whatever SQLite
/// stored, with blobs carried as their hex text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub sl: i64,
    pub sensor_name: Option<String>,
    pub status: Option<String>,
    pub temperature: Option<Temperature>,
    pub timestamp: Option<Timestamp>,
}

impl LogRecord {
    /// Field names in their fixed output order
    pub const FIELD_NAMES: [&'static str; 5] =
        ["sl", "sensor_name", "status", "temperature", "timestamp"];

    /// Build a record by zipping a result row against its column names.
    ///
    /// Columns outside the record's field set are ignored; absent optional
    /// columns map to `None`.
    pub fn from_row(
        columns: &[String],
        cells: Vec<CellValue>,
    ) -> std::result::Result<Self, RowError> {
        if columns.len() != cells.len() {
            return Err(RowError::Width {
                cells: cells.len(),
                columns: columns.len(),
            });
        }

        let mut sl = None;
        let mut record = LogRecord {
            sl: 0,
            sensor_name: None,
            status: None,
            temperature: None,
            timestamp: None,
        };

        for (column, cell) in columns.iter().zip(cells) {
            match column.as_str() {
                "sl" => sl = Some(key_cell(cell)?),
                "sensor_name" => record.sensor_name = text_cell(cell),
                "status" => record.status = text_cell(cell),
                "temperature" => record.temperature = temperature_cell(cell),
                "timestamp" => record.timestamp = timestamp_cell(cell),
                _ => {}
            }
        }

        record.sl = sl.ok_or(RowError::MissingColumn("sl"))?;
        Ok(record)
    }

    /// The value of one field as a cell, `None` for unknown field names
    pub fn cell(&self, name: &str) -> Option<CellValue> {
        let cell = match name {
            "sl" => CellValue::Integer(self.sl),
            "sensor_name" => self.sensor_name.clone().map_or(CellValue::Null, CellValue::Text),
            "status" => self.status.clone().map_or(CellValue::Null, CellValue::Text),
            "temperature" => self.temperature.clone().map_or(CellValue::Null, CellValue::from),
            "timestamp" => self.timestamp.clone().map_or(CellValue::Null, CellValue::from),
            _ => return None,
        };
        Some(cell)
    }
}

fn key_cell(cell: CellValue) -> std::result::Result<i64, RowError> {
    match cell {
        CellValue::Integer(i) => Ok(i),
        other => Err(RowError::NonIntegerKey {
            found: other.type_name(),
        }),
    }
}

// SQLite columns are dynamically typed; values outside the declared type
// keep their display form rather than failing the row.
fn text_cell(cell: CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::Text(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn temperature_cell(cell: CellValue) -> Option<Temperature> {
    match cell {
        CellValue::Null => None,
        CellValue::Integer(i) => Some(Temperature::Integer(i)),
        CellValue::Real(r) => Some(Temperature::Real(r)),
        CellValue::Text(s) => Some(Temperature::Text(s)),
        blob @ CellValue::Blob(_) => Some(Temperature::Text(blob.to_string())),
    }
}

fn timestamp_cell(cell: CellValue) -> Option<Timestamp> {
    match cell {
        CellValue::Null => None,
        CellValue::Integer(i) => Some(Timestamp::Integer(i)),
        CellValue::Text(s) => Some(Timestamp::Text(s)),
        other => Some(Timestamp::Text(other.to_string())),
    }
}

/// Records of one extraction, most recent (`sl` descending) first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecordSet(Vec<LogRecord>);

impl LogRecordSet {
    pub fn new(records: Vec<LogRecord>) -> Self {
        Self(records)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.0.iter()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.0
    }
}

impl FromIterator<LogRecord> for LogRecordSet {
    fn from_iter<I: IntoIterator<Item = LogRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for LogRecordSet {
    type Item = LogRecord;
    type IntoIter = std::vec::IntoIter<LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LogRecordSet {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A record whose field set comes from the data itself, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    fields: Vec<(String, CellValue)>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing the value of an existing field of the same name
    pub fn with_field(mut self, name: impl Into<String>, value: CellValue) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Parse a JSON array of objects, keeping each object's key order
    pub fn list_from_json(text: &str) -> Result<Vec<DynamicRecord>> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let serde_json::Value::Array(items) = value else {
            return Err(TempLogError::InvalidInput {
                message: "expected a JSON array of records".to_string(),
            }
            .into());
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                serde_json::Value::Object(map) => Ok(DynamicRecord::from(map)),
                _ => Err(TempLogError::InvalidInput {
                    message: format!("record {} is not a JSON object", index),
                }
                .into()),
            })
            .collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for DynamicRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(k, v)| (k, CellValue::from(v)))
                .collect(),
        }
    }
}

impl Serialize for DynamicRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl From<&LogRecord> for DynamicRecord {
    fn from(record: &LogRecord) -> Self {
        LogRecord::FIELD_NAMES
            .iter()
            .fold(DynamicRecord::new(), |acc, name| {
                acc.with_field(*name, record.cell(name).unwrap_or(CellValue::Null))
            })
    }
}
