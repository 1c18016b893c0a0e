//! Single-row spreadsheet export of flat records.
//!
//! A record is written as a header row of field names followed by one row of
//! values. Decimals are written in full, so currency and integer fields read
//! back exactly. Nested fields (lists, sub-objects) are rejected.
//!
//! On import each cell is read as the type of the field it lands in, so a
//! text field holding `2024` stays text. An empty cell reads back as an
//! absent optional value.

use serde::de::value::{Error as CellError, MapDeserializer, StringDeserializer};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use serde::Serialize;
use serde_json::Value;
use std::io::{Read, Write};

use crate::error::ShareValError;
use crate::ShareValResult;

/// Write `record` as CSV to `writer`.
pub fn to_writer<T: Serialize, W: Write>(record: &T, writer: W) -> ShareValResult<()> {
    let fields = match serde_json::to_value(record)? {
        Value::Object(map) => map,
        other => {
            return Err(ShareValError::SerializationError(format!(
                "Only records can be exported, got {other}"
            )))
        }
    };

    let mut headers = Vec::with_capacity(fields.len());
    let mut cells = Vec::with_capacity(fields.len());
    for (name, value) in &fields {
        headers.push(name.as_str());
        cells.push(cell_text(name, value)?);
    }

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&headers)?;
    wtr.write_record(&cells)?;
    wtr.flush()
        .map_err(|e| ShareValError::SerializationError(e.to_string()))?;

    log::debug!("exported record with {} columns", headers.len());
    Ok(())
}

/// Read the first data row of a CSV export back into a record.
pub fn from_reader<T: DeserializeOwned, R: Read>(reader: R) -> ShareValResult<T> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let row = rdr.records().next().ok_or_else(|| {
        ShareValError::SerializationError("Export contains a header but no data row".into())
    })??;

    if row.len() != headers.len() {
        return Err(ShareValError::SerializationError(format!(
            "Row has {} cells but the header names {} columns",
            row.len(),
            headers.len()
        )));
    }

    let cells = headers
        .iter()
        .zip(row.iter())
        .map(|(name, cell)| (name.to_string(), Cell(cell.to_string())));
    let fields: MapDeserializer<_, CellError> = MapDeserializer::new(cells);

    T::deserialize(fields).map_err(|e| ShareValError::SerializationError(e.to_string()))
}

pub fn to_csv<T: Serialize>(record: &T) -> ShareValResult<Vec<u8>> {
    let mut buf = Vec::new();
    to_writer(record, &mut buf)?;
    Ok(buf)
}

pub fn from_csv<T: DeserializeOwned>(bytes: &[u8]) -> ShareValResult<T> {
    from_reader(bytes)
}

fn cell_text(name: &str, value: &Value) -> ShareValResult<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err(ShareValError::SerializationError(format!(
            "Field '{name}' is not a scalar and cannot be exported as a single cell"
        ))),
    }
}

/// One exported cell, deserialized as whatever its field asks for.
struct Cell(String);

impl<'de> de::Deserializer<'de> for Cell {
    type Error = CellError;

    /// Untyped positions, such as fields of a flattened record, get the
    /// narrowest reading of the text: integer, then boolean, then string.
    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, CellError> {
        let text = self.0;
        if text.is_empty() {
            return visitor.visit_unit();
        }
        if let Ok(n) = text.parse::<u64>() {
            return visitor.visit_u64(n);
        }
        if let Ok(n) = text.parse::<i64>() {
            return visitor.visit_i64(n);
        }
        match text.as_str() {
            "true" => visitor.visit_bool(true),
            "false" => visitor.visit_bool(false),
            _ => visitor.visit_string(text),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, CellError> {
        if self.0.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, CellError> {
        visitor.visit_string(self.0)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, CellError> {
        visitor.visit_string(self.0)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, CellError> {
        let variant: StringDeserializer<CellError> = self.0.into_deserializer();
        visitor.visit_enum(variant)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char bytes byte_buf
        unit unit_struct newtype_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

impl<'de> IntoDeserializer<'de, CellError> for Cell {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}
