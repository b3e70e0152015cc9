//! Record normalization
//!
//! Turns one raw adverse-event record into a clean document: empty
//! values swept out, redundant `*dateformat` fields dropped, dates
//! rendered ISO, integer and categorical codes coerced, keys lowered,
//! and the stable `_id` attached.

use crate::schema::EventSchema;
use crate::{EventDocument, IngestError, Result};
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Parse an openFDA date string: 8 digits for a full date, 6 for a
/// month, 4 for a year. Partial dates clamp to the first day.
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let padded = match date_str.len() {
        8 => date_str.to_string(),
        6 => format!("{date_str}01"),
        4 => format!("{date_str}0101"),
        _ => return None,
    };
    NaiveDate::parse_from_str(&padded, "%Y%m%d").ok()
}

/// Normalize one raw record into a storable document.
///
/// The record must be a JSON object carrying a `safetyreportid`.
pub fn normalize_record(record: Value, schema: &EventSchema) -> Result<EventDocument> {
    let mut record = sweep(record)
        .ok_or_else(|| IngestError::MalformedRecord("record swept down to nothing".to_string()))?;

    remove_dateformat_fields(&mut record);
    coerce_values(&mut record, schema)?;
    let record = lowercase_keys(record);

    let Value::Object(mut doc) = record else {
        return Err(IngestError::MalformedRecord(
            "record is not a JSON object".to_string(),
        ));
    };

    if let Some(duplicate) = doc.get("duplicate") {
        // the flag arrives as a code, sometimes left as a string
        let is_duplicate = duplicate == &Value::from(1) || duplicate == &Value::from("1");
        doc.insert("duplicate".to_string(), Value::Bool(is_duplicate));
    }

    let report_id = doc
        .get("safetyreportid")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            IngestError::MalformedRecord("record has no safetyreportid".to_string())
        })?;
    doc.insert("_id".to_string(), Value::String(report_id));

    Ok(doc)
}

/// Drop empty strings and nulls recursively. Containers emptied by the
/// sweep disappear with their values; a fully swept input yields `None`.
fn sweep(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::Object(map) => {
            let swept: Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| sweep(v).map(|v| (k, v)))
                .collect();
            (!swept.is_empty()).then_some(Value::Object(swept))
        }
        Value::Array(items) => {
            let swept: Vec<Value> = items.into_iter().filter_map(sweep).collect();
            (!swept.is_empty()).then_some(Value::Array(swept))
        }
        other => Some(other),
    }
}

/// The `*dateformat` companion fields only describe the encoding of the
/// sibling date field, which normalization makes uniform.
fn remove_dateformat_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !key.ends_with("dateformat"));
            for child in map.values_mut() {
                remove_dateformat_fields(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                remove_dateformat_fields(item);
            }
        }
        _ => {}
    }
}

/// Coerce leaf values by their key: `*date` fields to ISO dates, schema
/// int fields to integers, categorical codes to their labels.
fn coerce_values(value: &mut Value, schema: &EventSchema) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                match child {
                    Value::Object(_) | Value::Array(_) => coerce_values(child, schema)?,
                    _ => {
                        if let Some(coerced) = coerce_leaf(key, child, schema)? {
                            *child = coerced;
                        }
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                coerce_values(item, schema)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn coerce_leaf(key: &str, value: &Value, schema: &EventSchema) -> Result<Option<Value>> {
    let Some(text) = value.as_str() else {
        return Ok(None);
    };

    if key.ends_with("date") {
        let date = parse_date(text).ok_or_else(|| {
            IngestError::MalformedRecord(format!("unparseable date {key}={text}"))
        })?;
        return Ok(Some(Value::String(date.format("%Y-%m-%d").to_string())));
    }

    if schema.is_int_field(key) {
        let parsed: i64 = text.parse().map_err(|_| {
            IngestError::MalformedRecord(format!("non-integer value {key}={text}"))
        })?;
        return Ok(Some(Value::from(parsed)));
    }

    if let Some(label) = schema.categorical_label(key, text) {
        return Ok(Some(Value::String(label.to_string())));
    }

    Ok(None)
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.replace(' ', "_").to_lowercase(), lowercase_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}
