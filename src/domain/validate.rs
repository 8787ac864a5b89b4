//! Field validation for incoming records.
//!
//! Every field has its own typed parser that either yields the normalized value or the
//! field's tag. The two entry points run all parsers and accumulate the tags, so one
//! response can report every bad field at once.

use super::record::{NewPotato, PotatoPatch, BUSINESS_FIELDS, NAME_MAX_CHARS};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value as JsonValue};

/// Short machine-readable label naming the field that failed.
pub type FieldTag = &'static str;

pub const NAME: FieldTag = "name";
pub const WEIGHT_KG: FieldTag = "weight_kg";
pub const QUANTITY: FieldTag = "quantity";
pub const HARVEST_DATE: FieldTag = "harvest_date";
pub const IS_ORGANIC: FieldTag = "is_organic";
/// Reported when a partial update carries no business field at all.
pub const NO_FIELDS: FieldTag = "no fields provided";

// Largest magnitude at which every integer is still exactly representable as f64.
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_991.0;

/// Validates a full record for create. All five business fields are required.
pub fn validate_create(input: &JsonValue) -> Result<NewPotato, Vec<FieldTag>> {
    let empty = Map::new();
    let fields = input.as_object().unwrap_or(&empty);
    let mut errors = Vec::new();

    let name = required(&mut errors, fields.get(NAME), NAME, parse_name);
    let weight_kg = required(&mut errors, fields.get(WEIGHT_KG), WEIGHT_KG, parse_weight);
    let quantity = required(&mut errors, fields.get(QUANTITY), QUANTITY, parse_quantity);
    let harvest_date = required(&mut errors, fields.get(HARVEST_DATE), HARVEST_DATE, parse_harvest_date);
    let is_organic = required(&mut errors, fields.get(IS_ORGANIC), IS_ORGANIC, parse_is_organic);

    match (name, weight_kg, quantity, harvest_date, is_organic) {
        (Some(name), Some(weight_kg), Some(quantity), Some(harvest_date), Some(is_organic)) => {
            Ok(NewPotato {
                name,
                weight_kg,
                quantity,
                harvest_date,
                is_organic,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a partial record for update. Only the fields present are checked; `id` and
/// unknown keys are ignored and never forwarded.
pub fn validate_partial(input: &JsonValue) -> Result<PotatoPatch, Vec<FieldTag>> {
    let empty = Map::new();
    let fields = input.as_object().unwrap_or(&empty);

    if !BUSINESS_FIELDS.iter().any(|f| fields.contains_key(*f)) {
        return Err(vec![NO_FIELDS]);
    }

    let mut errors = Vec::new();
    let patch = PotatoPatch {
        name: optional(&mut errors, fields.get(NAME), parse_name),
        weight_kg: optional(&mut errors, fields.get(WEIGHT_KG), parse_weight),
        quantity: optional(&mut errors, fields.get(QUANTITY), parse_quantity),
        harvest_date: optional(&mut errors, fields.get(HARVEST_DATE), parse_harvest_date),
        is_organic: optional(&mut errors, fields.get(IS_ORGANIC), parse_is_organic),
    };

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

fn required<T>(
    errors: &mut Vec<FieldTag>,
    value: Option<&JsonValue>,
    tag: FieldTag,
    parse: fn(&JsonValue) -> Result<T, FieldTag>,
) -> Option<T> {
    match value.ok_or(tag).and_then(parse) {
        Ok(v) => Some(v),
        Err(tag) => {
            errors.push(tag);
            None
        }
    }
}

fn optional<T>(
    errors: &mut Vec<FieldTag>,
    value: Option<&JsonValue>,
    parse: fn(&JsonValue) -> Result<T, FieldTag>,
) -> Option<T> {
    match parse(value?) {
        Ok(v) => Some(v),
        Err(tag) => {
            errors.push(tag);
            None
        }
    }
}

pub fn parse_name(v: &JsonValue) -> Result<String, FieldTag> {
    let name = v.as_str().map(str::trim).ok_or(NAME)?;
    if name.is_empty() || name.chars().count() > NAME_MAX_CHARS {
        return Err(NAME);
    }
    Ok(name.to_string())
}

pub fn parse_weight(v: &JsonValue) -> Result<f64, FieldTag> {
    let weight = as_number(v).ok_or(WEIGHT_KG)?;
    if weight < 0.0 {
        return Err(WEIGHT_KG);
    }
    Ok(weight)
}

pub fn parse_quantity(v: &JsonValue) -> Result<i64, FieldTag> {
    let quantity = match v {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };
    quantity.filter(|q| *q >= 0).ok_or(QUANTITY)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its own calendar date is kept).
pub fn parse_harvest_date(v: &JsonValue) -> Result<NaiveDate, FieldTag> {
    let raw = v.as_str().map(str::trim).ok_or(HARVEST_DATE)?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .ok_or(HARVEST_DATE)
}

/// Strict: only a JSON boolean passes. `"true"`, `1` and friends are rejected.
pub fn parse_is_organic(v: &JsonValue) -> Result<bool, FieldTag> {
    v.as_bool().ok_or(IS_ORGANIC)
}

fn as_number(v: &JsonValue) -> Option<f64> {
    let n = match v {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_F64_INT {
        Some(n as i64)
    } else {
        None
    }
}
