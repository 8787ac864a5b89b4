//! The potato inventory record, in its stored and its write shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Business fields of a record, in the order they are validated and reported.
pub const BUSINESS_FIELDS: [&str; 5] = ["name", "weight_kg", "quantity", "harvest_date", "is_organic"];

pub const NAME_MAX_CHARS: usize = 50;

/// A row as stored by the remote data-API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Potato {
    pub id: i64,
    pub name: String,
    pub weight_kg: f64,
    pub quantity: i64,
    pub harvest_date: NaiveDate,
    pub is_organic: bool,
}

/// Normalized payload for a create: trimmed name, coerced numbers, parsed date.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NewPotato {
    pub name: String,
    pub weight_kg: f64,
    pub quantity: i64,
    pub harvest_date: NaiveDate,
    pub is_organic: bool,
}

/// Normalized payload for a partial update. Only the fields that were sent are set,
/// and only those are serialized.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct PotatoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvest_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_organic: Option<bool>,
}

/// Request body accepted by the create endpoint. Documentation only: the handler reads
/// the raw body so that loosely typed input can be reported field by field.
#[derive(Deserialize, Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreatePotatoRequest {
    /// 1-50 characters after trimming.
    pub name: String,
    /// Non-negative decimal; numeric strings are accepted.
    #[schema(value_type = f64)]
    pub weight_kg: serde_json::Value,
    /// Non-negative integer; numeric strings are accepted.
    #[schema(value_type = i64)]
    pub quantity: serde_json::Value,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub harvest_date: String,
    pub is_organic: bool,
}

/// Request body accepted by the update endpoint. Every field is optional, but at least
/// one must be present.
#[derive(Deserialize, Debug, ToSchema)]
#[allow(dead_code)]
pub struct UpdatePotatoRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub weight_kg: Option<serde_json::Value>,
    #[schema(value_type = Option<i64>)]
    pub quantity: Option<serde_json::Value>,
    pub harvest_date: Option<String>,
    pub is_organic: Option<bool>,
}
