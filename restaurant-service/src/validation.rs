//! Field rules for restaurant payloads.
//!
//! Scalars are coerced to text and trimmed before the rules run; arrays and
//! objects always fail. A failing field produces exactly one [`FieldError`],
//! reported in field order (`name`, `location`, `cuisine`).

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::models::NewRestaurant;

pub const INVALID_VALUE: &str = "Invalid value";
pub const NAME_LENGTH: RangeInclusive<usize> = 10..=30;

/// Fields are kept as raw JSON so that a wrong type is reported as an invalid
/// field instead of failing the whole request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct RestaurantPayload {
    /// Name of the restaurant, 10 to 30 characters
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    /// Where the restaurant is
    #[schema(value_type = Option<String>)]
    pub location: Option<Value>,
    /// Kind of food served
    #[schema(value_type = Option<String>)]
    pub cuisine: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Value that failed, trimmed when it was a scalar; omitted when the
    /// field was missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: &'static str,
    pub path: &'static str,
    pub location: &'static str,
}

impl FieldError {
    fn invalid(path: &'static str, value: Option<Value>) -> Self {
        Self {
            kind: "field",
            value,
            msg: INVALID_VALUE,
            path,
            location: "body",
        }
    }
}

/// A payload that passed every rule, with its fields trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRestaurant {
    pub name: String,
    pub location: String,
    pub cuisine: String,
}

impl ValidRestaurant {
    pub fn as_new(&self) -> NewRestaurant<'_> {
        NewRestaurant {
            name: &self.name,
            location: &self.location,
            cuisine: &self.cuisine,
        }
    }
}

pub fn validate_restaurant(payload: &RestaurantPayload) -> Result<ValidRestaurant, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = check("name", payload.name.as_ref(), &mut errors, Some(name_length));
    let location = check("location", payload.location.as_ref(), &mut errors, None);
    let cuisine = check("cuisine", payload.cuisine.as_ref(), &mut errors, None);

    match (name, location, cuisine) {
        (Some(name), Some(location), Some(cuisine)) => Ok(ValidRestaurant {
            name,
            location,
            cuisine,
        }),
        _ => Err(errors),
    }
}

/// Text form of a scalar JSON value. `null`, arrays and objects have none.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn name_length(value: &str) -> bool {
    NAME_LENGTH.contains(&value.chars().count())
}

/// Requires `value` to coerce to non-empty trimmed text that passes `rule`.
fn check(
    path: &'static str,
    value: Option<&Value>,
    errors: &mut Vec<FieldError>,
    rule: Option<fn(&str) -> bool>,
) -> Option<String> {
    let Some(raw) = value else {
        errors.push(FieldError::invalid(path, None));
        return None;
    };

    let Some(text) = coerce_text(raw) else {
        errors.push(FieldError::invalid(path, Some(raw.clone())));
        return None;
    };

    let trimmed = text.trim();
    if !trimmed.is_empty() && rule.is_none_or(|rule| rule(trimmed)) {
        Some(trimmed.to_string())
    } else {
        errors.push(FieldError::invalid(path, Some(Value::from(trimmed))));
        None
    }
}
