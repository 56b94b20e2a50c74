//! Field rules and request decoding. Each payload type lists exactly which fields it accepts.

use crate::error::{AppError, FieldErrors};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

pub type Body = Map<String, Value>;

pub const NAME_MAX: usize = 120;
pub const EMAIL_MAX: usize = 120;
pub const ADDRESS_MAX: usize = 255;
pub const PRODUCT_NAME_MAX: usize = 200;

const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_STRING: &str = "Not a valid string.";
const UNKNOWN: &str = "Unknown field.";
const PRICE_INVALID: &str = "price must be a non-negative number.";
const EMAIL_INVALID: &str = "email must be a valid email address.";
const ORDER_DATE_INVALID: &str = "order_date must be ISO format (YYYY-MM-DD or ISO8601).";

/// Price must be present, numeric and not negative.
pub fn validate_price(value: Option<&Value>) -> Result<f64, String> {
    match value.and_then(Value::as_f64) {
        Some(p) if p >= 0.0 => Ok(p),
        _ => Err(PRICE_INVALID.to_string()),
    }
}

/// Only checks for an `@`; full address validation is left to delivery.
pub fn validate_email(value: &str) -> Result<&str, String> {
    if value.contains('@') {
        Ok(value)
    } else {
        Err(EMAIL_INVALID.to_string())
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.f]]` (or with a space), and RFC 3339 with an offset.
pub fn parse_order_date(value: &str) -> Result<NaiveDateTime, AppError> {
    let s = value.trim();
    if s.len() == 10 {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| AppError::field("order_date", ORDER_DATE_INVALID));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).naive_utc());
    }
    Err(AppError::field("order_date", ORDER_DATE_INVALID))
}

fn string_field(errors: &mut FieldErrors, field: &str, value: &Value, max: usize) -> Option<String> {
    match value {
        Value::Null => {
            errors.add(field, NULL);
            None
        }
        Value::String(s) if s.chars().count() > max => {
            errors.add(field, format!("Longer than maximum length {}.", max));
            None
        }
        Value::String(s) => Some(s.clone()),
        _ => {
            errors.add(field, NOT_STRING);
            None
        }
    }
}

fn required_string(errors: &mut FieldErrors, body: &Body, field: &str, max: usize) -> Option<String> {
    match body.get(field) {
        Some(v) => string_field(errors, field, v, max),
        None => {
            errors.add(field, MISSING);
            None
        }
    }
}

/// `null` clears the column; a string must fit the column.
fn nullable_string(errors: &mut FieldErrors, field: &str, value: &Value, max: usize) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        v => string_field(errors, field, v, max).map(Some),
    }
}

fn email_field(errors: &mut FieldErrors, value: Option<String>) -> Option<String> {
    let email = value?;
    match validate_email(&email) {
        Ok(_) => Some(email),
        Err(msg) => {
            errors.add("email", msg);
            None
        }
    }
}

fn reject_unknown(errors: &mut FieldErrors, body: &Body, allowed: &[&str]) {
    for key in body.keys() {
        // `id` is assigned by the store; clients echoing it back are tolerated.
        if key != "id" && !allowed.contains(&key.as_str()) {
            errors.add(key, UNKNOWN);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub address: Option<String>,
    pub email: String,
}

impl NewUser {
    pub fn from_body(body: &Body) -> Result<Self, AppError> {
        let mut errors = FieldErrors::new();
        reject_unknown(&mut errors, body, &["name", "address", "email"]);
        let name = required_string(&mut errors, body, "name", NAME_MAX);
        let address = body
            .get("address")
            .and_then(|v| nullable_string(&mut errors, "address", v, ADDRESS_MAX))
            .flatten();
        let email = required_string(&mut errors, body, "email", EMAIL_MAX);
        let email = email_field(&mut errors, email);
        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => Ok(NewUser { name, address, email }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// Partial update: `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub address: Option<Option<String>>,
    pub email: Option<String>,
}

impl UserChanges {
    pub fn from_body(body: &Body) -> Result<Self, AppError> {
        let mut errors = FieldErrors::new();
        let name = body.get("name").and_then(|v| string_field(&mut errors, "name", v, NAME_MAX));
        let address = body
            .get("address")
            .and_then(|v| nullable_string(&mut errors, "address", v, ADDRESS_MAX));
        let email = body.get("email").and_then(|v| string_field(&mut errors, "email", v, EMAIL_MAX));
        let email = email_field(&mut errors, email);
        errors.into_result()?;
        Ok(UserChanges { name, address, email })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_name: String,
    pub price: f64,
}

impl NewProduct {
    pub fn from_body(body: &Body) -> Result<Self, AppError> {
        let mut errors = FieldErrors::new();
        reject_unknown(&mut errors, body, &["product_name", "price"]);
        let product_name = required_string(&mut errors, body, "product_name", PRODUCT_NAME_MAX);
        let price = if body.contains_key("price") {
            validate_price(body.get("price")).map_err(|m| errors.add("price", m)).ok()
        } else {
            errors.add("price", MISSING);
            None
        };
        match (product_name, price) {
            (Some(product_name), Some(price)) if errors.is_empty() => Ok(NewProduct { product_name, price }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub product_name: Option<String>,
    pub price: Option<f64>,
}

impl ProductChanges {
    pub fn from_body(body: &Body) -> Result<Self, AppError> {
        let mut errors = FieldErrors::new();
        let product_name = body
            .get("product_name")
            .and_then(|v| string_field(&mut errors, "product_name", v, PRODUCT_NAME_MAX));
        let price = match body.get("price") {
            Some(v) => validate_price(Some(v)).map_err(|m| errors.add("price", m)).ok(),
            None => None,
        };
        errors.into_result()?;
        Ok(ProductChanges { product_name, price })
    }
}

/// Order creation input. The date stays raw until the user has been found.
/// `user_id` is any JSON integer; ids outside the key range simply match no user.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub order_date: String,
}

impl NewOrder {
    pub fn from_body(body: &Body) -> Result<Self, AppError> {
        let user_id = match body.get("user_id") {
            None | Some(Value::Null) => return Err(AppError::field("user_id", "user_id is required")),
            Some(v) => v
                .as_i64()
                .ok_or_else(|| AppError::field("user_id", "user_id must be an integer."))?,
        };
        let order_date = match body.get("order_date") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(AppError::field("order_date", ORDER_DATE_INVALID)),
        }
        .ok_or_else(|| AppError::field("order_date", "order_date is required (YYYY-MM-DD or ISO8601)."))?;
        Ok(NewOrder { user_id, order_date })
    }
}
