//! Reading stored address documents.
//!
//! Older documents name the same fields differently: `street` for
//! `address`, `Upazilla` for `city`, `postalCode` for `zipCode`, and
//! snake_case keys in places. Everything read from storage passes through
//! here, so the rest of the crate only sees the canonical shape. Writes always
//! use the canonical camelCase names.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{Address, AddressKind, ShippingAddress};
use crate::errors::{AppError, AppResult};

const ADDRESS_KEYS: &[&str] = &["address", "street"];
const CITY_KEYS: &[&str] = &["city", "Upazilla", "upazilla"];
const ZIP_KEYS: &[&str] = &["zipCode", "postalCode", "zip_code", "postal_code", "zip"];
const DEFAULT_KEYS: &[&str] = &["isDefault", "is_default"];

/// Map a stored order shipping address onto the canonical shape.
pub fn shipping_address(document: &Value) -> AppResult<ShippingAddress> {
    let fields = as_object(document, "shipping address")?;

    Ok(ShippingAddress {
        address: text(fields, ADDRESS_KEYS).unwrap_or_default(),
        city: text(fields, CITY_KEYS),
        landmark: text(fields, &["landmark"]),
        district: text(fields, &["district"]),
        division: text(fields, &["division"]),
        zip_code: text(fields, ZIP_KEYS),
        phone: text(fields, &["phone"]),
    })
}

/// Map a stored account address onto the canonical shape.
///
/// Entries written before addresses carried ids get a fresh one, which is
/// persisted the next time the account is saved.
pub fn account_address(document: &Value) -> AppResult<Address> {
    let fields = as_object(document, "address")?;

    let id = text(fields, &["id", "_id"])
        .and_then(|raw| Uuid::parse_str(&raw).ok())
        .unwrap_or_else(Uuid::new_v4);

    let kind = match text(fields, &["type", "kind"]).as_deref() {
        Some("work") => AddressKind::Work,
        Some("other") => AddressKind::Other,
        _ => AddressKind::Home,
    };

    let is_default = DEFAULT_KEYS
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_bool))
        .unwrap_or(false);

    Ok(Address {
        id,
        kind,
        address: text(fields, ADDRESS_KEYS).unwrap_or_default(),
        city: text(fields, CITY_KEYS).unwrap_or_default(),
        landmark: text(fields, &["landmark"]),
        district: text(fields, &["district"]),
        division: text(fields, &["division"]),
        zip_code: text(fields, ZIP_KEYS),
        is_default,
    })
}

/// Map a stored address list, accepting a missing/null column as empty.
pub fn account_addresses(document: &Value) -> AppResult<Vec<Address>> {
    match document {
        Value::Null => Ok(Vec::new()),
        Value::Array(entries) => entries.iter().map(account_address).collect(),
        _ => Err(AppError::internal("Malformed addresses document: expected array")),
    }
}

fn as_object<'a>(document: &'a Value, what: &str) -> AppResult<&'a Map<String, Value>> {
    document
        .as_object()
        .ok_or_else(|| AppError::internal(format!("Malformed {} document: expected object", what)))
}

/// First non-empty string (or number, for zip codes) under any of `keys`.
fn text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
