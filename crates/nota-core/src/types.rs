//! # Domain Types
//!
//! Core domain types plus the spreadsheet-shaped boundary records.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Spreadsheet rows (loosely typed JSON)                                  │
//! │  ┌─────────────────┐          ┌─────────────────┐                       │
//! │  │   RawInvoice    │          │ RawStoreProfile │                       │
//! │  │  ─────────────  │          │  ─────────────  │                       │
//! │  │  items_json:    │          │  wa_number:     │                       │
//! │  │  string | array │          │  string | num   │                       │
//! │  └────────┬────────┘          └────────┬────────┘                       │
//! │           │ tolerant decode            │ tolerant decode                │
//! │           ▼                            ▼                                │
//! │  ┌─────────────────┐          ┌─────────────────┐                       │
//! │  │    Invoice      │          │  StoreProfile   │                       │
//! │  │  ─────────────  │          │  ─────────────  │                       │
//! │  │  items:         │          │  phone:         │                       │
//! │  │  Vec<LineItem>  │          │  Option<String> │                       │
//! │  └─────────────────┘          └─────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Decode Tolerance
//! The backing store is a remote spreadsheet: numeric cells silently drop
//! leading zeros, `items_json` may arrive pre-parsed or as a serialized
//! string, and `total_amount` may be an int, a float, or a numeric string.
//! Decoding therefore NEVER fails. Malformed item payloads degrade to an
//! empty item list; malformed fields degrade to their documented defaults.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Line Item
// =============================================================================

/// A single purchased line on an invoice.
///
/// Coercion rules (applied at decode time, see [`LineItem::from_value`]):
/// - missing/invalid `price` -> 0
/// - missing/invalid `qty`   -> 1
/// - missing `name`          -> `"Item"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Display name shown on the receipt and in messages.
    pub name: String,

    /// Unit price in whole rupiah, never negative.
    pub unit_price: Money,

    /// Quantity purchased, always >= 1.
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line item, applying the coercion invariants.
    pub fn new(name: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        LineItem {
            name: name.into(),
            unit_price: unit_price.clamp_non_negative(),
            quantity: quantity.max(1),
        }
    }

    /// The line subtotal: `unit_price * quantity`.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Decodes one item from a loosely typed JSON value.
    ///
    /// Accepts the spreadsheet row field names (`name`, `price`, `qty`) and
    /// coerces every field; a non-object value still yields a valid
    /// placeholder item rather than an error.
    pub fn from_value(value: &Value) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("Item")
            .to_string();

        let price = value
            .get("price")
            .and_then(lenient_i64)
            .filter(|p| *p >= 0)
            .unwrap_or(0);

        let qty = value
            .get("qty")
            .and_then(lenient_i64)
            .filter(|q| *q >= 1)
            .unwrap_or(1);

        LineItem {
            name,
            unit_price: Money::from_rupiah(price),
            quantity: qty,
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A recorded sale, decoded into canonical form.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    /// Business identifier (e.g. `INV-0042`), assigned by the app shell.
    pub id: String,

    /// Customer display name.
    pub customer_name: String,

    /// Raw customer WhatsApp digits, if recorded. Normalized on use, not
    /// at decode time, so the stored value stays untouched.
    pub customer_phone: Option<String>,

    /// Purchased lines in insertion order (= display order).
    pub items: Vec<LineItem>,

    /// Total as stored in the spreadsheet. Possibly stale or zero; the
    /// reconciler decides whether to trust it.
    pub stored_total: Money,

    /// When the sale happened.
    pub timestamp: DateTime<Utc>,
}

impl Invoice {
    /// Decodes a spreadsheet row into a canonical invoice. Total: every
    /// malformed field degrades to a default instead of erroring.
    pub fn from_raw(raw: &RawInvoice) -> Self {
        Invoice {
            id: raw.invoice_id.clone(),
            customer_name: raw.customer_name.clone(),
            customer_phone: raw
                .customer_wa
                .as_ref()
                .and_then(lenient_string)
                .filter(|s| !s.is_empty()),
            items: decode_items(&raw.items_json),
            stored_total: Money::from_rupiah(
                raw.total_amount.as_ref().and_then(lenient_i64).unwrap_or(0),
            ),
            timestamp: parse_timestamp(&raw.date),
        }
    }

    /// Number of distinct lines on the invoice.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

// =============================================================================
// Store Profile
// =============================================================================

/// The merchant's own details, shown on every receipt and message.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreProfile {
    /// Store display name.
    pub name: String,

    /// Street address, word-wrapped onto the receipt when present.
    pub address: Option<String>,

    /// Store WhatsApp digits, raw form.
    pub phone: Option<String>,

    /// Logo as a data-URI string (`data:image/jpeg;base64,...`), bounded
    /// by the compressor before it was ever stored.
    pub logo: Option<String>,
}

impl StoreProfile {
    /// Decodes a spreadsheet profile row. Total.
    pub fn from_raw(raw: &RawStoreProfile) -> Self {
        StoreProfile {
            name: raw.store_name.clone(),
            address: raw.address.clone().filter(|s| !s.is_empty()),
            phone: raw
                .wa_number
                .as_ref()
                .and_then(lenient_string)
                .filter(|s| !s.is_empty()),
            logo: raw.logo_base64.clone().filter(|s| !s.is_empty()),
        }
    }
}

// =============================================================================
// Raw (Spreadsheet-Shaped) Records
// =============================================================================

/// An invoice row exactly as the spreadsheet API returns it.
///
/// Field types are deliberately loose: the store is schemaless and rows
/// written by older app versions drift. Everything firms up in
/// [`Invoice::from_raw`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInvoice {
    pub invoice_id: String,
    pub customer_name: String,
    /// May arrive as a string or as a bare number (leading zero lost).
    #[serde(default)]
    pub customer_wa: Option<Value>,
    /// Either a JSON array of items or a string containing serialized JSON.
    #[serde(default)]
    pub items_json: Value,
    /// Int, float, or numeric string.
    #[serde(default)]
    pub total_amount: Option<Value>,
    /// ISO-8601-ish date string.
    #[serde(default)]
    pub date: String,
}

/// A store profile row exactly as the spreadsheet API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStoreProfile {
    pub store_name: String,
    #[serde(default)]
    pub address: Option<String>,
    /// May arrive as a string or as a bare number.
    #[serde(default)]
    pub wa_number: Option<Value>,
    #[serde(default)]
    pub logo_base64: Option<String>,
}

// =============================================================================
// Tolerant Decoding Helpers
// =============================================================================

/// Decodes the `items_json` field into line items.
///
/// Accepts a JSON array (already structured) or a string holding serialized
/// JSON. Any decode failure yields an EMPTY list — never an error. The
/// reconciler then falls back to the stored total, which is the documented
/// degraded path.
pub fn decode_items(value: &Value) -> Vec<LineItem> {
    let parsed: Option<Vec<Value>> = match value {
        Value::Array(entries) => Some(entries.clone()),
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .and_then(|v| v.as_array().cloned()),
        _ => None,
    };

    parsed
        .unwrap_or_default()
        .iter()
        .map(LineItem::from_value)
        .collect()
}

/// Extracts an integer from an int, float (truncated), or numeric string.
fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Renders a string or number JSON value as a plain string.
///
/// Phone cells stored as numbers come back as e.g. `81234567890`; keeping
/// the digits is enough, the normalizer restores the missing prefix.
fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parses the `date` field, degrading to the Unix epoch when unparseable
/// so invoice decode stays total.
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Utc.from_utc_datetime(&naive);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Utc.from_utc_datetime(&naive);
        }
    }
    Utc.timestamp_opt(0, 0).single().unwrap_or_default()
}

// =============================================================================
// Unit Tests
// =============================================================================
