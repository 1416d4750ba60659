//! # Message Composition
//!
//! Builds the shareable WhatsApp message and its `wa.me` deep link.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice + StoreProfile (+ optional phone override)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  compose()                                                              │
//! │   ├── body: fixed multi-line text (WhatsApp *bold* markup)             │
//! │   ├── phone: override > invoice.customer_phone > store.phone > none    │
//! │   └── link: https://wa.me/{intl phone}?text={percent-encoded body}     │
//! │             https://wa.me/?text={...}  when no phone resolves           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure and synchronous; the app shell just opens the returned link.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::format::format_date_long;
use crate::phone::to_international;
use crate::reconcile::reconcile;
use crate::types::{Invoice, StoreProfile};

/// Escape set matching JavaScript's `encodeURIComponent`: everything
/// except alphanumerics and `- _ . ! ~ * ' ( )`. WhatsApp unpacks the
/// prefilled text with the same rules.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const HEADER_SEPARATOR: &str = "========================";
const ITEM_SEPARATOR: &str = "------------------------";

/// The composed share artifact: plain body plus ready-to-open deep link.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShareMessage {
    /// Full message body, WhatsApp markup included.
    pub text: String,

    /// `https://wa.me/...` deep link with the body percent-encoded.
    pub link: String,
}

/// Composes the invoice share message.
///
/// Phone precedence for the link target: `phone_override` >
/// `invoice.customer_phone` > `store.phone` > none. A candidate that
/// cleans to an empty digit string counts as unresolved.
pub fn compose(
    invoice: &Invoice,
    store: &StoreProfile,
    phone_override: Option<&str>,
) -> ShareMessage {
    let text = build_body(invoice, store);
    let encoded = utf8_percent_encode(&text, URI_COMPONENT).to_string();

    let phone = phone_override
        .map(str::to_string)
        .or_else(|| invoice.customer_phone.clone())
        .or_else(|| store.phone.clone())
        .map(|raw| to_international(&raw))
        .filter(|digits| !digits.is_empty());

    let link = match phone {
        Some(digits) => format!("https://wa.me/{digits}?text={encoded}"),
        None => format!("https://wa.me/?text={encoded}"),
    };

    ShareMessage { text, link }
}

/// Builds the fixed-structure message body.
fn build_body(invoice: &Invoice, store: &StoreProfile) -> String {
    let total = reconcile(invoice);

    let mut body = String::new();

    // Header
    body.push_str("*INVOICE*\n");
    body.push_str(HEADER_SEPARATOR);
    body.push('\n');
    body.push_str(store_name_or_default(store));
    body.push('\n');
    if let Some(address) = &store.address {
        body.push_str("> ");
        body.push_str(address);
        body.push('\n');
    }
    body.push('\n');

    // Invoice info
    body.push_str(&format!("No: #{}\n", invoice_id_or_default(invoice)));
    body.push_str(&format!("Tanggal: {}\n", format_date_long(&invoice.timestamp)));
    body.push_str(&format!("Pelanggan: {}\n", customer_or_default(invoice)));
    body.push('\n');

    // Items
    body.push_str("*Detail Pembelian:*\n");
    body.push_str(ITEM_SEPARATOR);
    body.push('\n');
    for (idx, item) in invoice.items.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", idx + 1, item.name));
        body.push_str(&format!(
            "   {} x {} = {}\n",
            item.quantity,
            item.unit_price,
            item.subtotal()
        ));
    }
    body.push_str(ITEM_SEPARATOR);
    body.push('\n');

    // Total
    body.push_str(&format!("*TOTAL: {total}*\n"));
    body.push('\n');

    // Footer
    body.push_str(HEADER_SEPARATOR);
    body.push('\n');
    body.push_str(
        "> Terima kasih sudah mendukung produk kami! Sampai jumpa di transaksi selanjutnya!\n",
    );
    body.push('\n');
    body.push_str("_Powered by SI-ACIL_");

    body
}

/// Builds the short copyable plain-text note (no markup, no link).
///
/// Deliberately uses the STORED total, not the reconciled one: this is the
/// quick clipboard copy of what the spreadsheet row says.
pub fn compose_plain(invoice: &Invoice, store: &StoreProfile) -> String {
    let mut text = String::new();

    text.push_str(&format!("NOTA #{}\n", invoice.id));
    text.push_str(store_name_or_default(store));
    text.push('\n');
    text.push_str(&format!("Pelanggan: {}\n", invoice.customer_name));
    text.push_str("---\n");
    for item in &invoice.items {
        text.push_str(&format!(
            "{} x{} = {}\n",
            item.name,
            item.quantity,
            item.subtotal()
        ));
    }
    text.push_str("---\n");
    text.push_str(&format!("TOTAL: {}", invoice.stored_total.clamp_non_negative()));

    text
}

fn store_name_or_default(store: &StoreProfile) -> &str {
    if store.name.is_empty() {
        "Toko"
    } else {
        &store.name
    }
}

fn invoice_id_or_default(invoice: &Invoice) -> &str {
    if invoice.id.is_empty() {
        "INV-0000"
    } else {
        &invoice.id
    }
}

fn customer_or_default(invoice: &Invoice) -> &str {
    if invoice.customer_name.is_empty() {
        "Pelanggan"
    } else {
        &invoice.customer_name
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
