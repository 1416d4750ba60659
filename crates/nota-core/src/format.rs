//! # Date Formatting (id-ID)
//!
//! Indonesian date renderings for receipts, messages, and QR payloads.
//! chrono has no locale data built in, so the month tables live here.

use chrono::{DateTime, Datelike, Timelike, Utc};

const MONTHS_LONG: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Long form used in the WhatsApp message body: `30 Agustus 2026 14:30`.
pub fn format_date_long(dt: &DateTime<Utc>) -> String {
    format!(
        "{:02} {} {} {:02}:{:02}",
        dt.day(),
        MONTHS_LONG[dt.month0() as usize],
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}

/// Short form printed on the receipt header row: `30 Agu 2026 14:30`.
pub fn format_date_short(dt: &DateTime<Utc>) -> String {
    format!(
        "{:02} {} {} {:02}:{:02}",
        dt.day(),
        MONTHS_SHORT[dt.month0() as usize],
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}

/// Compact numeric form embedded in the QR payload: `30/08/2026`.
pub fn format_date_compact(dt: &DateTime<Utc>) -> String {
    format!("{:02}/{:02}/{}", dt.day(), dt.month(), dt.year())
}
