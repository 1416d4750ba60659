//! # nota-core: Pure Business Logic for Nota
//!
//! This crate is the **heart** of the receipt & messaging subsystem. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Nota Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 App Shell (excluded collaborator)               │   │
//! │  │   Screens ──► Session ──► Spreadsheet API client                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain records, by value                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nota-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   phone   │  │ reconcile │  │   │
//! │  │   │  Invoice  │  │   Money   │  │ intl/disp │  │  totals   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │          ┌───────────┐  ┌───────────┐                          │   │
//! │  │          │  format   │  │  message  │                          │   │
//! │  │          │   id-ID   │  │   wa.me   │                          │   │
//! │  │          └───────────┘  └───────────┘                          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • TOTAL FUNCTIONS                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                nota-render (Rendering Edge)                     │   │
//! │  │        Receipt PDF, QR raster, logo compression                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records and the tolerant spreadsheet-row decode
//! - [`money`] - Whole-rupiah Money type (no floating point!)
//! - [`phone`] - Phone normalization (international / display form)
//! - [`reconcile`] - Canonical total derivation
//! - [`format`] - id-ID date formatting
//! - [`message`] - WhatsApp message + deep-link composition
//!
//! ## Design Principles
//!
//! 1. **Total Functions**: every operation here accepts any input within the
//!    documented schema and always returns a value, never raising
//! 2. **No I/O**: network, file system, and raster work are FORBIDDEN here
//! 3. **Integer Money**: all monetary values are whole rupiah (i64)
//! 4. **Degrade, Don't Fail**: malformed spreadsheet data decays to
//!    documented defaults at the boundary
//!
//! ## Example Usage
//!
//! ```rust
//! use nota_core::{compose, reconcile, Invoice, LineItem, Money, StoreProfile};
//! use chrono::Utc;
//!
//! let invoice = Invoice {
//!     id: "INV-0001".into(),
//!     customer_name: "Budi".into(),
//!     customer_phone: Some("081234567890".into()),
//!     items: vec![LineItem::new("Kopi", Money::from_rupiah(15_000), 2)],
//!     stored_total: Money::zero(),
//!     timestamp: Utc::now(),
//! };
//! let store = StoreProfile {
//!     name: "Warung Acil".into(),
//!     address: None,
//!     phone: None,
//!     logo: None,
//! };
//!
//! assert_eq!(reconcile(&invoice).to_string(), "Rp 30.000");
//!
//! let msg = compose(&invoice, &store, None);
//! assert!(msg.link.starts_with("https://wa.me/6281234567890?text="));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod format;
pub mod message;
pub mod money;
pub mod phone;
pub mod reconcile;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use nota_core::Money` instead of
// `use nota_core::money::Money`

pub use message::{compose, compose_plain, ShareMessage};
pub use money::Money;
pub use phone::{to_display, to_international};
pub use reconcile::reconcile;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Ceiling on encoded image strings handed to the spreadsheet store.
///
/// ## Why 40,000?
/// The store caps a cell at ~50,000 characters; targeting 40,000 leaves
/// headroom for the data-URI prefix and future metadata. The compressor
/// enforces this with a single fixed-quality retry (see `nota-render`).
pub const MAX_ENCODED_IMAGE_LEN: usize = 40_000;

/// Upper bound accepted when validating an already-stored image string.
///
/// Slightly above [`MAX_ENCODED_IMAGE_LEN`]: legacy rows written before
/// the retry logic existed may sit between the two limits and are still
/// usable.
pub const MAX_STORED_IMAGE_LEN: usize = 45_000;

/// Checks whether an encoded image string is safe to hand to the store.
pub fn is_image_size_valid(encoded: &str) -> bool {
    !encoded.is_empty() && encoded.len() < MAX_STORED_IMAGE_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_size_validation() {
        assert!(is_image_size_valid("data:image/jpeg;base64,abc"));
        assert!(!is_image_size_valid(""));
        assert!(!is_image_size_valid(&"x".repeat(MAX_STORED_IMAGE_LEN)));
        assert!(is_image_size_valid(&"x".repeat(MAX_STORED_IMAGE_LEN - 1)));
    }
}
