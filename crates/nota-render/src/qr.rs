//! # Validation QR Encoding
//!
//! Builds the human-readable verification payload printed into every
//! receipt's QR symbol, and rasterizes it.
//!
//! The payload is consumed only by external QR-reading software — a buyer
//! points any scanner at the printed receipt and compares the decoded text
//! against the paper. Nothing is stored or validated server-side.

use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};
use tokio::task;

use nota_core::format::format_date_compact;
use nota_core::{Invoice, Money};

use crate::error::RenderResult;

/// Target edge length of the rendered QR raster, in pixels.
const TARGET_SIZE_PX: u32 = 100;

/// Quiet-zone width around the symbol, in modules.
const MARGIN_MODULES: u32 = 1;

/// Builds the fixed multi-line validation payload.
///
/// The layout is a contract with already-printed receipts; do not reorder
/// or reword lines.
///
/// ```text
/// = VALIDASI STRUK =
///
/// INV-0042
///
/// Customer: Budi
/// Total: Rp 40.000
/// Tgl: 30/08/2026
/// Item: 2 produk
///
/// === SI-ACIL by Mas Alfy ===
/// ```
pub fn build_payload(invoice: &Invoice, reconciled_total: Money) -> String {
    let id = if invoice.id.is_empty() {
        "INV-0000"
    } else {
        &invoice.id
    };
    let customer = if invoice.customer_name.is_empty() {
        "Pelanggan"
    } else {
        &invoice.customer_name
    };

    [
        "= VALIDASI STRUK =".to_string(),
        String::new(),
        id.to_string(),
        String::new(),
        format!("Customer: {customer}"),
        format!("Total: {reconciled_total}"),
        format!("Tgl: {}", format_date_compact(&invoice.timestamp)),
        format!("Item: {} produk", invoice.item_count()),
        String::new(),
        "=== SI-ACIL by Mas Alfy ===".to_string(),
    ]
    .join("\n")
}

/// Encodes a payload as a black-on-white QR raster.
///
/// Scaled so the symbol (plus a 1-module quiet zone) lands as close to
/// 100px as whole-module scaling allows. Symbol construction is CPU-bound,
/// so it runs on the blocking pool.
pub async fn encode(payload: String) -> RenderResult<GrayImage> {
    let image = task::spawn_blocking(move || -> RenderResult<GrayImage> {
        let code = QrCode::new(payload.as_bytes())?;
        Ok(rasterize(&code))
    })
    .await??;

    Ok(image)
}

/// Draws the symbol module-by-module onto a white canvas.
fn rasterize(code: &QrCode) -> GrayImage {
    let modules = code.width() as u32;
    let total_modules = modules + 2 * MARGIN_MODULES;
    // Whole-pixel modules only; tiny payloads get scaled up, huge ones
    // fall back to 1px per module rather than clipping.
    let scale = (TARGET_SIZE_PX / total_modules).max(1);
    let size = total_modules * scale;

    let mut img = GrayImage::from_pixel(size, size, Luma([255u8]));

    for my in 0..modules {
        for mx in 0..modules {
            if code[(mx as usize, my as usize)] == Color::Dark {
                let px0 = (MARGIN_MODULES + mx) * scale;
                let py0 = (MARGIN_MODULES + my) * scale;
                for py in py0..py0 + scale {
                    for px in px0..px0 + scale {
                        img.put_pixel(px, py, Luma([0u8]));
                    }
                }
            }
        }
    }

    img
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nota_core::LineItem;

    fn sample_invoice() -> Invoice {
        Invoice {
            id: "INV-0042".to_string(),
            customer_name: "Budi".to_string(),
            customer_phone: None,
            items: vec![
                LineItem::new("Kopi", Money::from_rupiah(15_000), 2),
                LineItem::new("Roti", Money::from_rupiah(10_000), 1),
            ],
            stored_total: Money::zero(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 30, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_payload_layout() {
        let payload = build_payload(&sample_invoice(), Money::from_rupiah(40_000));
        let expected = "= VALIDASI STRUK =\n\
                        \n\
                        INV-0042\n\
                        \n\
                        Customer: Budi\n\
                        Total: Rp 40.000\n\
                        Tgl: 30/08/2026\n\
                        Item: 2 produk\n\
                        \n\
                        === SI-ACIL by Mas Alfy ===";
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_payload_fallbacks() {
        let mut invoice = sample_invoice();
        invoice.id = String::new();
        invoice.customer_name = String::new();
        invoice.items.clear();

        let payload = build_payload(&invoice, Money::zero());
        assert!(payload.contains("INV-0000"));
        assert!(payload.contains("Customer: Pelanggan"));
        assert!(payload.contains("Total: Rp 0"));
        assert!(payload.contains("Item: 0 produk"));
    }

    #[tokio::test]
    async fn test_encode_produces_square_raster() {
        let payload = build_payload(&sample_invoice(), Money::from_rupiah(40_000));
        let img = encode(payload).await.unwrap();

        assert_eq!(img.width(), img.height());
        // Close to the 100px target, never above it
        assert!(img.width() <= TARGET_SIZE_PX);
        assert!(img.width() > 0);

        // Black and white only
        assert!(img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        // Quiet zone: the border row is entirely white
        assert!((0..img.width()).all(|x| img.get_pixel(x, 0).0[0] == 255));
    }

    #[tokio::test]
    async fn test_encode_deterministic() {
        let payload = build_payload(&sample_invoice(), Money::from_rupiah(40_000));
        let a = encode(payload.clone()).await.unwrap();
        let b = encode(payload).await.unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
