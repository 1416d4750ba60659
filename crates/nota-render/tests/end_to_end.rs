//! End-to-end flow: spreadsheet row in, artifacts out.
//!
//! Walks the full checkout path the app shell drives: decode a raw
//! invoice row, reconcile the total, compose the WhatsApp message, build
//! the QR payload, and render the receipt into a memory sink.

use serde_json::json;

use nota_core::{compose, reconcile, Invoice, RawInvoice, RawStoreProfile, StoreProfile};
use nota_render::{qr, receipt, MemorySink};

fn checkout_fixture() -> (Invoice, StoreProfile) {
    let raw_invoice: RawInvoice = serde_json::from_value(json!({
        "invoice_id": "INV-0042",
        "customer_name": "Budi",
        "customer_wa": 81234567890i64,
        "items_json": "[{\"name\":\"Kopi\",\"price\":15000,\"qty\":2},\
                        {\"name\":\"Roti\",\"price\":10000,\"qty\":1}]",
        "total_amount": 0,
        "date": "2026-08-30T14:30:00Z",
    }))
    .unwrap();

    let raw_store: RawStoreProfile = serde_json::from_value(json!({
        "store_name": "Warung Acil",
        "address": "Jl. Mawar No. 3, Banjarmasin",
        "wa_number": "081234567899",
    }))
    .unwrap();

    (Invoice::from_raw(&raw_invoice), StoreProfile::from_raw(&raw_store))
}

#[test]
fn reconciles_stale_stored_total_from_items() {
    let (invoice, _) = checkout_fixture();

    // Stored total is 0; the two items are ground truth
    assert_eq!(invoice.items.len(), 2);
    assert_eq!(reconcile(&invoice).rupiah(), 40_000);
}

#[test]
fn qr_payload_carries_reconciled_total() {
    let (invoice, _) = checkout_fixture();
    let payload = qr::build_payload(&invoice, reconcile(&invoice));

    assert!(payload.contains("INV-0042"));
    assert!(payload.contains("Total: Rp 40.000"));
    assert!(payload.contains("Tgl: 30/08/2026"));
    assert!(payload.contains("Item: 2 produk"));
}

#[test]
fn message_lists_items_and_bold_total() {
    let (invoice, store) = checkout_fixture();
    let msg = compose(&invoice, &store, None);

    assert!(msg.text.contains("1. Kopi\n   2 x Rp 15.000 = Rp 30.000"));
    assert!(msg.text.contains("2. Roti\n   1 x Rp 10.000 = Rp 10.000"));
    assert!(msg.text.contains("*TOTAL: Rp 40.000*"));

    // The customer phone lost its leading zero in the numeric cell;
    // the link restores the international form
    assert!(msg.link.starts_with("https://wa.me/6281234567890?text="));
}

#[tokio::test]
async fn receipt_renders_into_caller_sink() {
    let (invoice, store) = checkout_fixture();

    let mut sink = MemorySink::new();
    let artifact = receipt::render_to(&invoice, &store, &mut sink).await.unwrap();

    assert!(artifact.name.starts_with("Invoice_INV-0042_"));
    assert!(artifact.name.ends_with(".pdf"));
    assert_eq!(&artifact.bytes[..5], b"%PDF-");

    let delivered = sink.artifacts();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, artifact.name);
}

#[tokio::test]
async fn compressed_logo_survives_storage_and_rendering() {
    // Profile editing: compress an uploaded logo, store the data URI,
    // then render a receipt that embeds it twice (watermark + header)
    let logo = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        400,
        300,
        image::Rgb([30, 90, 160]),
    ));
    let mut png = std::io::Cursor::new(Vec::new());
    logo.write_to(&mut png, image::ImageFormat::Png).unwrap();

    let encoded = nota_render::compress(png.into_inner(), 150, 150, 0.7)
        .await
        .unwrap();
    assert!(encoded.starts_with("data:image/jpeg;base64,"));
    assert!(nota_core::is_image_size_valid(&encoded));

    let (invoice, mut store) = checkout_fixture();
    store.logo = Some(encoded);

    let artifact = receipt::render(&invoice, &store).await.unwrap();
    assert_eq!(&artifact.bytes[..5], b"%PDF-");
}
