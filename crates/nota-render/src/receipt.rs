//! # Receipt Rendering
//!
//! Lays out the full fixed-width receipt document.
//!
//! ## Page Anatomy (80mm thermal format)
//! ```text
//! ┌──────────────────────────────┐
//! │          [logo 12mm]         │  header logo, full opacity
//! │         Warung  Acil         │  store name, bold, centered
//! │      Jl. Mawar No. 3 ...     │  address, wrapped, centered
//! │       WA: 081234567890       │  store phone, display form
//! │ ---------------------------- │  dashed separator
//! │ #INV-0042    30 Agu 26 14:30 │  id left, date right
//! │ Pelanggan: Budi              │
//! │ ---------------------------- │
//! │ Kopi                         │  item name, bold
//! │   2 x Rp 15.000    Rp 30.000 │  qty x unit ......... subtotal
//! │ ---------------------------- │
//! │ TOTAL              Rp 40.000 │  bold, reconciled total
//! │ ---------------------------- │
//! │   Scan untuk validasi struk  │
//! │          [QR 22mm]           │  validation QR, centered
//! │ ---------------------------- │
//! │  Terima kasih ...  footer    │
//! └──────────────────────────────┘
//!        (watermark: logo at ~6% opacity behind the body)
//! ```
//!
//! QR or logo failures are logged and the element omitted; the receipt
//! itself always completes. Only page-level failures (fonts, byte emit)
//! propagate.

use chrono::Utc;
use image::DynamicImage;
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, LineDashPattern, Mm, PdfDocument, PdfLayerReference, Point, Px, Rgb,
};
use tracing::{debug, warn};

use nota_core::format::format_date_short;
use nota_core::phone::to_display;
use nota_core::{reconcile, Invoice, StoreProfile};

use crate::compress::decode_data_uri;
use crate::error::{RenderError, RenderResult};
use crate::qr;
use crate::sink::ArtifactSink;

// =============================================================================
// Page Geometry
// =============================================================================

const PAGE_WIDTH_MM: f32 = 80.0;
const PAGE_HEIGHT_MM: f32 = 250.0;
const MARGIN_MM: f32 = 5.0;
const LINE_HEIGHT_MM: f32 = 5.0;

const WATERMARK_SIZE_MM: f32 = 35.0;
const WATERMARK_TOP_MM: f32 = 55.0;
const WATERMARK_OPACITY: f32 = 0.06;
const HEADER_LOGO_SIZE_MM: f32 = 12.0;
const QR_SIZE_MM: f32 = 22.0;

/// Points to millimetres (1 pt = 1/72 inch).
const PT_TO_MM: f32 = 0.352_778;
/// Average Helvetica glyph advance as a fraction of the font size. Good
/// enough for centering/right-aligning on a 70mm column.
const AVG_GLYPH_EM: f32 = 0.5;

// =============================================================================
// Artifact
// =============================================================================

/// A finished receipt: printable bytes plus the delivery name.
#[derive(Debug, Clone)]
pub struct ReceiptArtifact {
    /// `Invoice_{id}_{epoch_millis}.pdf`
    pub name: String,
    pub bytes: Vec<u8>,
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders the receipt document for an invoice.
pub async fn render(invoice: &Invoice, store: &StoreProfile) -> RenderResult<ReceiptArtifact> {
    debug!(invoice_id = %invoice.id, "rendering receipt");

    let total = reconcile(invoice);

    // Degradable elements are resolved up front so layout below is linear.
    let qr_raster = match qr::encode(qr::build_payload(invoice, total)).await {
        Ok(raster) => Some(DynamicImage::ImageLuma8(raster)),
        Err(e) => {
            warn!(invoice_id = %invoice.id, error = %e, "qr generation failed, omitting");
            None
        }
    };
    let logo = store.logo.as_deref().and_then(|encoded| {
        decode_data_uri(encoded)
            .map_err(|e| warn!(error = %e, "logo decode failed, omitting"))
            .ok()
    });

    let (doc, page_idx, layer_idx) = PdfDocument::new(
        "Struk",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut page = Page {
        layer,
        font,
        font_bold,
        y_top: 8.0,
    };

    // Watermark first so every later element overlays it
    if let Some(logo) = &logo {
        let faded = fade_toward_white(logo, WATERMARK_OPACITY);
        embed_image(
            &page.layer,
            &faded,
            (PAGE_WIDTH_MM - WATERMARK_SIZE_MM) / 2.0,
            WATERMARK_TOP_MM,
            WATERMARK_SIZE_MM,
            WATERMARK_SIZE_MM,
        );
    }

    // Header logo
    if let Some(logo) = &logo {
        embed_image(
            &page.layer,
            logo,
            (PAGE_WIDTH_MM - HEADER_LOGO_SIZE_MM) / 2.0,
            page.y_top,
            HEADER_LOGO_SIZE_MM,
            HEADER_LOGO_SIZE_MM,
        );
        page.y_top += HEADER_LOGO_SIZE_MM + 3.0;
    }

    // Store block
    page.text_center(&store_name(store), 12.0, true);
    page.y_top += LINE_HEIGHT_MM;
    if let Some(address) = &store.address {
        for line in wrap_text(address, max_chars_per_line(7.0)) {
            page.text_center(&line, 7.0, false);
            page.y_top += LINE_HEIGHT_MM - 1.5;
        }
    }
    if let Some(phone) = &store.phone {
        page.text_center(&format!("WA: {}", to_display(phone)), 7.0, false);
        page.y_top += LINE_HEIGHT_MM;
    }

    page.y_top += 2.0;
    page.dashed_separator();
    page.y_top += 5.0;

    // Invoice info row: id left, date right
    page.text_left(&format!("#{}", invoice_id(invoice)), 8.0, true);
    page.text_right(&format_date_short(&invoice.timestamp), 8.0, false);
    page.y_top += LINE_HEIGHT_MM;

    page.text_left(&format!("Pelanggan: {}", customer_name(invoice)), 8.0, false);
    page.y_top += LINE_HEIGHT_MM;
    if let Some(phone) = &invoice.customer_phone {
        page.text_left(&format!("WA: {}", to_display(phone)), 8.0, false);
        page.y_top += LINE_HEIGHT_MM;
    }

    page.y_top += 2.0;
    page.dashed_separator();
    page.y_top += 5.0;

    // Items
    if invoice.items.is_empty() {
        page.text_left("Tidak ada item", 8.0, false);
        page.y_top += LINE_HEIGHT_MM;
    } else {
        for item in &invoice.items {
            page.text_left(&item.name, 8.0, true);
            page.y_top += LINE_HEIGHT_MM - 1.0;

            page.text_at(
                &format!("{} x {}", item.quantity, item.unit_price),
                8.0,
                false,
                MARGIN_MM + 2.0,
            );
            page.text_right(&item.subtotal().to_string(), 8.0, false);
            page.y_top += LINE_HEIGHT_MM;
        }
    }

    page.y_top += 2.0;
    page.dashed_separator();
    page.y_top += 5.0;

    // Total row
    page.text_left("TOTAL", 10.0, true);
    page.text_right(&total.to_string(), 10.0, true);
    page.y_top += LINE_HEIGHT_MM + 3.0;

    // QR block
    match &qr_raster {
        Some(raster) => {
            page.dashed_separator();
            page.y_top += 3.0;

            page.set_gray_text();
            page.text_center("Scan untuk validasi struk", 6.0, false);
            page.set_black_text();
            page.y_top += 2.0;

            embed_image(
                &page.layer,
                raster,
                (PAGE_WIDTH_MM - QR_SIZE_MM) / 2.0,
                page.y_top,
                QR_SIZE_MM,
                QR_SIZE_MM,
            );
            page.y_top += QR_SIZE_MM + 3.0;
        }
        None => page.y_top += 3.0,
    }

    // Footer
    page.dashed_separator();
    page.y_top += 5.0;
    page.text_center("Terima kasih atas kepercayaan Anda.", 8.0, false);
    page.y_top += LINE_HEIGHT_MM;
    page.text_center("Barang yang dibeli sudah sah.", 8.0, false);
    page.y_top += LINE_HEIGHT_MM + 2.0;
    page.text_center("Barakallah! Minta rela.", 8.0, false);
    page.y_top += LINE_HEIGHT_MM + 2.0;

    page.set_gray_text();
    page.text_center("Powered by SI-ACIL by Mas Alfy", 6.0, false);
    page.set_black_text();

    let name = format!(
        "Invoice_{}_{}.pdf",
        invoice_id(invoice),
        Utc::now().timestamp_millis()
    );
    let bytes = doc.save_to_bytes()?;

    Ok(ReceiptArtifact { name, bytes })
}

/// Renders and hands the artifact to the caller-supplied sink.
pub async fn render_to(
    invoice: &Invoice,
    store: &StoreProfile,
    sink: &mut dyn ArtifactSink,
) -> RenderResult<ReceiptArtifact> {
    let artifact = render(invoice, store).await?;
    sink.deliver(&artifact.name, &artifact.bytes)
        .map_err(RenderError::Deliver)?;
    Ok(artifact)
}

// =============================================================================
// Page Cursor
// =============================================================================

/// A top-down layout cursor over one PDF layer. printpdf's origin is the
/// bottom-left corner; receipts are laid out from the top, so positions
/// are flipped on every draw.
struct Page {
    layer: PdfLayerReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    /// Distance from the top edge, in millimetres.
    y_top: f32,
}

impl Page {
    fn font_for(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.font_bold
        } else {
            &self.font
        }
    }

    fn text_at(&self, text: &str, size_pt: f32, bold: bool, x_mm: f32) {
        self.layer.use_text(
            text,
            size_pt,
            Mm(x_mm),
            Mm(PAGE_HEIGHT_MM - self.y_top),
            self.font_for(bold),
        );
    }

    fn text_left(&self, text: &str, size_pt: f32, bold: bool) {
        self.text_at(text, size_pt, bold, MARGIN_MM);
    }

    fn text_center(&self, text: &str, size_pt: f32, bold: bool) {
        let x = (PAGE_WIDTH_MM - text_width_mm(text, size_pt)).max(0.0) / 2.0;
        self.text_at(text, size_pt, bold, x);
    }

    fn text_right(&self, text: &str, size_pt: f32, bold: bool) {
        let x = (PAGE_WIDTH_MM - MARGIN_MM - text_width_mm(text, size_pt)).max(0.0);
        self.text_at(text, size_pt, bold, x);
    }

    /// Light dashed rule across the printable width at the cursor.
    fn dashed_separator(&self) {
        self.layer.set_outline_color(Color::Rgb(Rgb::new(0.6, 0.6, 0.6, None)));
        self.layer.set_line_dash_pattern(LineDashPattern {
            dash_1: Some(1),
            gap_1: Some(1),
            ..Default::default()
        });

        let y = PAGE_HEIGHT_MM - self.y_top;
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH_MM - MARGIN_MM), Mm(y)), false),
            ],
            is_closed: false,
        });

        // Back to solid black for whatever draws next
        self.layer.set_line_dash_pattern(LineDashPattern::default());
        self.layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    fn set_gray_text(&self) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(0.4, 0.4, 0.4, None)));
    }

    fn set_black_text(&self) {
        self.layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn store_name(store: &StoreProfile) -> String {
    if store.name.is_empty() {
        "SI-ACIL Store".to_string()
    } else {
        store.name.clone()
    }
}

fn invoice_id(invoice: &Invoice) -> &str {
    if invoice.id.is_empty() {
        "INV-0000"
    } else {
        &invoice.id
    }
}

fn customer_name(invoice: &Invoice) -> &str {
    if invoice.customer_name.is_empty() {
        "Umum"
    } else {
        &invoice.customer_name
    }
}

/// Approximate rendered width of builtin-Helvetica text.
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * PT_TO_MM
}

/// How many characters fit on one printable line at the given size.
fn max_chars_per_line(size_pt: f32) -> usize {
    let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    (usable / (size_pt * AVG_GLYPH_EM * PT_TO_MM)).floor() as usize
}

/// Greedy word wrap; a single word longer than the line is hard-split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                lines.push(chunk.iter().collect());
            }
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Blends every pixel toward white, simulating the given opacity over the
/// white page. Drawn pre-blended because the watermark always sits on a
/// blank background.
fn fade_toward_white(raster: &DynamicImage, opacity: f32) -> DynamicImage {
    let mut rgb = raster.to_rgb8();
    for pixel in rgb.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let faded = 255.0 - (255.0 - f32::from(*channel)) * opacity;
            *channel = faded.round() as u8;
        }
    }
    DynamicImage::ImageRgb8(rgb)
}

/// Places a raster at the given top-left position and size (mm).
fn embed_image(
    layer: &PdfLayerReference,
    raster: &DynamicImage,
    x_mm: f32,
    y_top_mm: f32,
    width_mm: f32,
    height_mm: f32,
) {
    let rgb = raster.to_rgb8();
    let (px_w, px_h) = (rgb.width(), rgb.height());

    let xobject = ImageXObject {
        width: Px(px_w as usize),
        height: Px(px_h as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: false,
        image_data: rgb.into_raw(),
        image_filter: None,
        smask: None,
        clipping_bbox: None,
    };

    // printpdf sizes images by dpi; derive the dpi that yields the target
    // width, then correct the height with scale_y.
    let dpi = px_w as f32 * 25.4 / width_mm;
    let natural_height_mm = px_h as f32 * 25.4 / dpi;
    let scale_y = height_mm / natural_height_mm;

    Image::from(xobject).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x_mm)),
            translate_y: Some(Mm(PAGE_HEIGHT_MM - y_top_mm - height_mm)),
            scale_x: Some(1.0),
            scale_y: Some(scale_y),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nota_core::{LineItem, Money};

    fn sample_invoice() -> Invoice {
        Invoice {
            id: "INV-0042".to_string(),
            customer_name: "Budi".to_string(),
            customer_phone: Some("081234567890".to_string()),
            items: vec![
                LineItem::new("Kopi", Money::from_rupiah(15_000), 2),
                LineItem::new("Roti", Money::from_rupiah(10_000), 1),
            ],
            stored_total: Money::zero(),
            timestamp: Utc.with_ymd_and_hms(2026, 8, 30, 14, 30, 0).unwrap(),
        }
    }

    fn sample_store() -> StoreProfile {
        StoreProfile {
            name: "Warung Acil".to_string(),
            address: Some("Jl. Mawar No. 3, Banjarmasin".to_string()),
            phone: Some("6281234567890".to_string()),
            logo: None,
        }
    }

    #[tokio::test]
    async fn test_render_produces_named_pdf() {
        let artifact = render(&sample_invoice(), &sample_store()).await.unwrap();

        assert!(artifact.name.starts_with("Invoice_INV-0042_"));
        assert!(artifact.name.ends_with(".pdf"));
        // PDF magic header
        assert_eq!(&artifact.bytes[..5], b"%PDF-");
    }

    #[tokio::test]
    async fn test_render_empty_invoice_completes() {
        let mut invoice = sample_invoice();
        invoice.items.clear();
        invoice.customer_phone = None;

        let artifact = render(&invoice, &sample_store()).await.unwrap();
        assert!(!artifact.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_render_with_bad_logo_degrades() {
        let mut store = sample_store();
        store.logo = Some("data:image/jpeg;base64,not-actually-an-image".to_string());

        // Bad logo is logged and skipped, not propagated
        let artifact = render(&sample_invoice(), &store).await.unwrap();
        assert_eq!(&artifact.bytes[..5], b"%PDF-");
    }

    #[tokio::test]
    async fn test_render_to_delivers_through_sink() {
        let mut sink = crate::sink::MemorySink::new();
        let artifact = render_to(&sample_invoice(), &sample_store(), &mut sink)
            .await
            .unwrap();

        let delivered = sink.artifacts();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, artifact.name);
        assert_eq!(delivered[0].1, artifact.bytes);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a b c", 10), vec!["a b c"]);
        assert_eq!(wrap_text("alpha beta gamma", 11), vec!["alpha beta", "gamma"]);
        assert_eq!(wrap_text("", 10), Vec::<String>::new());
        // Oversized single word gets hard-split
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_fade_toward_white() {
        let black = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            2,
            2,
            image::Rgb([0, 0, 0]),
        ));
        let faded = fade_toward_white(&black, 0.06).to_rgb8();
        // 6% of black over white: 255 - 255*0.06 ≈ 240
        assert_eq!(faded.get_pixel(0, 0).0, [240, 240, 240]);

        let white = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            1,
            1,
            image::Rgb([255, 255, 255]),
        ));
        assert_eq!(fade_toward_white(&white, 0.06).to_rgb8().get_pixel(0, 0).0[0], 255);
    }

    #[test]
    fn test_text_width_estimate() {
        // 10 chars at 8pt: 10 * 8 * 0.5 * 0.352778 ≈ 14.1mm
        let w = text_width_mm("ABCDEFGHIJ", 8.0);
        assert!((w - 14.11).abs() < 0.1);
    }
}
