//! # nota-render: Rendering & Encoding Edge for Nota
//!
//! Everything that turns core records into shareable artifacts lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Nota Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                nota-core (pure, total functions)                │   │
//! │  │        Invoice • StoreProfile • Money • reconcile               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nota-render (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  receipt  │  │    qr     │  │ compress  │  │   sink    │  │   │
//! │  │   │ 80mm PDF  │  │ validate  │  │ logo <=   │  │ artifact  │  │   │
//! │  │   │           │  │  raster   │  │ 40k chars │  │ delivery  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ASYNC EDGE • CPU WORK ON THE BLOCKING POOL • TYPED ERRORS    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`receipt`] - fixed-width thermal receipt PDF with validation QR
//! - [`qr`] - validation payload text + QR rasterization
//! - [`compress`] - bounded-size logo/avatar compression
//! - [`sink`] - caller-supplied artifact delivery channel
//! - [`error`] - typed failures (`CompressError`, `RenderError`)
//!
//! ## Degradation Policy
//!
//! A receipt is never blocked by a decorative element: QR and logo
//! failures are logged via `tracing` and the element is omitted.
//! Compression failures DO surface — the user picked the file and needs
//! to know it was rejected — but abort only that one operation.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod compress;
pub mod error;
pub mod qr;
pub mod receipt;
pub mod sink;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use compress::{compress, compress_file, DEFAULT_MAX_DIMENSION, DEFAULT_QUALITY};
pub use error::{CompressError, RenderError, RenderResult};
pub use receipt::{render, render_to, ReceiptArtifact};
pub use sink::{ArtifactSink, FileSink, MemorySink};
