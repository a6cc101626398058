//! # Retouch
//!
//! An image-editing backend: one operation per request over an uploaded
//! image, plus a grid collage compositor.
//!
//! | Code | Operation |
//! |------|-----------|
//! | `txt` | Text at a caller-given position, font, size and color |
//! | `anm` | Neural style transfer through a pretrained generator |
//! | `mnc` | Monochrome (BT.601 luma, single channel) |
//! | `crd` | Card grade: blue tint in overlay mode, contrast ×1.2, saturation ×1.35 |
//! | `rtr` | Vintage sepia matrix |
//! | `dnt` | Weekday and day-of-month stamped vertically near the bottom-left corner |
//!
//! # Pipeline
//!
//! ```text
//! bytes → decode → cap longer edge at 1024 → operation → {stem}_{code}{ext}
//! files → decode each → stretch to largest width/height → rows x cols grid
//! ```
//!
//! Every call is self-contained: nothing is cached between requests, fonts
//! and model weights included.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Filters, text rendering, style transfer, collage, dispatcher |
//! | [`naming`] | Output names and the allowed-extension check |
//! | [`config`] | `retouch.toml` loading, validation and merging |
//! | [`process`] | File-level entry points over the upload and output directories |
//! | [`output`] | CLI output formatting |

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
