//! Image processing: pure Rust apart from the optional ONNX Runtime.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode / encode** | `image` (JPEG, PNG, TIFF, WebP) |
//! | **Resize** | `resize_exact` with a triangle filter |
//! | **Vintage, monochrome, card grade** | per-pixel math over rayon slice iterators |
//! | **Text and date stamp** | `imageproc::drawing` + `ab_glyph` |
//! | **Neural style** | [`Stylizer`] seam, `ort` session behind the `onnx` feature |
//! | **Collage** | `resize_exact` + `imageops::replace` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and placement math (unit testable)
//! - **Parameters**: Operation codes, colors and raw text parameters
//! - **Filters / Text / Style / Collage**: The pixel work
//! - **Codec**: Loading and saving
//! - **Operations**: The dispatcher combining all of the above

mod calculations;
pub mod codec;
pub mod collage;
mod error;
pub mod filters;
pub mod operations;
mod params;
pub mod style;
pub mod text;

pub use calculations::{
    CollageLayout, GridCell, StampMargins, calculate_capped_dimensions, calculate_collage_layout,
    calculate_grid_cells, calculate_stamp_position,
};
pub use error::ImagingError;
pub use operations::{OperationContext, normalize, process, process_bytes};
pub use params::{
    Color, OperationCode, Quality, TextDefaults, TextOverlay, TextParams, coerce_font_size,
};
pub use style::{Device, ModelStylizer, Stylizer};
pub use text::{FontLibrary, StampStyle, stamp_text};
