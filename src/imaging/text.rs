//! Font handling and the two text renderers: free text overlays and the
//! rotated day/date stamp.

use super::calculations::{StampMargins, calculate_stamp_position};
use super::error::ImagingError;
use super::params::{Color, TextOverlay};
use ab_glyph::{FontVec, PxScale};
use chrono::NaiveDate;
use image::{DynamicImage, Rgba, RgbaImage, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Known font faces by key, plus the face used for unknown or absent keys.
#[derive(Debug, Clone, PartialEq)]
pub struct FontLibrary {
    pub faces: BTreeMap<String, PathBuf>,
    pub default: PathBuf,
}

impl FontLibrary {
    /// Path for a font key. Unknown keys fall back to the default face.
    pub fn resolve(&self, key: Option<&str>) -> &Path {
        key.and_then(|k| self.faces.get(k))
            .unwrap_or(&self.default)
            .as_path()
    }
}

/// Read and parse a TrueType/OpenType font file.
pub fn load_font(path: &Path) -> Result<FontVec, ImagingError> {
    let missing = || ImagingError::MissingResource {
        resource: "font",
        path: path.to_path_buf(),
    };
    let data = std::fs::read(path).map_err(|_| missing())?;
    FontVec::try_from_vec(data).map_err(|_| missing())
}

/// Draw `overlay.text` with its top-left corner at `(x, y)`.
///
/// Coordinates outside the image are allowed; glyphs are clipped.
pub fn draw_text(
    image: &DynamicImage,
    overlay: &TextOverlay,
    fonts: &FontLibrary,
) -> Result<RgbImage, ImagingError> {
    let font = load_font(fonts.resolve(overlay.font.as_deref()))?;
    let mut canvas = image.to_rgb8();
    draw_text_mut(
        &mut canvas,
        overlay.color.to_rgb(),
        overlay.x,
        overlay.y,
        PxScale::from(overlay.size as f32),
        &font,
        &overlay.text,
    );
    Ok(canvas)
}

/// Appearance of the day/date stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct StampStyle {
    pub font: PathBuf,
    pub size: u32,
    pub color: Color,
    pub margins: StampMargins,
}

/// Stamp text for a date: full weekday name and two-digit day of month.
///
/// ```
/// use chrono::NaiveDate;
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(retouch::imaging::stamp_text(date), "Tuesday, 05");
/// ```
pub fn stamp_text(date: NaiveDate) -> String {
    date.format("%A, %d").to_string()
}

/// Stamp `text` vertically (reading bottom to top) near the bottom-left
/// corner.
///
/// A missing stamp font is not an error: the image comes back unchanged
/// and a warning is logged.
pub fn draw_day_date_stamp(image: &DynamicImage, text: &str, style: &StampStyle) -> DynamicImage {
    let font = match load_font(&style.font) {
        Ok(font) => font,
        Err(e) => {
            log::warn!("Skipping date stamp: {e}");
            return image.clone();
        }
    };

    let scale = PxScale::from(style.size as f32);
    let (text_w, text_h) = text_size(scale, &font, text);
    if text_w == 0 || text_h == 0 {
        return image.clone();
    }

    let ink = style.color.to_rgba();
    let mut label = RgbaImage::from_pixel(text_w, text_h, Rgba([ink[0], ink[1], ink[2], 0]));
    draw_text_mut(&mut label, ink, 0, 0, scale, &font, text);
    let label = image::imageops::rotate270(&label);

    let (x, y) = calculate_stamp_position(image_dims(image), label.dimensions(), style.margins);
    let mut base = image.to_rgba8();
    image::imageops::overlay(&mut base, &label, x, y);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(base).to_rgb8())
}

fn image_dims(image: &DynamicImage) -> (u32, u32) {
    (image.width(), image.height())
}
