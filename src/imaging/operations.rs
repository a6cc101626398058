//! The operation dispatcher.
//!
//! Combines the pieces: cap the image size, route the operation code to
//! exactly one filter or renderer, and name the result after the source.

use super::calculations::calculate_capped_dimensions;
use super::codec;
use super::error::ImagingError;
use super::filters;
use super::params::{OperationCode, TextDefaults, TextParams};
use super::style::Stylizer;
use super::text::{self, FontLibrary, StampStyle};
use crate::naming::output_name;
use chrono::NaiveDate;
use image::DynamicImage;
use image::imageops::FilterType;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Everything an operation may need besides the image itself.
pub struct OperationContext {
    pub max_dimension: u32,
    pub text_defaults: TextDefaults,
    pub fonts: FontLibrary,
    pub stamp: StampStyle,
    pub stylizer: Box<dyn Stylizer>,
    /// Date printed by the day/date stamp. `None` uses today's local date.
    pub stamp_date: Option<NaiveDate>,
}

impl OperationContext {
    fn stamp_date(&self) -> NaiveDate {
        self.stamp_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Cap the longer edge at `max_dimension`, preserving aspect ratio.
///
/// Images already within bounds are returned untouched.
pub fn normalize(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    let dims = (image.width(), image.height());
    let (width, height) = calculate_capped_dimensions(dims, max_dimension);
    if (width, height) == dims {
        return image;
    }
    log::info!(
        "Image resized from {}x{} to {width}x{height} for processing",
        dims.0,
        dims.1
    );
    image.resize_exact(width, height, FilterType::Triangle)
}

/// Apply one operation to a decoded image.
///
/// Returns the transformed image and the output name derived from
/// `source_name` (`photo.jpg` + `mnc` → `photo_mnc.jpg`).
pub fn process(
    image: DynamicImage,
    source_name: &str,
    op: OperationCode,
    params: &TextParams,
    ctx: &OperationContext,
) -> Result<(DynamicImage, String)> {
    log::info!("Processing {op} on {source_name}");
    let image = normalize(image, ctx.max_dimension);

    let result = match op {
        OperationCode::TextOverlay => {
            let overlay = params.resolve(ctx.text_defaults)?;
            DynamicImage::ImageRgb8(text::draw_text(&image, &overlay, &ctx.fonts)?)
        }
        OperationCode::NeuralStyle => {
            DynamicImage::ImageRgb8(ctx.stylizer.stylize(&image.to_rgb8())?)
        }
        OperationCode::Monochrome => DynamicImage::ImageLuma8(filters::monochrome(&image)),
        OperationCode::CardGrade => DynamicImage::ImageRgb8(filters::card_grade(&image)),
        OperationCode::Vintage => DynamicImage::ImageRgb8(filters::vintage(&image)),
        OperationCode::DayDateStamp => {
            let label = text::stamp_text(ctx.stamp_date());
            log::debug!("Day with date: {label}");
            text::draw_day_date_stamp(&image, &label, &ctx.stamp)
        }
    };

    Ok((result, output_name(source_name, op)))
}

/// Decode `bytes`, then dispatch on the raw operation code.
///
/// Undecodable input fails before the code is even looked at.
pub fn process_bytes(
    bytes: &[u8],
    source_name: &str,
    op_code: &str,
    params: &TextParams,
    ctx: &OperationContext,
) -> Result<(DynamicImage, String)> {
    let image = codec::decode(bytes)?;
    let op: OperationCode = op_code.parse()?;
    process(image, source_name, op, params, ctx)
}
