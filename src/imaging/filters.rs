//! Stateless pixel filters.
//!
//! Every filter takes an image by reference and returns a new buffer; none
//! of them depend on each other. Per-pixel work runs over the whole raw
//! buffer at once through rayon's parallel slice iterators.
//!
//! | Filter | Output |
//! |---|---|
//! | [`vintage`] | RGB, sepia matrix |
//! | [`monochrome`] | single channel, BT.601 luma |
//! | [`card_grade`] | RGB, tint overlay → contrast → saturate |

use super::params::Color;
use image::{DynamicImage, GrayImage, RgbImage};
use rayon::prelude::*;

/// Row-major 3x3 color transform applied to `[r, g, b]`.
pub type ColorMatrix = [[f32; 3]; 3];

/// The classic sepia transform.
pub const SEPIA: ColorMatrix = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Tint composited by the card grade.
pub const CARD_TINT: Color = Color([127, 187, 227]);
pub const CARD_TINT_OPACITY: f32 = 0.2;
pub const CARD_CONTRAST: f32 = 1.2;
pub const CARD_SATURATION: f32 = 1.35;

/// Sepia-toned copy of the image.
///
/// Channels are clamped to 255 and truncated to 8 bits.
pub fn vintage(image: &DynamicImage) -> RgbImage {
    let mut rgb = image.to_rgb8();
    apply_color_matrix(&mut rgb, &SEPIA);
    rgb
}

/// Luminance-weighted grayscale (0.299 R + 0.587 G + 0.114 B).
///
/// Always yields one channel, whatever the input layout.
pub fn monochrome(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }
    let rgb = image.to_rgb8();
    let mut gray = GrayImage::new(rgb.width(), rgb.height());
    let src: &[u8] = &rgb;
    let dst: &mut [u8] = &mut gray;
    dst.par_iter_mut()
        .zip(src.par_chunks_exact(3))
        .for_each(|(out, px)| {
            let luma = 0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32;
            *out = luma.round().clamp(0.0, 255.0) as u8;
        });
    gray
}

/// The "card" look: tint overlay, then contrast, then saturation.
///
/// The order is part of the result; each step quantizes back to 8 bits
/// before the next one runs.
pub fn card_grade(image: &DynamicImage) -> RgbImage {
    let mut rgb = image.to_rgb8();
    overlay_tint(&mut rgb, CARD_TINT, CARD_TINT_OPACITY);
    contrast(&mut rgb, CARD_CONTRAST);
    saturate(&mut rgb, CARD_SATURATION);
    rgb
}

/// Apply `matrix` to every pixel of an RGB buffer in place.
pub fn apply_color_matrix(rgb: &mut RgbImage, matrix: &ColorMatrix) {
    let pixels: &mut [u8] = rgb;
    pixels.par_chunks_exact_mut(3).for_each(|px| {
        let src = [px[0] as f32, px[1] as f32, px[2] as f32];
        for (out, row) in px.iter_mut().zip(matrix) {
            let value = row[0] * src[0] + row[1] * src[1] + row[2] * src[2];
            *out = value.clamp(0.0, 255.0) as u8;
        }
    });
}

/// Composite a flat color over the image with the overlay blend mode.
///
/// The tint layer has uniform `opacity`, so the result per channel is
/// `(1 - opacity) * base + opacity * overlay(base, tint)`.
pub fn overlay_tint(rgb: &mut RgbImage, tint: Color, opacity: f32) {
    let tint = tint.0.map(|c| c as f32 / 255.0);
    let pixels: &mut [u8] = rgb;
    pixels.par_chunks_exact_mut(3).for_each(|px| {
        for (channel, &source) in px.iter_mut().zip(&tint) {
            let backdrop = *channel as f32 / 255.0;
            let blended = overlay_blend(backdrop, source);
            let mixed = (1.0 - opacity) * backdrop + opacity * blended;
            *channel = to_u8(mixed * 255.0);
        }
    });
}

/// Overlay blend of one normalized channel: multiply in the shadows,
/// screen in the highlights, keyed on the backdrop.
pub fn overlay_blend(backdrop: f32, source: f32) -> f32 {
    if backdrop <= 0.5 {
        2.0 * backdrop * source
    } else {
        1.0 - 2.0 * (1.0 - backdrop) * (1.0 - source)
    }
}

/// Mid-gray that [`contrast`] stretches away from.
const CONTRAST_PIVOT: f32 = 128.0;

/// Scale each channel's distance from mid-gray by `amount`.
pub fn contrast(rgb: &mut RgbImage, amount: f32) {
    let channels: &mut [u8] = rgb;
    channels.par_iter_mut().for_each(|channel| {
        *channel = to_u8((*channel as f32 - CONTRAST_PIVOT) * amount + CONTRAST_PIVOT);
    });
}

/// Scale saturation around the gray axis by `amount` (1.0 = unchanged).
pub fn saturate(rgb: &mut RgbImage, amount: f32) {
    let s = amount;
    let matrix: ColorMatrix = [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ];
    let pixels: &mut [u8] = rgb;
    pixels.par_chunks_exact_mut(3).for_each(|px| {
        let src = [px[0] as f32, px[1] as f32, px[2] as f32];
        for (out, row) in px.iter_mut().zip(&matrix) {
            *out = to_u8(row[0] * src[0] + row[1] * src[1] + row[2] * src[2]);
        }
    });
}

#[inline]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
