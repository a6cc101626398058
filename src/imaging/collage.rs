//! Grid collage composition.

use super::calculations::{calculate_collage_layout, calculate_grid_cells};
use super::error::ImagingError;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use rayon::prelude::*;

/// Compose `images` into a `rows x cols` grid on a black canvas.
///
/// Every cell is sized to the largest width and largest height among all
/// inputs; each placed image is stretched to exactly that size. Images are
/// placed row-major; surplus images are ignored and unfilled cells stay
/// black.
pub fn compose(images: &[DynamicImage], rows: u32, cols: u32) -> Result<RgbImage, ImagingError> {
    if images.is_empty() {
        return Err(ImagingError::invalid("images", "at least one image is required"));
    }
    let dims: Vec<(u32, u32)> = images.iter().map(|i| (i.width(), i.height())).collect();
    let layout = calculate_collage_layout(&dims, rows, cols).ok_or_else(|| {
        ImagingError::invalid("grid", format!("{rows}x{cols} is empty or too large"))
    })?;

    let cells = calculate_grid_cells(&layout, images.len(), rows, cols);
    let tiles: Vec<RgbImage> = cells
        .par_iter()
        .map(|cell| {
            images[cell.index]
                .resize_exact(layout.cell_width, layout.cell_height, FilterType::CatmullRom)
                .to_rgb8()
        })
        .collect();

    let mut canvas = RgbImage::new(layout.canvas_width, layout.canvas_height);
    for (cell, tile) in cells.iter().zip(&tiles) {
        image::imageops::replace(&mut canvas, tile, cell.x as i64, cell.y as i64);
    }
    log::debug!(
        "Collage {}x{} grid from {} image(s): {}x{}",
        rows,
        cols,
        images.len(),
        layout.canvas_width,
        layout.canvas_height
    );
    Ok(canvas)
}
