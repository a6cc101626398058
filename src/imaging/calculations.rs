//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale dimensions down so the longer edge fits within `max_dimension`.
///
/// Both axes use the same factor (`max_dimension / longer_edge`), rounded to
/// the nearest integer and never below 1. Dimensions already within bounds
/// are returned unchanged.
///
/// # Examples
/// ```
/// # use retouch::imaging::calculate_capped_dimensions;
/// assert_eq!(calculate_capped_dimensions((4000, 3000), 1024), (1024, 768));
/// assert_eq!(calculate_capped_dimensions((800, 600), 1024), (800, 600));
/// ```
pub fn calculate_capped_dimensions(dims: (u32, u32), max_dimension: u32) -> (u32, u32) {
    let (width, height) = dims;
    let longer_edge = width.max(height);

    if longer_edge <= max_dimension {
        return dims;
    }

    let scale = max_dimension as f64 / longer_edge as f64;
    let scaled = |v: u32| ((v as f64 * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Margins used to place the rotated day/date stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampMargins {
    /// Distance from the left edge.
    pub left: u32,
    /// Distance from the bottom edge.
    pub bottom: u32,
    /// Inset used when the stamp would overflow the right or bottom edge.
    pub edge_inset: u32,
}

/// Calculate the top-left corner of the rotated stamp.
///
/// The stamp sits `margins.left` from the left edge and `margins.bottom`
/// above the bottom edge. If it would run past the right edge it is pulled
/// back inside by `margins.edge_inset`, but never past the left edge.
///
/// The bottom anchor always holds: a stamp taller than the space above the
/// margin gets a negative `y` and its top is clipped when composited.
///
/// # Arguments
/// * `image` - Target image dimensions (width, height)
/// * `stamp` - Rotated stamp buffer dimensions (width, height)
pub fn calculate_stamp_position(
    image: (u32, u32),
    stamp: (u32, u32),
    margins: StampMargins,
) -> (i64, i64) {
    let (img_w, img_h) = (image.0 as i64, image.1 as i64);
    let (stamp_w, stamp_h) = (stamp.0 as i64, stamp.1 as i64);
    let inset = margins.edge_inset as i64;

    let mut x = margins.left as i64;
    let y = img_h - stamp_h - margins.bottom as i64;

    if x + stamp_w > img_w {
        x = (img_w - stamp_w - inset).max(0);
    }

    (x, y)
}

/// Uniform cell size and canvas size for a grid collage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollageLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Calculate the collage layout from the input image dimensions.
///
/// Every cell takes the largest width and the largest height found across
/// all inputs, so the canvas is `(max_w * cols) x (max_h * rows)`.
/// Returns `None` for an empty input list, a zero-sized grid, or a canvas
/// too large for `u32`.
pub fn calculate_collage_layout(
    dims: &[(u32, u32)],
    rows: u32,
    cols: u32,
) -> Option<CollageLayout> {
    if rows == 0 || cols == 0 {
        return None;
    }
    let cell_width = dims.iter().map(|&(w, _)| w).max()?;
    let cell_height = dims.iter().map(|&(_, h)| h).max()?;

    Some(CollageLayout {
        cell_width,
        cell_height,
        canvas_width: cell_width.checked_mul(cols)?,
        canvas_height: cell_height.checked_mul(rows)?,
    })
}

/// A grid cell assigned to one input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// Index into the input image list.
    pub index: usize,
    pub x: u32,
    pub y: u32,
}

/// Assign images to grid cells in row-major order.
///
/// Cells past `image_count` are skipped, and images past `rows * cols` are
/// never assigned.
pub fn calculate_grid_cells(
    layout: &CollageLayout,
    image_count: usize,
    rows: u32,
    cols: u32,
) -> Vec<GridCell> {
    if cols == 0 {
        return Vec::new();
    }
    let cells = (rows as usize).saturating_mul(cols as usize);
    (0..image_count.min(cells))
        .map(|index| {
            let (row, col) = ((index / cols as usize) as u32, (index % cols as usize) as u32);
            GridCell {
                index,
                x: col * layout.cell_width,
                y: row * layout.cell_height,
            }
        })
        .collect()
}
