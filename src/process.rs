//! File-level entry points.
//!
//! Wraps the in-memory dispatcher and compositor with the on-disk layout
//! from [`AppConfig`]:
//!
//! ```text
//! uploads/                 # paths.upload_dir: sources looked up by name
//! └── photo.jpg
//! static/
//! ├── uploads/             # paths.output_dir
//! │   └── photo_mnc.jpg    # {stem}_{code}{ext}
//! └── collages/            # paths.collage_dir
//!     └── collage.png      # collage.filename
//! ```
//!
//! Output directories are created on demand.

use crate::config::AppConfig;
use crate::imaging::{
    FontLibrary, ImagingError, ModelStylizer, OperationContext, Quality, StampMargins, StampStyle,
    TextDefaults, TextParams, codec, collage, process_bytes,
};
use crate::naming::is_allowed_extension;
use image::{DynamicImage, GenericImageView};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Imaging(#[from] ImagingError),
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error("Source image not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("File type not allowed: {0}")]
    DisallowedExtension(String),
    #[error("A {rows}x{cols} collage needs {needed} images, got {supplied}")]
    NotEnoughImages {
        rows: u32,
        cols: u32,
        needed: usize,
        supplied: usize,
    },
}

/// A processed image written to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// `{stem}_{code}{ext}`
    pub output_name: String,
    pub path: PathBuf,
    pub operation: String,
    pub dimensions: (u32, u32),
}

/// A collage written to the collage directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CollageImage {
    pub path: PathBuf,
    pub rows: u32,
    pub cols: u32,
    pub images_used: usize,
    pub dimensions: (u32, u32),
}

/// Build the dispatcher context (fonts, stamp, stylizer) from config.
pub fn operation_context(config: &AppConfig) -> OperationContext {
    OperationContext {
        max_dimension: config.images.max_dimension,
        text_defaults: TextDefaults {
            size: config.text.default_size,
            color: config.text.default_color,
        },
        fonts: FontLibrary {
            faces: config.fonts.faces.clone(),
            default: config.fonts.default.clone(),
        },
        stamp: StampStyle {
            font: config.fonts.stamp.clone(),
            size: config.stamp.font_size,
            color: config.stamp.color,
            margins: StampMargins {
                left: config.stamp.margin_left,
                bottom: config.stamp.margin_bottom,
                edge_inset: config.stamp.edge_inset,
            },
        },
        stylizer: Box::new(ModelStylizer::new(
            config.style.model.clone(),
            config.style.device,
        )),
        stamp_date: None,
    }
}

/// Apply `op_code` to `upload_dir/source_name` and save the result.
pub fn process_image(
    config: &AppConfig,
    source_name: &str,
    op_code: &str,
    params: &TextParams,
) -> Result<ProcessedImage, ProcessError> {
    let ctx = operation_context(config);
    process_image_with_context(config, &ctx, source_name, op_code, params)
}

/// Process an image with a specific context (allows testing with a stub stylizer).
pub fn process_image_with_context(
    config: &AppConfig,
    ctx: &OperationContext,
    source_name: &str,
    op_code: &str,
    params: &TextParams,
) -> Result<ProcessedImage, ProcessError> {
    if !is_allowed_extension(source_name, &config.images.allowed_extensions) {
        return Err(ProcessError::DisallowedExtension(source_name.to_string()));
    }
    let source_path = config.paths.upload_dir.join(source_name);
    if !source_path.is_file() {
        return Err(ProcessError::SourceNotFound(source_path));
    }

    let bytes = std::fs::read(&source_path)?;
    let (result, output_name) = process_bytes(&bytes, source_name, op_code, params, ctx)?;

    let path = config.paths.output_dir.join(&output_name);
    save(&result, &path, config)?;

    Ok(ProcessedImage {
        dimensions: result.dimensions(),
        operation: op_code.to_string(),
        output_name,
        path,
    })
}

/// Compose already-decoded images, enforcing `rows * cols <= images.len()`.
pub fn make_collage(
    images: &[DynamicImage],
    rows: u32,
    cols: u32,
) -> Result<DynamicImage, ProcessError> {
    let needed = rows as usize * cols as usize;
    if needed > images.len() {
        return Err(ProcessError::NotEnoughImages {
            rows,
            cols,
            needed,
            supplied: images.len(),
        });
    }
    Ok(DynamicImage::ImageRgb8(collage::compose(images, rows, cols)?))
}

/// Load `files`, compose them and save to `collage_dir/filename`.
///
/// Files with an extension outside `allowed_extensions` are skipped before
/// the image count is checked.
pub fn create_collage(
    config: &AppConfig,
    files: &[PathBuf],
    rows: u32,
    cols: u32,
) -> Result<CollageImage, ProcessError> {
    let mut images = Vec::with_capacity(files.len());
    for file in files {
        let name = file.to_string_lossy();
        if !is_allowed_extension(&name, &config.images.allowed_extensions) {
            log::warn!("Skipping {name}: file type not allowed");
            continue;
        }
        if !file.is_file() {
            return Err(ProcessError::SourceNotFound(file.clone()));
        }
        images.push(codec::load_image(file)?);
    }

    let collage = make_collage(&images, rows, cols)?;
    let path = config.paths.collage_dir.join(&config.collage.filename);
    save(&collage, &path, config)?;
    log::info!("Saved collage to {}", path.display());

    Ok(CollageImage {
        dimensions: collage.dimensions(),
        path,
        rows,
        cols,
        images_used: (rows * cols) as usize,
    })
}

fn save(image: &DynamicImage, path: &Path, config: &AppConfig) -> Result<(), ProcessError> {
    log::debug!("Saving {}", path.display());
    codec::save_image(image, path, Quality::new(config.images.quality))?;
    Ok(())
}
