//! Decoding and encoding through the `image` crate.
//!
//! | Format | Decode | Encode |
//! |---|---|---|
//! | JPEG | yes | `JpegEncoder` at the configured quality |
//! | PNG | yes | lossless |
//! | TIFF | yes | lossless |
//! | WebP | yes | lossless |

use super::error::ImagingError;
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Whether files with `extension` can be both decoded and re-encoded.
///
/// Outputs keep their source's extension, so an input format is only
/// usable when the compiled-in codecs can write it back.
pub fn supports_extension(extension: &str) -> bool {
    ImageFormat::from_extension(extension)
        .is_some_and(|format| format.reading_enabled() && format.writing_enabled())
}

/// Decode an in-memory image, guessing the format from its contents.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ImagingError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(ImagingError::Decode)
}

/// Load and decode an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Save an image, inferring the format from the path's extension.
///
/// Parent directories are created as needed. JPEG output drops alpha and
/// is encoded at `quality`; other formats ignore it.
pub fn save_image(image: &DynamicImage, path: &Path, quality: Quality) -> Result<(), ImagingError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let encode_err = |source| ImagingError::Encode {
        path: path.to_path_buf(),
        source,
    };

    let format = ImageFormat::from_path(path).map_err(encode_err)?;
    if format == ImageFormat::Jpeg {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
        let flattened = match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image.clone(),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };
        return flattened.write_with_encoder(encoder).map_err(encode_err);
    }

    image.save_with_format(path, format).map_err(encode_err)
}
