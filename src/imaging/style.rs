//! Neural style transfer behind a single-method seam.
//!
//! The pretrained generator is opaque: the [`Stylizer`] trait is the whole
//! contract ("given an image, produce a stylized image"). This module owns
//! only the plumbing around it:
//!
//! - **Pre-processing**: RGB8 → NCHW `f32` tensor in `[-1, 1]` ([`image_to_tensor`])
//! - **Post-processing**: tensor clipped to `[-1, 1]` → RGB8 ([`tensor_to_image`])
//! - **Device selection**: [`Device`], resolved when the session is built
//!
//! The production implementation runs an ONNX export of the generator
//! through ONNX Runtime and is compiled in with the `onnx` feature. Tests
//! substitute a stub.

use super::error::ImagingError;
use image::RgbImage;
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Image tensor in NCHW layout (batch, channels, height, width).
pub type ImageTensor = Array4<f32>;

/// Turns a photo into a stylized rendering.
pub trait Stylizer: Send + Sync {
    fn stylize(&self, image: &RgbImage) -> Result<RgbImage, ImagingError>;
}

/// Compute device for inference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// CUDA when the runtime can provide it, CPU otherwise.
    #[default]
    Auto,
    Cpu,
    /// CUDA or fail.
    Cuda,
}

/// Convert an RGB image to a `(1, 3, h, w)` tensor with values in `[-1, 1]`.
pub fn image_to_tensor(image: &RgbImage) -> ImageTensor {
    let (width, height) = image.dimensions();
    Array4::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| {
            let value = image.get_pixel(x as u32, y as u32).0[c];
            value as f32 / 255.0 * 2.0 - 1.0
        },
    )
}

/// Convert a `(1, 3, h, w)` tensor back to RGB8.
///
/// Values are clipped to `[-1, 1]`, mapped to `[0, 1]` and scaled to 255
/// with truncation.
pub fn tensor_to_image(tensor: &ImageTensor) -> Result<RgbImage, ImagingError> {
    let (batch, channels, height, width) = tensor.dim();
    if batch != 1 || channels != 3 {
        return Err(ImagingError::Inference(format!(
            "expected a (1, 3, h, w) tensor, got {:?}",
            tensor.shape()
        )));
    }

    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        image::Rgb(std::array::from_fn(|c| {
            let v = tensor[[0, c, y, x]].clamp(-1.0, 1.0) * 0.5 + 0.5;
            (v * 255.0) as u8
        }))
    }))
}

/// Stylizer that loads the generator weights on every call.
///
/// The core keeps no model between requests; construction only records
/// where the weights live and which device to use.
#[derive(Debug, Clone)]
pub struct ModelStylizer {
    pub model_path: PathBuf,
    pub device: Device,
}

impl ModelStylizer {
    pub fn new(model_path: impl Into<PathBuf>, device: Device) -> Self {
        Self {
            model_path: model_path.into(),
            device,
        }
    }
}

impl Stylizer for ModelStylizer {
    fn stylize(&self, image: &RgbImage) -> Result<RgbImage, ImagingError> {
        if !self.model_path.exists() {
            return Err(ImagingError::MissingResource {
                resource: "style model weights",
                path: self.model_path.clone(),
            });
        }
        run_model(&self.model_path, self.device, image)
    }
}

#[cfg(feature = "onnx")]
fn run_model(path: &Path, device: Device, image: &RgbImage) -> Result<RgbImage, ImagingError> {
    let stylizer = onnx::OnnxStylizer::load(path, device)?;
    stylizer.stylize(image)
}

#[cfg(not(feature = "onnx"))]
fn run_model(path: &Path, _device: Device, _image: &RgbImage) -> Result<RgbImage, ImagingError> {
    Err(ImagingError::MissingResource {
        resource: "ONNX runtime (rebuild with --features onnx) for style model",
        path: path.to_path_buf(),
    })
}

#[cfg(feature = "onnx")]
pub mod onnx {
    //! ONNX Runtime-backed [`Stylizer`].

    use super::{Device, ImageTensor, Stylizer, image_to_tensor, tensor_to_image};
    use crate::imaging::ImagingError;
    use image::RgbImage;
    use ndarray::Ix4;
    use ort::execution_providers::CUDAExecutionProvider;
    use ort::session::Session;
    use ort::value::Tensor;
    use std::path::Path;
    use std::sync::Mutex;

    /// A loaded generator session.
    ///
    /// `Session::run` needs exclusive access, so the session sits behind a
    /// mutex to keep the stylizer `Sync`.
    pub struct OnnxStylizer {
        session: Mutex<Session>,
    }

    fn inference_error(err: impl std::fmt::Display) -> ImagingError {
        ImagingError::Inference(err.to_string())
    }

    impl OnnxStylizer {
        pub fn load(path: &Path, device: Device) -> Result<Self, ImagingError> {
            let mut builder = Session::builder().map_err(inference_error)?;
            builder = match device {
                Device::Cpu => builder,
                Device::Auto => builder
                    .with_execution_providers([CUDAExecutionProvider::default().build()])
                    .map_err(inference_error)?,
                Device::Cuda => builder
                    .with_execution_providers([CUDAExecutionProvider::default()
                        .build()
                        .error_on_failure()])
                    .map_err(inference_error)?,
            };
            let session = builder.commit_from_file(path).map_err(inference_error)?;
            log::debug!("Loaded style model {} ({device:?})", path.display());
            Ok(Self {
                session: Mutex::new(session),
            })
        }
    }

    impl Stylizer for OnnxStylizer {
        fn stylize(&self, image: &RgbImage) -> Result<RgbImage, ImagingError> {
            let input = Tensor::from_array(image_to_tensor(image)).map_err(inference_error)?;
            let mut session = self
                .session
                .lock()
                .map_err(|_| ImagingError::Inference("style session poisoned".into()))?;
            let outputs = session.run(ort::inputs![input]).map_err(inference_error)?;
            let output = outputs
                .values()
                .next()
                .ok_or_else(|| ImagingError::Inference("model produced no output".into()))?;

            let tensor: ImageTensor = output
                .try_extract_array::<f32>()
                .map_err(inference_error)?
                .into_dimensionality::<Ix4>()
                .map_err(inference_error)?
                .to_owned();
            tensor_to_image(&tensor)
        }
    }
}
