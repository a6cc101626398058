//! Application configuration.
//!
//! Handles loading, validating, and merging `retouch.toml`. Stock defaults
//! are serialized to a TOML value and the user file is merged on top, so a
//! config file only needs the keys it wants to change. A missing file means
//! stock defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! upload_dir = "uploads"            # Where `process` looks up source images
//! output_dir = "static/uploads"     # Where processed images are written
//! collage_dir = "static/collages"   # Where collages are written
//!
//! [images]
//! max_dimension = 1024              # Longer edge cap applied before any operation
//! quality = 90                      # JPEG quality (1-100)
//! allowed_extensions = ["png", "jpg", "jpeg"]
//!
//! [text]
//! default_size = 20                 # Used when the font size is not a positive integer
//! default_color = "#000000"         # Used when no color is given
//!
//! [fonts]
//! default = "fonts/arial.ttf"       # Used for unknown or absent font keys
//! stamp = "fonts/Arimo-Regular.ttf" # Day/date stamp face
//!
//! [fonts.faces]
//! arimo = "fonts/Arimo-Regular.ttf"
//! # ...
//!
//! [stamp]
//! font_size = 60
//! margin_left = 20
//! margin_bottom = 35
//! edge_inset = 10                   # Inset used when the stamp would overflow
//! color = "#ffffff"
//!
//! [style]
//! model = "models/face_paint_512_v2.onnx"
//! device = "auto"                   # auto | cpu | cuda
//!
//! [collage]
//! rows = 2
//! cols = 2
//! filename = "collage.png"
//!
//! [processing]
//! max_processes = 4                 # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Color, Device, codec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "retouch.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `retouch.toml`.
///
/// All fields have defaults matching the stock file. Unknown keys are
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Input and output directories.
    pub paths: PathsConfig,
    /// Size cap, encode quality, accepted uploads.
    pub images: ImagesConfig,
    /// Text overlay fallbacks.
    pub text: TextConfig,
    /// Font files by key.
    pub fonts: FontsConfig,
    /// Day/date stamp appearance.
    pub stamp: StampConfig,
    /// Neural style model.
    pub style: StyleConfig,
    /// Collage grid defaults.
    pub collage: CollageConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.images.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "images.max_dimension must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.images.allowed_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "images.allowed_extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .images
            .allowed_extensions
            .iter()
            .find(|ext| !codec::supports_extension(ext))
        {
            return Err(ConfigError::Validation(format!(
                "images.allowed_extensions: no codec for \"{ext}\""
            )));
        }
        if self.text.default_size == 0 {
            return Err(ConfigError::Validation(
                "text.default_size must be non-zero".into(),
            ));
        }
        if self.stamp.font_size == 0 {
            return Err(ConfigError::Validation(
                "stamp.font_size must be non-zero".into(),
            ));
        }
        if self.collage.rows == 0 || self.collage.cols == 0 {
            return Err(ConfigError::Validation(
                "collage.rows and collage.cols must be non-zero".into(),
            ));
        }
        if self.collage.filename.trim().is_empty() {
            return Err(ConfigError::Validation(
                "collage.filename must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub collage_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            upload_dir: "uploads".into(),
            output_dir: "static/uploads".into(),
            collage_dir: "static/collages".into(),
        }
    }
}

/// Image handling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Longer edge cap, applied once before any operation.
    pub max_dimension: u32,
    /// JPEG encode quality (1-100).
    pub quality: u32,
    /// Accepted source extensions, without the dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_dimension: 1024,
            quality: 90,
            allowed_extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    pub default_size: u32,
    pub default_color: Color,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_size: 20,
            default_color: Color::BLACK,
        }
    }
}

/// Font files. Relative paths resolve against the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Face for unknown or absent font keys.
    pub default: PathBuf,
    /// Face for the day/date stamp.
    pub stamp: PathBuf,
    /// Selectable faces by key.
    pub faces: BTreeMap<String, PathBuf>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        let faces = [
            ("arimo", "fonts/Arimo-Regular.ttf"),
            ("tinos", "fonts/Tinos-Regular.ttf"),
            ("playwrite", "fonts/PlaywriteCU-Regular.ttf"),
            ("allan", "fonts/Allan-Regular.ttf"),
            ("anton", "fonts/Anton-Regular.ttf"),
        ]
        .into_iter()
        .map(|(key, path)| (key.to_string(), PathBuf::from(path)))
        .collect();

        Self {
            default: "fonts/arial.ttf".into(),
            stamp: "fonts/Arimo-Regular.ttf".into(),
            faces,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StampConfig {
    pub font_size: u32,
    pub margin_left: u32,
    pub margin_bottom: u32,
    /// Distance from the right/bottom edge when the stamp would overflow.
    pub edge_inset: u32,
    pub color: Color,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            font_size: 60,
            margin_left: 20,
            margin_bottom: 35,
            edge_inset: 10,
            color: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// ONNX export of the style generator.
    pub model: PathBuf,
    pub device: Device,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            model: "models/face_paint_512_v2.onnx".into(),
            device: Device::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollageConfig {
    pub rows: u32,
    pub cols: u32,
    /// Output filename inside `paths.collage_dir`.
    pub filename: String,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 2,
            filename: "collage.png".into(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but is
/// not valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults if it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        log::debug!("Loaded config from {}", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `retouch.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Retouch Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directories
# ---------------------------------------------------------------------------
[paths]
# Source images named on the command line are looked up here.
upload_dir = "uploads"

# Processed images are written here as {stem}_{code}{ext}.
output_dir = "static/uploads"

# Collages are written here.
collage_dir = "static/collages"

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
# Longer edge cap. Larger images are scaled down (aspect preserved)
# before any operation runs.
max_dimension = 1024

# JPEG encoding quality (1 = worst, 100 = best). PNG output is lossless.
quality = 90

# Accepted source extensions (case-insensitive, without the dot).
allowed_extensions = ["png", "jpg", "jpeg"]

# ---------------------------------------------------------------------------
# Text overlay (txt)
# ---------------------------------------------------------------------------
[text]
# Used when the requested size is not a positive integer.
default_size = 20

# Used when no color is given. Accepts #rgb, #rrggbb or a basic color name.
default_color = "#000000"

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
# Face used for unknown or absent font keys.
default = "fonts/arial.ttf"

# Face used by the day/date stamp (dnt).
stamp = "fonts/Arimo-Regular.ttf"

# Selectable faces by key.
[fonts.faces]
allan = "fonts/Allan-Regular.ttf"
anton = "fonts/Anton-Regular.ttf"
arimo = "fonts/Arimo-Regular.ttf"
playwrite = "fonts/PlaywriteCU-Regular.ttf"
tinos = "fonts/Tinos-Regular.ttf"

# ---------------------------------------------------------------------------
# Day/date stamp (dnt)
# ---------------------------------------------------------------------------
[stamp]
font_size = 60

# Offset of the rotated stamp from the left and bottom edges.
margin_left = 20
margin_bottom = 35

# Inset from the edge when the stamp would not fit at the margins.
edge_inset = 10

color = "#ffffff"

# ---------------------------------------------------------------------------
# Neural style (anm)
# ---------------------------------------------------------------------------
[style]
# ONNX export of the style generator. Requires a build with `--features onnx`.
model = "models/face_paint_512_v2.onnx"

# auto = CUDA when available, else CPU. cuda fails if CUDA is unavailable.
device = "auto"

# ---------------------------------------------------------------------------
# Collage
# ---------------------------------------------------------------------------
[collage]
# Default grid when --rows/--cols are not given.
rows = 2
cols = 2

# Output filename inside paths.collage_dir.
filename = "collage.png"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for pixel filters and collage resizing.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_paths() {
        let config = AppConfig::default();
        assert_eq!(config.paths.upload_dir, PathBuf::from("uploads"));
        assert_eq!(config.paths.output_dir, PathBuf::from("static/uploads"));
        assert_eq!(config.paths.collage_dir, PathBuf::from("static/collages"));
    }

    #[test]
    fn default_config_has_image_settings() {
        let config = AppConfig::default();
        assert_eq!(config.images.max_dimension, 1024);
        assert_eq!(config.images.quality, 90);
        assert_eq!(config.images.allowed_extensions, vec!["png", "jpg", "jpeg"]);
        assert_eq!(config.text.default_size, 20);
        assert_eq!(config.text.default_color, Color::BLACK);
    }

    #[test]
    fn default_config_has_font_faces() {
        let config = AppConfig::default();
        let keys: Vec<&str> = config.fonts.faces.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["allan", "anton", "arimo", "playwrite", "tinos"]);
        assert_eq!(config.fonts.default, PathBuf::from("fonts/arial.ttf"));
        assert_eq!(config.fonts.stamp, PathBuf::from("fonts/Arimo-Regular.ttf"));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[stamp]
color = "#ff0000"
"##;
        let config: AppConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.stamp.color, Color([255, 0, 0]));
        // Default values preserved
        assert_eq!(config.stamp.font_size, 60);
        assert_eq!(config.images.max_dimension, 1024);
    }

    #[test]
    fn parse_style_device() {
        let config: AppConfig = toml::from_str("[style]\ndevice = \"cpu\"\n").unwrap();
        assert_eq!(config.style.device, Device::Cpu);

        let result: Result<AppConfig, _> = toml::from_str("[style]\ndevice = \"tpu\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn malformed_color_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[text]\ndefault_color = \"#12\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("retouch.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("retouch.toml");

        fs::write(
            &config_path,
            r#"
[paths]
output_dir = "out"

[fonts.faces]
mono = "fonts/Mono.ttf"
"#,
        )
        .unwrap();

        let config = load_config(&config_path).unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("out"));
        // Unspecified values should be defaults
        assert_eq!(config.paths.upload_dir, PathBuf::from("uploads"));
        // Tables merge key-by-key, so stock faces survive
        assert_eq!(config.fonts.faces.len(), 6);
        assert_eq!(config.fonts.faces["mono"], PathBuf::from("fonts/Mono.ttf"));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("retouch.toml");
        fs::write(&config_path, "[images\nquality = ").unwrap();
        assert!(matches!(load_config(&config_path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("retouch.toml");
        fs::write(&config_path, "[collage]\nrows = 0\n").unwrap();
        assert!(matches!(
            load_config(&config_path),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn default_processing_config() {
        let config = ProcessingConfig::default();
        assert_eq!(config.max_processes, None);
    }

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig {
            max_processes: None,
        };
        let threads = effective_threads(&config);
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(100_000),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str(r#"quality = 90"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"quality = 70"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("quality").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[images]
max_dimension = 1024
quality = 90
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[images]
quality = 70
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let images = merged.get("images").unwrap();
        assert_eq!(images.get("quality").unwrap().as_integer(), Some(70));
        assert_eq!(images.get("max_dimension").unwrap().as_integer(), Some(1024));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"exts = ["png", "jpg"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"exts = ["webp"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("exts").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r#"
[fonts.faces]
arimo = "a.ttf"
tinos = "t.ttf"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[fonts.faces]
arimo = "b.ttf"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let faces = merged.get("fonts").unwrap().get("faces").unwrap();
        assert_eq!(faces.get("arimo").unwrap().as_str(), Some("b.ttf"));
        assert_eq!(faces.get("tinos").unwrap().as_str(), Some("t.ttf"));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[images]
qualty = 90
"#;
        let result: Result<AppConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[imagez]\nquality = 90\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("retouch.toml");
        fs::write(&config_path, "[stamp]\nfont = \"x.ttf\"\n").unwrap();
        assert!(load_config(&config_path).is_err());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_boundaries() {
        let mut config = AppConfig::default();
        config.images.quality = 100;
        assert!(config.validate().is_ok());
        config.images.quality = 1;
        assert!(config.validate().is_ok());
        config.images.quality = 0;
        assert!(config.validate().is_err());
        config.images.quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_sizes() {
        let mut config = AppConfig::default();
        config.images.max_dimension = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.stamp.font_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.collage.cols = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_extensions_not_empty() {
        let mut config = AppConfig::default();
        config.images.allowed_extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_extension_without_codec() {
        let mut config = AppConfig::default();
        config.images.allowed_extensions.push("gif".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gif"));

        config.images.allowed_extensions = vec!["PNG".into(), "tiff".into(), "webp".into()];
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // resolve_config / load_raw_config tests
    // =========================================================================

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let result = load_raw_config(&tmp.path().join("retouch.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn resolve_config_with_overlay() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[images]\nquality = 70\n").unwrap();
        let config = resolve_config(base, Some(overlay)).unwrap();
        assert_eq!(config.images.quality, 70);
        // Other fields preserved from defaults
        assert_eq!(config.images.max_dimension, 1024);
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[images]\nquality = 200\n").unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[paths]",
            "[images]",
            "[text]",
            "[fonts]",
            "[fonts.faces]",
            "[stamp]",
            "[style]",
            "[collage]",
            "[processing]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        for key in ["paths", "images", "text", "fonts", "stamp", "style", "collage"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
