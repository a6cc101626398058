//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! photo.jpg → mnc
//!     Output: static/uploads/photo_mnc.jpg (1024x768)
//! ```
//!
//! ## Collage
//!
//! ```text
//! Collage 2x2 (4 images)
//!     Output: static/collages/collage.png (2048x1536)
//! ```
//!
//! With `--json` each command prints a single object instead:
//! `{"output": "..."}` or `{"collage": "..."}`.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::process::{CollageImage, ProcessedImage};
use std::path::Path;

fn output_line(path: &Path, (width, height): (u32, u32)) -> String {
    format!("    Output: {} ({width}x{height})", path.display())
}

/// Plain-text lines for a processed image.
pub fn format_processed(source_name: &str, result: &ProcessedImage) -> Vec<String> {
    vec![
        format!("{source_name} → {}", result.operation),
        output_line(&result.path, result.dimensions),
    ]
}

/// JSON for a processed image: `{"output": "<path>"}`.
pub fn format_processed_json(result: &ProcessedImage) -> String {
    serde_json::json!({ "output": result.path }).to_string()
}

pub fn print_processed(source_name: &str, result: &ProcessedImage, json: bool) {
    if json {
        println!("{}", format_processed_json(result));
        return;
    }
    for line in format_processed(source_name, result) {
        println!("{line}");
    }
}

/// Plain-text lines for a collage.
pub fn format_collage(result: &CollageImage) -> Vec<String> {
    let noun = if result.images_used == 1 { "image" } else { "images" };
    vec![
        format!(
            "Collage {}x{} ({} {noun})",
            result.rows, result.cols, result.images_used
        ),
        output_line(&result.path, result.dimensions),
    ]
}

/// JSON for a collage: `{"collage": "<path>"}`.
pub fn format_collage_json(result: &CollageImage) -> String {
    serde_json::json!({ "collage": result.path }).to_string()
}

pub fn print_collage(result: &CollageImage, json: bool) {
    if json {
        println!("{}", format_collage_json(result));
        return;
    }
    for line in format_collage(result) {
        println!("{line}");
    }
}

/// JSON for a failed request: `{"error": "<message>"}`.
pub fn format_error_json(err: &dyn std::error::Error) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn processed() -> ProcessedImage {
        ProcessedImage {
            output_name: "photo_mnc.jpg".into(),
            path: PathBuf::from("static/uploads/photo_mnc.jpg"),
            operation: "mnc".into(),
            dimensions: (1024, 768),
        }
    }

    fn collage(images_used: usize) -> CollageImage {
        CollageImage {
            path: PathBuf::from("static/collages/collage.png"),
            rows: 1,
            cols: images_used as u32,
            images_used,
            dimensions: (200, 100),
        }
    }

    #[test]
    fn processed_lines() {
        let lines = format_processed("photo.jpg", &processed());
        assert_eq!(
            lines,
            vec![
                "photo.jpg → mnc",
                "    Output: static/uploads/photo_mnc.jpg (1024x768)",
            ]
        );
    }

    #[test]
    fn processed_json_has_output_key() {
        let json: serde_json::Value =
            serde_json::from_str(&format_processed_json(&processed())).unwrap();
        assert_eq!(json["output"], "static/uploads/photo_mnc.jpg");
    }

    #[test]
    fn collage_lines_pluralize() {
        assert_eq!(format_collage(&collage(1))[0], "Collage 1x1 (1 image)");
        assert_eq!(format_collage(&collage(3))[0], "Collage 1x3 (3 images)");
        assert_eq!(
            format_collage(&collage(3))[1],
            "    Output: static/collages/collage.png (200x100)"
        );
    }

    #[test]
    fn collage_json_has_collage_key() {
        let json: serde_json::Value =
            serde_json::from_str(&format_collage_json(&collage(2))).unwrap();
        assert_eq!(json["collage"], "static/collages/collage.png");
    }

    #[test]
    fn error_json() {
        let err = std::io::Error::other("boom");
        let json: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(json["error"], "boom");
    }
}
