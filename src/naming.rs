//! Output filename derivation.
//!
//! A processed image is named after its source with the operation code
//! inserted before the extension:
//! - `photo.jpg` + `mnc` → `photo_mnc.jpg`
//! - `archive.tar.gz` + `rtr` → `archive.tar_rtr.gz`
//! - `README` + `txt` → `README_txt`
//! - `.hidden` + `crd` → `.hidden_crd` (a leading dot does not start an extension)

use crate::imaging::OperationCode;

/// Split a name into `(stem, extension)`, the extension keeping its dot.
///
/// Only the last path component is searched for the extension, and leading
/// dots in that component are not treated as extension separators.
pub fn split_extension(name: &str) -> (&str, &str) {
    let base_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let base = &name[base_start..];
    let leading_dots = base.len() - base.trim_start_matches('.').len();

    match base.rfind('.') {
        Some(dot) if dot >= leading_dots => name.split_at(base_start + dot),
        _ => (name, ""),
    }
}

/// Name of the output produced by `op` for `source_name`.
pub fn output_name(source_name: &str, op: OperationCode) -> String {
    let (stem, ext) = split_extension(source_name);
    format!("{stem}_{}{ext}", op.code())
}

/// Whether `name` carries one of the `allowed` extensions (case-insensitive,
/// given without the dot).
pub fn is_allowed_extension(name: &str, allowed: &[String]) -> bool {
    let (_, ext) = split_extension(name);
    let Some(ext) = ext.strip_prefix('.') else {
        return false;
    };
    allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))
}
