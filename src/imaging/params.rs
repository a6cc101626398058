//! Parameter types for image operations.
//!
//! These types describe *what* to do, not *how* to do it. Raw caller input
//! (strings from a form or the command line) is coerced here, so the
//! default-versus-fail rule for each field lives in one place:
//!
//! | Field | Absent / malformed |
//! |---|---|
//! | operation code | [`ImagingError::UnsupportedOperation`] |
//! | text | [`ImagingError::InvalidParameter`] |
//! | x, y | [`ImagingError::InvalidParameter`] |
//! | font size | falls back to the default size (20) |
//! | color | absent → default color (black); malformed → [`ImagingError::InvalidParameter`] |
//! | font key | unknown → default font (resolved by [`FontLibrary`](super::text::FontLibrary)) |

use super::error::ImagingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of operations the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationCode {
    /// `txt`: free text at a caller-given position.
    TextOverlay,
    /// `anm`: neural style transfer.
    NeuralStyle,
    /// `mnc`: grayscale conversion.
    Monochrome,
    /// `crd`: tinted overlay + contrast + saturation.
    CardGrade,
    /// `rtr`: sepia matrix.
    Vintage,
    /// `dnt`: rotated weekday/day-of-month stamp.
    DayDateStamp,
}

impl OperationCode {
    pub const ALL: [OperationCode; 6] = [
        Self::TextOverlay,
        Self::NeuralStyle,
        Self::Monochrome,
        Self::CardGrade,
        Self::Vintage,
        Self::DayDateStamp,
    ];

    /// Short tag used on the wire and as the output filename suffix.
    pub fn code(self) -> &'static str {
        match self {
            Self::TextOverlay => "txt",
            Self::NeuralStyle => "anm",
            Self::Monochrome => "mnc",
            Self::CardGrade => "crd",
            Self::Vintage => "rtr",
            Self::DayDateStamp => "dnt",
        }
    }
}

impl FromStr for OperationCode {
    type Err = ImagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.code() == s)
            .ok_or_else(|| ImagingError::UnsupportedOperation(s.to_string()))
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An opaque RGB color.
///
/// Parsed from `#rgb`, `#rrggbb` or one of a handful of CSS color names.
/// Serializes as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    pub fn to_rgb(self) -> image::Rgb<u8> {
        image::Rgb(self.0)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        let [r, g, b] = self.0;
        image::Rgba([r, g, b, 255])
    }
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

impl FromStr for Color {
    type Err = ImagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || ImagingError::invalid("color", format!("'{s}' is not a color"));

        if let Some(hex) = s.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(malformed());
            }
            let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| malformed());
            return match hex.len() {
                6 => Ok(Color([
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                ])),
                // #abc is shorthand for #aabbcc
                3 => Ok(Color([
                    channel(&hex[0..1])? * 17,
                    channel(&hex[1..2])? * 17,
                    channel(&hex[2..3])? * 17,
                ])),
                _ => Err(malformed()),
            };
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|&(_, rgb)| Color(rgb))
            .ok_or_else(malformed)
    }
}

impl TryFrom<String> for Color {
    type Error = ImagingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        let [r, g, b] = color.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Fallbacks applied while coercing [`TextParams`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDefaults {
    pub size: u32,
    pub color: Color,
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            size: 20,
            color: Color::BLACK,
        }
    }
}

/// Raw text-overlay parameters, exactly as the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextParams {
    pub text: Option<String>,
    pub font: Option<String>,
    pub font_size: Option<String>,
    pub color: Option<String>,
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Validated text-overlay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOverlay {
    pub text: String,
    /// Symbolic font key; `None` selects the default font.
    pub font: Option<String>,
    pub size: u32,
    pub color: Color,
    pub x: i32,
    pub y: i32,
}

impl TextParams {
    /// Coerce raw parameters into a [`TextOverlay`].
    ///
    /// See the [module docs](self) for which fields fail and which fall back.
    pub fn resolve(&self, defaults: TextDefaults) -> Result<TextOverlay, ImagingError> {
        let text = match self.text.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(ImagingError::invalid("text", "text is required")),
        };

        let color = match self.color.as_deref().map(str::trim) {
            None | Some("") => defaults.color,
            Some(raw) => raw.parse()?,
        };

        Ok(TextOverlay {
            text,
            font: self.font.clone().filter(|f| !f.is_empty()),
            size: coerce_font_size(self.font_size.as_deref(), defaults.size),
            color,
            x: parse_position("x", self.x.as_deref())?,
            y: parse_position("y", self.y.as_deref())?,
        })
    }
}

/// Parse a font size, falling back to `default` unless it is a positive integer.
pub fn coerce_font_size(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&size| size > 0)
        .unwrap_or(default)
}

fn parse_position(name: &'static str, raw: Option<&str>) -> Result<i32, ImagingError> {
    let raw = raw.ok_or_else(|| ImagingError::invalid(name, "position is required"))?;
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ImagingError::invalid(name, format!("'{raw}' is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(text: &str, x: &str, y: &str) -> TextParams {
        TextParams {
            text: Some(text.into()),
            x: Some(x.into()),
            y: Some(y.into()),
            ..TextParams::default()
        }
    }

    #[test]
    fn operation_codes_roundtrip() {
        for op in OperationCode::ALL {
            assert_eq!(op.code().parse::<OperationCode>().unwrap(), op);
            assert_eq!(op.to_string(), op.code());
        }
    }

    #[test]
    fn unknown_operation_code_is_unsupported() {
        for code in ["", "xyz", "MNC", "txt "] {
            let err = code.parse::<OperationCode>().unwrap_err();
            assert!(matches!(err, ImagingError::UnsupportedOperation(ref c) if c == code));
        }
    }

    #[test]
    fn color_parses_hex_forms() {
        assert_eq!("#7fbbe3".parse::<Color>().unwrap(), Color([127, 187, 227]));
        assert_eq!("#FFF".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!(" #000000 ".parse::<Color>().unwrap(), Color::BLACK);
    }

    #[test]
    fn color_parses_names() {
        assert_eq!("Red".parse::<Color>().unwrap(), Color([255, 0, 0]));
    }

    #[test]
    fn color_rejects_malformed() {
        for raw in ["#12345", "#ggg", "banana", "#", "123456"] {
            assert!(
                matches!(
                    raw.parse::<Color>(),
                    Err(ImagingError::InvalidParameter { name: "color", .. })
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn color_serializes_as_hex() {
        assert_eq!(String::from(Color([1, 171, 255])), "#01abff");
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn font_size_falls_back_unless_positive_integer() {
        assert_eq!(coerce_font_size(Some("32"), 20), 32);
        assert_eq!(coerce_font_size(Some(" 12 "), 20), 12);
        assert_eq!(coerce_font_size(Some("0"), 20), 20);
        assert_eq!(coerce_font_size(Some("-4"), 20), 20);
        assert_eq!(coerce_font_size(Some("big"), 20), 20);
        assert_eq!(coerce_font_size(Some("12.5"), 20), 20);
        assert_eq!(coerce_font_size(None, 20), 20);
    }

    #[test]
    fn resolve_applies_defaults() {
        let overlay = params("hello", "10", "-5").resolve(TextDefaults::default()).unwrap();
        assert_eq!(overlay.text, "hello");
        assert_eq!(overlay.size, 20);
        assert_eq!(overlay.color, Color::BLACK);
        assert_eq!((overlay.x, overlay.y), (10, -5));
        assert_eq!(overlay.font, None);
    }

    #[test]
    fn resolve_empty_color_uses_default() {
        let mut p = params("hi", "0", "0");
        p.color = Some(String::new());
        assert_eq!(p.resolve(TextDefaults::default()).unwrap().color, Color::BLACK);
    }

    #[test]
    fn resolve_keeps_supplied_values() {
        let mut p = params("hi", "3", "4");
        p.font = Some("anton".into());
        p.font_size = Some("48".into());
        p.color = Some("#ff0000".into());
        let overlay = p.resolve(TextDefaults::default()).unwrap();
        assert_eq!(overlay.font.as_deref(), Some("anton"));
        assert_eq!(overlay.size, 48);
        assert_eq!(overlay.color, Color([255, 0, 0]));
    }

    #[test]
    fn resolve_missing_text_is_error() {
        let mut p = params("", "0", "0");
        assert!(matches!(
            p.resolve(TextDefaults::default()),
            Err(ImagingError::InvalidParameter { name: "text", .. })
        ));
        p.text = None;
        assert!(p.resolve(TextDefaults::default()).is_err());
    }

    #[test]
    fn resolve_bad_position_is_error() {
        assert!(matches!(
            params("hi", "ten", "0").resolve(TextDefaults::default()),
            Err(ImagingError::InvalidParameter { name: "x", .. })
        ));
        let mut p = params("hi", "0", "0");
        p.y = None;
        assert!(matches!(
            p.resolve(TextDefaults::default()),
            Err(ImagingError::InvalidParameter { name: "y", .. })
        ));
    }

    #[test]
    fn resolve_malformed_color_is_error() {
        let mut p = params("hi", "0", "0");
        p.color = Some("not-a-color".into());
        assert!(matches!(
            p.resolve(TextDefaults::default()),
            Err(ImagingError::InvalidParameter { name: "color", .. })
        ));
    }
}
