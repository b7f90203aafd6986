use crate::constants::*;
use crate::types::*;

/// A supported book trim size
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrimSize {
    pub width_in: f32,
    pub height_in: f32,
    /// Typical words per page at default sizes, for page estimates
    pub words_per_page: usize,
}

const fn trim(width_in: f32, height_in: f32, words_per_page: usize) -> TrimSize {
    TrimSize {
        width_in,
        height_in,
        words_per_page,
    }
}

/// Supported trim sizes (width × height, inches)
pub const TRIM_SIZES: [TrimSize; 16] = [
    trim(5.0, 8.0, 250),
    trim(5.06, 7.81, 245),
    trim(5.25, 8.0, 265),
    trim(5.5, 8.5, 290),
    trim(6.0, 9.0, 330),
    trim(6.14, 9.21, 345),
    trim(6.69, 9.61, 390),
    trim(7.0, 10.0, 430),
    trim(7.44, 9.69, 450),
    trim(7.5, 9.25, 445),
    trim(8.0, 10.0, 500),
    trim(8.25, 6.0, 330),
    trim(8.25, 8.25, 440),
    trim(8.5, 8.5, 460),
    trim(8.5, 11.0, 600),
    trim(8.25, 10.5, 560),
];

/// Trim used when the requested size cannot be resolved
pub const DEFAULT_TRIM: TrimSize = trim(6.0, 9.0, 330);

impl Default for TrimSize {
    fn default() -> Self {
        DEFAULT_TRIM
    }
}

impl TrimSize {
    pub fn width_pt(&self) -> f32 {
        in_to_pt(self.width_in)
    }

    pub fn height_pt(&self) -> f32 {
        in_to_pt(self.height_in)
    }

    /// Short label such as `6x9` or `6.14x9.21`
    pub fn label(&self) -> String {
        format!("{}x{}", self.width_in, self.height_in)
    }

    fn matches(&self, width_in: f32, height_in: f32) -> bool {
        (self.width_in - width_in).abs() <= TRIM_TOLERANCE_IN
            && (self.height_in - height_in).abs() <= TRIM_TOLERANCE_IN
    }
}

/// Reduce a free-form trim string to `<width>x<height>`.
///
/// Lowercases, maps `×`, `*` and `by` to `x`, and drops quotes, units,
/// binding words, brackets, whitespace and other punctuation. Returns the
/// cleaned string and whether the input was in centimeters.
pub fn normalize_trim_input(raw: &str) -> (String, bool) {
    let mut s = raw.trim().to_lowercase();
    for word in ["hardcover", "paperback"] {
        s = s.replace(word, " ");
    }
    let centimeters = s.contains("cm");
    for unit in ["inches", "inch", "cm", "in"] {
        s = s.replace(unit, " ");
    }
    s = s.replace(['×', '*'], "x").replace("by", "x");

    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == 'x')
        .collect();
    (cleaned, centimeters)
}

/// Look a trim string up in the table
pub fn parse_trim(raw: &str) -> Option<TrimSize> {
    let (cleaned, centimeters) = normalize_trim_input(raw);
    let mut parts = cleaned.split('x').filter(|p| !p.is_empty());
    let width: f32 = parts.next()?.trim_matches('.').parse().ok()?;
    let height: f32 = parts.next()?.trim_matches('.').parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let (width, height) = if centimeters {
        (width / CM_PER_INCH, height / CM_PER_INCH)
    } else {
        (width, height)
    };

    TRIM_SIZES.iter().copied().find(|t| t.matches(width, height))
}

/// Resolve a requested trim, falling back to 6×9 unless `strict` is set.
pub fn resolve_trim_size(raw: &str, strict: bool) -> Result<TrimSize> {
    match parse_trim(raw) {
        Some(trim) => Ok(trim),
        None if strict => Err(TypesetError::InvalidInput(format!(
            "Unsupported trim size '{}'",
            raw
        ))),
        None => {
            log::warn!(
                "Unrecognized trim size '{}', using {}",
                raw,
                DEFAULT_TRIM.label()
            );
            Ok(DEFAULT_TRIM)
        }
    }
}
