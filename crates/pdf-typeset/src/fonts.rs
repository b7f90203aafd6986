//! Font registry.
//!
//! Built once at start-up and shared read-only. It holds the PDF base-14 text
//! faces, every `.ttf`/`.otf` file of a fonts directory, and name aliases.
//! Lookups of unknown names fail instead of substituting another family.

use crate::constants::*;
use crate::types::*;
use printpdf::BuiltinFont;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Weight suffixes stripped from font file names (`Roboto-400.ttf` → `Roboto`)
const WEIGHT_SUFFIXES: [&str; 9] = [
    "100", "200", "300", "400", "500", "600", "700", "800", "900",
];

/// Glyph advances of a face, as fractions of the em
#[derive(Debug, Clone)]
struct Advances {
    by_char: HashMap<char, f32>,
    fallback: f32,
}

impl Advances {
    fn from_face(bytes: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(bytes, 0).ok()?;
        let units = f32::from(face.units_per_em().max(1));

        let ranges = [
            (0x20u32, 0x2FFu32),
            (0x2000, 0x206F),
            (0x20AC, 0x20AC),
            (0x2122, 0x2122),
        ];
        let mut by_char = HashMap::new();
        for (start, end) in ranges {
            for code in start..=end {
                let Some(ch) = char::from_u32(code) else {
                    continue;
                };
                let advance = face
                    .glyph_index(ch)
                    .and_then(|id| face.glyph_hor_advance(id));
                if let Some(advance) = advance {
                    by_char.insert(ch, f32::from(advance) / units);
                }
            }
        }
        if by_char.is_empty() {
            return None;
        }

        let fallback = match by_char.get(&'n') {
            Some(advance) => *advance,
            None => by_char.values().sum::<f32>() / by_char.len() as f32,
        };
        Some(Self { by_char, fallback })
    }

    /// Metrics of a base-14 face, read from the subset program printpdf ships
    fn from_builtin(font: BuiltinFont) -> Option<Self> {
        let mut advances = Self::from_face(&font.get_subset_font().bytes)?;
        // The subset programs carry no space glyph
        let space = builtin_space_advance(font);
        advances.by_char.insert(' ', space);
        advances.by_char.insert('\u{a0}', space);
        Some(advances)
    }

    fn width(&self, ch: char) -> f32 {
        self.by_char.get(&ch).copied().unwrap_or(self.fallback)
    }
}

/// Space advance of the base-14 faces, from their AFM metrics
fn builtin_space_advance(font: BuiltinFont) -> f32 {
    use BuiltinFont::*;
    match font {
        Courier | CourierBold | CourierOblique | CourierBoldOblique => COURIER_SPACE_EM,
        TimesRoman | TimesBold | TimesItalic | TimesBoldItalic => TIMES_SPACE_EM,
        _ => HELVETICA_SPACE_EM,
    }
}

#[derive(Debug, Clone)]
pub enum FontSource {
    Builtin(BuiltinFont),
    Embedded {
        bytes: Arc<Vec<u8>>,
        path: Option<PathBuf>,
    },
}

/// A face that can be used for measuring and drawing text
#[derive(Debug, Clone)]
pub struct RegisteredFont {
    pub name: String,
    pub source: FontSource,
    advances: Advances,
}

impl RegisteredFont {
    pub fn is_builtin(&self) -> bool {
        matches!(self.source, FontSource::Builtin(_))
    }

    /// File the face was loaded from, for faces registered from a directory
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FontSource::Embedded { path, .. } => path.as_deref(),
            FontSource::Builtin(_) => None,
        }
    }

    /// Width of `text` at `size` points
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.advances.width(ch)).sum::<f32>() * size
    }

    /// Whether the face has a glyph for `ch`
    pub fn supports(&self, ch: char) -> bool {
        self.advances.by_char.contains_key(&ch)
    }
}

/// Base-14 text faces: (name, regular, bold, italic, bold italic)
const BUILTIN_FAMILIES: [(&str, [(&str, BuiltinFont); 4]); 3] = [
    (
        "Helvetica",
        [
            ("Helvetica", BuiltinFont::Helvetica),
            ("Helvetica-Bold", BuiltinFont::HelveticaBold),
            ("Helvetica-Oblique", BuiltinFont::HelveticaOblique),
            ("Helvetica-BoldOblique", BuiltinFont::HelveticaBoldOblique),
        ],
    ),
    (
        "Times-Roman",
        [
            ("Times-Roman", BuiltinFont::TimesRoman),
            ("Times-Bold", BuiltinFont::TimesBold),
            ("Times-Italic", BuiltinFont::TimesItalic),
            ("Times-BoldItalic", BuiltinFont::TimesBoldItalic),
        ],
    ),
    (
        "Courier",
        [
            ("Courier", BuiltinFont::Courier),
            ("Courier-Bold", BuiltinFont::CourierBold),
            ("Courier-Oblique", BuiltinFont::CourierOblique),
            ("Courier-BoldOblique", BuiltinFont::CourierBoldOblique),
        ],
    ),
];

/// Strip the extension and a trailing `-<weight>` from a font file name
pub fn font_name_from_file(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    for weight in WEIGHT_SUFFIXES {
        if let Some(base) = stem.strip_suffix(&format!("-{}", weight)) {
            return Some(base.to_string());
        }
    }
    Some(stem.to_string())
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}

/// Immutable set of fonts available to the renderer
#[derive(Debug, Clone, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, RegisteredFont>,
    aliases: HashMap<String, String>,
}

impl FontRegistry {
    /// Registry holding only the base-14 text faces
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for (_, faces) in BUILTIN_FAMILIES {
            for (name, font) in faces {
                let Some(advances) = Advances::from_builtin(font) else {
                    log::warn!("No metrics for builtin font {}, skipping", name);
                    continue;
                };
                registry.fonts.insert(
                    name.to_string(),
                    RegisteredFont {
                        name: name.to_string(),
                        source: FontSource::Builtin(font),
                        advances,
                    },
                );
            }
        }
        registry
    }

    /// Register a TrueType/OpenType face from memory
    pub fn with_font_bytes(mut self, name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        self.insert_embedded(name, bytes, None)?;
        Ok(self)
    }

    fn insert_embedded(&mut self, name: String, bytes: Vec<u8>, path: Option<PathBuf>) -> Result<()> {
        let advances = Advances::from_face(&bytes)
            .ok_or_else(|| TypesetError::Font(format!("Could not parse font '{}'", name)))?;
        let mut warnings = Vec::new();
        if printpdf::ParsedFont::from_bytes(&bytes, 0, &mut warnings).is_none() {
            return Err(TypesetError::Font(format!(
                "Font '{}' cannot be embedded in a PDF",
                name
            )));
        }
        match &path {
            Some(path) => log::info!("Registered font: {} ({})", name, path.display()),
            None => log::info!("Registered font: {}", name),
        }
        self.fonts.insert(
            name.clone(),
            RegisteredFont {
                name,
                source: FontSource::Embedded {
                    bytes: Arc::new(bytes),
                    path,
                },
                advances,
            },
        );
        Ok(())
    }

    /// Register every `.ttf`/`.otf` file in `dir`.
    ///
    /// Files that fail to parse are logged and skipped; a missing directory is
    /// not an error.
    pub fn with_font_dir(mut self, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            log::warn!("No fonts directory found at {}", dir.display());
            return Ok(self);
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_font_file(p))
            .collect();
        paths.sort();

        for path in paths {
            let Some(name) = font_name_from_file(&path) else {
                continue;
            };
            let bytes = std::fs::read(&path)?;
            if let Err(e) = self.insert_embedded(name.clone(), bytes, Some(path.clone())) {
                log::warn!("Could not register font {} ({}): {}", name, path.display(), e);
            }
        }
        Ok(self)
    }

    /// Make `alias` resolve to an already registered `target`
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Result<Self> {
        let alias = alias.into();
        let target = target.into();
        if !self.fonts.contains_key(&target) {
            return Err(TypesetError::FontNotRegistered(target));
        }
        if self.fonts.contains_key(&alias) {
            log::debug!("Alias {} shadows a registered font, keeping the font", alias);
            return Ok(self);
        }
        self.aliases.insert(alias, target);
        Ok(self)
    }

    /// Build the registry off the async runtime
    pub async fn load(
        font_dir: Option<PathBuf>,
        aliases: Vec<(String, String)>,
    ) -> Result<Self> {
        tokio::task::spawn_blocking(move || {
            let mut registry = Self::builtin();
            if let Some(dir) = font_dir {
                registry = registry.with_font_dir(dir)?;
            }
            for (alias, target) in aliases {
                registry = registry.with_alias(alias, target)?;
            }
            Ok(registry)
        })
        .await?
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered face behind `name` when `name` is an alias
    pub fn alias_target(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredFont> {
        let key = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.fonts.get(key)
    }

    /// Look a family up, failing for names that were never registered
    pub fn resolve(&self, name: &str) -> Result<&RegisteredFont> {
        self.get(name)
            .ok_or_else(|| TypesetError::FontNotRegistered(name.to_string()))
    }

    /// Pick the bold/italic face of a family, or the family's own face when
    /// the variant is not registered.
    pub fn face(&self, family: &str, bold: bool, italic: bool) -> Result<&RegisteredFont> {
        let base = self.resolve(family)?;
        if !bold && !italic {
            return Ok(base);
        }

        if let FontSource::Builtin(font) = &base.source {
            let variant = BUILTIN_FAMILIES
                .iter()
                .find(|(_, faces)| faces.iter().any(|(_, f)| f == font))
                .map(|(_, faces)| {
                    let index = match (bold, italic) {
                        (true, true) => 3,
                        (false, true) => 2,
                        _ => 1,
                    };
                    faces[index].0
                });
            return Ok(variant.and_then(|name| self.fonts.get(name)).unwrap_or(base));
        }

        let stem = base
            .name
            .strip_suffix("-Regular")
            .unwrap_or(base.name.as_str());
        let candidates: &[&str] = match (bold, italic) {
            (true, true) => &["BoldItalic", "Bold Italic", "BoldOblique"],
            (true, false) => &["Bold"],
            _ => &["Italic", "Oblique"],
        };
        let variant = candidates
            .iter()
            .find_map(|suffix| self.fonts.get(&format!("{}-{}", stem, suffix)));
        match variant {
            Some(face) => Ok(face),
            None => {
                log::debug!(
                    "No bold={} italic={} face for {}, using regular",
                    bold,
                    italic,
                    base.name
                );
                Ok(base)
            }
        }
    }

    /// Registered face names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fonts
            .keys()
            .chain(self.aliases.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}
