use crate::front_matter::FrontMatter;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const MIN_FONT_SIZE: f32 = 4.0;
const MAX_FONT_SIZE: f32 = 96.0;
const MAX_GUTTER_IN: f32 = 2.0;

/// Page number placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PageNumberOptions {
    pub enabled: bool,
    /// Leading pages left unnumbered; `None` skips the front matter
    pub skip_first: Option<usize>,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            skip_first: None,
        }
    }
}

/// Book typesetting configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TypesetOptions {
    // Fonts
    pub heading_font: String,
    pub body_font: String,
    pub heading_size: f32,
    pub body_size: f32,

    // Page
    pub trim_size: String,
    /// Reject trim sizes outside the table instead of using 6x9
    pub strict_trim_size: bool,
    pub bleed: bool,
    /// Replaces the page-count gutter table (inches)
    pub gutter_override_in: Option<f32>,

    // Content
    pub generate_toc: bool,
    pub drop_caps: bool,
    pub front_matter: FrontMatter,

    pub page_numbers: PageNumberOptions,
}

impl Default for TypesetOptions {
    fn default() -> Self {
        Self {
            heading_font: "Roboto-Regular".to_string(),
            body_font: "Roboto-Regular".to_string(),
            heading_size: 18.0,
            body_size: 12.0,
            trim_size: "6x9".to_string(),
            strict_trim_size: false,
            bleed: false,
            gutter_override_in: None,
            generate_toc: false,
            drop_caps: false,
            front_matter: FrontMatter::default(),
            page_numbers: PageNumberOptions::default(),
        }
    }
}

impl TypesetOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| TypesetError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TypesetError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.heading_font.trim().is_empty() || self.body_font.trim().is_empty() {
            return Err(TypesetError::Config("Font name must not be empty".to_string()));
        }

        for (name, size) in [("heading_size", self.heading_size), ("body_size", self.body_size)] {
            if !size.is_finite() || !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
                return Err(TypesetError::Config(format!(
                    "{} must be between {} and {} points, got {}",
                    name, MIN_FONT_SIZE, MAX_FONT_SIZE, size
                )));
            }
        }

        if let Some(gutter) = self.gutter_override_in {
            if !gutter.is_finite() || !(0.0..=MAX_GUTTER_IN).contains(&gutter) {
                return Err(TypesetError::Config(format!(
                    "Gutter must be between 0 and {} inches, got {}",
                    MAX_GUTTER_IN, gutter
                )));
            }
        }

        Ok(())
    }
}
