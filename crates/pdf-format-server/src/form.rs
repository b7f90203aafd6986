//! `POST /format` form decoding.

use crate::config::LayoutConfig;
use crate::error::{Result, ServiceError};
use axum::extract::Multipart;
use pdf_manuscript::{ExtractOptions, ManuscriptSource};
use pdf_typeset::{FrontMatter, TypesetOptions};
use std::collections::HashMap;

/// Raw multipart fields
#[derive(Debug, Default)]
pub struct FormFields {
    /// `(file name, bytes)` of the `file` part
    pub file: Option<(String, Vec<u8>)>,
    pub values: HashMap<String, String>,
}

impl FormFields {
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut fields = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ServiceError::InvalidInput(format!("Malformed form data: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ServiceError::InvalidInput(format!("Could not read upload: {}", e))
                })?;
                // Browsers send an empty part when no file was chosen
                if !file_name.is_empty() || !bytes.is_empty() {
                    fields.file = Some((file_name, bytes.to_vec()));
                }
                continue;
            }
            let value = field.text().await.map_err(|e| {
                ServiceError::InvalidInput(format!("Could not read field '{}': {}", name, e))
            })?;
            fields.values.insert(name, value);
        }
        Ok(fields)
    }

    pub fn with_value(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, file_name: &str, bytes: Vec<u8>) -> Self {
        self.file = Some((file_name.to_string(), bytes));
        self
    }

    fn text(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn number(&self, name: &str) -> Result<Option<f32>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw.parse::<f32>().map(Some).map_err(|_| {
                ServiceError::InvalidInput(format!("Field '{}' must be a number, got '{}'", name, raw))
            }),
        }
    }

    fn flag(&self, name: &str, default: bool) -> Result<bool> {
        let Some(raw) = self.text(name) else {
            return Ok(default);
        };
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(true),
            "false" | "0" | "off" | "no" => Ok(false),
            _ => Err(ServiceError::InvalidInput(format!(
                "Field '{}' must be true or false, got '{}'",
                name, raw
            ))),
        }
    }
}

/// A validated formatting request
#[derive(Debug, Clone)]
pub struct FormatRequest {
    pub source: ManuscriptSource,
    pub extract: ExtractOptions,
    pub options: TypesetOptions,
}

impl FormatRequest {
    pub async fn from_multipart(multipart: Multipart, layout: &LayoutConfig) -> Result<Self> {
        let fields = FormFields::read(multipart).await?;
        Self::from_fields(fields, layout)
    }

    /// Apply defaults and check that exactly one manuscript source is given
    pub fn from_fields(fields: FormFields, layout: &LayoutConfig) -> Result<Self> {
        let pasted = fields.text("pasted_text");
        let source = match (fields.file.clone(), pasted) {
            (Some(_), Some(_)) => {
                return Err(ServiceError::InvalidInput(
                    "Provide either a file or pasted text, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(ServiceError::InvalidInput(
                    "No manuscript provided: upload a .docx file or paste text".to_string(),
                ));
            }
            (Some((file_name, bytes)), None) => ManuscriptSource::from_upload(&file_name, bytes)?,
            (None, Some(text)) => ManuscriptSource::Text(text),
        };

        let defaults = TypesetOptions::default();
        let options = TypesetOptions {
            heading_font: fields.text("heading_font").unwrap_or(defaults.heading_font),
            body_font: fields.text("body_font").unwrap_or(defaults.body_font),
            heading_size: fields.number("heading_size")?.unwrap_or(defaults.heading_size),
            body_size: fields.number("body_size")?.unwrap_or(defaults.body_size),
            trim_size: fields.text("trim_size").unwrap_or(defaults.trim_size),
            strict_trim_size: layout.strict_trim_size,
            bleed: fields.flag("bleed", false)?,
            gutter_override_in: fields.number("gutter")?,
            generate_toc: fields.flag("generate_toc", false)?,
            drop_caps: fields.flag("drop_caps", layout.drop_caps)?,
            front_matter: FrontMatter {
                title: fields.text("book_title"),
                subtitle: fields.text("book_subtitle"),
                author: fields.text("author_name"),
                dedication: fields.text("dedication"),
                copyright: fields.text("copyright_notice"),
            },
            page_numbers: layout.page_numbers,
        };
        options.validate()?;

        Ok(Self {
            source,
            extract: ExtractOptions {
                drop_caps: options.drop_caps,
            },
            options,
        })
    }
}
