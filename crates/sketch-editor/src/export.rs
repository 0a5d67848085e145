//! Image export: confirmation prompt, file naming, encoding.

use crate::surface::DrawingSurface;
use sketch_core::{CodecError, ImageFormat, encode_data_url};

/// A pending export. Nothing is encoded until the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    file_name: String,
    format: ImageFormat,
}

impl ExportRequest {
    pub const PROMPT: &'static str = "Do you want to save this image?";

    /// File name is `<timestamp_ms>.<ext>`.
    pub fn new(timestamp_ms: u64, format: ImageFormat) -> Self {
        Self {
            file_name: format!("{timestamp_ms}.{}", format.extension()),
            format,
        }
    }

    pub fn prompt(&self) -> &'static str {
        Self::PROMPT
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Encode the surface as it is now. Declining is simply dropping the
    /// request.
    pub fn confirm(self, surface: &DrawingSurface) -> Result<Export, CodecError> {
        let data_url = encode_data_url(surface.bitmap(), self.format)?;
        log::info!("exporting {} ({} bytes)", self.file_name, data_url.len());
        Ok(Export {
            file_name: self.file_name,
            data_url,
        })
    }
}

/// An encoded image ready to hand to the host's download mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub data_url: String,
}
