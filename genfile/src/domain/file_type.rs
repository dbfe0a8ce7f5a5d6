use std::path::Path;

use crate::domain::errors::GenError;

/// Output formats the service can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Text,
    Csv,
    Json,
    Html,
    Xml,
    Png,
    Jpeg,
    Gif,
    Wav,
    Mp4,
    Zip,
    Xlsx,
    Docx,
    Pdf,
    Dwg,
    Dxf,
}

impl FileType {
    /// Map a file extension to its format. Extensions are matched
    /// case-insensitively; `log` and `md` are plain text.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "log" | "md" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            "xml" => Some(Self::Xml),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "wav" => Some(Self::Wav),
            "mp4" | "m4v" => Some(Self::Mp4),
            "zip" => Some(Self::Zip),
            "xlsx" => Some(Self::Xlsx),
            "docx" => Some(Self::Docx),
            "pdf" => Some(Self::Pdf),
            "dwg" => Some(Self::Dwg),
            "dxf" => Some(Self::Dxf),
            _ => None,
        }
    }

    /// Resolve the format for an output path from its extension.
    pub fn from_path(path: &Path) -> Result<Self, GenError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| GenError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(ext).ok_or_else(|| GenError::UnsupportedFormat(ext.to_string()))
    }
}
