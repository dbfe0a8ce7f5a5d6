//! Generator registry.
//!
//! Formats are registered explicitly at construction time; nothing is
//! wired up through global state. The lock only exists so callers can
//! register custom generators after startup.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::application::ports::FileGenerator;
use crate::domain::file_type::FileType;
use crate::infrastructure::generators;

pub struct GeneratorRegistry {
    generators: RwLock<HashMap<FileType, Arc<dyn FileGenerator>>>,
}

impl GeneratorRegistry {
    /// An empty registry. Useful for tests that wire a single format.
    pub fn new() -> Self {
        Self {
            generators: RwLock::new(HashMap::new()),
        }
    }

    /// A registry with every built-in format wired up.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(FileType::Text, Arc::new(generators::text::TextGenerator));
        registry.register(FileType::Csv, Arc::new(generators::text::CsvGenerator));
        registry.register(FileType::Json, Arc::new(generators::text::JsonGenerator));
        registry.register(
            FileType::Html,
            Arc::new(generators::markup::HtmlGenerator),
        );
        registry.register(FileType::Xml, Arc::new(generators::markup::XmlGenerator));
        registry.register(FileType::Png, Arc::new(generators::png::PngGenerator));
        registry.register(FileType::Jpeg, Arc::new(generators::jpeg::JpegGenerator));
        registry.register(FileType::Gif, Arc::new(generators::gif::GifGenerator));
        registry.register(FileType::Wav, Arc::new(generators::wav::WavGenerator));
        registry.register(FileType::Mp4, Arc::new(generators::mp4::Mp4Generator));
        registry.register(FileType::Zip, Arc::new(generators::zip::ZipGenerator));
        registry.register(
            FileType::Xlsx,
            Arc::new(generators::office::XlsxGenerator),
        );
        registry.register(
            FileType::Docx,
            Arc::new(generators::office::DocxGenerator),
        );
        registry.register(FileType::Pdf, Arc::new(generators::pdf::PdfGenerator));
        registry.register(FileType::Dwg, Arc::new(generators::dwg::DwgGenerator));
        registry.register(FileType::Dxf, Arc::new(generators::dxf::DxfGenerator));
        registry
    }

    pub fn register(&self, file_type: FileType, generator: Arc<dyn FileGenerator>) {
        self.generators.write().insert(file_type, generator);
    }

    pub fn get(&self, file_type: FileType) -> Option<Arc<dyn FileGenerator>> {
        self.generators.read().get(&file_type).cloned()
    }

    pub fn supported(&self) -> Vec<FileType> {
        self.generators.read().keys().copied().collect()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
