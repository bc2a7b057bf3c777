use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow, Context};
use log::{debug, info};
use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::file_utils::FileManager;
use crate::page_store;

// @module: Document splitting and per-page text extraction

// @const: Control characters that PDF extraction can leak into text
static NON_PRINTABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap()
});

// @struct: Splits a source document into single-page artifacts
pub struct DocumentSplitter {
    // @field: Path of the source document
    source: PathBuf,
    // @field: Base name for the per-page artifact family
    base_name: String,
}

impl DocumentSplitter {
    // @fn: Create a splitter for a source document with an explicit base name
    pub fn new<P: AsRef<Path>>(source: P, base_name: impl Into<String>) -> Self {
        DocumentSplitter {
            source: source.as_ref().to_path_buf(),
            base_name: base_name.into(),
        }
    }

    // @fn: Create a splitter deriving the base name from the file stem
    pub fn from_path<P: AsRef<Path>>(source: P) -> Result<Self> {
        let source = source.as_ref();
        let base_name = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Cannot derive a base name from {:?}", source))?
            .to_string();

        Ok(Self::new(source, base_name))
    }

    // @fn: Base name of the artifact family
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    // @fn: Write one single-page PDF per source page into the pages directory
    //
    // Page files follow the artifact naming scheme with 1-based indices.
    pub fn split_into_pages<P: AsRef<Path>>(&self, pages_dir: P) -> Result<Vec<PathBuf>> {
        let pages_dir = pages_dir.as_ref();
        FileManager::ensure_dir(pages_dir)?;

        let document = Document::load(&self.source)
            .with_context(|| format!("Failed to load document: {:?}", self.source))?;

        let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
        if page_numbers.is_empty() {
            return Err(anyhow!("Document has no pages: {:?}", self.source));
        }

        let mut written = Vec::with_capacity(page_numbers.len());
        for &number in &page_numbers {
            let mut single = document.clone();
            let others: Vec<u32> = page_numbers.iter().filter(|&&p| p != number).copied().collect();
            single.delete_pages(&others);
            single.prune_objects();

            let path = pages_dir.join(page_store::page_file_name(&self.base_name, number, "pdf"));
            single.save(&path)
                .with_context(|| format!("Failed to write page file: {:?}", path))?;
            debug!("Wrote page {} to {}", number, path.display());
            written.push(path);
        }

        info!("Split {} into {} pages", self.source.display(), written.len());
        Ok(written)
    }

    // @fn: Extract text from every single-page PDF into the text directory
    //
    // Each text file shares its stem with the page PDF. Extracted text is
    // trimmed; a page with no extractable text produces an empty file.
    pub fn extract_pages_text<P1: AsRef<Path>, P2: AsRef<Path>>(pages_dir: P1, text_dir: P2) -> Result<Vec<PathBuf>> {
        let pages_dir = pages_dir.as_ref();
        let text_dir = text_dir.as_ref();
        FileManager::ensure_dir(text_dir)?;

        let page_files = FileManager::find_files(pages_dir, "pdf")?;
        let mut written = Vec::with_capacity(page_files.len());

        for page_file in &page_files {
            let raw = pdf_extract::extract_text(page_file)
                .with_context(|| format!("Failed to extract text from {:?}", page_file))?;
            let text = NON_PRINTABLE.replace_all(&raw, "");
            let text = text.trim();

            if text.is_empty() {
                debug!("No extractable text in {}", page_file.display());
            }

            let stem = page_file
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| anyhow!("Page file has no stem: {:?}", page_file))?;
            let path = text_dir.join(format!("{}.txt", stem));
            FileManager::write_to_file(&path, text)?;
            written.push(path);
        }

        info!("Extracted text from {} page files", written.len());
        Ok(written)
    }
}
