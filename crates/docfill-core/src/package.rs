//! In-memory view of a `.docx` package.
//!
//! The whole archive is read when the package is opened and the file
//! handle is dropped before `open` returns. Only the main document part
//! is exposed as text; every other part is carried through `save`
//! unchanged.

use std::fs::File;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{DocfillError, Result};

/// Name of the WordprocessingML main document part.
pub const MAIN_DOCUMENT_PART: &str = "word/document.xml";

struct Part {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// An opened document package.
pub struct TemplatePackage {
    path: PathBuf,
    parts: Vec<Part>,
    main_xml: String,
    modified: bool,
}

impl TemplatePackage {
    /// Read the package at `path` into memory.
    ///
    /// Anything that keeps the file from being used as a Word package
    /// (missing file, not a zip, no main part, main part not UTF-8) is
    /// reported as [`DocfillError::DocumentOpen`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DocfillError::open(path, e))?;
        let mut archive = ZipArchive::new(file).map_err(|e| DocfillError::open(path, e))?;

        let mut parts = Vec::with_capacity(archive.len());
        let mut main_xml = None;
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| DocfillError::open(path, e))?;
            let name = entry.name().to_string();
            if entry.is_dir() {
                parts.push(Part {
                    name,
                    data: Vec::new(),
                    is_dir: true,
                });
                continue;
            }

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| DocfillError::open(path, e))?;
            if name == MAIN_DOCUMENT_PART {
                let text = std::str::from_utf8(&data).map_err(|e| {
                    DocfillError::open(path, format!("{} is not UTF-8: {}", MAIN_DOCUMENT_PART, e))
                })?;
                main_xml = Some(text.trim_start_matches('\u{feff}').to_string());
            }
            parts.push(Part {
                name,
                data,
                is_dir: false,
            });
        }

        let main_xml = main_xml.ok_or_else(|| {
            DocfillError::open(path, format!("part '{}' not found", MAIN_DOCUMENT_PART))
        })?;

        debug!("Opened package {:?} ({} parts)", path, parts.len());
        Ok(Self {
            path: path.to_path_buf(),
            parts,
            main_xml,
            modified: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text of `word/document.xml`.
    pub fn main_document(&self) -> &str {
        &self.main_xml
    }

    pub fn replace_main_document(&mut self, xml: String) {
        self.main_xml = xml;
        self.modified = true;
    }

    /// Whether the main document was replaced since the package was opened.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Names of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Write the package to `path`, creating or truncating it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            if part.is_dir {
                writer.add_directory(part.name.as_str(), options)?;
                continue;
            }
            writer.start_file(part.name.as_str(), options)?;
            if part.name == MAIN_DOCUMENT_PART && self.modified {
                writer.write_all(self.main_xml.as_bytes())?;
            } else {
                writer.write_all(&part.data)?;
            }
        }
        writer.finish()?;

        info!("Saved package {:?} to {:?}", self.path, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = ZipWriter::new(file);
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = TemplatePackage::open(temp_dir.path().join("nope.docx")).err().unwrap();
        assert!(matches!(err, DocfillError::DocumentOpen { .. }));
    }

    #[test]
    fn test_open_not_a_zip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.docx");
        std::fs::write(&path, "just text").unwrap();

        let err = TemplatePackage::open(&path).err().unwrap();
        assert!(matches!(err, DocfillError::DocumentOpen { .. }));
    }

    #[test]
    fn test_open_without_main_part() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.docx");
        write_zip(&path, &[("[Content_Types].xml", "<Types/>")]);

        let err = TemplatePackage::open(&path).err().unwrap();
        assert!(err.to_string().contains(MAIN_DOCUMENT_PART));
    }

    #[test]
    fn test_save_keeps_part_order() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src.docx");
        write_zip(
            &src,
            &[
                ("[Content_Types].xml", "<Types/>"),
                (MAIN_DOCUMENT_PART, "<w:document/>"),
                ("word/styles.xml", "<w:styles/>"),
            ],
        );

        let mut package = TemplatePackage::open(&src).unwrap();
        assert_eq!(package.path(), src.as_path());
        assert!(!package.is_modified());
        package.replace_main_document("<w:document>changed</w:document>".to_string());
        assert!(package.is_modified());

        let dst = temp_dir.path().join("out/dst.docx");
        package.save(&dst).unwrap();

        let reopened = TemplatePackage::open(&dst).unwrap();
        let names: Vec<&str> = reopened.part_names().collect();
        assert_eq!(names, vec!["[Content_Types].xml", MAIN_DOCUMENT_PART, "word/styles.xml"]);
        assert_eq!(reopened.main_document(), "<w:document>changed</w:document>");
    }
}
