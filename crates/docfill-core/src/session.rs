//! Session records and their XML snapshot.
//!
//! A session is the list of templates picked during one run. It starts
//! empty at every launch; snapshots are written on shutdown and never
//! read back by the program.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{DocfillError, Result};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// A template picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "TemplatePath")]
    pub template_path: String,
}

impl DocumentRecord {
    pub fn new(name: impl Into<String>, template_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_path: template_path.into(),
        }
    }

    /// Record for a selected file, named after its file stem.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, path.to_string_lossy())
    }

    pub fn path(&self) -> &Path {
        Path::new(&self.template_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct DocumentList {
    #[serde(rename = "Document", default)]
    items: Vec<DocumentRecord>,
}

/// Templates picked during this run, in selection order.
/// Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename = "DocumentData")]
pub struct SessionState {
    #[serde(rename = "Documents", default)]
    documents: DocumentList,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return its index.
    pub fn add(&mut self, record: DocumentRecord) -> usize {
        self.documents.items.push(record);
        self.documents.items.len() - 1
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents.items
    }

    pub fn get(&self, index: usize) -> Option<&DocumentRecord> {
        self.documents.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.documents.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.items.is_empty()
    }
}

/// `output_<uuid>.xml`
pub fn snapshot_file_name() -> String {
    format!("output_{}.xml", Uuid::new_v4())
}

/// Render the session as an indented XML document.
pub fn to_xml(state: &SessionState) -> Result<String> {
    let mut body = String::new();
    let mut ser = quick_xml::se::Serializer::new(&mut body);
    ser.indent(' ', 2);
    state
        .serialize(ser)
        .map_err(|e| DocfillError::Snapshot(e.to_string()))?;
    Ok(format!("{}\n{}\n", XML_DECLARATION, body))
}

/// Parse a snapshot written by [`serialize`].
pub fn parse(xml: &str) -> Result<SessionState> {
    quick_xml::de::from_str(xml).map_err(|e| DocfillError::Snapshot(e.to_string()))
}

/// Write the session snapshot to `path`, creating or truncating it.
/// Missing parent directories are created.
pub fn serialize(path: impl AsRef<Path>, state: &SessionState) -> Result<()> {
    let path = path.as_ref();
    let xml = to_xml(state)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)?;
    info!("Wrote session snapshot with {} document(s) to {:?}", state.len(), path);
    Ok(())
}
