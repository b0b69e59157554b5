//! Application context: the state one run of docfill works on.
//!
//! Holds the session list, the selected template, the form generated for
//! it and the snapshot write to perform at shutdown. Front ends (the
//! shell, one-shot subcommands) only translate input into calls here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use docfill_core::session;
use docfill_core::{discover_fields, fill_template, DocumentRecord, FieldValues, FillReport, SessionState};
use tracing::{info, warn};

use crate::config::Config;
use crate::launcher::Viewer;

pub const NO_TEMPLATE_SELECTED: &str = "Select a document file first.";
pub const FILL_COMPLETED: &str =
    "Document filled. Data will be saved to an XML file when the application closes.";

/// Result of a fill request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillOutcome {
    /// Nothing selected; the request was dropped.
    NoTemplateSelected,
    Filled {
        output: PathBuf,
        report: FillReport,
    },
}

pub struct App {
    output_dir: PathBuf,
    snapshot_dir: PathBuf,
    open_filled: bool,
    viewer: Box<dyn Viewer>,
    session: SessionState,
    selected: Option<usize>,
    form: FieldValues,
    pending_snapshot: Option<PathBuf>,
}

impl App {
    pub fn new(config: &Config, viewer: Box<dyn Viewer>) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            snapshot_dir: config.snapshot_dir.clone(),
            open_filled: config.open,
            viewer,
            session: SessionState::new(),
            selected: None,
            form: FieldValues::new(),
            pending_snapshot: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&DocumentRecord> {
        self.selected.and_then(|i| self.session.get(i))
    }

    /// Current form: one entry per field of the selected template.
    pub fn form(&self) -> &FieldValues {
        &self.form
    }

    /// Snapshot file that will be written at shutdown, if any.
    pub fn pending_snapshot(&self) -> Option<&Path> {
        self.pending_snapshot.as_deref()
    }

    /// Register a picked file and select it.
    ///
    /// The record is kept even when the file turns out not to be a
    /// readable template.
    pub fn select_file(&mut self, path: &Path) -> Result<&FieldValues> {
        let record = DocumentRecord::from_path(path);
        info!("Adding document '{}' ({:?})", record.name, path);
        let index = self.session.add(record);
        self.select_document(index)
    }

    /// Select a session entry and rebuild the form from its template.
    pub fn select_document(&mut self, index: usize) -> Result<&FieldValues> {
        let record = self
            .session
            .get(index)
            .with_context(|| format!("No document #{}", index.saturating_add(1)))?;
        let template = record.path().to_path_buf();

        self.selected = Some(index);
        self.form = FieldValues::new();
        let fields = discover_fields(&template)
            .with_context(|| format!("Failed to read fields of {:?}", template))?;
        self.form = FieldValues::from_fields(fields);
        Ok(&self.form)
    }

    /// Type `value` into the field `tag`. Returns false for tags that are
    /// not part of the current form.
    pub fn set_field(&mut self, tag: &str, value: &str) -> bool {
        self.form.update(tag, value)
    }

    /// Fill a copy of the selected template with the current form.
    ///
    /// The copy goes to `output`, or to [`Self::default_output`].
    /// Each successful fill replaces the pending snapshot with a new
    /// `output_<uuid>.xml` file name; only the last one is written.
    pub fn fill(&mut self, output: Option<PathBuf>) -> Result<FillOutcome> {
        let Some(record) = self.selected() else {
            return Ok(FillOutcome::NoTemplateSelected);
        };
        let template = record.path().to_path_buf();
        let output = output.unwrap_or_else(|| self.default_output(record));

        let report = fill_template(&template, &output, &self.form)
            .with_context(|| format!("Failed to fill {:?}", template))?;
        for tag in &report.skipped {
            warn!("Field '{}' has no control in {:?}", tag, template);
        }

        let snapshot = self.snapshot_dir.join(session::snapshot_file_name());
        if let Some(previous) = self.pending_snapshot.replace(snapshot) {
            info!("Dropping earlier pending snapshot {:?}", previous);
        }

        if self.open_filled {
            self.viewer
                .open(&output)
                .with_context(|| format!("Failed to open {:?}", output))?;
        }

        Ok(FillOutcome::Filled { output, report })
    }

    /// `<output-dir>/<name>_filled.docx` for the first template named
    /// `name` in the session; templates at other paths sharing that name
    /// get `<name>_<n>_filled.docx`, numbered in the order they were
    /// first picked.
    pub fn default_output(&self, record: &DocumentRecord) -> PathBuf {
        let mut paths: Vec<&str> = Vec::new();
        for other in self.session.documents() {
            if other.name == record.name && !paths.contains(&other.template_path.as_str()) {
                paths.push(&other.template_path);
            }
        }
        let position = paths
            .iter()
            .position(|p| *p == record.template_path)
            .unwrap_or(paths.len());

        let file_name = match position {
            0 => format!("{}_filled.docx", record.name),
            n => format!("{}_{}_filled.docx", record.name, n + 1),
        };
        self.output_dir.join(file_name)
    }

    /// Perform the pending snapshot write, once.
    pub fn shutdown(&mut self) -> Result<Option<PathBuf>> {
        let Some(path) = self.pending_snapshot.take() else {
            return Ok(None);
        };
        session::serialize(&path, &self.session)
            .with_context(|| format!("Failed to write session snapshot {:?}", path))?;
        Ok(Some(path))
    }
}
