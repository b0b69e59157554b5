//! Core of docfill: reading Word templates, filling their tagged
//! content controls and persisting the session list.
//!
//! - `TemplatePackage`: in-memory `.docx` package
//! - `discover_fields`: distinct control tags of a template, first seen order
//! - `fill_field` / `fill_fields` / `fill_template`: write values into controls
//! - `SessionState`: templates picked during a run, saved as an XML snapshot

mod error;
mod filler;
mod inspector;
mod package;
pub mod session;
pub mod wordml;

pub use error::{DocfillError, Result};
pub use filler::{fill_field, fill_fields, fill_template, FieldValues, FillReport};
pub use inspector::{discover_fields, fields_in};
pub use package::{TemplatePackage, MAIN_DOCUMENT_PART};
pub use session::{DocumentRecord, SessionState};
