use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::package::TemplatePackage;
use crate::wordml;

/// List the field tags of the template at `template_path`.
///
/// Every content control contributes the value of its first `w:tag`.
/// The result keeps first-seen order and holds each tag once; it is
/// empty when the document has no tagged controls.
pub fn discover_fields(template_path: impl AsRef<Path>) -> Result<Vec<String>> {
    let template_path = template_path.as_ref();
    let package = TemplatePackage::open(template_path)?;
    let fields = fields_in(&package)?;
    info!("Found {} field(s) in {:?}", fields.len(), template_path);
    Ok(fields)
}

/// Same walk as [`discover_fields`] over an already opened package.
pub fn fields_in(package: &TemplatePackage) -> Result<Vec<String>> {
    let doc = roxmltree::Document::parse(package.main_document())?;

    let mut fields: Vec<String> = Vec::new();
    for sdt in wordml::content_controls(&doc) {
        let Some(value) = wordml::first_tag(&sdt).and_then(|tag| wordml::tag_value(&tag)) else {
            continue;
        };
        if fields.iter().any(|f| f == value) {
            debug!("Skipping repeated tag '{}'", value);
            continue;
        }
        fields.push(value.to_string());
    }
    Ok(fields)
}
