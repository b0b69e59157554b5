use std::path::Path;

use tracing::{debug, info};

use crate::error::{DocfillError, Result};
use crate::package::TemplatePackage;
use crate::wordml;

/// Ordered mapping of field tag to the text entered for it.
///
/// A tag appears at most once; setting an existing tag replaces its value
/// in place so the original order is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    entries: Vec<(String, String)>,
}

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// One empty value per field, as a freshly generated form.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().map(|f| (f, String::new())).collect()
    }

    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, v)) => *v = value,
            None => self.entries.push((tag, value)),
        }
    }

    /// Replace the value of a tag that is already present.
    /// Returns false, changing nothing, for unknown tags.
    pub fn update(&mut self, tag: &str, value: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(t, _)| t == tag) {
            Some((_, v)) => {
                *v = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = FieldValues::new();
        for (tag, value) in iter {
            values.set(tag, value);
        }
        values
    }
}

/// Outcome of a batch fill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Tags whose control was found.
    pub filled: Vec<String>,
    /// Tags with no control in the document.
    pub skipped: Vec<String>,
}

/// Write `value` into the control tagged `tag`.
///
/// Only the first `w:tag` whose value equals `tag` is considered: when a
/// template repeats a tag, later controls carrying it are never filled.
/// The first `w:t` of the owning content control receives the value; a
/// control without any text run is left as is. Returns whether the tag
/// was found. An unknown tag leaves the document untouched.
///
/// Values holding characters XML 1.0 cannot represent (most C0 controls,
/// U+FFFE, U+FFFF) are rejected with [`DocfillError::InvalidValue`]
/// before anything is written.
pub fn fill_field(package: &mut TemplatePackage, tag: &str, value: &str) -> Result<bool> {
    if let Some(character) = value.chars().find(|c| !is_xml_char(*c)) {
        return Err(DocfillError::InvalidValue {
            tag: tag.to_string(),
            character,
        });
    }

    let xml = package.main_document();
    let doc = roxmltree::Document::parse(xml)?;

    let Some(tag_node) = doc
        .descendants()
        .find(|n| wordml::is_w(n, "tag") && wordml::tag_value(n) == Some(tag))
    else {
        debug!("No control tagged '{}'", tag);
        return Ok(false);
    };

    let text_run = tag_node
        .ancestors()
        .find(|n| wordml::is_w(n, "sdt"))
        .and_then(|sdt| sdt.descendants().find(|n| wordml::is_w(n, "t")));
    let Some(text_run) = text_run else {
        debug!("Control '{}' has no text run, nothing to write", tag);
        return Ok(true);
    };

    let range = text_run.range();
    let element_name = qualified_name(&xml[range.clone()]);
    let replacement = format!(
        "<{name} xml:space=\"preserve\">{text}</{name}>",
        name = element_name,
        text = quick_xml::escape::escape(value),
    );

    let mut updated = String::with_capacity(xml.len() + replacement.len());
    updated.push_str(&xml[..range.start]);
    updated.push_str(&replacement);
    updated.push_str(&xml[range.end..]);
    // releases the borrow of the package text
    drop(doc);

    package.replace_main_document(updated);
    debug!("Filled '{}'", tag);
    Ok(true)
}

/// Fill every entry of `values`, in order.
///
/// Tags without a control are listed as skipped. The first error stops
/// the batch; fields written before it stay written.
pub fn fill_fields(package: &mut TemplatePackage, values: &FieldValues) -> Result<FillReport> {
    let mut report = FillReport::default();
    for (tag, value) in values.iter() {
        if fill_field(package, tag, value)? {
            report.filled.push(tag.to_string());
        } else {
            report.skipped.push(tag.to_string());
        }
    }
    Ok(report)
}

/// Fill a copy of `template` and save it as `output`.
///
/// The template file is only read.
pub fn fill_template(
    template: impl AsRef<Path>,
    output: impl AsRef<Path>,
    values: &FieldValues,
) -> Result<FillReport> {
    let mut package = TemplatePackage::open(template.as_ref())?;
    let report = fill_fields(&mut package, values)?;
    package.save(output.as_ref())?;
    info!(
        "Filled {} field(s), skipped {} from {:?} into {:?}",
        report.filled.len(),
        report.skipped.len(),
        package.path(),
        output.as_ref()
    );
    Ok(report)
}

// XML 1.0 `Char` production; surrogates cannot occur in a `char`
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{fffd}' | '\u{10000}'..)
}

// `<w:t xml:space="preserve">` -> `w:t`
fn qualified_name(element: &str) -> &str {
    let start = element.trim_start_matches('<');
    let end = start
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(start.len());
    &start[..end]
}
