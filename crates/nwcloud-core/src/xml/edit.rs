//! Load, edit and persist a descriptor in one step

use crate::errors::{malformed_xml, not_found, ExError, Result};
use crate::ports::FileStore;
use crate::xml::document::XmlDocument;
use std::path::Path;

/// Read and parse the XML file at `path`
///
/// # Errors
///
/// `NotFound` if absent, `MalformedXml` (naming the file) if it is not UTF-8
/// or not well-formed.
pub fn load_document(files: &dyn FileStore, path: &Path) -> Result<XmlDocument> {
    if !files.exists(path) {
        return Err(not_found("load_document", path));
    }
    let bytes = files.read_bytes(path)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        malformed_xml("load_document", format!("not valid UTF-8: {}", e)).with_path(path)
    })?;
    XmlDocument::parse(&text).map_err(|e| with_path(e, path))
}

/// Parse template bytes
///
/// # Errors
///
/// `MalformedXml` naming the template.
pub fn parse_template(name: &str, bytes: Vec<u8>) -> Result<XmlDocument> {
    let text = String::from_utf8(bytes).map_err(|e| {
        malformed_xml("parse_template", format!("not valid UTF-8: {}", e)).with_template(name)
    })?;
    XmlDocument::parse(&text).map_err(|e| e.with_template(name))
}

/// Write `doc` back to `path` unless the serialized bytes equal what is on
/// disk. Returns whether a write happened.
///
/// # Errors
///
/// Propagates store failures.
pub fn save_if_changed(
    files: &dyn FileStore,
    path: &Path,
    doc: &XmlDocument,
    change: &str,
) -> Result<bool> {
    let rendered = doc.to_xml_string();
    if files.exists(path) && files.read_bytes(path)? == rendered.as_bytes() {
        return Ok(false);
    }
    files.write_text(path, &rendered, change)?;
    Ok(true)
}

/// Load `path`, apply `edit`, and save only if the content changed
///
/// `edit` returns a description of what it did, used as the change
/// message when the file is written.
///
/// # Errors
///
/// Load errors, errors returned by `edit`, and store failures.
pub fn edit_document<F>(files: &dyn FileStore, path: &Path, edit: F) -> Result<bool>
where
    F: FnOnce(&mut XmlDocument) -> Result<String>,
{
    let mut doc = load_document(files, path)?;
    let change = edit(&mut doc)?;
    save_if_changed(files, path, &doc, &change)
}

fn with_path(err: ExError, path: &Path) -> ExError {
    if err.path().is_some() {
        err
    } else {
        err.with_path(path)
    }
}
