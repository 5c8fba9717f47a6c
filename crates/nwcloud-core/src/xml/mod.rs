//! XML descriptors: lossless tree, path queries and idempotent edits

pub mod document;
pub mod edit;
pub mod mutate;
pub mod path;

pub use document::{XmlDocument, XmlElement, XmlNode};
pub use edit::{edit_document, load_document, parse_template, save_if_changed};
pub use mutate::removal_description;
pub use path::XmlPath;
