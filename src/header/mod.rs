//! Header extraction and injection between DOCX packages

mod extract;
mod inject;

pub use extract::extract_headers;
pub use inject::{inject_header, InjectOptions};

use crate::opc::Relationship;
use crate::xml::RawXmlElement;

/// A header captured from a source document: the unit copied between
/// packages. Created by [`extract_headers`], consumed by [`inject_header`].
#[derive(Clone, Debug)]
pub struct HeaderRecord {
    /// The source relationship entry (header type URI + target file name)
    pub relationship: Relationship,
    /// Header part path relative to the word-internals directory,
    /// subdirectories included (e.g. `header2.xml`, `headers/header2.xml`)
    pub file_name: String,
    /// Parsed header part content
    pub content: RawXmlElement,
    /// Page margins captured from the source's section properties at
    /// extraction time
    pub margins: MarginSnapshot,
}

/// Snapshot of a document's `w:pgMar` attributes, in twentieths of a point,
/// kept verbatim. All fields are `None` when the document has no page-margin
/// node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarginSnapshot {
    pub left: Option<String>,
    pub right: Option<String>,
    pub gutter: Option<String>,
    pub footer: Option<String>,
    pub bottom: Option<String>,
    pub header: Option<String>,
    pub top: Option<String>,
}

impl MarginSnapshot {
    /// True when no page-margin node was found at extraction time
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
