//! Error types for docx-header-clone

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML encoding error: {0}")]
    XmlEncoding(#[from] quick_xml::encoding::EncodingError),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Invalid part URI: {0}")]
    InvalidPartUri(String),

    #[error("Missing attribute '{attr}' on element '{element}'")]
    MissingAttribute { element: String, attr: String },

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Malformed relationship ID '{0}': expected a non-digit prefix followed by digits")]
    MalformedRelationshipId(String),

    #[error("Relationship IDs use mixed prefixes ('{0}' vs '{1}'); cannot allocate a new ID")]
    MixedRelationshipIdPrefixes(String, String),

    #[error("Missing node '{node}' in {part}")]
    MissingNode { part: String, node: String },

    #[error("Packaging failed: {0}")]
    Packaging(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
