//! Header extraction from a source package

use log::{debug, info};

use crate::error::{Error, Result};
use crate::header::{HeaderRecord, MarginSnapshot};
use crate::opc::{rel_types, Package};
use crate::xml::RawXmlElement;

/// Extract every header part referenced by the source document, in the order
/// the relationship entries appear in the document's relationships part.
///
/// Each record carries a snapshot of the first `w:pgMar` found in the source
/// document; the snapshot is empty (never an error) when the source has no
/// page-margin node. Returns an empty vector when the document has no header
/// relationships.
pub fn extract_headers(package: &Package) -> Result<Vec<HeaderRecord>> {
    let doc_uri = package.main_document_uri();
    let doc_part = package.main_document_part()?;

    let doc_root = RawXmlElement::parse(doc_part.data_as_str()?)?;
    let margins = capture_margins(&doc_root);

    let Some(rels) = doc_part.relationships() else {
        return Ok(Vec::new());
    };

    let mut headers = Vec::new();
    for rel in rels.all_by_type(rel_types::HEADER) {
        info!("header relationship {} -> {}", rel.id, rel.target);

        let header_uri = doc_uri.resolve(&rel.target)?;
        let header_part = package
            .part(&header_uri)
            .ok_or_else(|| Error::MissingPart(header_uri.to_string()))?;
        let content = RawXmlElement::parse(header_part.data_as_str()?)?;

        // Relative to the document's directory; subdirectory targets like
        // "headers/header2.xml" keep their full path
        let file_name = match doc_uri.parent() {
            Some(parent) => header_uri
                .as_str()
                .strip_prefix(&format!("{}/", parent.as_str()))
                .unwrap_or(header_uri.as_str().trim_start_matches('/'))
                .to_string(),
            None => header_uri.as_str().trim_start_matches('/').to_string(),
        };

        headers.push(HeaderRecord {
            relationship: rel.clone(),
            file_name,
            content,
            margins: margins.clone(),
        });
    }

    Ok(headers)
}

/// Capture the first `w:pgMar` attribute set found in the document
fn capture_margins(doc_root: &RawXmlElement) -> MarginSnapshot {
    let Some(pg_mar) = doc_root.find_first("pgMar") else {
        debug!("no w:pgMar node in source document");
        return MarginSnapshot::default();
    };

    let get = |name: &str| pg_mar.attr(name).map(str::to_string);
    let snapshot = MarginSnapshot {
        left: get("w:left"),
        right: get("w:right"),
        gutter: get("w:gutter"),
        footer: get("w:footer"),
        bottom: get("w:bottom"),
        header: get("w:header"),
        top: get("w:top"),
    };
    debug!("captured source margins: {:?}", snapshot);
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_margins_present() {
        let doc = RawXmlElement::parse(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:sectPr>
      <w:pgMar w:top="1417" w:bottom="1134" w:left="1134" w:right="850" w:header="720" w:footer="708" w:gutter="0"/>
    </w:sectPr>
  </w:body>
</w:document>"#,
        )
        .unwrap();

        let margins = capture_margins(&doc);
        assert_eq!(margins.header.as_deref(), Some("720"));
        assert_eq!(margins.top.as_deref(), Some("1417"));
        assert_eq!(margins.gutter.as_deref(), Some("0"));
        assert!(!margins.is_empty());
    }

    #[test]
    fn test_capture_margins_absent() {
        let doc = RawXmlElement::parse(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#,
        )
        .unwrap();

        let margins = capture_margins(&doc);
        assert!(margins.is_empty());
        assert_eq!(margins.header, None);
    }
}
