//! Integration tests: extracting headers from one package and injecting them
//! into another

use pretty_assertions::assert_eq;

use docx_header_clone::header::{extract_headers, inject_header, InjectOptions};
use docx_header_clone::opc::{content_types, rel_types, well_known, Package, Part, TargetMode};
use docx_header_clone::xml::{RawXmlElement, RawXmlNode};

const HEADER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:p>
    <w:r>
      <w:t>Company letterhead</w:t>
    </w:r>
  </w:p>
</w:hdr>"#;

fn document_xml(header_distance: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <w:body>
    <w:p/>
    <w:sectPr>
      <w:pgSz w:w="11906" w:h="16838"/>
      <w:pgMar w:top="1417" w:bottom="1134" w:left="1134" w:right="850" w:header="{}" w:footer="708" w:gutter="0"/>
    </w:sectPr>
  </w:body>
</w:document>"#,
        header_distance
    )
}

fn base_package(doc_xml: &str) -> Package {
    let mut pkg = Package::new();
    pkg.content_types_mut()
        .add_default("rels", content_types::RELATIONSHIPS);
    pkg.content_types_mut().add_default("xml", content_types::XML);

    pkg.add_part(Part::new(
        well_known::document(),
        content_types::MAIN_DOCUMENT,
        doc_xml.as_bytes().to_vec(),
    ));
    pkg.relationships_mut().add_with_id(
        "rId1",
        rel_types::OFFICE_DOCUMENT,
        "word/document.xml",
        TargetMode::Internal,
    );
    pkg
}

/// Source: one header relationship `rId3 -> header2.xml`, header distance 720
fn source_package() -> Package {
    let mut pkg = base_package(&document_xml("720"));

    pkg.add_part(Part::new(
        well_known::word_part("header2.xml"),
        content_types::HEADER,
        HEADER_XML.as_bytes().to_vec(),
    ));

    let doc_uri = well_known::document();
    let doc_part = pkg.part_mut(&doc_uri).unwrap();
    doc_part.ensure_relationships().add_with_id(
        "rId3",
        rel_types::HEADER,
        "header2.xml",
        TargetMode::Internal,
    );
    pkg
}

/// Destination: relationship IDs {rId1, rId2}, no header relationships
fn destination_package() -> Package {
    let mut pkg = base_package(&document_xml("708"));

    let doc_uri = well_known::document();
    let doc_part = pkg.part_mut(&doc_uri).unwrap();
    let rels = doc_part.ensure_relationships();
    rels.add_with_id("rId1", rel_types::STYLES, "styles.xml", TargetMode::Internal);
    rels.add_with_id(
        "rId2",
        rel_types::FOOTER,
        "footer1.xml",
        TargetMode::Internal,
    );
    pkg
}

fn document_root(pkg: &Package) -> RawXmlElement {
    let doc = pkg.main_document_part().unwrap();
    RawXmlElement::parse(doc.data_as_str().unwrap()).unwrap()
}

#[test]
fn test_extract_captures_relationship_content_and_margins() {
    let src = source_package();
    let headers = extract_headers(&src).unwrap();

    assert_eq!(headers.len(), 1);
    let header = &headers[0];
    assert_eq!(header.relationship.id, "rId3");
    assert_eq!(header.relationship.rel_type, rel_types::HEADER);
    assert_eq!(header.file_name, "header2.xml");
    assert_eq!(header.margins.header.as_deref(), Some("720"));
    assert_eq!(header.margins.top.as_deref(), Some("1417"));
    assert!(header.content.find_first("hdr").is_some());
}

#[test]
fn test_extract_no_headers_is_empty() {
    let src = base_package(&document_xml("708"));
    let headers = extract_headers(&src).unwrap();
    assert!(headers.is_empty());
}

#[test]
fn test_inject_single_header_scenario() {
    let src = source_package();
    let mut dst = destination_package();

    let headers = extract_headers(&src).unwrap();
    let rel_id = inject_header(&mut dst, &headers[0], &InjectOptions::default()).unwrap();

    // New relationship continues the destination's ID sequence
    assert_eq!(rel_id, "rId3");
    let doc_uri = well_known::document();
    let rels = dst.part(&doc_uri).unwrap().relationships().unwrap();
    let rel = rels.get("rId3").unwrap();
    assert_eq!(rel.rel_type, rel_types::HEADER);
    assert_eq!(rel.target, "header2.xml");

    // Header part copied
    let header_uri = well_known::word_part("header2.xml");
    let header_part = dst.part(&header_uri).unwrap();
    assert!(header_part
        .data_as_str()
        .unwrap()
        .contains("Company letterhead"));

    // Exactly one headerReference, first child of the first sectPr
    let root = document_root(&dst);
    let sect_pr = root.find_first("sectPr").unwrap();
    let references: Vec<_> = sect_pr
        .children
        .iter()
        .filter_map(|c| match c {
            RawXmlNode::Element(e) if e.name == "w:headerReference" => Some(e),
            _ => None,
        })
        .collect();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].attr("r:id"), Some("rId3"));
    assert_eq!(references[0].attr("w:type"), Some("default"));
    match &sect_pr.children[0] {
        RawXmlNode::Element(e) => assert_eq!(e.name, "w:headerReference"),
        other => panic!("unexpected first child: {:?}", other),
    }

    // Margins forced to the configured constants, not the source's
    let pg_mar = root.find_first("pgMar").unwrap();
    assert_eq!(pg_mar.attr("w:header"), Some("0"));
    assert_eq!(pg_mar.attr("w:top"), Some("1134"));

    // Content type declared
    assert_eq!(
        dst.content_types().get(&header_uri),
        Some(content_types::HEADER)
    );
}

#[test]
fn test_inject_updates_existing_override_in_place() {
    let src = source_package();
    let mut dst = destination_package();

    let header_uri = well_known::word_part("header2.xml");
    dst.content_types_mut()
        .ensure_override(&header_uri, "application/xml");

    let headers = extract_headers(&src).unwrap();
    inject_header(&mut dst, &headers[0], &InjectOptions::default()).unwrap();

    assert_eq!(
        dst.content_types().get(&header_uri),
        Some(content_types::HEADER)
    );
    assert_eq!(dst.content_types().override_count(&header_uri), 1);
}

#[test]
fn test_nested_header_target_keeps_its_path() {
    // Header parts may live in a subdirectory of word/; the relationship
    // target, the copied part and the content-type override must all agree
    let mut src = base_package(&document_xml("720"));
    src.add_part(Part::new(
        well_known::word_part("headers/header2.xml"),
        content_types::HEADER,
        HEADER_XML.as_bytes().to_vec(),
    ));
    let doc_uri = well_known::document();
    src.part_mut(&doc_uri).unwrap().ensure_relationships().add_with_id(
        "rId2",
        rel_types::HEADER,
        "headers/header2.xml",
        TargetMode::Internal,
    );

    let headers = extract_headers(&src).unwrap();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].file_name, "headers/header2.xml");

    let mut dst = destination_package();
    let rel_id = inject_header(&mut dst, &headers[0], &InjectOptions::default()).unwrap();

    let rels = dst.part(&doc_uri).unwrap().relationships().unwrap();
    let rel = rels.get(&rel_id).unwrap();
    assert_eq!(rel.target, "headers/header2.xml");

    // The relationship resolves to a part that actually exists
    let header_uri = doc_uri.resolve(&rel.target).unwrap();
    assert_eq!(header_uri, well_known::word_part("headers/header2.xml"));
    assert!(dst.part(&header_uri).is_some());
    assert_eq!(
        dst.content_types().get(&header_uri),
        Some(content_types::HEADER)
    );
}

#[test]
fn test_inject_respects_margin_options() {
    let src = source_package();
    let mut dst = destination_package();

    let options = InjectOptions {
        header_distance: 720,
        top_margin: 1417,
    };
    let headers = extract_headers(&src).unwrap();
    inject_header(&mut dst, &headers[0], &options).unwrap();

    let root = document_root(&dst);
    let pg_mar = root.find_first("pgMar").unwrap();
    assert_eq!(pg_mar.attr("w:header"), Some("720"));
    assert_eq!(pg_mar.attr("w:top"), Some("1417"));
}

#[test]
fn test_reinjection_into_same_document_adds_one_header() {
    let src = source_package();
    let bytes = src.to_bytes().unwrap();

    // Fresh copy of the same document as destination
    let mut dst = Package::from_bytes(&bytes).unwrap();

    let headers = extract_headers(&src).unwrap();
    for header in &headers {
        inject_header(&mut dst, header, &InjectOptions::default()).unwrap();
    }

    let doc_uri = well_known::document();
    let rels = dst.part(&doc_uri).unwrap().relationships().unwrap();
    let header_rels = rels.all_by_type(rel_types::HEADER);
    assert_eq!(header_rels.len(), 2);

    // No duplicate IDs
    let mut ids: Vec<_> = rels.iter().map(|r| r.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), rels.len());
}

#[test]
fn test_zero_headers_leaves_destination_unchanged() {
    let src = base_package(&document_xml("708"));
    let mut dst = destination_package();
    let doc_before = dst
        .main_document_part()
        .unwrap()
        .data_as_str()
        .unwrap()
        .to_string();

    let headers = extract_headers(&src).unwrap();
    assert!(headers.is_empty());
    for header in &headers {
        inject_header(&mut dst, header, &InjectOptions::default()).unwrap();
    }

    // Repackaging only; the document part is untouched
    let reloaded = Package::from_bytes(&dst.to_bytes().unwrap()).unwrap();
    let doc_after = reloaded.main_document_part().unwrap().data_as_str().unwrap().to_string();
    assert_eq!(doc_before, doc_after);
}

#[test]
fn test_end_to_end_runs_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("source.docx");
    let dst_path = dir.path().join("target.docx");

    source_package().save(&src_path).unwrap();
    let dst_bytes = destination_package().to_bytes().unwrap();

    std::fs::write(&dst_path, &dst_bytes).unwrap();
    let copied =
        docx_header_clone::copy_headers(&src_path, &dst_path, &InjectOptions::default()).unwrap();
    assert_eq!(copied, 1);
    let first = std::fs::read(&dst_path).unwrap();

    // Reset the destination and run again
    std::fs::write(&dst_path, &dst_bytes).unwrap();
    docx_header_clone::copy_headers(&src_path, &dst_path, &InjectOptions::default()).unwrap();
    let second = std::fs::read(&dst_path).unwrap();

    assert_eq!(first, second);
}
