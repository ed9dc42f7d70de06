//! Header injection into a destination package
//!
//! All edits happen on the in-memory package; nothing reaches disk until the
//! caller saves it, so a failure partway leaves the destination file intact.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::header::HeaderRecord;
use crate::opc::{content_types, Package, Part};
use crate::xml::{self, RawXmlElement};

/// Page-margin values applied to the destination when a header is injected.
///
/// The defaults reproduce the historical behavior of this tool: the header
/// distance is collapsed to 0 and the top margin forced to 1134 twips,
/// regardless of the margins captured from the source (those remain
/// available on [`HeaderRecord::margins`](crate::header::HeaderRecord)).
#[derive(Clone, Debug)]
pub struct InjectOptions {
    /// Value written to `w:pgMar/@w:header`, in twips
    pub header_distance: u32,
    /// Value written to `w:pgMar/@w:top`, in twips
    pub top_margin: u32,
}

impl Default for InjectOptions {
    fn default() -> Self {
        Self {
            header_distance: 0,
            top_margin: 1134,
        }
    }
}

/// Inject one extracted header into the destination package.
///
/// Allocates a fresh relationship ID, copies the relationship entry and the
/// header part, inserts a `w:headerReference` at the front of the first
/// `w:sectPr` in the destination document, patches the page margins and
/// declares the header content type. Returns the allocated relationship ID.
///
/// A header part with the same file name already present in the destination
/// is overwritten (last writer wins).
pub fn inject_header(
    package: &mut Package,
    header: &HeaderRecord,
    options: &InjectOptions,
) -> Result<String> {
    let doc_uri = package.main_document_uri();

    // Relationship entry, under a freshly allocated ID
    let rel_id = {
        let doc_part = package.main_document_part_mut()?;
        let rels = doc_part.ensure_relationships();
        let rel_id = rels.allocate_id()?;
        rels.add_with_id(
            &rel_id,
            &header.relationship.rel_type,
            &header.relationship.target,
            header.relationship.target_mode,
        );
        rel_id
    };
    info!(
        "injecting {} as relationship {}",
        header.file_name, rel_id
    );

    // Header part content, stored where the copied relationship target
    // resolves so the two can never disagree; add_part also reconciles the
    // content-types manifest (updating an existing override in place, else
    // appending)
    let header_uri = doc_uri.resolve(&header.relationship.target)?;
    let data = header.content.to_part_xml()?;
    package.add_part(Part::new(header_uri, content_types::HEADER, data));

    // Section properties and page margins in document.xml
    let doc_part = package.main_document_part()?;
    let mut doc_root = RawXmlElement::parse(doc_part.data_as_str()?)?;
    patch_section_properties(&mut doc_root, &rel_id, options, doc_uri.as_str())?;

    let data = doc_root.to_part_xml()?;
    package.main_document_part_mut()?.set_data(data);

    Ok(rel_id)
}

/// Insert the header reference and adjust the page margins under the first
/// `w:sectPr` of the document
fn patch_section_properties(
    doc_root: &mut RawXmlElement,
    rel_id: &str,
    options: &InjectOptions,
    part: &str,
) -> Result<()> {
    // The reference carries an r:id attribute; make sure the prefix is bound
    if !doc_root.attributes.iter().any(|(k, _)| k == "xmlns:r") {
        debug!("declaring relationships namespace on document root");
        doc_root.set_attr("xmlns:r", xml::R);
    }

    let sect_pr = doc_root
        .find_first_mut("sectPr")
        .ok_or_else(|| Error::MissingNode {
            part: part.to_string(),
            node: "w:sectPr".into(),
        })?;

    let reference = RawXmlElement {
        self_closing: true,
        ..RawXmlElement::new("w:headerReference")
    }
    .with_attr("w:type", "default")
    .with_attr("r:id", rel_id);
    sect_pr.insert_child_front(reference);

    let pg_mar = sect_pr
        .find_first_mut("pgMar")
        .ok_or_else(|| Error::MissingNode {
            part: part.to_string(),
            node: "w:pgMar".into(),
        })?;
    pg_mar.set_attr("w:header", &options.header_distance.to_string());
    pg_mar.set_attr("w:top", &options.top_margin.to_string());

    Ok(())
}
