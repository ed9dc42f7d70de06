//! OPC Package implementation
//!
//! Handles reading and writing DOCX files as ZIP packages. The whole package
//! is held in memory; mutation never touches the original archive until
//! `save`, which builds a scratch file and renames it into place. A failed
//! run therefore leaves the destination exactly as it was.

use crate::error::{Error, Result};
use crate::opc::relationships::rel_types;
use crate::opc::{well_known, ContentTypes, Part, PartUri, Relationships};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use zip::read::ZipArchive;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// An OPC package (ZIP-based container for DOCX and friends)
#[derive(Debug)]
pub struct Package {
    /// All parts in the package, keyed by URI. Sorted so that serialization
    /// is deterministic: identical inputs produce byte-identical archives.
    parts: BTreeMap<PartUri, Part>,
    /// Package-level relationships (/_rels/.rels)
    relationships: Relationships,
    /// Content types ([Content_Types].xml)
    content_types: ContentTypes,
}

impl Package {
    /// Create a new empty package
    pub fn new() -> Self {
        Self {
            parts: BTreeMap::new(),
            relationships: Relationships::new(),
            content_types: ContentTypes::new(),
        }
    }

    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("opening package {}", path.as_ref().display());
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Open a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        Self::from_reader(cursor)
    }

    /// Open a package from a reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut package = Self::new();

        package.content_types = Self::read_content_types(&mut archive)?;
        package.relationships = Self::read_package_rels(&mut archive)?;
        package.read_parts(&mut archive)?;
        package.read_part_relationships(&mut archive)?;

        debug!("package loaded: {} parts", package.parts.len());
        Ok(package)
    }

    /// Save the package to a file.
    ///
    /// The archive is built as a scratch file beside the target and renamed
    /// into place, so the target is replaced atomically from the caller's
    /// perspective.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut scratch = path.as_os_str().to_os_string();
        scratch.push(".tmp");
        let scratch = std::path::PathBuf::from(scratch);

        let file = File::create(&scratch)
            .map_err(|e| Error::Packaging(format!("cannot create {}: {}", scratch.display(), e)))?;

        if let Err(e) = self.write_to(file) {
            let _ = std::fs::remove_file(&scratch);
            return Err(e);
        }

        std::fs::rename(&scratch, path).map_err(|e| {
            let _ = std::fs::remove_file(&scratch);
            Error::Packaging(format!(
                "cannot rename {} to {}: {}",
                scratch.display(),
                path.display(),
                e
            ))
        })?;

        info!("saved package {}", path.display());
        Ok(())
    }

    /// Save the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let cursor = Cursor::new(&mut buf);
        self.write_to(cursor)?;
        Ok(buf)
    }

    /// Write the package to a writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        // Pinned timestamp keeps repeated runs byte-identical.
        let options: FileOptions<()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        zip.start_file("[Content_Types].xml", options)?;
        self.content_types.write_to(&mut zip)?;

        if !self.relationships.is_empty() {
            zip.start_file("_rels/.rels", options)?;
            self.relationships.write_to(&mut zip)?;
        }

        for (uri, part) in &self.parts {
            let path = &uri.as_str()[1..]; // Remove leading '/'
            zip.start_file(path, options)?;
            zip.write_all(part.data())?;

            if let Some(rels) = part.relationships() {
                if !rels.is_empty() {
                    let rels_uri = uri.relationships_uri();
                    let rels_path = &rels_uri.as_str()[1..];
                    zip.start_file(rels_path, options)?;
                    rels.write_to(&mut zip)?;
                }
            }
        }

        zip.finish()?;
        Ok(())
    }

    /// Get a part by URI
    pub fn part(&self, uri: &PartUri) -> Option<&Part> {
        self.parts.get(uri)
    }

    /// Get a mutable part by URI
    pub fn part_mut(&mut self, uri: &PartUri) -> Option<&mut Part> {
        self.parts.get_mut(uri)
    }

    /// Add a part to the package, replacing any existing part at that URI
    pub fn add_part(&mut self, part: Part) {
        let uri = part.uri().clone();
        self.content_types.ensure_override(&uri, part.content_type());
        self.parts.insert(uri, part);
    }

    /// Get all parts
    pub fn parts(&self) -> impl Iterator<Item = (&PartUri, &Part)> {
        self.parts.iter()
    }

    /// Get package-level relationships
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// Get mutable package-level relationships
    pub fn relationships_mut(&mut self) -> &mut Relationships {
        &mut self.relationships
    }

    /// Get content types
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Get mutable content types
    pub fn content_types_mut(&mut self) -> &mut ContentTypes {
        &mut self.content_types
    }

    /// URI of the main document part, resolved through the package
    /// relationships (falls back to `/word/document.xml`)
    pub fn main_document_uri(&self) -> PartUri {
        self.relationships
            .by_type(rel_types::OFFICE_DOCUMENT)
            .and_then(|rel| PartUri::new(&rel.target).ok())
            .unwrap_or_else(well_known::document)
    }

    /// Get the main document part
    pub fn main_document_part(&self) -> Result<&Part> {
        let uri = self.main_document_uri();
        self.parts
            .get(&uri)
            .ok_or_else(|| Error::MissingPart(uri.to_string()))
    }

    /// Get the main document part mutably
    pub fn main_document_part_mut(&mut self) -> Result<&mut Part> {
        let uri = self.main_document_uri();
        self.parts
            .get_mut(&uri)
            .ok_or_else(|| Error::MissingPart(uri.to_string()))
    }

    // === Private methods ===

    fn read_content_types<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<ContentTypes> {
        let mut file = archive
            .by_name("[Content_Types].xml")
            .map_err(|_| Error::MissingPart("[Content_Types].xml".into()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        ContentTypes::from_xml(&content)
    }

    fn read_package_rels<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Relationships> {
        match archive.by_name("_rels/.rels") {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)?;
                Relationships::from_xml(&content)
            }
            Err(_) => Ok(Relationships::new()),
        }
    }

    fn read_parts<R: Read + Seek>(&mut self, archive: &mut ZipArchive<R>) -> Result<()> {
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            // Skip the manifest
            if name == "[Content_Types].xml" {
                continue;
            }

            // Relationship files are attached to their owning part below
            if name.contains("_rels/") && name.ends_with(".rels") {
                continue;
            }

            let uri = PartUri::new(&format!("/{}", name))?;

            let content_type = self
                .content_types
                .get(&uri)
                .unwrap_or("application/octet-stream")
                .to_string();

            let mut data = Vec::new();
            file.read_to_end(&mut data)?;

            let part = Part::new(uri.clone(), content_type, data);
            self.parts.insert(uri, part);
        }

        Ok(())
    }

    fn read_part_relationships<R: Read + Seek>(
        &mut self,
        archive: &mut ZipArchive<R>,
    ) -> Result<()> {
        let part_uris: Vec<PartUri> = self.parts.keys().cloned().collect();

        for uri in part_uris {
            let rels_path = uri.relationships_uri();
            let rels_zip_path = rels_path.as_str()[1..].to_string();

            if let Ok(mut file) = archive.by_name(&rels_zip_path) {
                let mut content = String::new();
                file.read_to_string(&mut content)?;
                let rels = Relationships::from_xml(&content)?;

                if let Some(part) = self.parts.get_mut(&uri) {
                    part.set_relationships(rels);
                }
            }
        }

        Ok(())
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}
