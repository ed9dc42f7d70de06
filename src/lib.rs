//! # docx-header-clone
//!
//! Copies header parts from one DOCX document into another.
//!
//! For every header relationship in the source document this copies the
//! header XML part and its relationship entry into the destination, inserts
//! a `w:headerReference` into the destination's section properties, adjusts
//! the destination's page margins and declares the header content type in
//! the destination's manifest.
//!
//! Both packages are loaded fully into memory and the destination is only
//! written back (atomically, scratch-then-rename) once every injection has
//! succeeded, so a failed run never leaves a half-patched document behind.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docx_header_clone::{copy_headers, InjectOptions};
//!
//! let copied = copy_headers("source.docx", "target.docx", &InjectOptions::default())?;
//! println!("copied {} header(s)", copied);
//! ```

pub mod error;
pub mod header;
pub mod opc;
pub mod xml;

pub use error::{Error, Result};
pub use header::{extract_headers, inject_header, HeaderRecord, InjectOptions, MarginSnapshot};
pub use opc::{Package, Part, PartUri};

use log::info;
use std::path::Path;

/// Copy every header from the source document into the destination document,
/// then save the destination in place. Returns the number of headers copied.
///
/// With no headers in the source the destination is still re-saved
/// (repackaged), otherwise unchanged.
pub fn copy_headers<S: AsRef<Path>, D: AsRef<Path>>(
    source: S,
    destination: D,
    options: &InjectOptions,
) -> Result<usize> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let src = Package::open(source)?;
    let mut dst = Package::open(destination)?;

    let headers = extract_headers(&src)?;
    info!("{} header(s) found in {}", headers.len(), source.display());

    for header in &headers {
        inject_header(&mut dst, header, options)?;
    }

    dst.save(destination)?;
    Ok(headers.len())
}
