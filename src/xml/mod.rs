//! XML utilities: raw tree editing and OOXML namespace constants

mod namespace;
mod raw;

pub use namespace::*;
pub use raw::{local_name, RawXmlElement, RawXmlNode};
