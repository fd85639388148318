//! DER documents.

use core::fmt;
use std::io::Read;

use zeroize::Zeroizing;

use crate::{Element, Error, Result, codec};

/// A binary document holding one DER element tree and its serialized
/// bytes.
///
/// The document uniquely owns its root. Parsing an empty buffer is valid
/// and yields an empty document; accessing the root of an empty document is
/// an error. The retained buffer and the per-element byte regions reflect
/// the most recent [`DerDocument::parse`] or [`DerDocument::dump`].
#[derive(Debug, Default)]
pub struct DerDocument {
    root: Option<Element>,
    bin: Zeroizing<Vec<u8>>,
}

impl DerDocument {
    /// New empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document owning `root`. The serialized buffer is empty until the
    /// first [`DerDocument::dump`].
    pub fn from_root(root: Element) -> Self {
        Self {
            root: Some(root),
            bin: Zeroizing::new(Vec::new()),
        }
    }

    /// Parse a DER byte buffer, replacing any previous contents.
    ///
    /// An empty input yields an empty document. Bytes after the root
    /// element are retained in the buffer but not interpreted.
    pub fn parse(&mut self, bytes: &[u8]) -> Result<()> {
        self.bin = Zeroizing::new(bytes.to_vec());
        self.parse_bin()
    }

    /// Parse a DER document from a reader (reads to end of stream).
    pub fn parse_reader(&mut self, reader: &mut impl Read) -> Result<()> {
        let mut bytes = Zeroizing::new(Vec::new());
        reader.read_to_end(&mut bytes)?;
        self.bin = bytes;
        self.parse_bin()
    }

    pub(crate) fn parse_bin(&mut self) -> Result<()> {
        self.root = if self.bin.is_empty() {
            None
        } else {
            Some(codec::parse_element(&self.bin, 0)?)
        };
        Ok(())
    }

    /// Serialize the tree, refresh the retained buffer and the per-element
    /// byte regions, and return the bytes.
    ///
    /// Fails with [`Error::EmptyDocument`] when there is no root.
    pub fn dump(&mut self) -> Result<Vec<u8>> {
        let root = self.root.as_ref().ok_or(Error::EmptyDocument)?;
        let bytes = codec::dump_element(root)?;
        self.bin = Zeroizing::new(bytes.clone());
        // reparse so every element's recorded region matches the buffer
        self.parse_bin()?;
        Ok(bytes)
    }

    /// The serialized buffer of the last parse or dump.
    pub fn bytes(&self) -> &[u8] {
        &self.bin
    }

    /// Is the document empty?
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The root element. Fails on an empty document.
    pub fn root(&self) -> Result<&Element> {
        self.root.as_ref().ok_or(Error::EmptyDocument)
    }

    /// The root element, mutable. Fails on an empty document.
    pub fn root_mut(&mut self) -> Result<&mut Element> {
        self.root.as_mut().ok_or(Error::EmptyDocument)
    }

    /// Replace the root element.
    pub fn set_root(&mut self, root: Element) {
        self.root = Some(root);
    }

    /// Take the root element out, leaving the document empty.
    pub fn take_root(&mut self) -> Option<Element> {
        self.root.take()
    }

    /// Clear the document.
    pub fn clear(&mut self) {
        self.root = None;
        self.bin = Zeroizing::new(Vec::new());
    }

    /// Compare the serialized form of two documents. Two empty documents
    /// are equal; emission failures compare unequal.
    pub fn content_equal(&self, other: &DerDocument) -> bool {
        match (&self.root, &other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => match (codec::dump_element(a), codec::dump_element(b)) {
                (Ok(da), Ok(db)) => {
                    let da = Zeroizing::new(da);
                    let db = Zeroizing::new(db);
                    *da == *db
                }
                _ => false,
            },
            _ => false,
        }
    }
}

/// Renders the element tree; `<empty>` for an empty document. The
/// alternate form (`{:#}`) adds byte regions.
impl fmt::Display for DerDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            None => f.write_str("<empty>"),
            Some(root) => {
                if f.alternate() {
                    write!(f, "{root:#}")
                } else {
                    write!(f, "{root}")
                }
            }
        }
    }
}
