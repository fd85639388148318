//! PEM framing around DER documents.
//!
//! RFC 7468 profile: a `-----BEGIN <label>-----` line, base64-encoded DER
//! split into fixed-width lines, and a matching `-----END <label>-----`
//! line. The decoded base64 working buffers held key material, so they are
//! scrubbed after use.

use core::fmt;
use core::ops::{Deref, DerefMut};
use std::io::BufRead;

use base64ct::{Base64, Encoding};
use zeroize::{Zeroize, Zeroizing};

use crate::{DerDocument, Error, Result};

const BEGIN: &str = "-----BEGIN ";
const END: &str = "-----END ";
const DASHES: &str = "-----";

/// A DER document wrapped in PEM text framing.
///
/// Dereferences to the inner [`DerDocument`] for tree access.
#[derive(Debug, Default)]
pub struct PemDocument {
    doc: DerDocument,
    label: String,
    chars_per_line: usize,
}

impl PemDocument {
    /// New empty document with the given label and the customary 64
    /// base64 characters per line.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            doc: DerDocument::new(),
            label: label.into(),
            chars_per_line: 64,
        }
    }

    /// New empty document with an explicit line width.
    pub fn with_line_width(label: impl Into<String>, chars_per_line: usize) -> Self {
        Self {
            doc: DerDocument::new(),
            label: label.into(),
            chars_per_line,
        }
    }

    /// Wrap an existing DER document.
    pub fn from_document(doc: DerDocument, label: impl Into<String>) -> Self {
        Self {
            doc,
            label: label.into(),
            chars_per_line: 64,
        }
    }

    /// The label between BEGIN/END markers.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Base64 characters per output line. After a parse this is the widest
    /// body line observed.
    pub fn chars_per_line(&self) -> usize {
        self.chars_per_line
    }

    /// Set the output line width.
    pub fn set_chars_per_line(&mut self, chars_per_line: usize) {
        self.chars_per_line = chars_per_line;
    }

    /// The wrapped DER document.
    pub fn document(&self) -> &DerDocument {
        &self.doc
    }

    /// The wrapped DER document, mutable.
    pub fn document_mut(&mut self) -> &mut DerDocument {
        &mut self.doc
    }

    /// Parse a PEM block from text.
    pub fn parse(&mut self, text: &str) -> Result<()> {
        let mut bytes = text.as_bytes();
        if !self.parse_next(&mut bytes)? {
            return Err(Error::Pem("no BEGIN line found"));
        }
        Ok(())
    }

    /// Parse the next PEM block from a reader.
    ///
    /// Skips lines until a BEGIN marker, then reads base64 body lines up to
    /// the matching END marker; the END label must equal the BEGIN label
    /// exactly. Returns `Ok(false)` when the stream ends before any BEGIN
    /// marker is seen, which lets callers iterate a concatenation of
    /// blocks to a clean stop.
    pub fn parse_next(&mut self, reader: &mut impl BufRead) -> Result<bool> {
        let mut line = Zeroizing::new(String::new());

        // scan for the begin marker
        let label = loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Ok(false);
            }
            let text = line.trim_end_matches(['\r', '\n']);
            if let Some(pos) = text.find(BEGIN) {
                let rest = &text[pos + BEGIN.len()..];
                let end = rest.rfind(DASHES).ok_or(Error::Pem(
                    "BEGIN line does not end with five dashes",
                ))?;
                let label = rest[..end].to_string();
                if label.is_empty() {
                    return Err(Error::Pem("empty label"));
                }
                break label;
            }
        };

        let mut body = Zeroizing::new(String::new());
        let mut widest = 0;
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                return Err(Error::Pem("no END line found"));
            }
            let text = line.trim_end_matches(['\r', '\n']);
            if let Some(pos) = text.find(END) {
                let rest = &text[pos + END.len()..];
                let end = rest
                    .rfind(DASHES)
                    .ok_or(Error::Pem("END line does not end with five dashes"))?;
                if rest[..end] != label {
                    return Err(Error::Pem("BEGIN and END labels do not match"));
                }
                break;
            }
            widest = widest.max(text.len());
            body.push_str(text);
        }

        let der = Zeroizing::new(
            Base64::decode_vec(&body).map_err(|_| Error::Pem("invalid base64 data"))?,
        );
        self.doc.parse(&der)?;
        self.label = label;
        self.chars_per_line = widest;
        Ok(true)
    }

    /// Serialize the document and wrap it in PEM framing.
    ///
    /// Fails when the label is empty or the line width is zero.
    pub fn dump(&mut self) -> Result<String> {
        if self.label.is_empty() {
            return Err(Error::Pem("empty label"));
        }
        if self.chars_per_line == 0 {
            return Err(Error::Pem("line width of zero"));
        }
        let der = Zeroizing::new(self.doc.dump()?);
        let mut body = Zeroizing::new(Base64::encode_string(&der));

        let mut out = String::new();
        out.push_str(BEGIN);
        out.push_str(&self.label);
        out.push_str(DASHES);
        out.push('\n');
        let mut rest = body.as_str();
        while !rest.is_empty() {
            let take = rest.len().min(self.chars_per_line);
            out.push_str(&rest[..take]);
            out.push('\n');
            rest = &rest[take..];
        }
        out.push_str(END);
        out.push_str(&self.label);
        out.push_str(DASHES);
        out.push('\n');

        body.zeroize();
        Ok(out)
    }
}

impl Deref for PemDocument {
    type Target = DerDocument;

    fn deref(&self) -> &DerDocument {
        &self.doc
    }
}

impl DerefMut for PemDocument {
    fn deref_mut(&mut self) -> &mut DerDocument {
        &mut self.doc
    }
}

impl fmt::Display for PemDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.doc, f)
    }
}
