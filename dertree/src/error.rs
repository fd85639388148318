//! Error type.

use core::fmt;

/// DER and PEM processing errors.
///
/// Parse failures are fatal for the document being processed: no partial
/// tree is ever returned. Offsets refer to the encoded byte buffer of the
/// current parse.
#[derive(Debug)]
pub enum Error {
    /// The buffer ended in the middle of a header or declared content.
    UnexpectedEnd {
        /// Offset at which more data was required.
        offset: usize,
    },
    /// The indefinite length form (`0x80`), which DER forbids.
    IndefiniteLength {
        /// Offset of the length byte.
        offset: usize,
    },
    /// A multi-byte length or id does not fit the platform word.
    LengthOverflow {
        /// Offset of the oversized field.
        offset: usize,
    },
    /// Content violates the invariants of its universal type, or a
    /// container's children do not span its declared length.
    Malformed {
        /// Offset of the offending element.
        offset: usize,
        /// What was violated.
        what: &'static str,
    },
    /// A typed accessor was applied to an element of a different type.
    /// Always a caller bug, never a property of the input data.
    TypeMismatch {
        /// The type the accessor expected.
        expected: &'static str,
    },
    /// An element cannot be emitted or converted as requested.
    Build(&'static str),
    /// `root()` was called on an empty document.
    EmptyDocument,
    /// PEM framing or base64 error.
    Pem(&'static str),
    /// Error from the underlying reader or writer.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEnd { offset } => {
                write!(f, "unexpected end of data at offset {offset}")
            }
            Error::IndefiniteLength { offset } => {
                write!(f, "indefinite length at offset {offset} not allowed in DER")
            }
            Error::LengthOverflow { offset } => {
                write!(f, "length or id overflow at offset {offset}")
            }
            Error::Malformed { offset, what } => {
                write!(f, "malformed element at offset {offset}: {what}")
            }
            Error::TypeMismatch { expected } => {
                write!(f, "element is not of type {expected}")
            }
            Error::Build(what) => write!(f, "cannot build element: {what}"),
            Error::EmptyDocument => f.write_str("document is empty"),
            Error::Pem(what) => write!(f, "pem: {what}"),
            Error::Io(err) => write!(f, "io: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Result type with the `dertree` crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
