#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

//! ASN.1 DER parsing and emission for cryptography objects.
//!
//! DER (Distinguished Encoding Rules, X.690) is the restricted subset of
//! BER used to package cryptographic objects: every value has exactly one
//! encoding, lengths are always definite, and integers and bit strings are
//! canonical. This crate models a DER document as an owned tree of
//! [`Element`] values — one enum variant per implemented universal type,
//! with application, context and private class elements retained
//! uninterpreted — and converts between trees and bytes:
//!
//! ```
//! use dertree::{DerDocument, Element};
//!
//! // SEQUENCE { INTEGER 0, INTEGER 127 }
//! let mut doc = DerDocument::from_root(Element::sequence(vec![
//!     Element::integer(0u32),
//!     Element::integer(127u32),
//! ]));
//! let bytes = doc.dump()?;
//! assert_eq!(bytes, [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x7f]);
//!
//! let mut parsed = DerDocument::new();
//! parsed.parse(&bytes)?;
//! assert_eq!(parsed.root()?.children()?.len(), 2);
//! # Ok::<(), dertree::Error>(())
//! ```
//!
//! [`PemDocument`] adds the RFC 7468 text framing (base64 body between
//! BEGIN/END label lines) used to carry certificates and keys.
//!
//! Element payloads, document buffers and decoded base64 are zeroized on
//! drop; parse failures are fatal for the document and never yield a
//! partial tree.
//!
//! References: X.680 (types), X.690 (encoding), RFC 7468 (PEM), and
//! RFC 5280 for the X.509 structures this codec is sized for.

mod bitstring;
mod codec;
mod document;
mod element;
mod error;
mod oid;
mod pem;
mod time;

pub use crate::bitstring::BitString;
pub use crate::codec::{dump_element, parse_element};
pub use crate::document::DerDocument;
pub use crate::element::{Class, Element, Opaque, Region, Value, type_id};
pub use crate::error::{Error, Result};
pub use crate::oid::Oid;
pub use crate::pem::PemDocument;
pub use crate::time::DateTime;
