//! Record decoder
//!
//! Turns the raw bytes of a source object into an ordered sequence of flat
//! records. Decoding is eager: the whole object is already in memory.
//!
//! - Bytes must be valid UTF-8 (`EVL_ENCODING`)
//! - The document must be a sequence of flat key/value records (`EVL_FORMAT`)
//! - Field contents are not validated here

mod decoder;
mod errors;
mod record;

pub use decoder::{decode, RecordDecoder, SourceFormat};
pub use errors::{DecodeError, DecodeResult};
pub use record::{FieldLookup, RawRecord, Scalar, SOURCE_ID_FIELD};
