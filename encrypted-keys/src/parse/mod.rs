//! Parsers for the three BIP38 record formats
//!
//! Every parser is a validating constructor over a checked record: it slices the
//! fixed-width fields, checks the format magic (and context, for tokens) and the
//! trailing checksum, and only then hands out a value. There is no way to hold
//! a parser for an invalid record.

mod key;
mod prefix;
mod private;
mod public;
mod token;

pub use key::KeyFields;
pub use prefix::PrefixFields;
pub use private::ParsePrivate;
pub use public::ParsePublic;
pub use token::ParseToken;

use crate::codec::verify_checksum;
use crate::error::ParseError;

/// Shared magic and checksum validation.
fn validate<const P: usize>(
    prefix: &PrefixFields<P>,
    magic: &[u8],
    record: &[u8],
) -> Result<(), ParseError> {
    if prefix.magic() != magic {
        return Err(ParseError::InvalidMagic);
    }

    if !verify_checksum(record) {
        return Err(ParseError::InvalidChecksum);
    }

    Ok(())
}
