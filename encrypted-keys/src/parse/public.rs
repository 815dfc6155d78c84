use tracing::debug;

use super::{KeyFields, PrefixFields, validate};
use crate::codec::{HASH_SIZE, slice};
use crate::error::ParseError;
use crate::records::EncryptedPublic;
use crate::types::{EK_PUBLIC_DECODED_SIZE, EkEntropy, EkSalt};

const MAGIC: [u8; 4] = [0x64, 0x3b, 0xf6, 0xa8];
const CONTEXT_BASE: u8 = 0x9a;

/// Fields of a validated confirmation code.
///
/// ```text
/// prefix[5] flags[1] salt[4] entropy[8] sign[1] data[32] checksum[4]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePublic {
    prefix: PrefixFields<5>,
    key: KeyFields,
    sign: u8,
    data: [u8; HASH_SIZE],
}

impl ParsePublic {
    pub const PREFIX_SIZE: usize = 5;

    pub fn parse(record: &EncryptedPublic) -> Result<Self, ParseError> {
        let bytes = record.as_byte_array();
        let parsed = Self {
            prefix: PrefixFields::new(slice::<0, 5, EK_PUBLIC_DECODED_SIZE>(bytes)),
            key: KeyFields::new(
                bytes[5],
                slice::<6, 4, EK_PUBLIC_DECODED_SIZE>(bytes),
                slice::<10, 8, EK_PUBLIC_DECODED_SIZE>(bytes),
            ),
            sign: bytes[18],
            data: slice::<19, HASH_SIZE, EK_PUBLIC_DECODED_SIZE>(bytes),
        };

        validate(&parsed.prefix, &MAGIC, bytes).inspect_err(|e| {
            debug!(error = %e, "rejected confirmation code");
        })?;
        Ok(parsed)
    }

    pub fn prefix_factory(address_version: u8) -> [u8; 5] {
        [MAGIC[0], MAGIC[1], MAGIC[2], MAGIC[3], CONTEXT_BASE.wrapping_add(address_version)]
    }

    pub fn address_version(&self) -> u8 {
        self.prefix.context().wrapping_sub(CONTEXT_BASE)
    }

    pub fn prefix(&self) -> &PrefixFields<5> {
        &self.prefix
    }

    pub fn key_fields(&self) -> &KeyFields {
        &self.key
    }

    pub fn context(&self) -> u8 {
        self.prefix.context()
    }

    pub fn flags(&self) -> u8 {
        self.key.flags()
    }

    pub fn compressed(&self) -> bool {
        self.key.compressed()
    }

    pub fn lot_sequence(&self) -> bool {
        self.key.lot_sequence()
    }

    pub fn salt(&self) -> &EkSalt {
        self.key.salt()
    }

    pub fn entropy(&self) -> &EkEntropy {
        self.key.entropy()
    }

    pub fn owner_salt(&self) -> &[u8] {
        self.key.owner_salt()
    }

    /// The masked parity byte of the factor point.
    pub fn sign(&self) -> u8 {
        self.sign
    }

    /// The encrypted x coordinate of the factor point.
    pub fn data(&self) -> &[u8; HASH_SIZE] {
        &self.data
    }
}
