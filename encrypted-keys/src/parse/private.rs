use tracing::debug;

use super::{KeyFields, PrefixFields, validate};
use crate::codec::{HALF, QUARTER, slice};
use crate::error::ParseError;
use crate::records::EncryptedPrivate;
use crate::types::flags::EC_NON_MULTIPLIED;
use crate::types::{EK_PRIVATE_DECODED_SIZE, EkEntropy, EkSalt};

const MAGIC: [u8; 1] = [0x01];
const CONTEXT_NON_MULTIPLIED: u8 = 0x42;
const CONTEXT_MULTIPLIED: u8 = 0x43;

/// Fields of a validated encrypted private key.
///
/// ```text
/// prefix[2] flags[1] salt[4] entropy[8] data1[8] data2[16] checksum[4]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsePrivate {
    prefix: PrefixFields<2>,
    key: KeyFields,
    data1: [u8; QUARTER],
    data2: [u8; HALF],
}

impl ParsePrivate {
    pub const PREFIX_SIZE: usize = 2;

    pub fn parse(record: &EncryptedPrivate) -> Result<Self, ParseError> {
        let bytes = record.as_byte_array();
        let parsed = Self {
            prefix: PrefixFields::new(slice::<0, 2, EK_PRIVATE_DECODED_SIZE>(bytes)),
            key: KeyFields::new(
                bytes[2],
                slice::<3, 4, EK_PRIVATE_DECODED_SIZE>(bytes),
                slice::<7, 8, EK_PRIVATE_DECODED_SIZE>(bytes),
            ),
            data1: slice::<15, QUARTER, EK_PRIVATE_DECODED_SIZE>(bytes),
            data2: slice::<23, HALF, EK_PRIVATE_DECODED_SIZE>(bytes),
        };

        validate(&parsed.prefix, &MAGIC, bytes).inspect_err(|e| {
            debug!(error = %e, "rejected encrypted private key");
        })?;
        Ok(parsed)
    }

    /// Build the prefix for an address version and multiplication mode.
    pub fn prefix_factory(address_version: u8, multiplied: bool) -> [u8; 2] {
        let context = if multiplied {
            CONTEXT_MULTIPLIED
        } else {
            CONTEXT_NON_MULTIPLIED
        };

        [MAGIC[0], context.wrapping_add(address_version)]
    }

    /// Whether the key was produced by EC multiplication from a token.
    ///
    /// BIP38 stores this inverted: the flag bits mean "not multiplied".
    pub fn multiplied(&self) -> bool {
        (self.flags() & EC_NON_MULTIPLIED) == 0
    }

    pub fn address_version(&self) -> u8 {
        let base = if self.multiplied() {
            CONTEXT_MULTIPLIED
        } else {
            CONTEXT_NON_MULTIPLIED
        };

        self.prefix.context().wrapping_sub(base)
    }

    pub fn prefix(&self) -> &PrefixFields<2> {
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

    /// The leading quarter of the first ciphertext block (multiplied keys).
    pub fn data1(&self) -> &[u8; QUARTER] {
        &self.data1
    }

    /// The second ciphertext block.
    pub fn data2(&self) -> &[u8; HALF] {
        &self.data2
    }
}
