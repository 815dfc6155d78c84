use tracing::debug;

use super::{PrefixFields, validate};
use crate::codec::{HASH_SIZE, slice};
use crate::error::ParseError;
use crate::records::EncryptedToken;
use crate::types::{EK_SALT_SIZE, EK_TOKEN_DECODED_SIZE, EkEntropy, SEQUENCE_BITS};

const MAGIC: [u8; 7] = [0x2c, 0xe9, 0xb3, 0xe1, 0xff, 0x39, 0xe2];
const CONTEXT_LOT_SEQUENCE: u8 = 0x51;
const CONTEXT_DEFAULT: u8 = 0x53;

/// Fields of a validated intermediate passphrase token.
///
/// ```text
/// prefix[8] entropy[8] sign[1] data[32] checksum[4]
/// ```
///
/// `sign` and `data` together are the compressed passpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseToken {
    prefix: PrefixFields<8>,
    entropy: EkEntropy,
    sign: u8,
    data: [u8; HASH_SIZE],
}

impl ParseToken {
    pub const PREFIX_SIZE: usize = 8;

    pub fn parse(record: &EncryptedToken) -> Result<Self, ParseError> {
        let bytes = record.as_byte_array();
        let parsed = Self {
            prefix: PrefixFields::new(slice::<0, 8, EK_TOKEN_DECODED_SIZE>(bytes)),
            entropy: slice::<8, 8, EK_TOKEN_DECODED_SIZE>(bytes),
            sign: bytes[16],
            data: slice::<17, HASH_SIZE, EK_TOKEN_DECODED_SIZE>(bytes),
        };

        validate(&parsed.prefix, &MAGIC, bytes)
            .and_then(|()| match parsed.context() {
                CONTEXT_LOT_SEQUENCE | CONTEXT_DEFAULT => Ok(()),
                other => Err(ParseError::InvalidContext(other)),
            })
            .inspect_err(|e| {
                debug!(error = %e, "rejected intermediate token");
            })?;
        Ok(parsed)
    }

    pub fn prefix_factory(lot_sequence: bool) -> [u8; 8] {
        let context = if lot_sequence {
            CONTEXT_LOT_SEQUENCE
        } else {
            CONTEXT_DEFAULT
        };

        let mut prefix = [0u8; 8];
        prefix[..MAGIC.len()].copy_from_slice(&MAGIC);
        prefix[MAGIC.len()] = context;
        prefix
    }

    pub fn prefix(&self) -> &PrefixFields<8> {
        &self.prefix
    }

    pub fn context(&self) -> u8 {
        self.prefix.context()
    }

    pub fn lot_sequence(&self) -> bool {
        self.context() == CONTEXT_LOT_SEQUENCE
    }

    pub fn entropy(&self) -> &EkEntropy {
        &self.entropy
    }

    /// The passphrase salt: four bytes for lot/sequence tokens, else all eight.
    pub fn owner_salt(&self) -> &[u8] {
        if self.lot_sequence() {
            &self.entropy[..EK_SALT_SIZE]
        } else {
            &self.entropy[..]
        }
    }

    pub fn lot_and_sequence(&self) -> Option<(u32, u32)> {
        if !self.lot_sequence() {
            return None;
        }

        let word = u32::from_be_bytes(slice::<EK_SALT_SIZE, 4, 8>(&self.entropy));
        Some((word >> SEQUENCE_BITS, word & ((1 << SEQUENCE_BITS) - 1)))
    }

    pub fn sign(&self) -> u8 {
        self.sign
    }

    pub fn data(&self) -> &[u8; HASH_SIZE] {
        &self.data
    }

    /// The compressed passpoint bytes, sign followed by data.
    pub fn passpoint(&self) -> [u8; HASH_SIZE + 1] {
        let mut point = [0u8; HASH_SIZE + 1];
        point[0] = self.sign;
        point[1..].copy_from_slice(&self.data);
        point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_token() {
        let record = EncryptedToken::from_base58(
            "passphraseouGLY8yjTZQ5Q2bTo8rtKfdbHz4tme7QuPheRgES8KnT6pX5yxFauYhv3SVPDD",
        )
        .unwrap();
        let parsed = ParseToken::parse(&record).unwrap();

        assert_eq!(parsed.context(), 0x53);
        assert!(!parsed.lot_sequence());
        assert_eq!(parsed.lot_and_sequence(), None);
        assert_eq!(parsed.entropy(), &[0x7a, 0x8d, 0x4f, 0xdd, 0x65, 0x04, 0x8d, 0xbd]);
        assert_eq!(parsed.owner_salt().len(), 8);
        assert_eq!(parsed.sign(), 0x02);
        assert_eq!(parsed.passpoint()[..4], [0x02, 0xa1, 0x5d, 0xc5]);
    }

    #[test]
    fn test_lot_sequence_token() {
        let record = EncryptedToken::from_base58(
            "passphrasecpXbDpHuvh54RYUFyPSp3i1qXjatYK8LM1K4Ujd7KVkuzEiJA8PvRdcSaSuq2J",
        )
        .unwrap();
        let parsed = ParseToken::parse(&record).unwrap();

        assert_eq!(parsed.context(), 0x51);
        assert!(parsed.lot_sequence());
        assert_eq!(parsed.owner_salt(), &[0xba, 0xad, 0xf0, 0x0d]);
        assert_eq!(parsed.lot_and_sequence(), Some((42, 24)));
        assert_eq!(parsed.sign(), 0x03);
    }

    #[test]
    fn test_rejects_unknown_context() {
        let mut payload = [0u8; 49];
        payload[..8].copy_from_slice(&ParseToken::prefix_factory(false));
        payload[7] = 0x52;
        let record = EncryptedToken::from_byte_array(crate::codec::insert_checksum(&payload));

        assert_eq!(ParseToken::parse(&record), Err(ParseError::InvalidContext(0x52)));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let record = EncryptedToken::from_base58(
            "passphraseo59BauW85etaRsKpbbTrEa5RRYw6bq5K9yrDf4r4N5fcirPdtDKmfJw9oYNoGN",
        )
        .unwrap();

        assert_eq!(ParseToken::parse(&record), Err(ParseError::InvalidChecksum));
    }

    #[test]
    fn test_prefix_factory() {
        assert_eq!(
            ParseToken::prefix_factory(true),
            [0x2c, 0xe9, 0xb3, 0xe1, 0xff, 0x39, 0xe2, 0x51]
        );
        assert_eq!(
            ParseToken::prefix_factory(false),
            [0x2c, 0xe9, 0xb3, 0xe1, 0xff, 0x39, 0xe2, 0x53]
        );
    }
}
