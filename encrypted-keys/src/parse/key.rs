use crate::codec::slice;
use crate::types::flags::{EC_COMPRESSED_KEY, LOT_SEQUENCE_KEY};
use crate::types::{EK_ENTROPY_SIZE, EK_SALT_SIZE, EkEntropy, EkSalt, SEQUENCE_BITS};

/// Flags, address salt and entropy, common to private and public records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyFields {
    flags: u8,
    salt: EkSalt,
    entropy: EkEntropy,
}

impl KeyFields {
    pub fn new(flags: u8, salt: EkSalt, entropy: EkEntropy) -> Self {
        Self {
            flags,
            salt,
            entropy,
        }
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn compressed(&self) -> bool {
        (self.flags & EC_COMPRESSED_KEY) != 0
    }

    pub fn lot_sequence(&self) -> bool {
        (self.flags & LOT_SEQUENCE_KEY) != 0
    }

    /// The address salt.
    pub fn salt(&self) -> &EkSalt {
        &self.salt
    }

    /// The raw entropy field.
    pub fn entropy(&self) -> &EkEntropy {
        &self.entropy
    }

    /// The passphrase salt: four bytes when lot/sequence is present, else all eight.
    pub fn owner_salt(&self) -> &[u8] {
        if self.lot_sequence() {
            &self.entropy[..EK_SALT_SIZE]
        } else {
            &self.entropy[..]
        }
    }

    /// The lot and sequence numbers, when the flags say they are present.
    pub fn lot_and_sequence(&self) -> Option<(u32, u32)> {
        if !self.lot_sequence() {
            return None;
        }

        let word = u32::from_be_bytes(slice::<EK_SALT_SIZE, 4, EK_ENTROPY_SIZE>(&self.entropy));
        Some((word >> SEQUENCE_BITS, word & ((1 << SEQUENCE_BITS) - 1)))
    }
}
