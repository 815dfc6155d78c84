//! Sizes, flags and fixed-width value types shared by the BIP38 records.

/// The maximum lot value for token creation (2^20 - 1).
pub const EK_MAX_LOT: u32 = 1_048_575;

/// The maximum sequence value for token creation (2^12 - 1).
pub const EK_MAX_SEQUENCE: u32 = 4095;

/// Number of low bits of the lot/sequence word that hold the sequence.
pub const SEQUENCE_BITS: u32 = 12;

pub const EK_SALT_SIZE: usize = 4;
pub const EK_ENTROPY_SIZE: usize = 8;
pub const EK_SEED_SIZE: usize = 24;

/// Address-derived salt, also the typo check of an encrypted key.
pub type EkSalt = [u8; EK_SALT_SIZE];

/// Owner salt, optionally followed by the big-endian lot/sequence word.
pub type EkEntropy = [u8; EK_ENTROPY_SIZE];

/// Random seed used to create a multiplied key pair.
pub type EkSeed = [u8; EK_SEED_SIZE];

/// Payload sizes, excluding the checksum.
pub const EK_PRIVATE_PAYLOAD_SIZE: usize = 39;
pub const EK_PUBLIC_PAYLOAD_SIZE: usize = 51;
pub const EK_TOKEN_PAYLOAD_SIZE: usize = 49;

/// Checked sizes, including the checksum.
pub const EK_PRIVATE_DECODED_SIZE: usize = EK_PRIVATE_PAYLOAD_SIZE + 4;
pub const EK_PUBLIC_DECODED_SIZE: usize = EK_PUBLIC_PAYLOAD_SIZE + 4;
pub const EK_TOKEN_DECODED_SIZE: usize = EK_TOKEN_PAYLOAD_SIZE + 4;

/// BIP38 flag bits.
///
/// BIP38 asks that the unused bits not be repurposed to mark alt-chain keys.
pub mod flags {
    pub const LOT_SEQUENCE_KEY: u8 = 1 << 2;
    pub const EC_COMPRESSED_KEY: u8 = 1 << 5;
    pub const EC_NON_MULTIPLIED_LOW: u8 = 1 << 6;
    pub const EC_NON_MULTIPLIED_HIGH: u8 = 1 << 7;

    /// Both bits together mean "not multiplied".
    pub const EC_NON_MULTIPLIED: u8 = EC_NON_MULTIPLIED_LOW | EC_NON_MULTIPLIED_HIGH;

    /// Assemble a flags byte.
    pub fn set_flags(compressed: bool, lot_sequence: bool, multiplied: bool) -> u8 {
        let mut byte = 0;

        if compressed {
            byte |= EC_COMPRESSED_KEY;
        }

        if lot_sequence {
            byte |= LOT_SEQUENCE_KEY;
        }

        if !multiplied {
            byte |= EC_NON_MULTIPLIED;
        }

        byte
    }
}

#[cfg(test)]
mod tests {
    use super::flags::*;

    #[test]
    fn test_set_flags() {
        assert_eq!(set_flags(false, false, false), 0xc0);
        assert_eq!(set_flags(true, false, false), 0xe0);
        assert_eq!(set_flags(false, false, true), 0x00);
        assert_eq!(set_flags(true, true, true), 0x24);
        assert_eq!(set_flags(false, true, true), 0x04);
    }
}
