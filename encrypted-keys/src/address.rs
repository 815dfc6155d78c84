//! Pay-to-public-key-hash addresses
//!
//! BIP38 binds every encrypted key to the text of its P2PKH address: the first
//! four bytes of SHA-256d over the encoded address serve as both scrypt salt and
//! passphrase check.

use core::fmt;

use bitcoin_hashes::{Hash, hash160};
use secp256k1::{PublicKey, Secp256k1, SecretKey};

use crate::codec::{HASH_SIZE, slice};
use crate::crypto::bitcoin_hash;
use crate::types::EkSalt;

/// Network type for address encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Network {
    /// Bitcoin mainnet
    Bitcoin,
    /// Bitcoin testnet
    Testnet,
    /// Bitcoin regtest
    Regtest,
}

impl Network {
    /// Get P2PKH version byte
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Bitcoin => 0x00, // '1' prefix
            Network::Testnet => 0x6f, // 'm' or 'n' prefix
            Network::Regtest => 0x6f,
        }
    }

    /// Network for a P2PKH version byte, if it is a known one.
    ///
    /// Testnet and regtest share a version, so `0x6f` maps to testnet.
    pub fn from_p2pkh_version(version: u8) -> Option<Self> {
        match version {
            0x00 => Some(Network::Bitcoin),
            0x6f => Some(Network::Testnet),
            _ => None,
        }
    }
}

/// A P2PKH payment address for an arbitrary version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaymentAddress {
    /// The address version byte
    pub version: u8,
    /// The hash160 of the serialized public key
    pub hash: hash160::Hash,
}

impl PaymentAddress {
    /// Create an address from a public key, hashing its compressed or uncompressed form.
    pub fn from_point(point: &PublicKey, version: u8, compressed: bool) -> Self {
        let hash = if compressed {
            hash160::Hash::hash(&point.serialize())
        } else {
            hash160::Hash::hash(&point.serialize_uncompressed())
        };

        Self {
            version,
            hash,
        }
    }

    /// Create an address from a secret key.
    pub fn from_secret(secret: &SecretKey, version: u8, compressed: bool) -> Self {
        let secp = Secp256k1::signing_only();
        Self::from_point(&PublicKey::from_secret_key(&secp, secret), version, compressed)
    }

    /// Base58Check text of the address.
    pub fn encoded(&self) -> String {
        let mut data = Vec::with_capacity(21);
        data.push(self.version);
        data.extend_from_slice(self.hash.as_byte_array());
        base58ck::encode_check(&data)
    }

    /// SHA-256d of the encoded address text.
    pub fn hash_of_encoded(&self) -> [u8; HASH_SIZE] {
        bitcoin_hash(self.encoded().as_bytes())
    }

    /// The BIP38 address salt: the first four bytes of [`Self::hash_of_encoded`].
    pub fn salt(&self) -> EkSalt {
        slice::<0, 4, HASH_SIZE>(&self.hash_of_encoded())
    }

    /// Whether `salt` was derived from this address.
    pub fn validate(&self, salt: &EkSalt) -> bool {
        self.salt() == *salt
    }
}

impl fmt::Display for PaymentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded())
    }
}
