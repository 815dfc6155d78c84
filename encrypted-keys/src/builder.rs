//! Builder for BIP38 operations sharing a passphrase and address settings

use core::fmt;

use secp256k1::SecretKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::address::Network;
use crate::bip38::{self, ConfirmedKeyPair};
use crate::codec::slice;
use crate::error::{Error, Result};
use crate::records::{EncryptedPrivate, EncryptedToken};
use crate::types::{EK_ENTROPY_SIZE, EK_SALT_SIZE, EkEntropy, EkSeed};

/// Builder for BIP38 encryption and token creation
///
/// Defaults to Bitcoin mainnet addresses with uncompressed public keys.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Bip38Builder {
    passphrase: Option<String>,
    version: u8,
    compressed: bool,
    #[zeroize(skip)]
    lot_sequence: Option<(u32, u32)>,
}

impl Bip38Builder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            passphrase: None,
            version: Network::Bitcoin.p2pkh_version(),
            compressed: false,
            lot_sequence: None,
        }
    }

    /// Set the passphrase
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    /// Set the address version from a network
    pub fn network(mut self, network: Network) -> Self {
        self.version = network.p2pkh_version();
        self
    }

    /// Set an arbitrary P2PKH address version
    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Set compressed flag
    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    /// Set lot and sequence for tokens
    pub fn lot_sequence(mut self, lot: u32, sequence: u32) -> Self {
        self.lot_sequence = Some((lot, sequence));
        self
    }

    fn require_passphrase(&self) -> Result<&str> {
        self.passphrase
            .as_deref()
            .ok_or_else(|| Error::InvalidParameter("Passphrase required".into()))
    }

    /// Encrypt a private key
    pub fn encrypt(&self, secret: &SecretKey) -> Result<EncryptedPrivate> {
        bip38::encrypt(secret, self.require_passphrase()?, self.version, self.compressed)
    }

    /// Create a token from caller-supplied entropy.
    ///
    /// With a lot and sequence set, only the first four bytes are used, as the
    /// owner salt.
    pub fn token_with_entropy(&self, entropy: &EkEntropy) -> Result<EncryptedToken> {
        let passphrase = self.require_passphrase()?;

        match self.lot_sequence {
            Some((lot, sequence)) => {
                let salt = slice::<0, EK_SALT_SIZE, EK_ENTROPY_SIZE>(entropy);
                bip38::create_token_lot(passphrase, &salt, lot, sequence)
            }
            None => bip38::create_token(passphrase, entropy),
        }
    }

    /// Create a token from random entropy
    #[cfg(feature = "rand")]
    pub fn token(&self) -> Result<EncryptedToken> {
        let passphrase = self.require_passphrase()?;

        match self.lot_sequence {
            Some((lot, sequence)) => bip38::generate_token_lot(passphrase, lot, sequence),
            None => bip38::generate_token(passphrase),
        }
    }

    /// Create a key pair from a token using the configured address settings.
    ///
    /// No passphrase is needed.
    pub fn key_pair(&self, token: &EncryptedToken, seed: &EkSeed) -> Result<ConfirmedKeyPair> {
        bip38::create_key_pair_with_confirmation(token, seed, self.version, self.compressed)
    }
}

impl Default for Bip38Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bip38Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bip38Builder")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("version", &self.version)
            .field("compressed", &self.compressed)
            .field("lot_sequence", &self.lot_sequence)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_builder_requires_passphrase() {
        let secret = SecretKey::from_slice(&[0x11; 32]).unwrap();
        let builder = Bip38Builder::new();

        assert_matches!(builder.encrypt(&secret), Err(Error::InvalidParameter(_)));
        assert_matches!(builder.token_with_entropy(&[0; 8]), Err(Error::InvalidParameter(_)));
    }

    #[test]
    fn test_builder_settings() {
        let builder = Bip38Builder::default().network(Network::Testnet).compressed(true);
        assert_eq!(builder.version, 0x6f);
        assert!(builder.compressed);

        let builder = builder.version(0x30).lot_sequence(42, 24);
        assert_eq!(builder.version, 0x30);
        assert_eq!(builder.lot_sequence, Some((42, 24)));
    }

    #[test]
    fn test_debug_redacts_passphrase() {
        let builder = Bip38Builder::new().passphrase("hunter2");
        let debug = format!("{:?}", builder);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_lot_sequence_range_checked_before_derivation() {
        let builder = Bip38Builder::new().passphrase("passphrase").lot_sequence(1_048_576, 0);
        assert_matches!(
            builder.token_with_entropy(&[0xba, 0xad, 0xf0, 0x0d, 0, 0, 0, 0]),
            Err(Error::LotSequenceOutOfRange {
                lot: 1_048_576,
                sequence: 0
            })
        );
    }

    #[test]
    fn test_lot_token_uses_entropy_prefix_as_salt() {
        let token = Bip38Builder::new()
            .passphrase("passphrase")
            .lot_sequence(42, 24)
            .token_with_entropy(&[0xba, 0xad, 0xf0, 0x0d, 0xff, 0xff, 0xff, 0xff])
            .unwrap();

        assert_eq!(
            token.to_base58(),
            "passphrasecpXbDpHuvh54RYUFyPSp3i1qXjatYK8LM1K4Ujd7KVkuzEiJA8PvRdcSaSuq2J"
        );
    }
}
