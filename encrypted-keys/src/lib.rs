//! Encrypted Keys Library
//!
//! BIP38 passphrase-protected private keys for Bitcoin-style P2PKH addresses:
//! encryption of existing secrets, intermediate passphrase tokens, and keys
//! created by EC multiplication on behalf of a passphrase owner together with
//! their confirmation codes.
//!
//! ```no_run
//! use encrypted_keys::{Bip38Builder, Network};
//! use secp256k1::SecretKey;
//!
//! let secret = SecretKey::from_slice(&[0x11; 32]).unwrap();
//! let builder = Bip38Builder::new().passphrase("TestingOneTwoThree").network(Network::Bitcoin);
//! let encrypted = builder.encrypt(&secret).unwrap();
//! let decrypted = encrypted.decrypt("TestingOneTwoThree").unwrap();
//! assert_eq!(decrypted.secret, secret);
//! ```
//!
//! All operations are synchronous and free of shared state. Scrypt at
//! N=16384 dominates their cost.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(test)]
#[macro_use]
mod test_macros;

#[cfg(test)]
mod bip38_tests;

pub mod address;
pub mod bip38;
pub mod builder;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod parse;
pub mod records;
pub mod types;

pub use secp256k1;

pub use address::{Network, PaymentAddress};
#[cfg(feature = "rand")]
pub use bip38::{generate_key_pair, generate_token, generate_token_lot};
pub use bip38::{
    ConfirmedKeyPair, DecryptedPoint, DecryptedSecret, KeyPair, create_key_pair,
    create_key_pair_with_confirmation, create_token, create_token_lot, decrypt, decrypt_public,
    encrypt,
};
pub use builder::Bip38Builder;
pub use error::{Error, ParseError, Result};
pub use records::{EncryptedPrivate, EncryptedPublic, EncryptedToken};
pub use types::{EK_MAX_LOT, EK_MAX_SEQUENCE, EkEntropy, EkSalt, EkSeed};
