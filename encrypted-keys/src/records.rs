//! Checked BIP38 records
//!
//! Each record is held as its decoded payload followed by the 4-byte SHA-256d
//! checksum, the form that Base58 encodes to the familiar `6P...`, `cfrm38...`
//! and `passphrase...` strings. Holding a record does not imply it is valid;
//! the parsers in [`crate::parse`] verify magic, context and checksum.

use core::fmt;
use core::str::FromStr;

use crate::error::{Error, ParseError, Result};
use crate::types::{EK_PRIVATE_DECODED_SIZE, EK_PUBLIC_DECODED_SIZE, EK_TOKEN_DECODED_SIZE};

/// Implements the constructors, accessors and text conversions shared by the
/// checked record newtypes.
macro_rules! checked_record {
    ($(#[$attr:meta])* $name:ident, $len:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Size of the checked record in bytes.
            pub const SIZE: usize = $len;

            /// Wrap a checked byte array.
            pub const fn from_byte_array(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Copy a checked record from a slice of exactly [`Self::SIZE`] bytes.
            pub fn from_slice(slice: &[u8]) -> Result<Self> {
                let bytes: [u8; $len] = slice.try_into().map_err(|_| {
                    Error::Parse(ParseError::InvalidLength {
                        expected: $len,
                        actual: slice.len(),
                    })
                })?;
                Ok(Self(bytes))
            }

            /// Decode from Base58 text. The checksum is carried, not verified.
            pub fn from_base58(s: &str) -> Result<Self> {
                let data = base58ck::decode(s).map_err(|_| Error::Base58)?;
                Self::from_slice(&data)
            }

            /// Encode as Base58 text.
            pub fn to_base58(&self) -> String {
                base58ck::encode(&self.0)
            }

            /// The checked bytes.
            pub fn as_byte_array(&self) -> &[u8; $len] {
                &self.0
            }

            /// Convert to the checked byte array.
            pub fn to_byte_array(self) -> [u8; $len] {
                self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_base58())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_base58())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_base58(s)
            }
        }

        #[cfg(feature = "serde")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_base58())
            }
        }

        #[cfg(feature = "serde")]
        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_base58(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

checked_record!(
    /// An encrypted private key (`6P...` on mainnet).
    EncryptedPrivate,
    EK_PRIVATE_DECODED_SIZE
);

checked_record!(
    /// An encrypted public key, called a confirmation code in BIP38 (`cfrm38...`).
    EncryptedPublic,
    EK_PUBLIC_DECODED_SIZE
);

checked_record!(
    /// An intermediate passphrase code (`passphrase...`).
    EncryptedToken,
    EK_TOKEN_DECODED_SIZE
);
