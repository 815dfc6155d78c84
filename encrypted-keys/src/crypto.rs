//! Thin wrappers over the hashing, cipher, KDF and curve primitives used by BIP38.

use aes::Aes256;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use bitcoin_hashes::{Hash, sha256d};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::{HALF, HASH_SIZE, LONG_HASH_SIZE, split};
use crate::error::Result;

/// A 32-byte hash digest.
pub type HashDigest = [u8; HASH_SIZE];

/// A serialized compressed curve point.
pub type EcCompressed = [u8; 33];

// Arbitrary scrypt parameters from BIP38, as log2(N), r, p.
const TOKEN_LOG_N: u8 = 14;
const TOKEN_R: u32 = 8;
const TOKEN_P: u32 = 8;
const PAIR_LOG_N: u8 = 10;
const PAIR_R: u32 = 1;
const PAIR_P: u32 = 1;

/// The two halves of a 64-byte scrypt output.
///
/// `derived1` is XORed against plaintext, `derived2` is the AES-256 key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKeys {
    pub derived1: HashDigest,
    pub derived2: HashDigest,
}

impl DerivedKeys {
    fn from_long_hash(mut long_hash: [u8; LONG_HASH_SIZE]) -> Self {
        let (derived1, derived2) = split(&long_hash);
        long_hash.zeroize();
        Self {
            derived1,
            derived2,
        }
    }
}

/// Passphrase-bound derivation of the owner pass factor (N=16384, r=8, p=8).
pub fn scrypt_token(data: &[u8], salt: &[u8]) -> Result<HashDigest> {
    let params = scrypt::Params::new(TOKEN_LOG_N, TOKEN_R, TOKEN_P, HASH_SIZE)?;
    let mut out = [0u8; HASH_SIZE];
    scrypt::scrypt(data, salt, &params, &mut out)?;
    Ok(out)
}

/// Passphrase-bound derivation for non-multiplied keys (N=16384, r=8, p=8).
pub fn scrypt_private(data: &[u8], salt: &[u8]) -> Result<DerivedKeys> {
    let params = scrypt::Params::new(TOKEN_LOG_N, TOKEN_R, TOKEN_P, LONG_HASH_SIZE)?;
    let mut out = [0u8; LONG_HASH_SIZE];
    scrypt::scrypt(data, salt, &params, &mut out)?;
    Ok(DerivedKeys::from_long_hash(out))
}

/// Point-bound derivation for multiplied keys (N=1024, r=1, p=1).
pub fn scrypt_pair(data: &[u8], salt: &[u8]) -> Result<DerivedKeys> {
    let params = scrypt::Params::new(PAIR_LOG_N, PAIR_R, PAIR_P, LONG_HASH_SIZE)?;
    let mut out = [0u8; LONG_HASH_SIZE];
    scrypt::scrypt(data, salt, &params, &mut out)?;
    Ok(DerivedKeys::from_long_hash(out))
}

/// Unicode NFC form of the passphrase, as UTF-8 bytes.
pub fn normalize(passphrase: &str) -> Vec<u8> {
    passphrase.nfc().collect::<String>().into_bytes()
}

/// SHA-256d.
pub fn bitcoin_hash(data: &[u8]) -> HashDigest {
    sha256d::Hash::hash(data).to_byte_array()
}

/// Encrypt one AES block in place.
pub fn aes256_encrypt(key: &HashDigest, block: &mut [u8; HALF]) {
    let cipher = Aes256::new(GenericArray::from_slice(key));
    cipher.encrypt_block(GenericArray::from_mut_slice(block));
}

/// Decrypt one AES block in place.
pub fn aes256_decrypt(key: &HashDigest, block: &mut [u8; HALF]) {
    let cipher = Aes256::new(GenericArray::from_slice(key));
    cipher.decrypt_block(GenericArray::from_mut_slice(block));
}

/// Interpret a 32-byte value as a secret key.
pub fn to_secret(secret: &HashDigest) -> Result<SecretKey> {
    Ok(SecretKey::from_slice(secret)?)
}

/// Compressed public point of a 32-byte secret.
pub fn secret_to_public(secret: &HashDigest) -> Result<PublicKey> {
    let secp = Secp256k1::signing_only();
    Ok(PublicKey::from_secret_key(&secp, &to_secret(secret)?))
}

/// Multiply a point by a 32-byte factor.
pub fn ec_multiply_point(point: &PublicKey, factor: &HashDigest) -> Result<PublicKey> {
    let secp = Secp256k1::verification_only();
    let scalar = Scalar::from_be_bytes(*factor)?;
    Ok(point.mul_tweak(&secp, &scalar)?)
}

/// Multiply a secret by a 32-byte factor.
pub fn ec_multiply_secret(secret: &HashDigest, factor: &HashDigest) -> Result<SecretKey> {
    let scalar = Scalar::from_be_bytes(*factor)?;
    Ok(to_secret(secret)?.mul_tweak(&scalar)?)
}
