//! BIP38 password-protected private keys
//!
//! BIP38 offers two ways to protect a key with a passphrase:
//!
//! 1. Non-multiplied: an existing secret is encrypted with AES-256, keyed by
//!    scrypt over the passphrase and the address salt ([`encrypt`], [`decrypt`]).
//! 2. EC-multiplied: the passphrase owner hands out an intermediate token
//!    ([`create_token`], [`create_token_lot`]), from which a third party
//!    creates encrypted keys without ever learning the secret
//!    ([`create_key_pair`], [`create_key_pair_with_confirmation`]). The owner
//!    recovers the secret with [`decrypt`] and can check a confirmation code
//!    with [`decrypt_public`].
//!
//! Every encrypted key carries the first four bytes of SHA-256d over its
//! P2PKH address, which doubles as the passphrase check on decryption.

use secp256k1::{PublicKey, SecretKey};
use tracing::debug;
use zeroize::Zeroize;

use crate::address::{Network, PaymentAddress};
use crate::codec::{HALF, HASH_SIZE, QUARTER, insert_checksum, slice, splice, splice3, split, xor_data, xor_offset};
use crate::crypto::{
    EcCompressed, HashDigest, aes256_decrypt, aes256_encrypt, bitcoin_hash, ec_multiply_point,
    ec_multiply_secret, normalize, scrypt_pair, scrypt_private, scrypt_token, secret_to_public,
    to_secret,
};
use crate::error::{Error, Result};
use crate::parse::{ParsePrivate, ParsePublic, ParseToken};
use crate::records::{EncryptedPrivate, EncryptedPublic, EncryptedToken};
use crate::types::flags::set_flags;
use crate::types::{
    EK_ENTROPY_SIZE, EK_MAX_LOT, EK_MAX_SEQUENCE, EK_PRIVATE_PAYLOAD_SIZE, EK_PUBLIC_PAYLOAD_SIZE,
    EK_SALT_SIZE, EK_SEED_SIZE, EK_TOKEN_PAYLOAD_SIZE, EkEntropy, EkSalt, EkSeed, SEQUENCE_BITS,
};

/// A secret recovered from an encrypted private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecryptedSecret {
    pub secret: SecretKey,
    /// The P2PKH address version the key was encrypted for
    pub version: u8,
    /// Whether the key's address uses the compressed public key
    pub compressed: bool,
}

impl DecryptedSecret {
    /// The payment address the secret was encrypted for.
    pub fn address(&self) -> PaymentAddress {
        PaymentAddress::from_secret(&self.secret, self.version, self.compressed)
    }

    /// The network of the address version, if it is a known one.
    pub fn network(&self) -> Option<Network> {
        Network::from_p2pkh_version(self.version)
    }
}

/// A public point recovered from a confirmation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecryptedPoint {
    pub point: PublicKey,
    pub version: u8,
    pub compressed: bool,
}

impl DecryptedPoint {
    pub fn address(&self) -> PaymentAddress {
        PaymentAddress::from_point(&self.point, self.version, self.compressed)
    }
}

/// An encrypted private key created from a token, with its public point.
///
/// Serialize the point with [`PublicKey::serialize`]; whether the key's
/// address uses the compressed form is recorded in the private key's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub private: EncryptedPrivate,
    pub point: PublicKey,
}

/// A [`KeyPair`] together with the confirmation code for the passphrase owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedKeyPair {
    pub private: EncryptedPrivate,
    pub public: EncryptedPublic,
    pub point: PublicKey,
}

impl From<ConfirmedKeyPair> for KeyPair {
    fn from(pair: ConfirmedKeyPair) -> Self {
        KeyPair {
            private: pair.private,
            point: pair.point,
        }
    }
}

/// Encrypt a secret under a passphrase (non-multiplied mode).
pub fn encrypt(
    secret: &SecretKey,
    passphrase: &str,
    version: u8,
    compressed: bool,
) -> Result<EncryptedPrivate> {
    debug!(version, compressed, "encrypting private key");

    let salt = PaymentAddress::from_secret(secret, version, compressed).salt();
    let derived = scrypt_private(&normalize(passphrase), &salt)?;

    let mut secret_bytes = secret.secret_bytes();
    let mut encrypted1: [u8; HALF] = xor_data(&secret_bytes, &derived.derived1);
    let mut encrypted2: [u8; HALF] = xor_offset::<HALF, HALF, HALF, HASH_SIZE, HASH_SIZE>(
        &secret_bytes,
        &derived.derived1,
    );
    secret_bytes.zeroize();

    aes256_encrypt(&derived.derived2, &mut encrypted1);
    aes256_encrypt(&derived.derived2, &mut encrypted2);

    let head: [u8; 7] = splice3(
        &ParsePrivate::prefix_factory(version, false),
        &[set_flags(compressed, false, false)],
        &salt,
    );
    let payload: [u8; EK_PRIVATE_PAYLOAD_SIZE] = splice3(&head, &encrypted1, &encrypted2);
    Ok(EncryptedPrivate::from_byte_array(insert_checksum(&payload)))
}

/// Decrypt an encrypted private key, multiplied or not.
///
/// Fails with [`Error::PassphraseMismatch`] when the recovered secret does not
/// hash to the salt stored in the key.
pub fn decrypt(key: &EncryptedPrivate, passphrase: &str) -> Result<DecryptedSecret> {
    let parsed = ParsePrivate::parse(key)?;
    let version = parsed.address_version();
    let compressed = parsed.compressed();
    let multiplied = parsed.multiplied();

    debug!(version, compressed, multiplied, lot_sequence = parsed.lot_sequence(), "decrypting private key");

    let secret = if multiplied {
        decrypt_multiplied(&parsed, passphrase)?
    } else {
        decrypt_non_multiplied(&parsed, passphrase)?
    };

    let address = PaymentAddress::from_secret(&secret, version, compressed);
    if !address.validate(parsed.salt()) {
        debug!("address salt mismatch on private key");
        return Err(Error::PassphraseMismatch);
    }

    Ok(DecryptedSecret {
        secret,
        version,
        compressed,
    })
}

fn decrypt_non_multiplied(parsed: &ParsePrivate, passphrase: &str) -> Result<SecretKey> {
    let derived = scrypt_private(&normalize(passphrase), parsed.salt())?;

    let mut block1: [u8; HALF] = splice(parsed.entropy(), parsed.data1());
    let mut block2 = *parsed.data2();
    aes256_decrypt(&derived.derived2, &mut block1);
    aes256_decrypt(&derived.derived2, &mut block2);

    let low: [u8; HALF] = xor_data(&block1, &derived.derived1);
    let high: [u8; HALF] = xor_offset::<HALF, 0, HALF, HALF, HASH_SIZE>(&block2, &derived.derived1);

    let mut secret: HashDigest = splice(&low, &high);
    let result = to_secret(&secret);
    secret.zeroize();
    result
}

fn decrypt_multiplied(parsed: &ParsePrivate, passphrase: &str) -> Result<SecretKey> {
    let mut factor = pass_factor(passphrase, parsed.entropy(), parsed.lot_sequence())?;
    let pass_point = secret_to_public(&factor)?.serialize();
    let derived = scrypt_pair(&pass_point, &address_entropy(parsed.salt(), parsed.entropy()))?;

    let mut block2 = *parsed.data2();
    aes256_decrypt(&derived.derived2, &mut block2);
    let decrypted2: [u8; HALF] =
        xor_offset::<HALF, 0, HALF, HALF, HASH_SIZE>(&block2, &derived.derived1);

    // The upper half of encrypted1 was carried inside encrypted2.
    let mut block1: [u8; HALF] =
        splice(parsed.data1(), &slice::<0, QUARTER, HALF>(&decrypted2));
    aes256_decrypt(&derived.derived2, &mut block1);
    let seed_low: [u8; HALF] = xor_data(&block1, &derived.derived1);

    let mut seed: EkSeed = splice(&seed_low, &slice::<QUARTER, QUARTER, HALF>(&decrypted2));
    let seed_factor = bitcoin_hash(&seed);
    seed.zeroize();

    let secret = ec_multiply_secret(&factor, &seed_factor);
    factor.zeroize();
    secret
}

/// Recover the public point of a confirmation code.
pub fn decrypt_public(key: &EncryptedPublic, passphrase: &str) -> Result<DecryptedPoint> {
    let parsed = ParsePublic::parse(key)?;
    let version = parsed.address_version();
    let compressed = parsed.compressed();

    debug!(version, compressed, lot_sequence = parsed.lot_sequence(), "decrypting confirmation code");

    let mut factor = pass_factor(passphrase, parsed.entropy(), parsed.lot_sequence())?;
    let pass_point = secret_to_public(&factor)?.serialize();
    let derived = scrypt_pair(&pass_point, &address_entropy(parsed.salt(), parsed.entropy()))?;

    let (mut low, mut high): ([u8; HALF], [u8; HALF]) = split(parsed.data());
    aes256_decrypt(&derived.derived2, &mut low);
    aes256_decrypt(&derived.derived2, &mut high);

    let x_low: [u8; HALF] = xor_data(&low, &derived.derived1);
    let x_high: [u8; HALF] = xor_offset::<HALF, 0, HALF, HALF, HASH_SIZE>(&high, &derived.derived1);
    let sign = parsed.sign() ^ (derived.derived2[HASH_SIZE - 1] & 0x01);
    let product: EcCompressed = splice3(&[sign], &x_low, &x_high);

    // A wrong passphrase usually yields bytes that are not a curve point.
    let factor_point = PublicKey::from_slice(&product).map_err(|_| {
        debug!("confirmation code does not decrypt to a point");
        Error::PassphraseMismatch
    })?;
    let point = ec_multiply_point(&factor_point, &factor);
    factor.zeroize();
    let point = point?;

    let address = PaymentAddress::from_point(&point, version, compressed);
    if !address.validate(parsed.salt()) {
        debug!("address salt mismatch on confirmation code");
        return Err(Error::PassphraseMismatch);
    }

    Ok(DecryptedPoint {
        point,
        version,
        compressed,
    })
}

/// Create an intermediate passphrase token from eight bytes of owner entropy.
pub fn create_token(passphrase: &str, entropy: &EkEntropy) -> Result<EncryptedToken> {
    debug!("creating intermediate token");
    token_from_entropy(passphrase, entropy, false)
}

/// Create an intermediate passphrase token carrying a lot and sequence number.
///
/// `lot` must not exceed [`EK_MAX_LOT`] and `sequence` must not exceed
/// [`EK_MAX_SEQUENCE`].
pub fn create_token_lot(
    passphrase: &str,
    salt: &EkSalt,
    lot: u32,
    sequence: u32,
) -> Result<EncryptedToken> {
    if lot > EK_MAX_LOT || sequence > EK_MAX_SEQUENCE {
        debug!(lot, sequence, "lot or sequence out of range");
        return Err(Error::LotSequenceOutOfRange {
            lot,
            sequence,
        });
    }

    debug!(lot, sequence, "creating intermediate token");

    let word = (lot << SEQUENCE_BITS) | sequence;
    let entropy: EkEntropy = splice(salt, &word.to_be_bytes());
    token_from_entropy(passphrase, &entropy, true)
}

fn token_from_entropy(
    passphrase: &str,
    entropy: &EkEntropy,
    lot_sequence: bool,
) -> Result<EncryptedToken> {
    let mut factor = pass_factor(passphrase, entropy, lot_sequence)?;
    let point = secret_to_public(&factor);
    factor.zeroize();

    let payload: [u8; EK_TOKEN_PAYLOAD_SIZE] =
        splice3(&ParseToken::prefix_factory(lot_sequence), entropy, &point?.serialize());
    Ok(EncryptedToken::from_byte_array(insert_checksum(&payload)))
}

/// Create an encrypted private key from a token and a 24-byte random seed.
pub fn create_key_pair(
    token: &EncryptedToken,
    seed: &EkSeed,
    version: u8,
    compressed: bool,
) -> Result<KeyPair> {
    create_key_pair_with_confirmation(token, seed, version, compressed).map(KeyPair::from)
}

/// Create an encrypted private key and its confirmation code from a token.
pub fn create_key_pair_with_confirmation(
    token: &EncryptedToken,
    seed: &EkSeed,
    version: u8,
    compressed: bool,
) -> Result<ConfirmedKeyPair> {
    let parsed = ParseToken::parse(token)?;
    let lot_sequence = parsed.lot_sequence();

    debug!(version, compressed, lot_sequence, "creating key pair from token");

    let pass_point_bytes = parsed.passpoint();
    let pass_point = PublicKey::from_slice(&pass_point_bytes)?;

    let mut factor = bitcoin_hash(seed);
    let point = ec_multiply_point(&pass_point, &factor)?;
    let salt = PaymentAddress::from_point(&point, version, compressed).salt();
    let derived = scrypt_pair(&pass_point_bytes, &address_entropy(&salt, parsed.entropy()))?;
    let flags = set_flags(compressed, lot_sequence, true);

    // Encrypted private key.
    let mut encrypted1: [u8; HALF] = xor_data(seed, &derived.derived1);
    aes256_encrypt(&derived.derived2, &mut encrypted1);

    let block2: [u8; HALF] = splice(
        &slice::<QUARTER, QUARTER, HALF>(&encrypted1),
        &slice::<HALF, QUARTER, EK_SEED_SIZE>(seed),
    );
    let mut encrypted2: [u8; HALF] =
        xor_offset::<HALF, 0, HALF, HALF, HASH_SIZE>(&block2, &derived.derived1);
    aes256_encrypt(&derived.derived2, &mut encrypted2);

    let head: [u8; 7] =
        splice3(&ParsePrivate::prefix_factory(version, true), &[flags], &salt);
    let body: [u8; QUARTER + HALF] =
        splice(&slice::<0, QUARTER, HALF>(&encrypted1), &encrypted2);
    let payload: [u8; EK_PRIVATE_PAYLOAD_SIZE] = splice3(&head, parsed.entropy(), &body);
    let private = EncryptedPrivate::from_byte_array(insert_checksum(&payload));

    // Confirmation code: the factor point, encrypted the same way.
    let factor_point = secret_to_public(&factor);
    factor.zeroize();
    let factor_point = factor_point?.serialize();

    let x: HashDigest = slice::<1, HASH_SIZE, 33>(&factor_point);
    let mut confirm1: [u8; HALF] = xor_data(&x, &derived.derived1);
    let mut confirm2: [u8; HALF] =
        xor_offset::<HALF, HALF, HALF, HASH_SIZE, HASH_SIZE>(&x, &derived.derived1);
    aes256_encrypt(&derived.derived2, &mut confirm1);
    aes256_encrypt(&derived.derived2, &mut confirm2);
    let sign = factor_point[0] ^ (derived.derived2[HASH_SIZE - 1] & 0x01);

    let head: [u8; 10] =
        splice3(&ParsePublic::prefix_factory(version), &[flags], &salt);
    let tail: [u8; 1 + HASH_SIZE] = splice3(&[sign], &confirm1, &confirm2);
    let payload: [u8; EK_PUBLIC_PAYLOAD_SIZE] = splice3(&head, parsed.entropy(), &tail);
    let public = EncryptedPublic::from_byte_array(insert_checksum(&payload));

    Ok(ConfirmedKeyPair {
        private,
        public,
        point,
    })
}

/// Generate a token from random owner entropy.
#[cfg(feature = "rand")]
pub fn generate_token(passphrase: &str) -> Result<EncryptedToken> {
    let entropy: EkEntropy = random_bytes();
    create_token(passphrase, &entropy)
}

/// Generate a lot/sequence token from a random owner salt.
#[cfg(feature = "rand")]
pub fn generate_token_lot(passphrase: &str, lot: u32, sequence: u32) -> Result<EncryptedToken> {
    let salt: EkSalt = random_bytes();
    create_token_lot(passphrase, &salt, lot, sequence)
}

/// Generate a key pair and confirmation code from a token and a random seed.
#[cfg(feature = "rand")]
pub fn generate_key_pair(
    token: &EncryptedToken,
    version: u8,
    compressed: bool,
) -> Result<ConfirmedKeyPair> {
    let mut seed: EkSeed = random_bytes();
    let pair = create_key_pair_with_confirmation(token, &seed, version, compressed);
    seed.zeroize();
    pair
}

#[cfg(feature = "rand")]
fn random_bytes<const N: usize>() -> [u8; N] {
    use rand::Rng;

    let mut bytes = [0u8; N];
    rand::thread_rng().fill(&mut bytes[..]);
    bytes
}

/// The owner's pass factor. Lot/sequence tokens rehash the scrypt output with
/// the full entropy.
fn pass_factor(passphrase: &str, entropy: &EkEntropy, lot_sequence: bool) -> Result<HashDigest> {
    let mut passphrase = normalize(passphrase);

    let factor = if lot_sequence {
        let owner_salt = slice::<0, EK_SALT_SIZE, EK_ENTROPY_SIZE>(entropy);
        let mut prefactor = scrypt_token(&passphrase, &owner_salt)?;
        let mut data: [u8; HASH_SIZE + EK_ENTROPY_SIZE] = splice(&prefactor, entropy);
        let factor = bitcoin_hash(&data);
        prefactor.zeroize();
        data.zeroize();
        factor
    } else {
        scrypt_token(&passphrase, entropy)?
    };

    passphrase.zeroize();
    Ok(factor)
}

/// The scrypt salt of multiplied keys: address salt followed by owner entropy.
fn address_entropy(salt: &EkSalt, entropy: &EkEntropy) -> [u8; EK_SALT_SIZE + EK_ENTROPY_SIZE] {
    splice(salt, entropy)
}

impl EncryptedPrivate {
    /// Decrypt this key, see [`decrypt`].
    pub fn decrypt(&self, passphrase: &str) -> Result<DecryptedSecret> {
        decrypt(self, passphrase)
    }
}

impl EncryptedPublic {
    /// Recover the public point of this confirmation code, see [`decrypt_public`].
    pub fn decrypt(&self, passphrase: &str) -> Result<DecryptedPoint> {
        decrypt_public(self, passphrase)
    }
}

impl EncryptedToken {
    /// Create a key pair from this token, see [`create_key_pair_with_confirmation`].
    pub fn key_pair(&self, seed: &EkSeed, version: u8, compressed: bool) -> Result<ConfirmedKeyPair> {
        create_key_pair_with_confirmation(self, seed, version, compressed)
    }
}
