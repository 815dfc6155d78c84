//! Fixed-size byte array helpers
//!
//! Every record handled by this crate is a fixed-width byte array, so slicing,
//! concatenation and XOR are expressed over arrays with sizes checked at compile
//! time. A size mismatch fails the build through an inline `const` assertion.

use bitcoin_hashes::{sha256d, Hash};

/// Size of a SHA-256 digest.
pub const HASH_SIZE: usize = 32;

/// Size of a scrypt output split into two derived keys.
pub const LONG_HASH_SIZE: usize = 2 * HASH_SIZE;

/// Half of a hash, also the AES-256 block size.
pub const HALF: usize = HASH_SIZE / 2;

/// Quarter of a hash.
pub const QUARTER: usize = HASH_SIZE / 4;

/// Size of the SHA-256d checksum appended to every record.
pub const CHECKSUM_SIZE: usize = 4;

/// Copy `data[START..START + L]` into a new array.
pub fn slice<const START: usize, const L: usize, const N: usize>(data: &[u8; N]) -> [u8; L] {
    const { assert!(START + L <= N) };
    let mut out = [0u8; L];
    out.copy_from_slice(&data[START..START + L]);
    out
}

/// Concatenate two arrays.
pub fn splice<const A: usize, const B: usize, const O: usize>(a: &[u8; A], b: &[u8; B]) -> [u8; O] {
    const { assert!(A + B == O) };
    let mut out = [0u8; O];
    out[..A].copy_from_slice(a);
    out[A..].copy_from_slice(b);
    out
}

/// Concatenate three arrays.
pub fn splice3<const A: usize, const B: usize, const C: usize, const O: usize>(
    a: &[u8; A],
    b: &[u8; B],
    c: &[u8; C],
) -> [u8; O] {
    const { assert!(A + B + C == O) };
    let mut out = [0u8; O];
    out[..A].copy_from_slice(a);
    out[A..A + B].copy_from_slice(b);
    out[A + B..].copy_from_slice(c);
    out
}

/// Split an array into two equal halves.
pub fn split<const N: usize, const H: usize>(data: &[u8; N]) -> ([u8; H], [u8; H]) {
    const { assert!(2 * H == N) };
    (slice::<0, H, N>(data), slice::<H, H, N>(data))
}

/// XOR `L` bytes of `a` starting at `A_OFF` with `L` bytes of `b` starting at `B_OFF`.
pub fn xor_offset<const L: usize, const A_OFF: usize, const B_OFF: usize, const NA: usize, const NB: usize>(
    a: &[u8; NA],
    b: &[u8; NB],
) -> [u8; L] {
    const { assert!(A_OFF + L <= NA && B_OFF + L <= NB) };
    let mut out = [0u8; L];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = a[A_OFF + i] ^ b[B_OFF + i];
    }
    out
}

/// XOR the leading `L` bytes of two arrays.
pub fn xor_data<const L: usize, const NA: usize, const NB: usize>(a: &[u8; NA], b: &[u8; NB]) -> [u8; L] {
    xor_offset::<L, 0, 0, NA, NB>(a, b)
}

/// First four bytes of SHA-256d over `data`.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let hash = sha256d::Hash::hash(data).to_byte_array();
    slice::<0, CHECKSUM_SIZE, HASH_SIZE>(&hash)
}

/// Append the checksum of `payload` to produce a checked record of size `N`.
pub fn insert_checksum<const P: usize, const N: usize>(payload: &[u8; P]) -> [u8; N] {
    const { assert!(P + CHECKSUM_SIZE == N) };
    splice(payload, &checksum(payload))
}

/// Verify the trailing checksum of a checked record.
pub fn verify_checksum(record: &[u8]) -> bool {
    if record.len() < CHECKSUM_SIZE {
        return false;
    }

    let (payload, check) = record.split_at(record.len() - CHECKSUM_SIZE);
    checksum(payload) == check
}
