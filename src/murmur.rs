//! Murmur3 (x86, 32-bit) hashing for keyed-store bucket selection.
//!
//! Keys are hashed as their raw bytes in 4-byte little-endian words, the
//! 1-3 trailing bytes are folded into one final word, and the result is
//! finished with the usual avalanche. The seed defaults to 0 so bucket
//! placement is reproducible across runs.

use core::hash::{BuildHasher, Hasher};

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;
const N: u32 = 0xe654_6b64;

#[inline]
fn scramble(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

#[inline]
fn mix_block(h: u32, k: u32) -> u32 {
    let h = h ^ scramble(k);
    h.rotate_left(13).wrapping_mul(5).wrapping_add(N)
}

#[inline]
fn finish(h: u32, tail: u32, len: u32) -> u32 {
    let mut h = h ^ scramble(tail);
    h ^= len;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// One-shot Murmur3 over `bytes`.
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut h = seed;
    let mut blocks = bytes.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h = mix_block(h, k);
    }
    let tail = blocks
        .remainder()
        .iter()
        .rev()
        .fold(0u32, |k, &b| (k << 8) | u32::from(b));
    finish(h, tail, bytes.len() as u32)
}

/// Streaming form of [`murmur3_32`]. Feeding the same bytes across any
/// number of `write` calls yields the same value as the one-shot function.
#[derive(Clone, Debug)]
pub struct Murmur3Hasher {
    h: u32,
    tail: u32,
    tail_len: u32,
    len: u32,
}

impl Murmur3Hasher {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            h: seed,
            tail: 0,
            tail_len: 0,
            len: 0,
        }
    }

    /// The 32-bit digest. `finish` returns the same value widened to `u64`.
    pub fn finish32(&self) -> u32 {
        finish(self.h, self.tail, self.len)
    }
}

impl Default for Murmur3Hasher {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Hasher for Murmur3Hasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.tail |= u32::from(b) << (8 * self.tail_len);
            self.tail_len += 1;
            if self.tail_len == 4 {
                self.h = mix_block(self.h, self.tail);
                self.tail = 0;
                self.tail_len = 0;
            }
        }
        self.len = self.len.wrapping_add(bytes.len() as u32);
    }

    fn finish(&self) -> u64 {
        u64::from(self.finish32())
    }
}

/// `BuildHasher` producing seeded [`Murmur3Hasher`]s.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BuildMurmur3 {
    seed: u32,
}

impl BuildMurmur3 {
    pub const fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl BuildHasher for BuildMurmur3 {
    type Hasher = Murmur3Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Murmur3Hasher::with_seed(self.seed)
    }
}
