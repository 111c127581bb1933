//! Integer hashing used to fold digests into a key
//!
//! Everything here is plain wrapping integer arithmetic so keys are identical
//! across processes, platforms and compiler versions.

/// 31-multiplier polynomial hash over the characters of a string
pub(crate) fn string_hash(value: &str) -> i32 {
    value
        .chars()
        .fold(0i32, |hash, c| hash.wrapping_mul(31).wrapping_add(c as i32))
}

/// Order-independent hash of a string-to-string map
pub(crate) fn entries_hash<'a, I>(entries: I) -> i32
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    entries.into_iter().fold(0i32, |sum, (key, value)| {
        sum.wrapping_add(string_hash(key) ^ string_hash(value))
    })
}

/// Two-accumulator rolling combiner: a multiplicative hash and an additive
/// checksum over position-weighted inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RollingHash {
    count: i32,
    hash: i32,
    checksum: i64,
}

impl RollingHash {
    const SEED: i32 = 17;
    const MULTIPLIER: i32 = 37;

    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            hash: Self::SEED,
            checksum: 0,
        }
    }

    pub(crate) fn append(&mut self, value: i32) -> &mut Self {
        self.count = self.count.wrapping_add(1);
        let weighted = self.count.wrapping_mul(value);
        let mixed = weighted ^ ((weighted as u32) >> 16) as i32;

        self.hash = Self::MULTIPLIER.wrapping_mul(self.hash).wrapping_add(mixed);
        self.checksum = self.checksum.wrapping_add(weighted as i64);
        self
    }

    pub(crate) fn hash(&self) -> i32 {
        self.hash
    }

    pub(crate) fn checksum(&self) -> i64 {
        self.checksum
    }
}
