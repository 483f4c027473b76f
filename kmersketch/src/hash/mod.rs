// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash functions that mix raw k-mer codes before they reach a sketch.
//!
//! Every sketch consumes 64-bit values whose bits should look uniformly
//! random. Canonical k-mer codes are far from that (a 31-mer never sets its
//! top two bits), so each code is passed through a [`KmerHasher`] first. The
//! hasher is resolved once, by name, when a run is configured:
//!
//! ```
//! use kmersketch::hash::hasher_by_name;
//!
//! let hasher = hasher_by_name("murmur3").unwrap();
//! assert_eq!(hasher.name(), "murmur3");
//! assert_eq!(hasher.hash(42), hasher.hash(42));
//! assert!(hasher_by_name("md5").is_err());
//! ```
//!
//! [`HashFamily`] provides the affine permutations that MinHash layers on
//! top of the mixed values.

use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;

use crate::error::Error;

mod family;
mod xxhash;

pub use self::family::DEFAULT_FAMILY_SEED;
pub use self::family::DEFAULT_PERMUTATIONS;
pub use self::family::HashFamily;
pub use self::family::MERSENNE_61;
pub use self::xxhash::xxh64_u64;

/// Name of the hasher used when none is configured.
pub const DEFAULT_HASHER: &str = "wyhash";

/// Names accepted by [`hasher_by_name`].
pub const HASHER_NAMES: [&str; 6] = [
    "identity", "stdhash", "wyhash", "farmhash", "murmur3", "xxhash",
];

/// A pure, deterministic `u64 -> u64` mixing function.
pub trait KmerHasher: Send + Sync + fmt::Debug {
    /// Name under which the hasher is registered.
    fn name(&self) -> &'static str;

    /// Hash one k-mer code.
    fn hash(&self, kmer: u64) -> u64;
}

/// Resolve a hasher by name.
///
/// # Errors
///
/// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
/// if the name is not one of [`HASHER_NAMES`].
pub fn hasher_by_name(name: &str) -> Result<Arc<dyn KmerHasher>, Error> {
    let hasher: Arc<dyn KmerHasher> = match name {
        "identity" => Arc::new(IdentityHasher),
        "stdhash" => Arc::new(StdHasher),
        "wyhash" => Arc::new(WyHasher::default()),
        "farmhash" => Arc::new(FarmFingerprint),
        "murmur3" => Arc::new(Murmur3Hasher::default()),
        "xxhash" => Arc::new(XxHasher::default()),
        _ => {
            return Err(Error::config_invalid(format!(
                "no such hash function: {name}, expected one of [{}]",
                HASHER_NAMES.join(", ")
            ))
            .with_context("hash", name));
        }
    };
    Ok(hasher)
}

/// The hasher named by [`DEFAULT_HASHER`].
pub fn default_hasher() -> Arc<dyn KmerHasher> {
    Arc::new(WyHasher::default())
}

/// Passes codes through unchanged. Useful when the input is already uniform.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher;

impl KmerHasher for IdentityHasher {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn hash(&self, kmer: u64) -> u64 {
        kmer
    }
}

/// The standard library's `DefaultHasher` with its fixed default keys.
///
/// Deterministic for a given toolchain; the algorithm may change between
/// Rust releases.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdHasher;

impl KmerHasher for StdHasher {
    fn name(&self) -> &'static str {
        "stdhash"
    }

    fn hash(&self, kmer: u64) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        hasher.write_u64(kmer);
        hasher.finish()
    }
}

const WYP0: u64 = 0xa0761d6478bd642f;
const WYP1: u64 = 0xe7037ed1a0b428db;

#[inline]
fn wymum(a: u64, b: u64) -> (u64, u64) {
    let r = (a as u128) * (b as u128);
    (r as u64, (r >> 64) as u64)
}

/// wyhash's 64-bit integer mixer (`wyhash64(kmer, seed)`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WyHasher {
    seed: u64,
}

impl WyHasher {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl KmerHasher for WyHasher {
    fn name(&self) -> &'static str {
        "wyhash"
    }

    fn hash(&self, kmer: u64) -> u64 {
        let (a, b) = wymum(kmer ^ WYP0, self.seed ^ WYP1);
        let (lo, hi) = wymum(a ^ WYP0, b ^ WYP1);
        lo ^ hi
    }
}

/// farmhash's 64-bit integer fingerprint.
#[derive(Debug, Clone, Copy, Default)]
pub struct FarmFingerprint;

impl KmerHasher for FarmFingerprint {
    fn name(&self) -> &'static str {
        "farmhash"
    }

    fn hash(&self, kmer: u64) -> u64 {
        const K_MUL: u64 = 0x9ddfea08eb382d69;
        let mut b = kmer.wrapping_mul(K_MUL);
        b ^= b >> 44;
        b = b.wrapping_mul(K_MUL);
        b ^= b >> 41;
        b.wrapping_mul(K_MUL)
    }
}

/// Low word of MurmurHash3 x64-128 over the little-endian code bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Murmur3Hasher {
    seed: u32,
}

impl Murmur3Hasher {
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl KmerHasher for Murmur3Hasher {
    fn name(&self) -> &'static str {
        "murmur3"
    }

    fn hash(&self, kmer: u64) -> u64 {
        let (h1, _) = mur3::murmurhash3_x64_128(&kmer.to_le_bytes(), self.seed);
        h1
    }
}

/// XXH64 over the little-endian code bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct XxHasher {
    seed: u64,
}

impl XxHasher {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl KmerHasher for XxHasher {
    fn name(&self) -> &'static str {
        "xxhash"
    }

    fn hash(&self, kmer: u64) -> u64 {
        xxh64_u64(kmer, self.seed)
    }
}
