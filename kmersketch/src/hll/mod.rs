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

//! HyperLogLog sketch for cardinality estimation.
//!
//! # Overview
//!
//! The sketch keeps `m = 2^p` one-byte registers, where `p` is the
//! *precision*. The top `p` bits of each hashed value pick a register; the
//! remaining bits give a *rank*, the position of their first set bit. Each
//! register keeps the largest rank it has seen, and the estimate is the
//! bias-corrected harmonic mean
//!
//! ```text
//! alpha_m * m^2 / sum_j 2^(-register_j),   alpha_m = 0.7213 / (1 + 1.079 / m)
//! ```
//!
//! # Accuracy
//!
//! The relative standard error is about `1.04 / sqrt(m)`. This is the raw
//! estimator: neither the small-range linear-counting correction nor the
//! large-range correction is applied, so the estimate is only reliable for
//! cardinalities roughly between `2.5 m` and `2^32 / 30`.

mod sketch;

pub use self::sketch::HllSketch;

/// Smallest accepted precision.
pub const MIN_PRECISION: u8 = 4;

/// Largest accepted precision.
pub const MAX_PRECISION: u8 = 18;

/// Default precision (`m = 256` registers).
pub const DEFAULT_PRECISION: u8 = 8;

/// Register index: the top `precision` bits of `hash`.
#[inline]
fn register_index(hash: u64, precision: u8) -> usize {
    (hash >> (64 - precision)) as usize
}

/// Rank of the bits below the register index: leading zeros plus one.
///
/// The index bits are shifted out and the vacated low bits are filled with
/// ones, so the rank never exceeds `64 - precision + 1`.
#[inline]
fn rank(hash: u64, precision: u8) -> u8 {
    let mask = (1u64 << precision) - 1;
    ((hash << precision) | mask).leading_zeros() as u8 + 1
}
