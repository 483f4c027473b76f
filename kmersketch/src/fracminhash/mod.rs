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

//! FracMinHash (ModHash) sketches.
//!
//! A FracMinHash sketch keeps every hashed value at or below
//! `scale * u64::MAX`, so it retains about `scale * |A|` values of a set `A`.
//! Unlike MinHash its size grows with the input, which keeps the estimates
//! accurate when the compared sets differ a lot in size.
//!
//! Similarity is estimated in two steps. [`FracMinHashSketch::containment`]
//! estimates `|A ∩ B| / |A|` from the overlap of the two retained
//! sequences, correcting for the chance that a set of `|A|` elements keeps
//! nothing at all. [`jaccard_from_containment`] then turns the asymmetric
//! containment into a Jaccard estimate given cardinality estimates of both
//! sets (in practice from [`HllSketch`](crate::hll::HllSketch)).
//!
//! # Duplicates
//!
//! By default repeated hashes are retained as separate entries and matched
//! pairwise during intersection, so k-mers that occur several times in both
//! inputs count several times. [`FracMinHashBuilder::deduplicate`] switches
//! to set semantics.

mod sketch;

pub use self::sketch::FracMinHashBuilder;
pub use self::sketch::FracMinHashSketch;

/// Default fraction of the hash space that is retained.
pub const DEFAULT_SCALE: f64 = 0.1;

/// Convert the containment of `A` in `B` into a Jaccard estimate.
///
/// Returns `c * |A| / (|A| + |B| - c * |A|)`, clamped to `[0, 1]`. Two empty
/// sets score `1.0` and a zero estimated intersection scores `0.0`. An
/// estimated intersection reaching half the summed sizes scores `1.0`; small
/// inputs at low scales overshoot there since `c` can exceed one.
///
/// # Examples
///
/// ```
/// # use kmersketch::fracminhash::jaccard_from_containment;
/// // A = {1, 2, 3}, B = {2, 3, 4}: containment 2/3, Jaccard 2/4
/// let j = jaccard_from_containment(2.0 / 3.0, 3.0, 3.0);
/// assert!((j - 0.5).abs() < 1e-12);
/// ```
pub fn jaccard_from_containment(containment: f64, size_a: f64, size_b: f64) -> f64 {
    let union = size_a + size_b;
    if union == 0.0 {
        return 1.0;
    }
    let shared = containment * size_a;
    if shared <= 0.0 {
        return 0.0;
    }
    let rest = union - shared;
    if rest <= shared {
        return 1.0;
    }
    shared / rest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jaccard_from_containment() {
        assert_eq!(jaccard_from_containment(1.0, 10.0, 10.0), 1.0);
        assert_eq!(jaccard_from_containment(0.0, 10.0, 20.0), 0.0);
        // A inside B, |B| = 2|A|
        assert_eq!(jaccard_from_containment(1.0, 10.0, 20.0), 0.5);
    }

    #[test]
    fn test_jaccard_from_containment_degenerate() {
        assert_eq!(jaccard_from_containment(0.0, 0.0, 0.0), 1.0);
        assert_eq!(jaccard_from_containment(0.0, 0.0, 5.0), 0.0);
    }

    #[test]
    fn test_jaccard_from_containment_overshoot() {
        // one retained hash of ~320 k-mers at scale 0.001: c is about 3.65
        let size = 320.54;
        let c = 1.0 / (1.0 - (1.0 - 0.001f64).powf(size));
        assert_eq!(jaccard_from_containment(c, size, size), 1.0);
        assert_eq!(jaccard_from_containment(1.2, 10.0, 10.0), 1.0);
        assert_eq!(jaccard_from_containment(1.0, 10.0, 5.0), 1.0);
        assert_eq!(jaccard_from_containment(-0.5, 10.0, 10.0), 0.0);
    }
}
