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

//! Flajolet-Martin cardinality estimation.
//!
//! A single register holds the longest run of leading zeros seen in any
//! hashed value; the estimate is two to that power. This is an
//! order-of-magnitude baseline: one register means the estimate can only
//! take power-of-two values and its variance is high. No averaging across
//! independent trials is done. Use [`HllSketch`](crate::hll::HllSketch) when
//! the number matters.

use crate::error::Error;
use crate::hash::KmerHasher;
use crate::source::KmerSource;
use crate::source::feed_hashed;

/// Single-register Flajolet-Martin estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlajoletMartin {
    max_leading_zeros: u8,
}

impl FlajoletMartin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an estimator from one pass over `source`.
    pub fn from_source<S: KmerSource + ?Sized>(
        source: &S,
        hasher: &dyn KmerHasher,
    ) -> Result<Self, Error> {
        let mut fm = Self::new();
        feed_hashed(source, hasher, |hash| fm.update(hash))?;
        Ok(fm)
    }

    /// Record one hashed value.
    #[inline]
    pub fn update(&mut self, hash: u64) {
        let zeros = hash.leading_zeros() as u8;
        self.max_leading_zeros = self.max_leading_zeros.max(zeros);
    }

    /// Fold another estimator into this one.
    pub fn merge(&mut self, other: &Self) {
        self.max_leading_zeros = self.max_leading_zeros.max(other.max_leading_zeros);
    }

    pub fn max_leading_zeros(&self) -> u8 {
        self.max_leading_zeros
    }

    /// Return `2^l` for the longest leading-zero run `l`.
    ///
    /// A zero hash has 64 leading zeros; the estimate then saturates at
    /// `u64::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kmersketch::fm::FlajoletMartin;
    /// let mut fm = FlajoletMartin::new();
    /// assert_eq!(fm.estimate(), 1);
    /// fm.update(1 << 60);
    /// assert_eq!(fm.estimate(), 8);
    /// ```
    pub fn estimate(&self) -> u64 {
        1u64.checked_shl(self.max_leading_zeros as u32).unwrap_or(u64::MAX)
    }
}
