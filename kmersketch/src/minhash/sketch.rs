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

use std::sync::Arc;

use crate::error::Error;
use crate::hash::HashFamily;
use crate::hash::KmerHasher;
use crate::source::KmerSource;
use crate::source::feed_hashed;

/// Per-permutation running minima.
#[derive(Debug, Clone)]
pub struct MinHashSketch {
    family: Arc<HashFamily>,
    values: Vec<u64>,
}

impl MinHashSketch {
    /// Create an empty sketch; every slot starts at `u64::MAX`.
    pub fn new(family: Arc<HashFamily>) -> Self {
        let values = vec![u64::MAX; family.permutations()];
        Self { family, values }
    }

    /// Build a sketch from one pass over `source`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use kmersketch::hash::{HashFamily, IdentityHasher};
    /// # use kmersketch::minhash::MinHashSketch;
    /// let family = Arc::new(HashFamily::new(64, 1).unwrap());
    /// let a = MinHashSketch::from_source(&vec![1u64, 2, 3], &IdentityHasher, family.clone()).unwrap();
    /// let b = MinHashSketch::from_source(&vec![3u64, 2, 1], &IdentityHasher, family).unwrap();
    /// assert_eq!(a.similarity(&b), 1.0);
    /// ```
    pub fn from_source<S: KmerSource + ?Sized>(
        source: &S,
        hasher: &dyn KmerHasher,
        family: Arc<HashFamily>,
    ) -> Result<Self, Error> {
        let mut sketch = Self::new(family);
        feed_hashed(source, hasher, |hash| sketch.update(hash))?;
        Ok(sketch)
    }

    /// Update every slot with the permuted images of a hashed value.
    #[inline]
    pub fn update(&mut self, hash: u64) {
        for (slot, permuted) in self.values.iter_mut().zip(self.family.apply_all(hash)) {
            if permuted < *slot {
                *slot = permuted;
            }
        }
    }

    /// Fold another sketch into this one, slot by slot.
    ///
    /// # Panics
    ///
    /// Panics if the sketches were built from different families.
    pub fn merge(&mut self, other: &Self) {
        self.check_compatible(other);
        for (mine, theirs) in self.values.iter_mut().zip(other.values.iter()) {
            *mine = (*mine).min(*theirs);
        }
    }

    /// Return the fraction of slots on which the two sketches agree.
    ///
    /// Two empty sketches agree everywhere and score `1.0`; an empty sketch
    /// against a non-empty one scores `0.0`, since permuted values are always
    /// below `u64::MAX`.
    ///
    /// # Panics
    ///
    /// Panics if the sketches were built from different families.
    pub fn similarity(&self, other: &Self) -> f64 {
        self.check_compatible(other);
        let matching = self
            .values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a == b)
            .count();
        matching as f64 / self.values.len() as f64
    }

    pub fn family(&self) -> &Arc<HashFamily> {
        &self.family
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn permutations(&self) -> usize {
        self.values.len()
    }

    /// Check if no value has been recorded.
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|&v| v == u64::MAX)
    }

    fn check_compatible(&self, other: &Self) {
        assert!(
            Arc::ptr_eq(&self.family, &other.family) || self.family == other.family,
            "MinHash sketches must share one hash family"
        );
    }
}
