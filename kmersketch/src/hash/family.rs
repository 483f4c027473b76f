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

use crate::common::RandomSource;
use crate::common::XorShift64;
use crate::error::Error;

/// The Mersenne prime `2^61 - 1`, modulus of every [`HashFamily`].
pub const MERSENNE_61: u64 = (1 << 61) - 1;

/// Default number of permutations in a MinHash family.
pub const DEFAULT_PERMUTATIONS: usize = 100;

/// Default seed for coefficient generation.
pub const DEFAULT_FAMILY_SEED: u64 = 1;

/// A family of affine hash functions `h_i(x) = (a_i * x + b_i) mod p` with
/// `p = 2^61 - 1`, `a_i` in `[1, p)` and `b_i` in `[0, p)`.
///
/// Each member simulates one random permutation for MinHash. Every sketch
/// compared in one run must be built from the same family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFamily {
    a: Vec<u64>,
    b: Vec<u64>,
}

impl HashFamily {
    /// Draw `permutations` coefficient pairs from a generator seeded with `seed`.
    ///
    /// The same `(permutations, seed)` always yields the same family.
    ///
    /// # Errors
    ///
    /// Returns a config error if `permutations` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kmersketch::hash::HashFamily;
    /// let family = HashFamily::new(100, 1).unwrap();
    /// assert_eq!(family.permutations(), 100);
    /// assert_eq!(family, HashFamily::new(100, 1).unwrap());
    /// ```
    pub fn new(permutations: usize, seed: u64) -> Result<Self, Error> {
        check_permutations(permutations)?;
        let mut rng = XorShift64::seeded(seed);
        let mut a = Vec::with_capacity(permutations);
        let mut b = Vec::with_capacity(permutations);
        for _ in 0..permutations {
            a.push(1 + rng.next_below(MERSENNE_61 - 1));
            b.push(rng.next_below(MERSENNE_61));
        }
        Ok(Self { a, b })
    }

    /// Build a family from explicit coefficients.
    ///
    /// # Errors
    ///
    /// Returns a config error if the slices are empty or differ in length, if
    /// any `a_i` is outside `[1, p)` or any `b_i` is outside `[0, p)`.
    pub fn from_coefficients(a: Vec<u64>, b: Vec<u64>) -> Result<Self, Error> {
        check_permutations(a.len())?;
        if a.len() != b.len() {
            return Err(Error::config_invalid(format!(
                "coefficient arrays differ in length: a has {}, b has {}",
                a.len(),
                b.len()
            )));
        }
        if let Some(i) = a.iter().position(|&v| v == 0 || v >= MERSENNE_61) {
            return Err(Error::config_invalid(format!(
                "a[{i}] = {} is outside [1, 2^61 - 1)",
                a[i]
            )));
        }
        if let Some(i) = b.iter().position(|&v| v >= MERSENNE_61) {
            return Err(Error::config_invalid(format!(
                "b[{i}] = {} is outside [0, 2^61 - 1)",
                b[i]
            )));
        }
        Ok(Self { a, b })
    }

    /// Number of member functions.
    pub fn permutations(&self) -> usize {
        self.a.len()
    }

    pub fn a(&self) -> &[u64] {
        &self.a
    }

    pub fn b(&self) -> &[u64] {
        &self.b
    }

    /// Evaluate member `i` on `x`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.permutations()`.
    #[inline]
    pub fn apply(&self, i: usize, x: u64) -> u64 {
        affine_mod_mersenne(self.a[i], self.b[i], x)
    }

    /// Iterate `h_i(x)` for every member in order.
    pub fn apply_all(&self, x: u64) -> impl Iterator<Item = u64> + '_ {
        self.a
            .iter()
            .zip(self.b.iter())
            .map(move |(&a, &b)| affine_mod_mersenne(a, b, x))
    }
}

fn check_permutations(permutations: usize) -> Result<(), Error> {
    if permutations == 0 {
        return Err(Error::config_invalid(
            "permutation count must be positive, got 0",
        ));
    }
    Ok(())
}

/// `(a * x + b) mod (2^61 - 1)` without overflow.
#[inline]
fn affine_mod_mersenne(a: u64, b: u64, x: u64) -> u64 {
    // a, b < 2^61 and x < 2^64, so the sum stays below 2^126
    let v = (a as u128) * (x as u128) + b as u128;
    let p = MERSENNE_61 as u128;
    let folded = (v & p) + (v >> 61);
    let mut r = (folded & p) + (folded >> 61);
    if r >= p {
        r -= p;
    }
    r as u64
}
