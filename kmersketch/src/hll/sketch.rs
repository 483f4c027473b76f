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

use crate::error::Error;
use crate::hash::KmerHasher;
use crate::hll::DEFAULT_PRECISION;
use crate::hll::MAX_PRECISION;
use crate::hll::MIN_PRECISION;
use crate::hll::rank;
use crate::hll::register_index;
use crate::source::KmerSource;
use crate::source::feed_hashed;

/// HyperLogLog sketch with one byte per register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HllSketch {
    precision: u8,
    registers: Box<[u8]>,
}

impl HllSketch {
    /// Create an empty sketch with `2^precision` registers.
    ///
    /// # Errors
    ///
    /// Returns a config error if `precision` is not in `[4, 18]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kmersketch::hll::HllSketch;
    /// let sketch = HllSketch::new(10).unwrap();
    /// assert_eq!(sketch.num_registers(), 1024);
    /// assert!(HllSketch::new(2).is_err());
    /// ```
    pub fn new(precision: u8) -> Result<Self, Error> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(Error::config_invalid(format!(
                "precision must be in [{MIN_PRECISION}, {MAX_PRECISION}], got {precision}"
            )));
        }
        Ok(Self {
            precision,
            registers: vec![0u8; 1 << precision].into_boxed_slice(),
        })
    }

    /// Build a sketch from one pass over `source`.
    pub fn from_source<S: KmerSource + ?Sized>(
        source: &S,
        hasher: &dyn KmerHasher,
        precision: u8,
    ) -> Result<Self, Error> {
        let mut sketch = Self::new(precision)?;
        feed_hashed(source, hasher, |hash| sketch.update(hash))?;
        Ok(sketch)
    }

    /// Update the sketch with a hashed value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kmersketch::hll::HllSketch;
    /// let mut sketch = HllSketch::new(8).unwrap();
    /// sketch.update(0x0123_4567_89ab_cdef);
    /// assert_eq!(sketch.num_zeros(), 255);
    /// ```
    #[inline]
    pub fn update(&mut self, hash: u64) {
        let index = register_index(hash, self.precision);
        let rank = rank(hash, self.precision);
        let register = &mut self.registers[index];
        if rank > *register {
            *register = rank;
        }
    }

    /// Fold another sketch into this one, register by register.
    ///
    /// The result equals the sketch of the concatenated streams.
    ///
    /// # Panics
    ///
    /// Panics if the precisions differ.
    pub fn merge(&mut self, other: &Self) {
        assert_eq!(
            self.precision, other.precision,
            "cannot merge HLL sketches of different precision"
        );
        for (mine, theirs) in self.registers.iter_mut().zip(other.registers.iter()) {
            *mine = (*mine).max(*theirs);
        }
    }

    /// Return the raw HyperLogLog cardinality estimate.
    ///
    /// No small-range or large-range correction is applied; an empty sketch
    /// estimates `alpha_m * m` rather than zero.
    pub fn estimate(&self) -> f64 {
        let m = self.num_registers() as f64;
        let alpha = 0.7213 / (1.0 + 1.079 / m);
        let sum: f64 = self
            .registers
            .iter()
            .map(|&register| 2f64.powi(-(register as i32)))
            .sum();
        alpha * m * m / sum
    }

    /// Theoretical relative standard error, `1.04 / sqrt(m)`.
    pub fn relative_standard_error(&self) -> f64 {
        1.04 / (self.num_registers() as f64).sqrt()
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// Number of registers that were never updated.
    pub fn num_zeros(&self) -> usize {
        self.registers.iter().filter(|&&r| r == 0).count()
    }

    /// Check if no value has been recorded.
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }
}

impl Default for HllSketch {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            registers: vec![0u8; 1 << DEFAULT_PRECISION].into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::IdentityHasher;

    #[test]
    fn test_storage_is_one_byte_per_register() {
        assert_eq!(HllSketch::new(4).unwrap().registers().len(), 16);
        assert_eq!(HllSketch::new(8).unwrap().registers().len(), 256);
        assert_eq!(HllSketch::new(14).unwrap().registers().len(), 16384);
        assert_eq!(HllSketch::default().precision(), DEFAULT_PRECISION);
    }

    #[test]
    fn test_precision_bounds() {
        assert!(HllSketch::new(MIN_PRECISION - 1).is_err());
        assert!(HllSketch::new(MAX_PRECISION + 1).is_err());
        assert!(HllSketch::new(MIN_PRECISION).is_ok());
        assert!(HllSketch::new(MAX_PRECISION).is_ok());
    }

    #[test]
    fn test_registers_never_decrease() {
        let mut sketch = HllSketch::new(4).unwrap();
        // register 3, remainder starts with 0b001
        let high = (3u64 << 60) | (1 << 57);
        sketch.update(high);
        assert_eq!(sketch.registers()[3], 3);

        // same register, larger remainder, lower rank
        sketch.update((3u64 << 60) | (1 << 59));
        assert_eq!(sketch.registers()[3], 3);
    }

    #[test]
    fn test_register_value_bounded() {
        let mut sketch = HllSketch::new(8).unwrap();
        sketch.update(0);
        assert_eq!(sketch.registers()[0], 64 - 8 + 1);
    }

    #[test]
    fn test_empty_estimate_is_raw_formula() {
        let sketch = HllSketch::new(8).unwrap();
        let m = 256.0;
        let alpha = 0.7213 / (1.0 + 1.079 / m);
        assert!(sketch.is_empty());
        assert_eq!(sketch.estimate(), alpha * m);
    }

    #[test]
    fn test_duplicates_do_not_change_sketch() {
        let values: Vec<u64> = (0..1000u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15)).collect();
        let once = HllSketch::from_source(&values, &IdentityHasher, 10).unwrap();

        let twice: Vec<u64> = values.iter().chain(values.iter()).copied().collect();
        let doubled = HllSketch::from_source(&twice, &IdentityHasher, 10).unwrap();
        assert_eq!(once, doubled);
    }

    #[test]
    fn test_merge_equals_single_pass() {
        let values: Vec<u64> = (0..5000u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15)).collect();
        let (left, right) = values.split_at(1700);

        let mut merged = HllSketch::from_source(left, &IdentityHasher, 8).unwrap();
        merged.merge(&HllSketch::from_source(right, &IdentityHasher, 8).unwrap());
        assert_eq!(merged, HllSketch::from_source(&values, &IdentityHasher, 8).unwrap());
    }

    #[test]
    #[should_panic(expected = "different precision")]
    fn test_merge_rejects_precision_mismatch() {
        let mut a = HllSketch::new(8).unwrap();
        a.merge(&HllSketch::new(9).unwrap());
    }
}
