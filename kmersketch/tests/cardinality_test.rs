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

use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use googletest::prelude::near;
use kmersketch::common::RandomSource;
use kmersketch::common::XorShift64;
use kmersketch::fm::FlajoletMartin;
use kmersketch::hash::IdentityHasher;
use kmersketch::hash::hasher_by_name;
use kmersketch::hll::HllSketch;

/// `n` distinct pseudo-random values; xorshift does not repeat within its period.
fn distinct_values(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = XorShift64::seeded(seed);
    (0..n).map(|_| rng.next_u64()).collect()
}

fn assert_within_three_standard_errors(precision: u8, n: usize) {
    let values = distinct_values(n, 0x5eed + precision as u64);
    let sketch = HllSketch::from_source(&values, &IdentityHasher, precision).unwrap();
    let n = n as f64;
    let tolerance = 3.0 * sketch.relative_standard_error() * n;
    assert_that!(sketch.estimate(), near(n, tolerance));
}

#[test]
fn test_hll_relative_error_p8() {
    assert_within_three_standard_errors(8, 200_000);
}

#[test]
fn test_hll_relative_error_p10() {
    assert_within_three_standard_errors(10, 200_000);
}

#[test]
fn test_hll_relative_error_p12() {
    assert_within_three_standard_errors(12, 200_000);
}

#[test]
fn test_hll_duplicates_do_not_inflate() {
    let values = distinct_values(50_000, 7);
    let repeated: Vec<u64> = values.iter().cycle().take(values.len() * 4).copied().collect();
    let once = HllSketch::from_source(&values, &IdentityHasher, 10).unwrap();
    let many = HllSketch::from_source(&repeated, &IdentityHasher, 10).unwrap();
    assert_eq!(once.estimate(), many.estimate());
}

#[test]
fn test_hll_with_named_hasher_on_sequential_codes() {
    // consecutive integers look nothing like uniform bits until hashed
    let codes: Vec<u64> = (0..100_000).collect();
    let hasher = hasher_by_name("murmur3").unwrap();
    let sketch = HllSketch::from_source(&codes, hasher.as_ref(), 12).unwrap();
    let tolerance = 3.0 * sketch.relative_standard_error() * 100_000.0;
    assert_that!(sketch.estimate(), near(100_000.0, tolerance));
}

#[test]
fn test_hll_merge_of_partitions() {
    let values = distinct_values(30_000, 11);
    let mut merged = HllSketch::new(10).unwrap();
    for chunk in values.chunks(7_000) {
        merged.merge(&HllSketch::from_source(chunk, &IdentityHasher, 10).unwrap());
    }
    let whole = HllSketch::from_source(&values, &IdentityHasher, 10).unwrap();
    assert_eq!(merged, whole);
}

#[test]
fn test_flajolet_martin_order_of_magnitude() {
    let values = distinct_values(1 << 16, 3);
    let fm = FlajoletMartin::from_source(&values, &IdentityHasher).unwrap();
    // single register: only the order of magnitude is meaningful
    assert_that!(fm.estimate(), ge(1u64 << 12));
    assert_that!(fm.estimate(), le(1u64 << 24));
}
