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

//! Cardinality estimators side by side on synthetic k-mer codes.

use kmersketch::common::RandomSource;
use kmersketch::common::XorShift64;
use kmersketch::exact::ExactKmerSet;
use kmersketch::fm::FlajoletMartin;
use kmersketch::hash::default_hasher;
use kmersketch::hll::HllSketch;

fn main() {
    println!("=== Cardinality Example ===\n");

    let mut rng = XorShift64::seeded(42);
    let codes: Vec<u64> = (0..50_000).map(|_| rng.next_below(1 << 40)).collect();
    let hasher = default_hasher();

    let exact = ExactKmerSet::from_source(&codes).unwrap();
    let actual = exact.len() as f64;
    println!("Actual distinct codes: {}", exact.len());

    let fm = FlajoletMartin::from_source(&codes, hasher.as_ref()).unwrap();
    println!("Flajolet-Martin estimate: {}", fm.estimate());

    for precision in [6, 10, 14] {
        let sketch = HllSketch::from_source(&codes, hasher.as_ref(), precision).unwrap();
        let estimate = sketch.estimate();
        let error = ((estimate - actual) / actual * 100.0).abs();
        println!(
            "HyperLogLog p={precision:<2} estimate: {estimate:.2} (error {error:.2}%, expected ~{:.2}%)",
            sketch.relative_standard_error() * 100.0
        );
    }

    println!("\nAdding the same codes again...");
    let mut sketch = HllSketch::from_source(&codes, hasher.as_ref(), 10).unwrap();
    let before = sketch.estimate();
    for &code in &codes {
        sketch.update(hasher.hash(code));
    }
    println!("Estimate before: {before:.2}, after: {:.2}", sketch.estimate());
}
