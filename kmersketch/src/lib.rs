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

//! Cardinality and similarity sketches for genomic k-mer sets.
//!
//! Every estimator consumes a [`KmerSource`](source::KmerSource), a
//! single-pass stream of 64-bit k-mer codes, mixed through a
//! [`KmerHasher`](hash::KmerHasher):
//!
//! - [`fm::FlajoletMartin`]: one-register, order-of-magnitude cardinality.
//! - [`hll::HllSketch`]: HyperLogLog cardinality.
//! - [`exact::ExactKmerSet`]: exact sets and Jaccard index, the baseline.
//! - [`minhash::MinHashSketch`]: fixed-size Jaccard estimation.
//! - [`fracminhash::FracMinHashSketch`]: scaled sampling with containment
//!   and cardinality-aware Jaccard estimation.
//!
//! [`matrix::SimilarityMatrixBuilder`] compares many sources pairwise,
//! building each sketch once.
//!
//! # Examples
//!
//! ```
//! use kmersketch::hash::default_hasher;
//! use kmersketch::hll::HllSketch;
//!
//! let kmers: Vec<u64> = (0..100_000).collect();
//! let sketch = HllSketch::from_source(&kmers, default_hasher().as_ref(), 12).unwrap();
//! let error = (sketch.estimate() - 100_000.0).abs() / 100_000.0;
//! assert!(error < 3.0 * sketch.relative_standard_error());
//! ```

pub mod common;
pub mod error;
pub mod exact;
pub mod fm;
pub mod fracminhash;
pub mod hash;
pub mod hll;
pub mod matrix;
pub mod minhash;
pub mod source;
