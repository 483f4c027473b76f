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

//! MinHash similarity sketches.
//!
//! Each of the `n` members of a [`HashFamily`](crate::hash::HashFamily)
//! simulates a random permutation of the hash space. A sketch keeps, per
//! member, the minimum permuted value over the whole input. For two inputs
//! `A` and `B` each slot matches with probability `J(A, B)`, so the fraction
//! of matching slots is an unbiased Jaccard estimate with variance shrinking
//! as `1 / n`.

mod sketch;

pub use self::sketch::MinHashSketch;
