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

//! Exact and sketched similarity matrices over overlapping code ranges.

use kmersketch::hash::HashFamily;
use kmersketch::hash::default_hasher;
use kmersketch::matrix::Diagonal;
use kmersketch::matrix::ExactJaccard;
use kmersketch::matrix::FracMinHashJaccard;
use kmersketch::matrix::MinHashJaccard;
use kmersketch::matrix::SimilarityMatrixBuilder;

fn main() {
    println!("=== Similarity Example ===\n");

    // each source overlaps the next by half
    let sources: Vec<Vec<u64>> = (0..4u64)
        .map(|i| (i * 10_000..i * 10_000 + 20_000).collect())
        .collect();

    println!("1. Exact Jaccard:");
    let exact = SimilarityMatrixBuilder::new(ExactJaccard)
        .try_build(&sources)
        .unwrap();
    print!("{exact}");

    println!("\n2. MinHash, 200 permutations:");
    let estimator = MinHashJaccard::new(default_hasher(), HashFamily::new(200, 1).unwrap());
    let minhash = SimilarityMatrixBuilder::new(estimator)
        .try_build(&sources)
        .unwrap();
    print!("{minhash}");

    println!("\n3. FracMinHash, scale 0.05, self-similarity on the diagonal:");
    let estimator = FracMinHashJaccard::new(default_hasher(), 0.05, 12).unwrap();
    let frac = SimilarityMatrixBuilder::new(estimator)
        .diagonal(Diagonal::SelfSimilarity)
        .try_build(&sources)
        .unwrap();
    print!("{frac}");
}
