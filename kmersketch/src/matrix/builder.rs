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

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::Error;
use crate::matrix::Diagonal;
use crate::matrix::MatrixBuild;
use crate::matrix::SimilarityEstimator;
use crate::matrix::SimilarityMatrix;
use crate::matrix::SourceFailure;
use crate::source::KmerSource;

/// Builds similarity matrices with one estimator.
#[derive(Debug, Clone)]
pub struct SimilarityMatrixBuilder<E> {
    estimator: E,
    diagonal: Diagonal,
    parallel: bool,
}

impl<E: SimilarityEstimator> SimilarityMatrixBuilder<E> {
    /// Create a builder with [`Diagonal::One`] and parallel evaluation.
    pub fn new(estimator: E) -> Self {
        Self {
            estimator,
            diagonal: Diagonal::default(),
            parallel: true,
        }
    }

    /// Set the diagonal convention.
    pub fn diagonal(mut self, diagonal: Diagonal) -> Self {
        self.diagonal = diagonal;
        self
    }

    /// Run sketch builds and pair evaluations on the rayon pool. On by
    /// default.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Build one sketch per source, in input order.
    pub fn build_sketches<S: KmerSource>(&self, sources: &[S]) -> Vec<Result<E::Sketch, Error>> {
        let build = |(index, source): (usize, &S)| self.build_one(index, source);
        if self.parallel {
            sources.par_iter().enumerate().map(build).collect()
        } else {
            sources.iter().enumerate().map(build).collect()
        }
    }

    /// Build the full matrix, failing on the first source that cannot be
    /// read.
    pub fn try_build<S: KmerSource>(&self, sources: &[S]) -> Result<SimilarityMatrix, Error> {
        info!(
            estimator = self.estimator.name(),
            sources = sources.len(),
            "building similarity matrix"
        );
        let sketches = self
            .build_sketches(sources)
            .into_iter()
            .collect::<Result<Vec<_>, Error>>()?;
        let sketches: Vec<Option<&E::Sketch>> = sketches.iter().map(Some).collect();
        Ok(self.fill(&sketches))
    }

    /// Build the matrix, leaving cells of failed sources empty.
    ///
    /// A source that cannot be read only costs its own row and column.
    pub fn build_lenient<S: KmerSource>(&self, sources: &[S]) -> MatrixBuild {
        info!(
            estimator = self.estimator.name(),
            sources = sources.len(),
            "building similarity matrix"
        );
        let mut failures = vec![];
        let mut sketches = Vec::with_capacity(sources.len());
        for (index, result) in self.build_sketches(sources).into_iter().enumerate() {
            match result {
                Ok(sketch) => sketches.push(Some(sketch)),
                Err(error) => {
                    warn!(index, source = %sources[index].describe(), %error, "skipping source");
                    failures.push(SourceFailure { index, error });
                    sketches.push(None);
                }
            }
        }
        let sketches: Vec<Option<&E::Sketch>> = sketches.iter().map(Option::as_ref).collect();
        MatrixBuild {
            matrix: self.fill(&sketches),
            failures,
        }
    }

    fn build_one<S: KmerSource>(&self, index: usize, source: &S) -> Result<E::Sketch, Error> {
        let start = Instant::now();
        let counted = Counted::new(source);
        let sketch = self
            .estimator
            .build(&counted)
            .map_err(|err| err.with_context("index", index))?;
        debug!(
            index,
            source = %source.describe(),
            kmers = counted.kmers(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built sketch"
        );
        Ok(sketch)
    }

    /// Evaluate every pair `i < j` and the diagonal over built sketches.
    fn fill(&self, sketches: &[Option<&E::Sketch>]) -> SimilarityMatrix {
        let dim = sketches.len();
        let mut matrix = SimilarityMatrix::unavailable(dim);

        let pairs: Vec<(usize, usize)> = (0..dim)
            .flat_map(|i| (i..dim).map(move |j| (i, j)))
            .collect();
        let evaluate = |&(i, j): &(usize, usize)| {
            let value = match (sketches[i], sketches[j]) {
                (Some(a), Some(b)) => Some(self.evaluate(i, j, a, b)),
                _ => None,
            };
            (i, j, value)
        };
        let values: Vec<(usize, usize, Option<f64>)> = if self.parallel {
            pairs.par_iter().map(evaluate).collect()
        } else {
            pairs.iter().map(evaluate).collect()
        };

        for (i, j, value) in values {
            if let Some(value) = value {
                matrix.set_symmetric(i, j, value);
            }
        }
        matrix
    }

    fn evaluate(&self, i: usize, j: usize, a: &E::Sketch, b: &E::Sketch) -> f64 {
        if i != j {
            return self.estimator.similarity(a, b);
        }
        match self.diagonal {
            Diagonal::One => 1.0,
            Diagonal::Zero => 0.0,
            Diagonal::SelfSimilarity => self.estimator.similarity(a, a),
        }
    }
}

/// Passes k-mers through and counts them.
struct Counted<'a, S: ?Sized> {
    inner: &'a S,
    kmers: AtomicU64,
}

impl<'a, S: KmerSource + ?Sized> Counted<'a, S> {
    fn new(inner: &'a S) -> Self {
        Self {
            inner,
            kmers: AtomicU64::new(0),
        }
    }

    fn kmers(&self) -> u64 {
        self.kmers.load(Ordering::Relaxed)
    }
}

impl<S: KmerSource + ?Sized> KmerSource for Counted<'_, S> {
    fn for_each_kmer(&self, f: &mut dyn FnMut(u64)) -> Result<(), Error> {
        let mut seen = 0u64;
        let result = self.inner.for_each_kmer(&mut |kmer| {
            seen += 1;
            f(kmer);
        });
        self.kmers.fetch_add(seen, Ordering::Relaxed);
        result
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}
