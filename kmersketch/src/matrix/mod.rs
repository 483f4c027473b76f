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

//! Pairwise similarity matrices over many sources.
//!
//! [`SimilarityMatrixBuilder`] builds one sketch per source, exactly once,
//! then fills a symmetric `N x N` matrix by evaluating a
//! [`SimilarityEstimator`] on every unordered pair. Sketch construction and
//! pair evaluation both run on the rayon thread pool unless disabled.
//!
//! ```
//! use kmersketch::matrix::{ExactJaccard, SimilarityMatrixBuilder};
//!
//! let sources = vec![vec![1u64, 2, 3], vec![2, 3, 4], vec![10]];
//! let matrix = SimilarityMatrixBuilder::new(ExactJaccard)
//!     .try_build(&sources)
//!     .unwrap();
//! assert_eq!(matrix.get(0, 1), Some(0.5));
//! assert_eq!(matrix.get(1, 0), Some(0.5));
//! assert_eq!(matrix.get(0, 2), Some(0.0));
//! assert_eq!(matrix.get(2, 2), Some(1.0));
//! ```

use std::fmt;

use crate::error::Error;

mod builder;
mod estimator;

pub use self::builder::SimilarityMatrixBuilder;
pub use self::estimator::ExactJaccard;
pub use self::estimator::FracMinHashJaccard;
pub use self::estimator::MinHashJaccard;
pub use self::estimator::SimilarityEstimator;
pub use self::estimator::SizedFracMinHash;

/// What to put on the matrix diagonal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Diagonal {
    /// Every source is fully similar to itself.
    #[default]
    One,
    /// Leave self comparisons at zero.
    Zero,
    /// Evaluate the estimator on each sketch paired with itself.
    SelfSimilarity,
}

/// A symmetric matrix of pairwise similarities.
///
/// Cells that depend on a source whose sketch could not be built are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    dim: usize,
    cells: Vec<Option<f64>>,
}

impl SimilarityMatrix {
    /// A `dim x dim` matrix with every cell unavailable.
    pub(crate) fn unavailable(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![None; dim * dim],
        }
    }

    pub(crate) fn set_symmetric(&mut self, i: usize, j: usize, value: f64) {
        self.cells[i * self.dim + j] = Some(value);
        self.cells[j * self.dim + i] = Some(value);
    }

    /// Number of rows (and columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the cell at row `i`, column `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        assert!(
            i < self.dim && j < self.dim,
            "cell ({i}, {j}) out of bounds for dimension {}",
            self.dim
        );
        self.cells[i * self.dim + j]
    }

    /// Return row `i`.
    pub fn row(&self, i: usize) -> &[Option<f64>] {
        &self.cells[i * self.dim..(i + 1) * self.dim]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        // chunks_exact panics on zero, and an empty matrix has no rows anyway
        self.cells.chunks_exact(self.dim.max(1))
    }

    /// Check if every cell holds a value.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

/// Rows on separate lines, cells separated by one space, `-` for cells
/// without a value.
impl fmt::Display for SimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            let line = row
                .iter()
                .map(|cell| match cell {
                    Some(v) => v.to_string(),
                    None => "-".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// A source whose sketch could not be built.
#[derive(Debug)]
pub struct SourceFailure {
    /// Position of the source in the input list.
    pub index: usize,
    pub error: Error,
}

/// Result of [`SimilarityMatrixBuilder::build_lenient`].
#[derive(Debug)]
pub struct MatrixBuild {
    pub matrix: SimilarityMatrix,
    /// Failed sources in input order.
    pub failures: Vec<SourceFailure>,
}
