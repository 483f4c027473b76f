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

//! Shared utilities for sketches.

mod random;

pub use self::random::RandomSource;
pub use self::random::XorShift64;

/// Divide two counts, mapping an empty comparison to a fixed value.
///
/// Returns `on_empty` when both `numerator` and `denominator` are zero and
/// `0.0` when only the denominator is zero.
pub(crate) fn ratio_or(numerator: f64, denominator: f64, on_empty: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else if numerator == 0.0 {
        on_empty
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::ratio_or;

    #[test]
    fn test_ratio_or() {
        assert_eq!(ratio_or(1.0, 4.0, 1.0), 0.25);
        assert_eq!(ratio_or(0.0, 0.0, 1.0), 1.0);
        assert_eq!(ratio_or(3.0, 0.0, 1.0), 0.0);
    }
}
