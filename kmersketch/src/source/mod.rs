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

//! Streams of k-mer codes that sketches are built from.
//!
//! A [`KmerSource`] is a finite, single-pass producer of 64-bit codes. Each
//! call to [`KmerSource::for_each_kmer`] performs a fresh pass (a file source
//! reopens its file), so the same source can feed several sketches.

use crate::error::Error;
use crate::hash::KmerHasher;

mod fastx;

pub use self::fastx::CanonicalKmers;
pub use self::fastx::DEFAULT_KMER_SIZE;
pub use self::fastx::FastxSource;
pub use self::fastx::MAX_KMER_SIZE;

/// A producer of k-mer codes.
pub trait KmerSource: Send + Sync {
    /// Feed every k-mer code of one pass to `f`, in stream order.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceRead`](crate::error::ErrorKind::SourceRead) error if
    /// the underlying data cannot be read. Codes delivered before the error
    /// must be discarded by the caller.
    fn for_each_kmer(&self, f: &mut dyn FnMut(u64)) -> Result<(), Error>;

    /// A short human readable name, used in logs and error context.
    fn describe(&self) -> String;
}

impl KmerSource for [u64] {
    fn for_each_kmer(&self, f: &mut dyn FnMut(u64)) -> Result<(), Error> {
        self.iter().for_each(|&kmer| f(kmer));
        Ok(())
    }

    fn describe(&self) -> String {
        format!("<{} in-memory k-mers>", self.len())
    }
}

impl KmerSource for Vec<u64> {
    fn for_each_kmer(&self, f: &mut dyn FnMut(u64)) -> Result<(), Error> {
        self.as_slice().for_each_kmer(f)
    }

    fn describe(&self) -> String {
        self.as_slice().describe()
    }
}

impl<S: KmerSource + ?Sized> KmerSource for &S {
    fn for_each_kmer(&self, f: &mut dyn FnMut(u64)) -> Result<(), Error> {
        (**self).for_each_kmer(f)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Run one pass over `source`, handing each hashed code to `update`.
///
/// Returns the number of k-mers seen (duplicates included).
pub fn feed_hashed<S: KmerSource + ?Sized>(
    source: &S,
    hasher: &dyn KmerHasher,
    mut update: impl FnMut(u64),
) -> Result<u64, Error> {
    let mut seen = 0u64;
    source.for_each_kmer(&mut |kmer| {
        seen += 1;
        update(hasher.hash(kmer));
    })?;
    Ok(seen)
}
