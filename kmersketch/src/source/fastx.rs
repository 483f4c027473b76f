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

use std::path::Path;
use std::path::PathBuf;

use needletail::errors::ParseError;
use needletail::errors::ParseErrorKind;
use tracing::debug;

use crate::error::Error;
use crate::source::KmerSource;

/// Default k-mer length.
pub const DEFAULT_KMER_SIZE: u8 = 31;

/// Largest k-mer length that fits a 2-bit code in 64 bits.
pub const MAX_KMER_SIZE: u8 = 32;

/// A FASTA or FASTQ file (plain or compressed) read as canonical k-mers.
///
/// Every call to [`for_each_kmer`](KmerSource::for_each_kmer) reopens the
/// file. An empty file yields no k-mers.
#[derive(Debug, Clone)]
pub struct FastxSource {
    path: PathBuf,
    k: u8,
}

impl FastxSource {
    /// Create a source reading `k`-mers from `path`.
    ///
    /// The file is not touched until the first pass.
    ///
    /// # Errors
    ///
    /// Returns a config error if `k` is not in `[1, 32]`.
    pub fn new(path: impl Into<PathBuf>, k: u8) -> Result<Self, Error> {
        check_kmer_size(k)?;
        Ok(Self {
            path: path.into(),
            k,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn k(&self) -> u8 {
        self.k
    }

    fn read_error(&self, err: ParseError) -> Error {
        Error::from(err).with_context("source", self.path.display())
    }
}

impl KmerSource for FastxSource {
    fn for_each_kmer(&self, f: &mut dyn FnMut(u64)) -> Result<(), Error> {
        // compressed files are only known to be empty after decoding
        let mut reader = match needletail::parse_fastx_file(&self.path) {
            Ok(reader) => reader,
            Err(err) if matches!(err.kind, ParseErrorKind::EmptyFile) => {
                debug!(path = %self.path.display(), "empty sequence file");
                return Ok(());
            }
            Err(err) => return Err(self.read_error(err)),
        };

        let mut records = 0u64;
        let mut kmers = 0u64;
        while let Some(record) = reader.next() {
            let record =
                record.map_err(|err| self.read_error(err).with_context("record", records))?;
            records += 1;
            for kmer in CanonicalKmers::new(&record.seq(), self.k) {
                kmers += 1;
                f(kmer);
            }
        }

        debug!(path = %self.path.display(), records, kmers, "read sequence file");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn check_kmer_size(k: u8) -> Result<(), Error> {
    if !(1..=MAX_KMER_SIZE).contains(&k) {
        return Err(Error::config_invalid(format!(
            "k-mer size must be in [1, {MAX_KMER_SIZE}], got {k}"
        )));
    }
    Ok(())
}

#[inline]
fn encode_base(base: u8) -> Option<u64> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' => Some(3),
        _ => None,
    }
}

/// Iterator over the canonical 2-bit codes of every k-mer in a sequence.
///
/// A k-mer's code is the smaller of its forward encoding and the encoding of
/// its reverse complement (`A=0, C=1, G=2, T=3`, first base in the most
/// significant position). Bytes other than `ACGT` (either case) break the
/// window; no k-mer spans them.
#[derive(Debug, Clone)]
pub struct CanonicalKmers<'a> {
    seq: &'a [u8],
    pos: usize,
    k: u8,
    filled: u8,
    mask: u64,
    shift: u32,
    forward: u64,
    reverse: u64,
}

impl<'a> CanonicalKmers<'a> {
    /// # Panics
    ///
    /// Panics if `k` is not in `[1, 32]`.
    pub fn new(seq: &'a [u8], k: u8) -> Self {
        assert!(
            (1..=MAX_KMER_SIZE).contains(&k),
            "k must be in [1, {MAX_KMER_SIZE}], got {k}"
        );
        let mask = if k == MAX_KMER_SIZE {
            u64::MAX
        } else {
            (1u64 << (2 * k)) - 1
        };
        Self {
            seq,
            pos: 0,
            k,
            filled: 0,
            mask,
            shift: 2 * (k as u32 - 1),
            forward: 0,
            reverse: 0,
        }
    }
}

impl Iterator for CanonicalKmers<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        while let Some(&base) = self.seq.get(self.pos) {
            self.pos += 1;
            let Some(code) = encode_base(base) else {
                self.filled = 0;
                continue;
            };
            self.forward = ((self.forward << 2) | code) & self.mask;
            self.reverse = (self.reverse >> 2) | ((3 - code) << self.shift);
            if self.filled < self.k {
                self.filled += 1;
            }
            if self.filled == self.k {
                return Some(self.forward.min(self.reverse));
            }
        }
        None
    }
}
