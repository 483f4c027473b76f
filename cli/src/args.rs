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

//! Command line arguments.

use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use kmersketch::fracminhash::DEFAULT_SCALE;
use kmersketch::hash::DEFAULT_FAMILY_SEED;
use kmersketch::hash::DEFAULT_HASHER;
use kmersketch::hash::DEFAULT_PERMUTATIONS;
use kmersketch::hll::DEFAULT_PRECISION;
use kmersketch::matrix::Diagonal;
use kmersketch::source::DEFAULT_KMER_SIZE;

/// Estimate k-mer cardinality and similarity of sequence files
#[derive(Debug, Parser)]
#[command(name = "kmersketch", version)]
#[command(long_about = "
Estimate the number of distinct k-mers in a FASTA/FASTQ file, or compare
several files pairwise with exact or sketched Jaccard similarity.

Common Usage:

  # Distinct k-mers with HyperLogLog
  kmersketch hll --precision 12 reads.fa

  # Pairwise MinHash similarity of three genomes
  kmersketch minhash -k 21 a.fa b.fa c.fa.gz

  # FracMinHash on 8 threads, zeros on the diagonal
  kmersketch --threads 8 --diagonal zero fracminhash --scale 0.01 *.fa
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// K-mer length, between 1 and 32
    #[arg(short = 'k', long, global = true, default_value_t = DEFAULT_KMER_SIZE)]
    pub kmer_size: u8,

    /// Worker threads for sketching files (defaults to one per core)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Value placed on the diagonal of similarity matrices
    #[arg(long, global = true, value_enum, default_value_t = DiagonalArg::One)]
    pub diagonal: DiagonalArg,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Flajolet-Martin estimate of distinct k-mers
    Fm(FmArgs),

    /// HyperLogLog estimate of distinct k-mers
    Hll(HllArgs),

    /// Exact pairwise Jaccard similarity
    Jaccard(JaccardArgs),

    /// MinHash estimate of pairwise Jaccard similarity
    Minhash(MinHashArgs),

    /// FracMinHash estimate of pairwise Jaccard similarity
    Fracminhash(FracMinHashArgs),
}

#[derive(Debug, Args)]
pub struct HashArgs {
    /// Hash function applied to k-mer codes
    /// [identity, stdhash, wyhash, farmhash, murmur3, xxhash]
    #[arg(long = "hash", default_value = DEFAULT_HASHER)]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct FmArgs {
    pub file: PathBuf,

    #[command(flatten)]
    pub hash: HashArgs,
}

#[derive(Debug, Args)]
pub struct HllArgs {
    pub file: PathBuf,

    /// Register index bits; the sketch keeps 2^precision registers
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    pub precision: u8,

    #[command(flatten)]
    pub hash: HashArgs,
}

#[derive(Debug, Args)]
pub struct JaccardArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MinHashArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Number of permutations (sketch slots)
    #[arg(short = 'n', long, default_value_t = DEFAULT_PERMUTATIONS)]
    pub permutations: usize,

    /// Seed for drawing the permutation coefficients
    #[arg(long, default_value_t = DEFAULT_FAMILY_SEED)]
    pub seed: u64,

    #[command(flatten)]
    pub hash: HashArgs,
}

#[derive(Debug, Args)]
pub struct FracMinHashArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Fraction of the hash space to retain, in (0, 1]
    #[arg(short, long, default_value_t = DEFAULT_SCALE)]
    pub scale: f64,

    /// HyperLogLog precision used for cardinality estimates
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    pub precision: u8,

    /// Collapse repeated hashes in each sketch
    #[arg(long)]
    pub dedup: bool,

    #[command(flatten)]
    pub hash: HashArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DiagonalArg {
    One,
    Zero,
    #[value(name = "self")]
    SelfSimilarity,
}

impl From<DiagonalArg> for Diagonal {
    fn from(arg: DiagonalArg) -> Self {
        match arg {
            DiagonalArg::One => Diagonal::One,
            DiagonalArg::Zero => Diagonal::Zero,
            DiagonalArg::SelfSimilarity => Diagonal::SelfSimilarity,
        }
    }
}
