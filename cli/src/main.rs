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

mod args;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use kmersketch::fm::FlajoletMartin;
use kmersketch::hash::HashFamily;
use kmersketch::hash::hasher_by_name;
use kmersketch::hll::HllSketch;
use kmersketch::matrix::ExactJaccard;
use kmersketch::matrix::FracMinHashJaccard;
use kmersketch::matrix::MinHashJaccard;
use kmersketch::matrix::SimilarityEstimator;
use kmersketch::matrix::SimilarityMatrixBuilder;
use kmersketch::source::FastxSource;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;
use crate::args::Commands;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.as_str()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    match &cli.command {
        Commands::Fm(args) => {
            let hasher = hasher_by_name(&args.hash.name)?;
            let source = FastxSource::new(&args.file, cli.kmer_size)?;
            let fm = FlajoletMartin::from_source(&source, hasher.as_ref())?;
            println!("Distinct kmers: {}", fm.estimate());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Hll(args) => {
            let hasher = hasher_by_name(&args.hash.name)?;
            let source = FastxSource::new(&args.file, cli.kmer_size)?;
            let sketch = HllSketch::from_source(&source, hasher.as_ref(), args.precision)?;
            // truncated toward zero
            println!("{}", sketch.estimate() as u64);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Jaccard(args) => print_matrix(cli, ExactJaccard, &args.files),
        Commands::Minhash(args) => {
            let hasher = hasher_by_name(&args.hash.name)?;
            let family = HashFamily::new(args.permutations, args.seed)?;
            print_matrix(cli, MinHashJaccard::new(hasher, family), &args.files)
        }
        Commands::Fracminhash(args) => {
            let hasher = hasher_by_name(&args.hash.name)?;
            let estimator = FracMinHashJaccard::new(hasher, args.scale, args.precision)?
                .deduplicate(args.dedup);
            print_matrix(cli, estimator, &args.files)
        }
    }
}

/// Print the matrix over `files`. Rows of unreadable files are printed as
/// `-` and turn the exit code into a failure.
fn print_matrix<E: SimilarityEstimator>(
    cli: &Cli,
    estimator: E,
    files: &[PathBuf],
) -> anyhow::Result<ExitCode> {
    let sources = files
        .iter()
        .map(|path| FastxSource::new(path, cli.kmer_size))
        .collect::<Result<Vec<_>, _>>()?;
    let build = SimilarityMatrixBuilder::new(estimator)
        .diagonal(cli.diagonal.into())
        .build_lenient(&sources);

    let mut out = std::io::stdout().lock();
    write!(out, "{}", build.matrix).context("failed to write matrix")?;
    out.flush().context("failed to write matrix")?;

    for failure in &build.failures {
        eprintln!("error: {}", failure.error);
    }
    if build.failures.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
