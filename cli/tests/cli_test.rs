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

use assert_cmd::Command;
use kmersketch::hash::hasher_by_name;
use kmersketch::hll::HllSketch;
use kmersketch::source::FastxSource;
use predicates::prelude::*;
use tempfile::TempDir;

const GENOME_A: &str = "ACGTTGCATGCATGCAAGGCTTAACCGGTATAGCCGATCGATCGGATCCTAGGCATTACG";
const GENOME_B: &str = "TTTTGGGGCCCCAAAATTTGGGCCCAGATTACAGATTACACATCATCATGGTGGTGGACAC";

fn fasta(dir: &Path, name: &str, seq: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!(">{name}\n{seq}\n")).unwrap();
    path
}

fn kmersketch() -> Command {
    let mut cmd = Command::cargo_bin("kmersketch").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixtures() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let a = fasta(dir.path(), "a.fa", GENOME_A);
    let b = fasta(dir.path(), "b.fa", GENOME_B);
    (dir, a, b)
}

#[test]
fn test_fm_prints_distinct_kmers() {
    let (_dir, a, _) = fixtures();
    kmersketch()
        .args(["-k", "11", "fm"])
        .arg(&a)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Distinct kmers: "));
}

#[test]
fn test_hll_prints_integer() {
    let (_dir, a, _) = fixtures();
    kmersketch()
        .args(["hll", "--precision", "10", "--hash", "murmur3"])
        .arg(&a)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\n$").unwrap());
}

#[test]
fn test_hll_estimate_is_truncated() {
    let (_dir, a, _) = fixtures();
    let source = FastxSource::new(&a, 11).unwrap();
    let hasher = hasher_by_name("xxhash").unwrap();
    let estimate = HllSketch::from_source(&source, hasher.as_ref(), 6)
        .unwrap()
        .estimate();
    kmersketch()
        .args(["-k", "11", "hll", "--precision", "6", "--hash", "xxhash"])
        .arg(&a)
        .assert()
        .success()
        .stdout(format!("{}\n", estimate as u64));
}

#[test]
fn test_jaccard_matrix() {
    let (_dir, a, b) = fixtures();
    kmersketch()
        .args(["-k", "15", "jaccard"])
        .arg(&a)
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("1 1 0\n1 1 0\n0 0 1\n"));
}

#[test]
fn test_minhash_zero_diagonal() {
    let (_dir, a, b) = fixtures();
    kmersketch()
        .args(["--diagonal", "zero", "-k", "15", "minhash", "-n", "16"])
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("0 "));
}

#[test]
fn test_fracminhash_runs_single_threaded() {
    let (_dir, a, b) = fixtures();
    let output = kmersketch()
        .args(["--threads", "1", "-k", "9", "fracminhash", "--scale", "1", "--dedup"])
        .arg(&a)
        .arg(&b)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn test_unknown_hash_is_reported() {
    let (_dir, a, _) = fixtures();
    kmersketch()
        .args(["hll", "--hash", "sha1"])
        .arg(&a)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no such hash function: sha1"));
}

#[test]
fn test_invalid_precision_is_reported() {
    let (_dir, a, _) = fixtures();
    kmersketch()
        .args(["hll", "--precision", "40"])
        .arg(&a)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ConfigInvalid"));
}

#[test]
fn test_missing_file_blanks_its_row() {
    let (dir, a, _) = fixtures();
    kmersketch()
        .args(["jaccard"])
        .arg(&a)
        .arg(dir.path().join("missing.fa"))
        .assert()
        .code(1)
        .stdout("1 -\n- -\n")
        .stderr(predicate::str::contains("SourceRead"));
}

#[test]
fn test_missing_arguments_are_usage_errors() {
    kmersketch().arg("minhash").assert().code(2);
    kmersketch().assert().code(2);
    kmersketch()
        .args(["hll", "--precision", "many", "reads.fa"])
        .assert()
        .code(2);
}
