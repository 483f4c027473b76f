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

//! XXH64 specialized to a single 64-bit input.

const P1: u64 = 0x9E3779B185EBCA87;
const P2: u64 = 0xC2B2AE3D27D4EB4F;
const P3: u64 = 0x165667B19E3779F9;
const P4: u64 = 0x85EBCA77C2B2AE63;
const P5: u64 = 0x27D4EB2F165667C5;

/// XXH64 of the 8 little-endian bytes of `input`.
///
/// Equivalent to streaming `input.to_le_bytes()` through a full XXH64
/// hasher, without the 32-byte stripe machinery.
#[inline]
pub fn xxh64_u64(input: u64, seed: u64) -> u64 {
    let mut hash = seed.wrapping_add(P5).wrapping_add(8);
    hash ^= round(0, input);
    hash = hash.rotate_left(27).wrapping_mul(P1).wrapping_add(P4);
    avalanche(hash)
}

#[inline]
fn round(acc: u64, input: u64) -> u64 {
    acc.wrapping_add(input.wrapping_mul(P2))
        .rotate_left(31)
        .wrapping_mul(P1)
}

#[inline]
fn avalanche(mut hash: u64) -> u64 {
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(P2);
    hash ^= hash >> 29;
    hash = hash.wrapping_mul(P3);
    hash ^ (hash >> 32)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference XXH64 for inputs shorter than one 32-byte stripe.
    fn xxh64_short(input: &[u8], seed: u64) -> u64 {
        assert!(input.len() < 32);
        let mut hash = seed.wrapping_add(P5).wrapping_add(input.len() as u64);
        let mut chunks = input.chunks_exact(8);
        for chunk in &mut chunks {
            let k1 = u64::from_le_bytes(chunk.try_into().unwrap());
            hash ^= round(0, k1);
            hash = hash.rotate_left(27).wrapping_mul(P1).wrapping_add(P4);
        }
        let mut rest = chunks.remainder();
        if rest.len() >= 4 {
            let k1 = u32::from_le_bytes(rest[..4].try_into().unwrap()) as u64;
            hash ^= k1.wrapping_mul(P1);
            hash = hash.rotate_left(23).wrapping_mul(P2).wrapping_add(P3);
            rest = &rest[4..];
        }
        for &byte in rest {
            hash ^= (byte as u64).wrapping_mul(P5);
            hash = hash.rotate_left(11).wrapping_mul(P1);
        }
        avalanche(hash)
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(xxh64_short(&[], 0), 0xEF46DB3751D8E999);
        assert_eq!(xxh64_short(&[0], 0), 0xE934A84ADB052768);
        assert_eq!(xxh64_short(&[], 0x9E3779B1), 0xAC75FDA2929B17EF);
    }

    #[test]
    fn test_u64_matches_byte_input() {
        for (value, seed) in [(0u64, 0u64), (123, 0), (u64::MAX, 7), (0xAC67, 9001)] {
            assert_eq!(xxh64_u64(value, seed), xxh64_short(&value.to_le_bytes(), seed));
        }
    }
}
