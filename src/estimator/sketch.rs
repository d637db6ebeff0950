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

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use crate::common::random::RandomSource;
use crate::common::random::XorShift64;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::key::Key;

/// Default number of hashes (rows) for an estimator.
pub const DEFAULT_HASHES: usize = 4;

/// Default number of slots (columns per row) for an estimator.
pub const DEFAULT_SLOTS: usize = 8192;

/// Maximum number of hashes an estimator supports.
///
/// The conservative update tracks the rows holding the minimum in a `u64`
/// bitmask, one bit per row.
pub const MAX_HASHES: usize = 64;

/// A lock-free count-min sketch estimator.
///
/// The counter grid is `hashes` rows of `slots` columns, stored flat with one
/// atomic 64-bit counter per cell. The slot count is rounded up to a power of
/// two so column selection reduces to a bitmask. Two seeds are drawn at
/// construction and each key is hashed once per seed; row `i` probes column
/// `(h1 + i * h2) mod slots`, so any number of rows costs two hash
/// evaluations. Because the seeds are private to the instance, coexisting
/// estimators map the same key to unrelated slots, and keys chosen to collide
/// in one instance do not collide elsewhere.
///
/// Counts are allowed to wrap on overflow; a caller that observes a negative
/// estimate after an overflow should treat it as saturation.
#[derive(Debug)]
pub struct Estimator {
    hashes: usize,
    slots: usize,
    seed1: u64,
    seed2: u64,
    counters: Box<[AtomicI64]>,
}

impl Estimator {
    /// Creates a new `Estimator` with the given number of hashes and slots.
    ///
    /// `slots` is rounded up to the next power of two. Fails with
    /// [`ErrorKind::ConfigInvalid`] if `hashes` is zero or exceeds
    /// [`MAX_HASHES`], or if `slots` is zero.
    pub fn new(hashes: usize, slots: usize) -> Result<Self, Error> {
        if hashes == 0 || hashes > MAX_HASHES {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                format!("hashes must be in range [1, {MAX_HASHES}]"),
            )
            .with_context("hashes", hashes));
        }
        if slots == 0 {
            return Err(Error::new(ErrorKind::ConfigInvalid, "slots must be greater than 0")
                .with_context("slots", slots));
        }
        let Some(slots) = slots.checked_next_power_of_two() else {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "slots rounded up to a power of two overflows usize",
            )
            .with_context("slots", slots));
        };

        let mut random = XorShift64::default();
        let counters = std::iter::repeat_with(|| AtomicI64::new(0))
            .take(hashes * slots)
            .collect();

        Ok(Self {
            hashes,
            slots,
            seed1: random.next_u64(),
            seed2: random.next_u64(),
            counters,
        })
    }

    /// Returns the number of hashes (rows).
    pub fn num_hashes(&self) -> usize {
        self.hashes
    }

    /// Returns the number of slots per row, after power-of-two rounding.
    pub fn num_slots(&self) -> usize {
        self.slots
    }

    /// Returns the estimated count for the provided key.
    ///
    /// The estimate is the minimum across all rows and never undercounts the
    /// total mass added for the key.
    pub fn get<K: Key>(&self, key: K) -> i64 {
        let (h1, h2) = self.hash_pair(key);
        self.get_hashed(h1, h2)
    }

    /// Increments the count for the provided key by one.
    ///
    /// Equivalent to `incr_n(key, 1)`.
    pub fn incr<K: Key>(&self, key: K) -> i64 {
        self.incr_n(key, 1)
    }

    /// Adds `n` to the count for the provided key, returning the updated
    /// estimate. `n` may be negative to undo or decay earlier increments.
    ///
    /// The update is conservative: a first pass finds the rows currently
    /// holding the key's minimum, and only those rows are mutated. Rows
    /// inflated by colliding keys are left alone, which keeps cross-key
    /// overestimation from compounding.
    ///
    /// The two passes are not atomic as a unit. Concurrent calls for the same
    /// key may interleave between them, so the returned estimate is a valid
    /// count-min state but not necessarily one a serial execution would have
    /// produced. Per-slot addition is still atomic, so no update is lost.
    pub fn incr_n<K: Key>(&self, key: K, n: i64) -> i64 {
        let (h1, h2) = self.hash_pair(key);
        self.incr_hashed(h1, h2, n)
    }

    /// Resets the estimator, returning all counts to 0.
    ///
    /// Slots are cleared one at a time; an increment racing with the reset
    /// lands either before or after its slot is zeroed, and the transient
    /// undercount corrects itself on the key's next update.
    pub fn reset(&self) {
        for counter in self.counters.iter() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn hash_pair<K: Key>(&self, key: K) -> (u64, u64) {
        (key.hash_with_seed(self.seed1), key.hash_with_seed(self.seed2))
    }

    pub(crate) fn get_hashed(&self, h1: u64, h2: u64) -> i64 {
        let mut minimum = i64::MAX;
        for row in 0..self.hashes {
            let count = self.slot(row, h1, h2).load(Ordering::Relaxed);
            minimum = minimum.min(count);
        }
        minimum
    }

    pub(crate) fn incr_hashed(&self, h1: u64, h2: u64, n: i64) -> i64 {
        // First pass: find the minimum and which rows hold it, ties included.
        let mut minimum = i64::MAX;
        let mut at_minimum = 0u64;
        for row in 0..self.hashes {
            let count = self.slot(row, h1, h2).load(Ordering::Relaxed);
            if count < minimum {
                minimum = count;
                at_minimum = 1 << row;
            } else if count == minimum {
                at_minimum |= 1 << row;
            }
        }

        // Second pass: add into the minimal rows, re-read the rest.
        let mut updated = i64::MAX;
        for row in 0..self.hashes {
            let counter = self.slot(row, h1, h2);
            let count = if at_minimum & (1 << row) != 0 {
                counter.fetch_add(n, Ordering::Relaxed).wrapping_add(n)
            } else {
                counter.load(Ordering::Relaxed)
            };
            updated = updated.min(count);
        }
        updated
    }

    #[inline]
    fn slot(&self, row: usize, h1: u64, h2: u64) -> &AtomicI64 {
        // Kirsch-Mitzenmacher double hashing; slots is a power of two.
        let mask = (self.slots - 1) as u64;
        let column = (h1.wrapping_add((row as u64).wrapping_mul(h2)) & mask) as usize;
        &self.counters[row * self.slots + column]
    }
}
