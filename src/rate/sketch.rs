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
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::Instant;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::estimator::Estimator;
use crate::key::Key;

/// Default number of hashes (rows) for a rate tracker's estimators.
pub const DEFAULT_RATE_HASHES: usize = 4;

/// Default number of slots (columns per row) for a rate tracker's estimators.
pub const DEFAULT_RATE_SLOTS: usize = 1024;

/// A probabilistic rate estimator over a fixed interval.
///
/// `Rate` owns two estimators. At any instant one is active and accumulates
/// the in-progress interval; the other is inactive and holds the previous
/// interval's totals, which is what [`Rate::get`] reports. Once the interval
/// elapses, the first operation to notice rotates the pair: the stale buffer
/// is cleared, becomes active, and the buffer that was accumulating becomes
/// readable. Rotation is lazy, so interval boundaries are anchored to traffic
/// rather than to a wall-clock grid.
///
/// Exactly one caller wins the rotation for a given boundary; the losers
/// proceed without mutating anything. If no operation arrives for two or more
/// full intervals, both buffers hold stale data, and the next rotation clears
/// them both.
#[derive(Debug)]
pub struct Rate {
    estimators: [Estimator; 2],
    // Index of the estimator accepting writes for the current interval.
    active: AtomicUsize,
    start: Instant,
    interval_ms: i64,
    last_rotation_ms: AtomicI64,
}

impl Rate {
    /// Creates a new `Rate` that reports totals over the provided interval,
    /// with estimators of the given hash and slot sizes.
    ///
    /// Fails with [`ErrorKind::ConfigInvalid`] if the interval is shorter
    /// than one millisecond or does not fit in `i64` milliseconds, or if the
    /// estimator sizes are invalid.
    pub fn new(interval: Duration, hashes: usize, slots: usize) -> Result<Self, Error> {
        if interval < Duration::from_millis(1) {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "interval must be 1 millisecond or greater",
            )
            .with_context("interval", format!("{interval:?}")));
        }
        let Ok(interval_ms) = i64::try_from(interval.as_millis()) else {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "interval exceeds the representable range of milliseconds",
            )
            .with_context("interval", format!("{interval:?}")));
        };

        Ok(Self {
            estimators: [Estimator::new(hashes, slots)?, Estimator::new(hashes, slots)?],
            active: AtomicUsize::new(0),
            start: Instant::now(),
            interval_ms,
            last_rotation_ms: AtomicI64::new(0),
        })
    }

    /// Returns the estimated number of events for the key in the previous
    /// interval.
    ///
    /// Returns 0 when no rotation has happened for two or more intervals, in
    /// which case even the previous interval's buffer is too stale to report.
    pub fn get<K: Key>(&self, key: K) -> i64 {
        let past_ms = self.maybe_rotate();
        if past_ms >= self.interval_ms.saturating_mul(2) {
            return 0;
        }
        let inactive = 1 - self.active.load(Ordering::Acquire);
        self.estimators[inactive].get(key)
    }

    /// Records one event for the key.
    ///
    /// Equivalent to `observe_n(key, 1)`.
    pub fn observe<K: Key>(&self, key: K) -> i64 {
        self.observe_n(key, 1)
    }

    /// Records `n` events for the key, returning the estimated total for the
    /// current, still-accumulating interval.
    pub fn observe_n<K: Key>(&self, key: K, n: i64) -> i64 {
        self.maybe_rotate();
        let active = self.active.load(Ordering::Acquire);
        self.estimators[active].incr_n(key, n)
    }

    /// Rotates the buffers if the interval has elapsed, returning the
    /// milliseconds since the last rotation as observed before any attempt.
    ///
    /// A single compare-and-swap on the rotation timestamp elects the winner;
    /// everyone else returns immediately and proceeds with whatever state the
    /// winner published. The winner clears the buffer that is about to start
    /// accumulating, then flips the selector. Past two idle intervals the
    /// outgoing buffer is stale as well and is cleared too.
    fn maybe_rotate(&self) -> i64 {
        let now_ms = self.start.elapsed().as_millis() as i64;
        let last_rotation = self.last_rotation_ms.load(Ordering::Relaxed);
        let past_ms = now_ms - last_rotation;

        if past_ms < self.interval_ms {
            return past_ms;
        }

        if self
            .last_rotation_ms
            .compare_exchange(last_rotation, now_ms, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            let active = self.active.load(Ordering::Acquire);
            self.estimators[1 - active].reset();
            self.active.store(1 - active, Ordering::Release);

            if past_ms >= self.interval_ms.saturating_mul(2) {
                self.estimators[active].reset();
            }
        }

        past_ms
    }
}
