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

use std::sync::Arc;

use crate::error::Error;
use crate::estimator::Estimator;
use crate::key::Key;

/// A tracker for events that are currently in flight.
///
/// Cloning an `Inflight` produces another handle to the same shared counts.
#[derive(Debug, Clone)]
pub struct Inflight {
    estimator: Arc<Estimator>,
}

impl Inflight {
    /// Creates a new `Inflight` tracker backed by an estimator of the given
    /// hash and slot sizes.
    ///
    /// Fails with [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind) under
    /// the same conditions as [`Estimator::new`].
    pub fn new(hashes: usize, slots: usize) -> Result<Self, Error> {
        Ok(Self {
            estimator: Arc::new(Estimator::new(hashes, slots)?),
        })
    }

    /// Records one in-flight event for the key.
    ///
    /// Equivalent to `incr_n(key, 1)`.
    pub fn incr<K: Key>(&self, key: K) -> (i64, Guard) {
        self.incr_n(key, 1)
    }

    /// Records `n` in-flight events for the key, returning the estimated
    /// in-flight total and a guard that subtracts `n` again when dropped.
    ///
    /// The guard retains the key's hash pair rather than the key itself, so
    /// it is `'static` and can be moved freely, e.g. into the task serving
    /// the tracked request.
    pub fn incr_n<K: Key>(&self, key: K, n: i64) -> (i64, Guard) {
        let (h1, h2) = self.estimator.hash_pair(key);
        let count = self.estimator.incr_hashed(h1, h2, n);
        let guard = Guard {
            estimator: Arc::clone(&self.estimator),
            h1,
            h2,
            n,
        };
        (count, guard)
    }

    /// Returns the estimated number of in-flight events for the key.
    pub fn get<K: Key>(&self, key: K) -> i64 {
        self.estimator.get(key)
    }
}

/// Undoes an [`Inflight`] increment when dropped.
#[must_use = "dropping the guard immediately marks the event as finished"]
#[derive(Debug)]
pub struct Guard {
    estimator: Arc<Estimator>,
    h1: u64,
    h2: u64,
    n: i64,
}

impl Drop for Guard {
    fn drop(&mut self) {
        self.estimator.incr_hashed(self.h1, self.h2, -self.n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_unwinds_increment() {
        let inflight = Inflight::new(4, 1024).unwrap();
        let (count, guard) = inflight.incr_n("key", 3);
        assert_eq!(count, 3);
        drop(guard);
        assert_eq!(inflight.get("key"), 0);
    }

    #[test]
    fn test_clone_shares_counts() {
        let inflight = Inflight::new(4, 1024).unwrap();
        let other = inflight.clone();
        let (_, _guard) = inflight.incr("key");
        assert_eq!(other.get("key"), 1);
    }

    #[test]
    fn test_guard_survives_tracker_drop() {
        let inflight = Inflight::new(4, 1024).unwrap();
        let (_, guard) = inflight.incr("key");
        let probe = inflight.clone();
        drop(inflight);
        assert_eq!(probe.get("key"), 1);
        drop(guard);
        assert_eq!(probe.get("key"), 0);
    }
}
