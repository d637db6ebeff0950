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

use std::thread;
use std::time::Duration;

use googletest::assert_that;
use googletest::prelude::contains_substring;
use ratelimits::error::ErrorKind;
use ratelimits::rate::DEFAULT_RATE_HASHES;
use ratelimits::rate::DEFAULT_RATE_SLOTS;
use ratelimits::rate::Rate;

fn new_rate(interval: Duration) -> Rate {
    Rate::new(interval, DEFAULT_RATE_HASHES, DEFAULT_RATE_SLOTS).unwrap()
}

#[test]
fn test_invalid_interval() {
    let err = Rate::new(Duration::ZERO, 4, 1024).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("interval"));

    let err = Rate::new(Duration::from_micros(999), 4, 1024).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_invalid_sizes_propagate() {
    let err = Rate::new(Duration::from_secs(1), 0, 1024).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let err = Rate::new(Duration::from_secs(1), 4, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_rate_basic() {
    let key = "1";
    let rate = new_rate(Duration::from_millis(10));

    assert_eq!(rate.observe(key), 1);
    assert_eq!(rate.observe_n(key, 2), 3);
    // The first interval has not completed yet.
    assert_eq!(rate.get(key), 0);

    thread::sleep(Duration::from_millis(11));
    assert_eq!(rate.observe(key), 1);
    assert_eq!(rate.get(key), 3);

    thread::sleep(Duration::from_millis(11));
    assert_eq!(rate.get(key), 1);

    thread::sleep(Duration::from_millis(11));
    assert_eq!(rate.get(key), 0);
}

#[test]
fn test_get_returns_zero_when_stale() {
    let rate = new_rate(Duration::from_millis(10));
    rate.observe_n("key", 5);

    // Two full intervals with no activity: even the completed bucket has
    // expired.
    thread::sleep(Duration::from_millis(25));
    assert_eq!(rate.get("key"), 0);
}

#[test]
fn test_rate_concurrency() {
    let rate = new_rate(Duration::from_secs(1));

    thread::scope(|scope| {
        for i in 0..10u64 {
            let rate = &rate;
            scope.spawn(move || {
                let key = (i + 1).to_string();
                for j in 0..1000 {
                    let count = rate.observe(key.as_str());
                    assert_eq!(count, j + 1, "unexpected count for key {key}");
                }
            });
        }
    });

    for i in 0..10u64 {
        let key = (i + 1).to_string();
        assert_eq!(rate.observe(key.as_str()), 1001);
    }
}

#[test]
fn test_rotation_is_idempotent_under_read_contention() {
    let rate = new_rate(Duration::from_millis(500));
    rate.observe_n("key", 5);

    // Cross the boundary and rotate once, deterministically.
    thread::sleep(Duration::from_millis(600));
    assert_eq!(rate.get("key"), 5);

    // Readers hammering the rotated state must all converge on the same
    // value; a second (spurious) rotation would clear it to 0 mid-interval.
    thread::scope(|scope| {
        for _ in 0..8 {
            let rate = &rate;
            scope.spawn(move || {
                let deadline = std::time::Instant::now() + Duration::from_millis(100);
                while std::time::Instant::now() < deadline {
                    assert_eq!(rate.get("key"), 5);
                }
            });
        }
    });
}

#[test]
fn test_observe_reports_only_current_interval() {
    let rate = new_rate(Duration::from_millis(10));
    assert_eq!(rate.observe_n("key", 7), 7);

    thread::sleep(Duration::from_millis(11));
    // The new interval starts from zero.
    assert_eq!(rate.observe("key"), 1);
    assert_eq!(rate.get("key"), 7);
}
