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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use ratelimits::error::ErrorKind;
use ratelimits::estimator::Estimator;
use ratelimits::estimator::MAX_HASHES;

#[test]
fn test_init_defaults() {
    let estimator = Estimator::new(4, 1024).unwrap();
    assert_eq!(estimator.num_hashes(), 4);
    assert_eq!(estimator.num_slots(), 1024);
    assert_eq!(estimator.get("missing"), 0);
}

#[test]
fn test_slots_round_up_to_power_of_two() {
    let estimator = Estimator::new(2, 1000).unwrap();
    assert_eq!(estimator.num_slots(), 1024);

    let estimator = Estimator::new(2, 1).unwrap();
    assert_eq!(estimator.num_slots(), 1);
}

#[test]
fn test_invalid_hashes() {
    let err = Estimator::new(0, 1024).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("hashes"));

    let err = Estimator::new(MAX_HASHES + 1, 1024).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_invalid_slots() {
    let err = Estimator::new(4, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("slots"));
}

#[test]
fn test_max_hashes_accepted() {
    let estimator = Estimator::new(MAX_HASHES, 64).unwrap();
    assert_eq!(estimator.incr("key"), 1);
}

#[test]
fn test_incr_returns_running_estimate() {
    let estimator = Estimator::new(8, 64).unwrap();
    assert_eq!(estimator.incr("a"), 1);
    assert_eq!(estimator.incr("b"), 1);
    assert_eq!(estimator.incr_n("a", 2), 3);
    assert_eq!(estimator.incr_n("b", 2), 3);
}

#[test]
fn test_read_after_write() {
    let estimator = Estimator::new(4, 1024).unwrap();
    for expected in 1..=100 {
        let updated = estimator.incr("key");
        assert_eq!(updated, expected);
        assert_eq!(estimator.get("key"), updated);
    }
}

#[test]
fn test_negative_delta_undoes_increment() {
    let estimator = Estimator::new(4, 1024).unwrap();
    estimator.incr_n("a", 3);
    estimator.incr_n("b", 3);
    assert_eq!(estimator.incr_n("a", -1), 2);
    assert_eq!(estimator.incr_n("b", -1), 2);
    assert_eq!(estimator.get("a"), 2);
    assert_eq!(estimator.get("b"), 2);
}

#[test]
fn test_reset() {
    let estimator = Estimator::new(4, 1024).unwrap();
    for i in 0..100u64 {
        estimator.incr_n(i, 7);
    }
    estimator.reset();
    for i in 0..100u64 {
        assert_eq!(estimator.get(i), 0);
    }
}

#[test]
fn test_never_undercounts_under_collision_pressure() {
    // Far more keys than slots, so rows collide constantly.
    let estimator = Estimator::new(4, 128).unwrap();
    for i in 0..1000u64 {
        for _ in 0..(i % 16) {
            estimator.incr(i);
        }
    }
    for i in 0..1000u64 {
        assert!(
            estimator.get(i) >= (i % 16) as i64,
            "estimate {} for key {} is below the true count {}",
            estimator.get(i),
            i,
            i % 16
        );
    }
}

#[test]
fn test_byte_and_string_keys_share_counters() {
    let estimator = Estimator::new(4, 1024).unwrap();
    estimator.incr_n("key", 5);
    assert_eq!(estimator.get(b"key".as_slice()), 5);
    assert_eq!(estimator.get(&"key".to_string()), 5);
}

#[test]
fn test_concurrent_distinct_keys_stay_exact() {
    let estimator = Estimator::new(4, 8192).unwrap();
    std::thread::scope(|scope| {
        for i in 0..10u64 {
            let estimator = &estimator;
            scope.spawn(move || {
                let key = (i + 1).to_string();
                for j in 0..1000 {
                    let count = estimator.incr(key.as_str());
                    assert!(count >= j + 1, "count {count} fell below {}", j + 1);
                }
            });
        }
    });
    for i in 0..10u64 {
        let key = (i + 1).to_string();
        assert_eq!(estimator.incr(key.as_str()), 1001);
    }
}
