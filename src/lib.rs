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

//! Lock-free probabilistic frequency and rate estimation primitives.
//!
//! This crate answers "how many times has key K been seen (recently)?" in
//! bounded memory and constant time, without storing per-key state. All
//! operations are implemented with atomic loads, stores, and compare-and-swap;
//! there are no locks and no operation blocks, which makes every type here
//! safe to share across any number of threads. The estimates are approximate:
//! queries never undercount a key, but may overcount when unrelated keys
//! collide in the underlying table.
//!
//! Three building blocks, each built on the previous one:
//!
//! - [`estimator::Estimator`]: a concurrent count-min sketch with conservative
//!   updates.
//! - [`rate::Rate`]: a rotating dual-buffer rate estimator that reports the
//!   previous interval's totals while the current interval accumulates.
//! - [`inflight::Inflight`]: an in-flight event tracker whose guard undoes its
//!   increment when dropped.
//!
//! # Usage
//!
//! ```rust
//! # use std::time::Duration;
//! # use ratelimits::rate::Rate;
//! # use ratelimits::rate::{DEFAULT_RATE_HASHES, DEFAULT_RATE_SLOTS};
//! let rate = Rate::new(Duration::from_secs(1), DEFAULT_RATE_HASHES, DEFAULT_RATE_SLOTS).unwrap();
//! rate.observe("client-7");
//! rate.observe_n("client-7", 2);
//! // The previous interval has not completed yet.
//! assert_eq!(rate.get("client-7"), 0);
//! ```

pub mod error;

pub mod key;

pub mod estimator;
pub mod inflight;
pub mod rate;

mod common;
