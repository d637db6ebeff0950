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

//! Rotating rate estimator over a fixed interval.
//!
//! [`Rate`] tracks per-key event counts with two [`Estimator`] buffers: one
//! accumulates the current interval while the other holds the just-completed
//! interval for reading. There is no timer thread; each access checks whether
//! the interval has elapsed and, if so, rotates the buffers with a single
//! compare-and-swap. Like the estimator it is built on, `Rate` is lock-free
//! and safe to share across threads.
//!
//! [`Estimator`]: crate::estimator::Estimator
//!
//! # Usage
//!
//! ```rust
//! # use std::time::Duration;
//! # use ratelimits::rate::{Rate, DEFAULT_RATE_HASHES, DEFAULT_RATE_SLOTS};
//! let rate = Rate::new(Duration::from_millis(10), DEFAULT_RATE_HASHES, DEFAULT_RATE_SLOTS)
//!     .unwrap();
//! assert_eq!(rate.observe("key"), 1);
//! assert_eq!(rate.observe_n("key", 2), 3);
//! // Nothing has completed an interval yet.
//! assert_eq!(rate.get("key"), 0);
//! std::thread::sleep(Duration::from_millis(11));
//! assert_eq!(rate.get("key"), 3);
//! ```

mod sketch;
pub use self::sketch::DEFAULT_RATE_HASHES;
pub use self::sketch::DEFAULT_RATE_SLOTS;
pub use self::sketch::Rate;
