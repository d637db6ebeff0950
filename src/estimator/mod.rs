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

//! Count-min sketch estimator for concurrent frequency estimation.
//!
//! The estimator keeps a fixed grid of atomic counters and addresses each key
//! through several hash-derived probes, one per row. Queries return the
//! minimum across the probed rows, which never undercounts the key but may
//! overcount when unrelated keys collide. All operations are lock-free and
//! safe to call from any number of threads.
//!
//! For background, see the [wikipedia] page.
//!
//! [wikipedia]: https://en.wikipedia.org/wiki/Count%E2%80%93min_sketch
//!
//! # Usage
//!
//! ```rust
//! # use ratelimits::estimator::{Estimator, DEFAULT_HASHES, DEFAULT_SLOTS};
//! let estimator = Estimator::new(DEFAULT_HASHES, DEFAULT_SLOTS).unwrap();
//! estimator.incr("apple");
//! estimator.incr_n("banana", 3);
//! assert!(estimator.get("banana") >= 3);
//! ```

mod sketch;
pub use self::sketch::DEFAULT_HASHES;
pub use self::sketch::DEFAULT_SLOTS;
pub use self::sketch::Estimator;
pub use self::sketch::MAX_HASHES;
