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

//! In-flight event tracking.
//!
//! [`Inflight`] counts events that are currently in progress, such as
//! outstanding requests per client. Incrementing returns a [`Guard`] that
//! subtracts the same amount when dropped, so a count cannot leak across an
//! early return or a panic. The counts live in a shared
//! [`Estimator`](crate::estimator::Estimator), so reads carry the usual
//! count-min property: never under the true in-flight total, possibly over
//! under collisions.
//!
//! # Usage
//!
//! ```rust
//! # use ratelimits::estimator::{DEFAULT_HASHES, DEFAULT_SLOTS};
//! # use ratelimits::inflight::Inflight;
//! let inflight = Inflight::new(DEFAULT_HASHES, DEFAULT_SLOTS).unwrap();
//! {
//!     let (count, _guard) = inflight.incr("client-7");
//!     assert_eq!(count, 1);
//!     assert_eq!(inflight.get("client-7"), 1);
//! }
//! // The guard dropped, the event is no longer in flight.
//! assert_eq!(inflight.get("client-7"), 0);
//! ```

mod tracker;
pub use self::tracker::Guard;
pub use self::tracker::Inflight;
