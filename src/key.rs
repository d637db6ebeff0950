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

//! Key hashing for estimators.
//!
//! Every estimator operation is generic over [`Key`], so the hash strategy is
//! resolved at compile time and the hot path carries no dynamic dispatch.
//! Implementations are provided for string and byte-sequence keys as well as
//! fixed integer values; embedding systems can implement the trait for their
//! own key representations.
//!
//! # Usage
//!
//! ```rust
//! # use ratelimits::key::Key;
//! let seed = 7;
//! assert_eq!("alpha".hash_with_seed(seed), "alpha".hash_with_seed(seed));
//! assert_eq!("alpha".hash_with_seed(seed), b"alpha".hash_with_seed(seed));
//! ```

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// A value that can be hashed with a caller-supplied 64-bit seed.
///
/// The output must be uniformly distributed for the estimators' collision
/// guarantees to hold; implementations here delegate to xxh3. Equal keys must
/// hash equally under the same seed, so `"a"` and `b"a"` address the same
/// counters.
pub trait Key {
    /// Returns the 64-bit hash of this key under `seed`.
    fn hash_with_seed(&self, seed: u64) -> u64;
}

impl Key for [u8] {
    #[inline]
    fn hash_with_seed(&self, seed: u64) -> u64 {
        xxh3_64_with_seed(self, seed)
    }
}

impl Key for str {
    #[inline]
    fn hash_with_seed(&self, seed: u64) -> u64 {
        xxh3_64_with_seed(self.as_bytes(), seed)
    }
}

impl Key for String {
    #[inline]
    fn hash_with_seed(&self, seed: u64) -> u64 {
        self.as_str().hash_with_seed(seed)
    }
}

impl Key for Vec<u8> {
    #[inline]
    fn hash_with_seed(&self, seed: u64) -> u64 {
        self.as_slice().hash_with_seed(seed)
    }
}

impl<const N: usize> Key for [u8; N] {
    #[inline]
    fn hash_with_seed(&self, seed: u64) -> u64 {
        self.as_slice().hash_with_seed(seed)
    }
}

impl<K: Key + ?Sized> Key for &K {
    #[inline]
    fn hash_with_seed(&self, seed: u64) -> u64 {
        (**self).hash_with_seed(seed)
    }
}

macro_rules! impl_key_for_int {
    ($($name:ty),*) => {
        $(
            impl Key for $name {
                #[inline]
                fn hash_with_seed(&self, seed: u64) -> u64 {
                    xxh3_64_with_seed(&self.to_le_bytes(), seed)
                }
            }
        )*
    };
}

impl_key_for_int!(u32, u64, u128, usize, i32, i64, i128, isize);
