#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Slot-count planning for the backing array.
pub mod capacity;

mod error;

/// String hash strategies.
///
/// This module provides the [`StrHasher`](hash::StrHasher) trait, the default
/// unseeded polynomial hash and adapters for seeded hashers.
pub mod hash;

/// The Robin Hood string map.
///
/// This module provides [`StrMap`] together with its entry, iterator and
/// builder types.
pub mod str_map;

#[cfg(all(test, feature = "std"))]
mod str_map_proptest;

pub use error::Error;
pub use hash::PolyHash;
pub use hash::StrHasher;
pub use str_map::Entry;
pub use str_map::StrMap;
pub use str_map::Upsert;
