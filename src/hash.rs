//! Pluggable string hash strategies.
//!
//! A [`StrMap`](crate::StrMap) hashes every key exactly once per operation
//! through a [`StrHasher`] chosen at construction time. The default,
//! [`PolyHash`], is fast and deterministic but unseeded: an adversary who
//! controls the keys can force every key onto the same home slot. Tables fed
//! untrusted keys should use a seeded strategy such as [`RandomStrHash`].

use core::hash::BuildHasher;

/// Hashes a string key to a 64-bit value.
///
/// Implemented for [`PolyHash`], for [`BuildStrHasher`], and for any
/// `Fn(&str) -> u64`, so a plain function can be supplied directly.
///
/// # Examples
///
/// ```rust
/// # use strmap::StrMap;
/// #
/// fn length_hash(key: &str) -> u64 {
///     key.len() as u64
/// }
///
/// let data = 1u32;
/// let mut map = StrMap::with_hasher(length_hash);
/// map.insert("abc", &data).unwrap();
/// assert_eq!(map.lookup("abc").unwrap().hash, 3);
/// ```
pub trait StrHasher {
    /// Returns the hash of `key`.
    fn hash_str(&self, key: &str) -> u64;
}

impl<F> StrHasher for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_str(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Polynomial accumulator `hash = hash * 257 + byte` over the key bytes.
///
/// # Examples
///
/// ```rust
/// # use strmap::hash::poly_hash;
/// #
/// assert_eq!(poly_hash(""), 0);
/// assert_eq!(poly_hash("a"), 97);
/// assert_eq!(poly_hash("ab"), 97 * 257 + 98);
/// ```
#[inline]
pub fn poly_hash(key: &str) -> u64 {
    key.bytes().fold(0u64, |hash, byte| {
        hash.wrapping_add(hash << 8).wrapping_add(byte as u64)
    })
}

/// The default strategy: [`poly_hash`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolyHash;

impl StrHasher for PolyHash {
    #[inline]
    fn hash_str(&self, key: &str) -> u64 {
        poly_hash(key)
    }
}

/// Adapts any [`BuildHasher`] into a [`StrHasher`].
///
/// # Examples
///
/// ```rust
/// # use std::collections::hash_map::RandomState;
/// #
/// # use strmap::StrMap;
/// # use strmap::hash::BuildStrHasher;
/// #
/// let hasher = BuildStrHasher::new(RandomState::new());
/// let data = "value";
/// let mut map = StrMap::with_hasher(hasher);
/// map.insert("key", &data).unwrap();
/// assert!(map.contains_key("key"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildStrHasher<S> {
    build: S,
}

impl<S: BuildHasher> BuildStrHasher<S> {
    /// Wraps `build`.
    pub fn new(build: S) -> Self {
        Self { build }
    }

    /// Returns the wrapped hasher builder.
    pub fn get_ref(&self) -> &S {
        &self.build
    }
}

impl<S: BuildHasher> StrHasher for BuildStrHasher<S> {
    #[inline]
    fn hash_str(&self, key: &str) -> u64 {
        self.build.hash_one(key)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// A randomly seeded strategy backed by `foldhash`.
        ///
        /// Each instance draws a fresh seed, so two maps built with
        /// `RandomStrHash::default()` hash the same key differently.
        pub type RandomStrHash = BuildStrHasher<foldhash::fast::RandomState>;
    } else if #[cfg(feature = "std")] {
        /// A randomly seeded strategy backed by the standard library's
        /// SipHash `RandomState`.
        pub type RandomStrHash = BuildStrHasher<std::collections::hash_map::RandomState>;
    }
}
