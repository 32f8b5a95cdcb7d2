//! Fast, non-cryptographic hash tables for the internal lookups. Keys must not
//! come from untrusted input.

pub use rustc_hash::{FxHashMap as FastHashMap, FxHashSet as FastHashSet};
