//! Content-addressable cache of backend state objects.
//!
//! Templates are bucketed by `(kind, fingerprint)` and disambiguated by an
//! exact byte comparison, so two byte-identical templates always resolve to
//! the same backend object while fingerprint collisions are harmless. The
//! cache owns the objects it stores. It never evicts on its own, entries live
//! until they are taken out explicitly or the cache is drained at teardown.

use std::fmt;

use byteorder::{ByteOrder, NativeEndian};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::backend::ObjectHandle;
use crate::errors::*;
use crate::templates::{StateKind, Template};
use crate::utils::prelude::FastHashMap;

/// Cheap digest of a template, a distribution aid and not an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub u32);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

const WORD: usize = 4;

/// XOR of every 32-bit word of `bytes`.
///
/// # Panics
///
/// Panics if the length of `bytes` is not a multiple of the word size.
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    assert!(
        bytes.len() % WORD == 0,
        "Template size {} is not a multiple of {}.",
        bytes.len(),
        WORD
    );

    let hash = bytes
        .chunks(WORD)
        .fold(0u32, |acc, word| acc ^ NativeEndian::read_u32(word));

    Fingerprint(hash)
}

struct CacheEntry {
    template: Box<[u8]>,
    handle: ObjectHandle,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Default)]
pub struct StateObjectCache {
    buckets: FastHashMap<(StateKind, Fingerprint), SmallVec<[CacheEntry; 1]>>,
    lens: [usize; StateKind::COUNT],
    stats: CacheStats,
}

impl StateObjectCache {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the object created from a template byte-equal to `template`,
    /// creating it with `factory` and inserting it on a miss.
    pub fn find_or_insert<T, F>(&mut self, template: &T, factory: F) -> Result<ObjectHandle>
    where
        T: Template,
        F: FnOnce(&T) -> Result<ObjectHandle>,
    {
        let bytes = template.as_bytes();
        self.find_or_insert_with(T::KIND, fingerprint(bytes), bytes, || factory(template))
    }

    /// Same as `find_or_insert`, for callers that already computed the
    /// fingerprint of `bytes`.
    pub fn find_or_insert_with<F>(
        &mut self,
        kind: StateKind,
        fp: Fingerprint,
        bytes: &[u8],
        factory: F,
    ) -> Result<ObjectHandle>
    where
        F: FnOnce() -> Result<ObjectHandle>,
    {
        self.stats.lookups += 1;

        if let Some(handle) = self.find_with(kind, fp, bytes) {
            self.stats.hits += 1;
            return Ok(handle);
        }

        self.stats.misses += 1;

        // Nothing is inserted if the backend fails.
        let handle = factory()?;
        debug!("Created {:?} object {} for fingerprint {}.", kind, handle, fp);

        self.buckets
            .entry((kind, fp))
            .or_insert_with(SmallVec::new)
            .push(CacheEntry {
                template: bytes.into(),
                handle,
            });

        self.lens[kind.index()] += 1;
        self.stats.entries += 1;
        Ok(handle)
    }

    /// Pure lookup, nothing is created and the statistics are untouched.
    pub fn find<T: Template>(&self, template: &T) -> Option<ObjectHandle> {
        let bytes = template.as_bytes();
        self.find_with(T::KIND, fingerprint(bytes), bytes)
    }

    pub fn find_with(&self, kind: StateKind, fp: Fingerprint, bytes: &[u8]) -> Option<ObjectHandle> {
        self.buckets.get(&(kind, fp)).and_then(|chain| {
            chain
                .iter()
                .find(|v| &*v.template == bytes)
                .map(|v| v.handle)
        })
    }

    /// Removes the entry matching `template` and hands its object over to the
    /// caller, who becomes responsible for destroying it.
    pub fn take<T: Template>(&mut self, template: &T) -> Option<ObjectHandle> {
        let bytes = template.as_bytes();
        self.take_with(T::KIND, fingerprint(bytes), bytes)
    }

    pub fn take_with(&mut self, kind: StateKind, fp: Fingerprint, bytes: &[u8]) -> Option<ObjectHandle> {
        let key = (kind, fp);
        let (handle, empty) = {
            let chain = self.buckets.get_mut(&key)?;
            let index = chain.iter().position(|v| &*v.template == bytes)?;
            let entry = chain.remove(index);
            (entry.handle, chain.is_empty())
        };

        if empty {
            self.buckets.remove(&key);
        }

        self.lens[kind.index()] -= 1;
        self.stats.entries -= 1;
        Some(handle)
    }

    /// Removes every entry, yielding the objects so they can be destroyed.
    pub fn drain(&mut self) -> Vec<(StateKind, ObjectHandle)> {
        let objects = self
            .buckets
            .drain()
            .flat_map(|((kind, _), chain)| chain.into_iter().map(move |v| (kind, v.handle)))
            .collect();

        self.lens = [0; StateKind::COUNT];
        self.stats.entries = 0;
        objects
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stats.entries
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries of one kind.
    #[inline]
    pub fn len_of(&self, kind: StateKind) -> usize {
        self.lens[kind.index()]
    }

    #[inline]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::templates::{ClearColorTemplate, ScissorTemplate, ViewportTemplate};
    use crate::utils::prelude::{HandleLike, HandlePool};

    fn scissor(minx: u32, miny: u32, maxx: u32, maxy: u32) -> ScissorTemplate {
        ScissorTemplate {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    #[test]
    fn fingerprint_xors_words() {
        let bytes = [1u32, 2, 4, 8]
            .iter()
            .flat_map(|v| {
                let mut buf = [0u8; 4];
                NativeEndian::write_u32(&mut buf, *v);
                buf.to_vec()
            })
            .collect::<Vec<_>>();

        assert_eq!(fingerprint(&bytes), Fingerprint(15));
        assert_eq!(fingerprint(&[]), Fingerprint(0));
    }

    #[test]
    #[should_panic]
    fn fingerprint_requires_whole_words() {
        fingerprint(&[0u8; 6]);
    }

    #[test]
    fn dedup() {
        let mut pool = HandlePool::<ObjectHandle>::new();
        let mut cache = StateObjectCache::new();

        let a = scissor(0, 0, 64, 64);
        let b = a;

        let h1 = cache.find_or_insert(&a, |_| Ok(pool.create())).unwrap();
        let h2 = cache
            .find_or_insert(&b, |_| panic!("byte-equal template created twice"))
            .unwrap();

        assert_eq!(h1, h2);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                lookups: 2,
                hits: 1,
                misses: 1,
                entries: 1,
            }
        );
    }

    #[test]
    fn collision_chain() {
        let mut pool = HandlePool::<ObjectHandle>::new();
        let mut cache = StateObjectCache::new();

        // Swapped words xor to the same fingerprint.
        let a = scissor(1, 2, 3, 4);
        let b = scissor(2, 1, 4, 3);
        assert_eq!(fingerprint(a.as_bytes()), fingerprint(b.as_bytes()));

        let ha = cache.find_or_insert(&a, |_| Ok(pool.create())).unwrap();
        let hb = cache.find_or_insert(&b, |_| Ok(pool.create())).unwrap();
        assert!(ha != hb);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.find(&a), Some(ha));
        assert_eq!(cache.find(&b), Some(hb));

        assert_eq!(cache.take(&a), Some(ha));
        assert_eq!(cache.find(&a), None);
        assert_eq!(cache.find(&b), Some(hb));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn kinds_never_share_buckets() {
        let mut pool = HandlePool::<ObjectHandle>::new();
        let mut cache = StateObjectCache::new();

        // Same bytes, different kinds.
        let clear = ClearColorTemplate::default();
        let scissor = scissor(0, 0, 0, 0);
        assert_eq!(clear.as_bytes(), scissor.as_bytes());

        let h1 = cache.find_or_insert(&clear, |_| Ok(pool.create())).unwrap();
        let h2 = cache.find_or_insert(&scissor, |_| Ok(pool.create())).unwrap();

        assert!(h1 != h2);
        assert_eq!(cache.len_of(StateKind::ClearColor), 1);
        assert_eq!(cache.len_of(StateKind::Scissor), 1);
        assert_eq!(cache.len_of(StateKind::Viewport), 0);
    }

    #[test]
    fn failed_factory_inserts_nothing() {
        let mut cache = StateObjectCache::new();
        let template = ViewportTemplate::default();

        let result = cache.find_or_insert(&template, |_| {
            Err(Error::OutOfResources(StateKind::Viewport))
        });

        assert!(result.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.find(&template), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn drain() {
        let mut cache = StateObjectCache::new();
        for i in 0..4 {
            let template = scissor(i, 0, 0, 0);
            cache
                .find_or_insert(&template, |_| Ok(ObjectHandle::new(i, 1)))
                .unwrap();
        }

        let mut objects = cache.drain();
        objects.sort();
        assert_eq!(objects.len(), 4);
        assert!(objects.iter().all(|v| v.0 == StateKind::Scissor));
        assert!(cache.is_empty());
        assert_eq!(cache.len_of(StateKind::Scissor), 0);
    }
}
