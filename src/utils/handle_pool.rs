use std::cmp::Ordering;
use std::collections::binary_heap::BinaryHeap;
use std::marker::PhantomData;

use super::handle::{HandleIndex, HandleLike};

#[derive(PartialEq, Eq)]
struct InverseHandleIndex(HandleIndex);

impl PartialOrd for InverseHandleIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InverseHandleIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}

/// `HandlePool` hands out versioned handles with compact indices. Freed
/// indices are reused lowest-first, and every reuse bumps the version so a
/// stale handle never aliases the object that replaced it.
pub struct HandlePool<T: HandleLike> {
    versions: Vec<HandleIndex>,
    frees: BinaryHeap<InverseHandleIndex>,
    _phantom: PhantomData<T>,
}

impl<T: HandleLike> Default for HandlePool<T> {
    fn default() -> Self {
        HandlePool::new()
    }
}

impl<T: HandleLike> HandlePool<T> {
    /// Constructs a new, empty `HandlePool`.
    pub fn new() -> Self {
        HandlePool {
            versions: Vec::new(),
            frees: BinaryHeap::new(),
            _phantom: PhantomData,
        }
    }

    /// Creates a unused handle.
    pub fn create(&mut self) -> T {
        if let Some(InverseHandleIndex(index)) = self.frees.pop() {
            let index = index as usize;
            self.versions[index] += 1;
            T::new(index as HandleIndex, self.versions[index])
        } else {
            self.versions.push(1);
            T::new(self.versions.len() as HandleIndex - 1, 1)
        }
    }

    /// Returns true if this handle was created by this pool, and has not been
    /// freed yet.
    pub fn contains(&self, handle: T) -> bool {
        let index = handle.index() as usize;
        index < self.versions.len()
            && (self.versions[index] & 0x1) == 1
            && self.versions[index] == handle.version()
    }

    /// Recycles the handle index, and marks its version as dead.
    pub fn free(&mut self, handle: T) -> bool {
        if !self.contains(handle) {
            return false;
        }

        self.versions[handle.index() as usize] += 1;
        self.frees.push(InverseHandleIndex(handle.index()));
        true
    }

    /// Returns the total number of alive handles.
    #[inline]
    pub fn len(&self) -> usize {
        self.versions.len() - self.frees.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
