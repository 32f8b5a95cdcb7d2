//! Dirty-state tracking.
//!
//! Two independent bit domains are accumulated between validation passes.
//! `Frontend` bits are raised by the API setters whenever application-visible
//! state is written. `Tracker` bits are raised internally, by the pre-pass or
//! by a state rule, when derived state (current program, framebuffer binding)
//! changed and rules further down the table have to revisit it.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

bitflags! {
    /// Application-visible state groups.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Frontend: u32 {
        const BUFFERS = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
        const ALPHA = 1 << 3;
        const TRANSFORM = 1 << 4;
        const PROGRAM = 1 << 5;
        const POLYGON = 1 << 6;
        const POINT = 1 << 7;
        const LINE = 1 << 8;
        const LIGHT = 1 << 9;
        const SCISSOR = 1 << 10;
        const VIEWPORT = 1 << 11;
        const MULTISAMPLE = 1 << 12;
        const BLEND = 1 << 13;
        const CLEAR_COLOR = 1 << 14;
        const TEXTURE = 1 << 15;
    }
}

bitflags! {
    /// Derived state raised from inside the validation pipeline.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Tracker: u32 {
        const FRAMEBUFFER = 1 << 0;
        const VERTEX_PROGRAM = 1 << 1;
        const FRAGMENT_PROGRAM = 1 << 2;
        const SAMPLER_VIEWS = 1 << 3;
    }
}

/// A pair of bit masks, one per domain. The same type describes both the
/// live accumulated dirty state and a rule's dependency mask.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyState {
    pub frontend: Frontend,
    pub tracker: Tracker,
}

impl DirtyState {
    #[inline]
    pub const fn new(frontend: Frontend, tracker: Tracker) -> Self {
        DirtyState { frontend, tracker }
    }

    #[inline]
    pub const fn empty() -> Self {
        DirtyState::new(Frontend::empty(), Tracker::empty())
    }

    /// Everything dirty, the state of a freshly created context.
    #[inline]
    pub const fn all() -> Self {
        DirtyState::new(Frontend::all(), Tracker::all())
    }

    #[inline]
    pub const fn frontend(frontend: Frontend) -> Self {
        DirtyState::new(frontend, Tracker::empty())
    }

    #[inline]
    pub const fn tracker(tracker: Tracker) -> Self {
        DirtyState::new(Frontend::empty(), tracker)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frontend.is_empty() && self.tracker.is_empty()
    }

    #[inline]
    pub fn intersects(&self, other: DirtyState) -> bool {
        self.frontend.intersects(other.frontend) || self.tracker.intersects(other.tracker)
    }

    #[inline]
    pub fn contains(&self, other: DirtyState) -> bool {
        self.frontend.contains(other.frontend) && self.tracker.contains(other.tracker)
    }

    /// Bits that differ between `self` and `other`.
    #[inline]
    pub fn xor(&self, other: DirtyState) -> DirtyState {
        DirtyState::new(
            self.frontend.symmetric_difference(other.frontend),
            self.tracker.symmetric_difference(other.tracker),
        )
    }

    /// ORs `word` into the accumulated state.
    #[inline]
    pub fn invalidate(&mut self, word: DirtyState) {
        self.frontend |= word.frontend;
        self.tracker |= word.tracker;
    }

    /// Returns the accumulated word and resets it to zero.
    #[inline]
    pub fn snapshot_and_clear(&mut self) -> DirtyState {
        ::std::mem::replace(self, DirtyState::empty())
    }
}

impl BitOr for DirtyState {
    type Output = DirtyState;

    fn bitor(self, rhs: DirtyState) -> DirtyState {
        DirtyState::new(self.frontend | rhs.frontend, self.tracker | rhs.tracker)
    }
}

impl BitOrAssign for DirtyState {
    fn bitor_assign(&mut self, rhs: DirtyState) {
        self.invalidate(rhs);
    }
}

impl From<Frontend> for DirtyState {
    fn from(frontend: Frontend) -> Self {
        DirtyState::frontend(frontend)
    }
}

impl From<Tracker> for DirtyState {
    fn from(tracker: Tracker) -> Self {
        DirtyState::tracker(tracker)
    }
}

impl fmt::Display for DirtyState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "(frontend: {:#06x}, tracker: {:#04x})",
            self.frontend.bits(),
            self.tracker.bits()
        )
    }
}
