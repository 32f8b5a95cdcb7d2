//! # Stipple
//!
//! Stipple resolves the mutable draw state of a GL-style rendering context
//! into immutable, deduplicated backend state objects.
//!
//! Setters on a `Context` record which groups of state changed in a dirty
//! word. Right before a draw, `Context::validate` walks an ordered table of
//! state rules and runs exactly the rules whose dependencies changed. Each rule
//! builds a flat template of its piece of state, compares it against the
//! template it bound last, and only on a difference looks it up in a
//! content-addressable cache of backend objects, creating the object on a miss
//! and binding it.
//!
//! ```
//! use stipple::prelude::*;
//!
//! let backend = HeadlessBackend::new();
//! let monitor = backend.monitor();
//!
//! let mut ctx = Context::new(ContextParams::default(), Box::new(backend));
//! ctx.validate().unwrap();
//!
//! ctx.set_depth_test(true);
//! ctx.set_depth_func(Comparison::LessOrEqual);
//! ctx.validate().unwrap();
//! assert_eq!(ctx.last_pass(), &["depth_stencil_alpha"]);
//! assert!(monitor.live_objects() > 0);
//! ```

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

#[macro_use]
pub mod utils;
pub mod errors;

pub mod backend;
pub mod cache;
pub mod context;
pub mod dirty;
pub mod pipeline;
pub mod rules;
pub mod templates;

pub mod prelude {
    pub use crate::backend::{Backend, HeadlessBackend, HeadlessMonitor, ObjectHandle};
    pub use crate::cache::{CacheStats, Fingerprint, StateObjectCache};
    pub use crate::context::*;
    pub use crate::dirty::{DirtyState, Frontend, Tracker};
    pub use crate::errors::*;
    pub use crate::pipeline::{RuleTable, StateRule, ValidationMode};
    pub use crate::templates::{StateKind, StateTemplate, Template};
    pub use crate::utils::prelude::*;
}
