//! The backend consumes resolved state. It owns nothing but the objects it
//! was asked to create, and is only ever told which object of a category is
//! bound; it never sees the mutable API state.

pub mod headless;

use crate::context::{Stage, TextureId};
use crate::errors::*;
use crate::templates::{StateKind, StateTemplate};

impl_handle!(ObjectHandle);

pub trait Backend {
    /// Creates an immutable state object described by `template`.
    fn create_object(&mut self, template: &StateTemplate) -> Result<ObjectHandle>;

    /// Destroys an object created by `create_object`. The object is never bound
    /// when this is called.
    fn destroy_object(&mut self, kind: StateKind, handle: ObjectHandle);

    /// Binds the object used for all subsequent draws of category `kind`,
    /// `None` unbinds. Samplers are bound as a set with `bind_samplers`.
    fn bind_object(&mut self, kind: StateKind, handle: Option<ObjectHandle>) -> Result<()>;

    /// Binds one sampler object per texture unit sampled by `stage`, starting
    /// at unit zero.
    fn bind_samplers(&mut self, stage: Stage, handles: &[Option<ObjectHandle>]) -> Result<()>;

    /// Sets the textures `stage` samples from each unit, starting at unit zero.
    fn set_sampler_views(&mut self, stage: Stage, views: &[Option<TextureId>]) -> Result<()>;
}

pub use self::headless::{HeadlessBackend, HeadlessMonitor};
