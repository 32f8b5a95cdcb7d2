use std::cell::RefCell;
use std::rc::Rc;

use smallvec::SmallVec;

use super::{Backend, ObjectHandle};

use crate::context::{Stage, TextureId};
use crate::errors::*;
use crate::templates::{StateKind, StateTemplate};
use crate::utils::prelude::{FastHashMap, HandlePool};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackendCounters {
    pub creates: usize,
    pub destroys: usize,
    pub binds: usize,
}

#[derive(Default)]
struct HeadlessState {
    handles: HandlePool<ObjectHandle>,
    objects: FastHashMap<ObjectHandle, StateTemplate>,
    limit: Option<usize>,
    bound: [Option<ObjectHandle>; StateKind::COUNT],
    samplers: [SmallVec<[Option<ObjectHandle>; 16]>; Stage::COUNT],
    views: [SmallVec<[Option<TextureId>; 16]>; Stage::COUNT],
    counters: BackendCounters,
}

/// A backend without a device. Objects are plain copies of their templates,
/// which makes it usable for tests and for hosts that only need resolved
/// state, e.g. a software rasterizer reading templates back by handle.
#[derive(Default)]
pub struct HeadlessBackend {
    state: Rc<RefCell<HeadlessState>>,
}

/// Read access to a `HeadlessBackend` after it was moved into a context.
#[derive(Clone)]
pub struct HeadlessMonitor {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates a backend that fails with `OutOfResources` once `limit`
    /// objects are alive.
    pub fn with_object_limit(limit: usize) -> Self {
        let backend = HeadlessBackend::new();
        backend.state.borrow_mut().limit = Some(limit);
        backend
    }

    pub fn monitor(&self) -> HeadlessMonitor {
        HeadlessMonitor {
            state: self.state.clone(),
        }
    }
}

impl HeadlessMonitor {
    pub fn counters(&self) -> BackendCounters {
        self.state.borrow().counters
    }

    pub fn reset_counters(&self) {
        self.state.borrow_mut().counters = BackendCounters::default();
    }

    /// Number of objects created and not yet destroyed.
    pub fn live_objects(&self) -> usize {
        self.state.borrow().objects.len()
    }

    pub fn set_object_limit(&self, limit: Option<usize>) {
        self.state.borrow_mut().limit = limit;
    }

    pub fn bound(&self, kind: StateKind) -> Option<ObjectHandle> {
        self.state.borrow().bound[kind.index()]
    }

    /// The template the bound object of `kind` was created from.
    pub fn bound_template(&self, kind: StateKind) -> Option<StateTemplate> {
        let state = self.state.borrow();
        let handle = state.bound[kind.index()]?;
        state.objects.get(&handle).cloned()
    }

    pub fn template(&self, handle: ObjectHandle) -> Option<StateTemplate> {
        self.state.borrow().objects.get(&handle).cloned()
    }

    pub fn bound_samplers(&self, stage: Stage) -> Vec<Option<ObjectHandle>> {
        self.state.borrow().samplers[stage.index()].to_vec()
    }

    pub fn sampler_views(&self, stage: Stage) -> Vec<Option<TextureId>> {
        self.state.borrow().views[stage.index()].to_vec()
    }
}

impl Backend for HeadlessBackend {
    fn create_object(&mut self, template: &StateTemplate) -> Result<ObjectHandle> {
        let mut state = self.state.borrow_mut();

        if let Some(limit) = state.limit {
            if state.objects.len() >= limit {
                return Err(Error::OutOfResources(template.kind()));
            }
        }

        let handle = state.handles.create();
        state.objects.insert(handle, *template);
        state.counters.creates += 1;
        Ok(handle)
    }

    fn destroy_object(&mut self, kind: StateKind, handle: ObjectHandle) {
        let mut state = self.state.borrow_mut();
        debug_assert!(state.bound[kind.index()] != Some(handle));

        if state.objects.remove(&handle).is_some() {
            state.handles.free(handle);
            state.counters.destroys += 1;
        } else {
            warn!("Destroying unknown {:?} object {}.", kind, handle);
        }
    }

    fn bind_object(&mut self, kind: StateKind, handle: Option<ObjectHandle>) -> Result<()> {
        let mut state = self.state.borrow_mut();

        if let Some(handle) = handle {
            if !state.handles.contains(handle) {
                return Err(Error::Backend(format!("{} is invalid.", handle)));
            }
        }

        state.bound[kind.index()] = handle;
        state.counters.binds += 1;
        Ok(())
    }

    fn bind_samplers(&mut self, stage: Stage, handles: &[Option<ObjectHandle>]) -> Result<()> {
        let mut state = self.state.borrow_mut();

        for handle in handles.iter().filter_map(|v| *v) {
            if !state.handles.contains(handle) {
                return Err(Error::Backend(format!("{} is invalid.", handle)));
            }
        }

        state.samplers[stage.index()] = handles.iter().cloned().collect();
        state.counters.binds += 1;
        Ok(())
    }

    fn set_sampler_views(&mut self, stage: Stage, views: &[Option<TextureId>]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.views[stage.index()] = views.iter().cloned().collect();
        state.counters.binds += 1;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::templates::{ClearColorTemplate, Template};

    #[test]
    fn create_bind_destroy() {
        let mut backend = HeadlessBackend::new();
        let monitor = backend.monitor();

        let template = ClearColorTemplate {
            color: [1.0, 0.0, 0.0, 1.0],
        };

        let handle = backend.create_object(&template.wrap()).unwrap();
        assert_eq!(monitor.live_objects(), 1);

        backend
            .bind_object(StateKind::ClearColor, Some(handle))
            .unwrap();
        assert_eq!(monitor.bound(StateKind::ClearColor), Some(handle));
        match monitor.bound_template(StateKind::ClearColor) {
            Some(StateTemplate::ClearColor(v)) => assert_eq!(v.color, template.color),
            other => panic!("unexpected {:?}", other),
        }

        backend.bind_object(StateKind::ClearColor, None).unwrap();
        backend.destroy_object(StateKind::ClearColor, handle);
        assert_eq!(monitor.live_objects(), 0);
        assert!(backend
            .bind_object(StateKind::ClearColor, Some(handle))
            .is_err());

        let counters = monitor.counters();
        assert_eq!(counters.creates, 1);
        assert_eq!(counters.destroys, 1);
        assert_eq!(counters.binds, 2);
    }

    #[test]
    fn object_limit() {
        let mut backend = HeadlessBackend::with_object_limit(1);
        let template = ClearColorTemplate::default().wrap();

        assert!(backend.create_object(&template).is_ok());
        match backend.create_object(&template) {
            Err(Error::OutOfResources(StateKind::ClearColor)) => {}
            other => panic!("unexpected {:?}", other),
        }

        backend.monitor().set_object_limit(None);
        assert!(backend.create_object(&template).is_ok());
    }
}
