//! The rendering context: mutable draw state, the dirty tracker and the
//! resolved backend objects.
//!
//! Every setter writes its field and raises the front-end dirty bit of the
//! state group it touched, even when the value did not change. Redundant
//! calls are absorbed by the shadow state of the rules on the next pass.

pub mod state;
pub mod types;

pub use self::state::*;
pub use self::types::*;

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::backend::{Backend, ObjectHandle};
use crate::cache::{CacheStats, StateObjectCache};
use crate::dirty::{DirtyState, Frontend};
use crate::errors::*;
use crate::pipeline::{self, RuleTable, ValidationMode};
use crate::rules::{self, Shadows};
use crate::templates::tokens::{MAX_CLIP_PLANES, MAX_COLOR_BUFS, MAX_SAMPLERS};
use crate::templates::{StateKind, Template};
use crate::utils::prelude::{FastHashMap, HandlePool};

impl_handle!(TextureId);
impl_handle!(ProgramId);

/// Tunable limits of a context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextParams {
    pub validation: ValidationMode,
    /// Number of texture units exposed, at most 16.
    pub max_texture_units: usize,
    /// Point sizes supported by the rasterizer.
    pub point_size_range: (f32, f32),
    /// Line widths supported by the rasterizer.
    pub line_width_range: (f32, f32),
    /// Size of the window surface when the context is created.
    pub window_size: (u32, u32),
    /// Whether the window surface has a depth/stencil buffer.
    pub window_depth: bool,
}

impl Default for ContextParams {
    fn default() -> Self {
        ContextParams {
            validation: ValidationMode::default(),
            max_texture_units: 8,
            point_size_range: (1.0, 255.0),
            line_width_range: (1.0, 255.0),
            window_size: (640, 480),
            window_depth: true,
        }
    }
}

/// Describes an application program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDesc {
    pub stage: Stage,
    /// Bit `i` is set if the program samples texture unit `i`.
    pub samplers_used: u32,
    /// Whether the program writes a per-vertex point size.
    pub writes_point_size: bool,
}

/// The program a stage actually runs, a user program or the generated
/// fixed-function one when `id` is `None`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CurrentProgram {
    pub id: Option<ProgramId>,
    pub samplers_used: u32,
    pub writes_point_size: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CurrentPrograms {
    pub vertex: CurrentProgram,
    pub fragment: CurrentProgram,
}

#[derive(Default)]
pub(crate) struct ProgramRegistry {
    handles: HandlePool<ProgramId>,
    descs: FastHashMap<ProgramId, ProgramDesc>,
}

impl ProgramRegistry {
    pub fn get(&self, id: ProgramId, stage: Stage) -> Result<ProgramDesc> {
        match self.descs.get(&id) {
            Some(desc) if desc.stage == stage => Ok(*desc),
            _ => Err(Error::ProgramInvalid(id)),
        }
    }
}

pub(crate) type SamplerSet = SmallVec<[Option<ObjectHandle>; MAX_SAMPLERS]>;

/// Backend objects the context owns, and which of them are bound.
pub(crate) struct Objects {
    pub cache: StateObjectCache,
    pub backend: Box<dyn Backend>,
    pub bound: [Option<ObjectHandle>; StateKind::COUNT],
    pub bound_samplers: [SamplerSet; Stage::COUNT],
    pub bound_views: [SmallVec<[Option<TextureId>; MAX_SAMPLERS]>; Stage::COUNT],
}

impl Objects {
    /// Returns the cached object for `template`, asking the backend to create
    /// it on a miss.
    pub fn find_or_create<T: Template>(&mut self, template: &T) -> Result<ObjectHandle> {
        let backend = &mut self.backend;
        self.cache
            .find_or_insert(template, |v| backend.create_object(&v.wrap()))
    }

    #[inline]
    pub fn is_bound(&self, kind: StateKind, handle: ObjectHandle) -> bool {
        if kind == StateKind::Sampler {
            self.bound_samplers.iter().any(|v| v.contains(&Some(handle)))
        } else {
            self.bound[kind.index()] == Some(handle)
        }
    }

    /// Binds `handle` unless it already is.
    pub fn bind(&mut self, kind: StateKind, handle: Option<ObjectHandle>) -> Result<()> {
        debug_assert!(kind != StateKind::Sampler);

        if self.bound[kind.index()] != handle {
            self.backend.bind_object(kind, handle)?;
            self.bound[kind.index()] = handle;
        }

        Ok(())
    }

    pub fn bind_samplers(&mut self, stage: Stage, handles: &[Option<ObjectHandle>]) -> Result<()> {
        let bound = &mut self.bound_samplers[stage.index()];
        if &bound[..] != handles {
            self.backend.bind_samplers(stage, handles)?;
            *bound = handles.iter().cloned().collect();
        }

        Ok(())
    }

    pub fn set_sampler_views(&mut self, stage: Stage, views: &[Option<TextureId>]) -> Result<()> {
        let bound = &mut self.bound_views[stage.index()];
        if &bound[..] != views {
            self.backend.set_sampler_views(stage, views)?;
            *bound = views.iter().cloned().collect();
        }

        Ok(())
    }
}

enum Saved {
    Object(Option<ObjectHandle>),
    Samplers([SamplerSet; Stage::COUNT]),
}

/// A rendering context. Owns the draw state, the dirty tracker, the state
/// object cache and the backend, and is used from one thread only.
pub struct Context {
    pub(crate) params: ContextParams,
    pub(crate) state: GlState,
    pub(crate) dirty: DirtyState,
    pub(crate) objects: Objects,
    pub(crate) shadows: Shadows,
    pub(crate) programs: ProgramRegistry,
    pub(crate) current: CurrentPrograms,
    pub(crate) table: Rc<RuleTable>,
    pub(crate) last_pass: Vec<&'static str>,
    saved: [Option<Saved>; StateKind::COUNT],
}

impl Context {
    /// Creates a context running the default rule table.
    pub fn new(params: ContextParams, backend: Box<dyn Backend>) -> Self {
        Context::with_table(params, backend, rules::default_table())
    }

    /// Creates a context running a custom rule table.
    pub fn with_table(mut params: ContextParams, backend: Box<dyn Backend>, table: RuleTable) -> Self {
        if params.max_texture_units > MAX_SAMPLERS {
            warn!(
                "{} texture units requested, clamped to {}.",
                params.max_texture_units, MAX_SAMPLERS
            );
            params.max_texture_units = MAX_SAMPLERS;
        }

        let (width, height) = params.window_size;
        let mut state = GlState::default();
        state.buffers.window_size = params.window_size;
        state.buffers.window_depth = params.window_depth;
        state.viewport.width = width;
        state.viewport.height = height;
        state.scissor.width = width;
        state.scissor.height = height;

        info!(
            "Creating context with {} rules ({:?} validation).",
            table.len(),
            params.validation
        );

        Context {
            params,
            state,
            dirty: DirtyState::all(),
            objects: Objects {
                cache: StateObjectCache::new(),
                backend,
                bound: Default::default(),
                bound_samplers: Default::default(),
                bound_views: Default::default(),
            },
            shadows: Shadows::default(),
            programs: ProgramRegistry::default(),
            current: CurrentPrograms::default(),
            table: Rc::new(table),
            last_pass: Vec::new(),
            saved: Default::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &ContextParams {
        &self.params
    }

    #[inline]
    pub fn state(&self) -> &GlState {
        &self.state
    }

    /// Mutable access to the draw state. Whoever writes through this must
    /// `invalidate` the matching front-end bits, nothing else will notice the
    /// change.
    #[inline]
    pub fn state_mut(&mut self) -> &mut GlState {
        &mut self.state
    }

    /// The dirty bits accumulated since the last successful validation.
    #[inline]
    pub fn dirty(&self) -> DirtyState {
        self.dirty
    }

    /// ORs `word` into the dirty state.
    #[inline]
    pub fn invalidate(&mut self, word: DirtyState) {
        self.dirty.invalidate(word);
    }

    /// Brings the bound backend objects in line with the draw state. On error
    /// the dirty state is kept, so the next call retries.
    pub fn validate(&mut self) -> Result<()> {
        pipeline::validate(self)
    }

    /// Names of the rules run by the last validation pass, in order.
    #[inline]
    pub fn last_pass(&self) -> &[&'static str] {
        &self.last_pass
    }

    #[inline]
    pub fn current_programs(&self) -> CurrentPrograms {
        self.current
    }

    #[inline]
    pub fn cache(&self) -> &StateObjectCache {
        &self.objects.cache
    }

    #[inline]
    pub fn cache_stats(&self) -> CacheStats {
        self.objects.cache.stats()
    }

    /// The object of `kind` currently bound, `None` for samplers.
    #[inline]
    pub fn bound(&self, kind: StateKind) -> Option<ObjectHandle> {
        self.objects.bound[kind.index()]
    }

    /// The sampler objects bound for `stage`, one per unit up to the last
    /// unit it samples.
    #[inline]
    pub fn bound_samplers(&self, stage: Stage) -> &[Option<ObjectHandle>] {
        &self.objects.bound_samplers[stage.index()]
    }

    #[inline]
    fn touch(&mut self, bits: Frontend) {
        self.dirty.invalidate(bits.into());
    }
}

impl Context {
    pub fn create_program(&mut self, desc: ProgramDesc) -> ProgramId {
        let id = self.programs.handles.create();
        self.programs.descs.insert(id, desc);
        id
    }

    /// Deletes a program. Validating while it is still bound fails with
    /// `ProgramInvalid`.
    pub fn delete_program(&mut self, id: ProgramId) -> bool {
        if self.programs.descs.remove(&id).is_none() {
            return false;
        }

        self.programs.handles.free(id);
        if self.state.program.vertex == Some(id) || self.state.program.fragment == Some(id) {
            self.touch(Frontend::PROGRAM);
        }

        true
    }

    /// Binds a program to `stage`, `None` falls back to fixed function.
    pub fn bind_program(&mut self, stage: Stage, id: Option<ProgramId>) {
        match stage {
            Stage::Vertex => self.state.program.vertex = id,
            Stage::Fragment => self.state.program.fragment = id,
        }

        self.touch(Frontend::PROGRAM);
    }
}

impl Context {
    /// Draws into `target`, or into the window surface with `None`.
    pub fn bind_offscreen(&mut self, target: Option<Offscreen>) {
        self.state.buffers.offscreen = target;
        self.touch(Frontend::BUFFERS);
    }

    pub fn resize_window(&mut self, width: u32, height: u32) {
        self.state.buffers.window_size = (width, height);
        self.touch(Frontend::BUFFERS);
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.state.color.clear_color = color;
        self.touch(Frontend::CLEAR_COLOR);
    }

    /// Enables or disables blending on every draw buffer.
    pub fn set_blend_enabled(&mut self, enabled: bool) {
        for v in self.state.color.targets.iter_mut() {
            v.blend_enabled = enabled;
        }

        self.touch(Frontend::BLEND);
    }

    pub fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.set_blend_func_separate(src, dst, src, dst);
    }

    pub fn set_blend_func_separate(
        &mut self,
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) {
        for v in self.state.color.targets.iter_mut() {
            v.src_rgb = src_rgb;
            v.dst_rgb = dst_rgb;
            v.src_alpha = src_alpha;
            v.dst_alpha = dst_alpha;
        }

        self.touch(Frontend::BLEND);
    }

    pub fn set_blend_equation(&mut self, rgb: Equation, alpha: Equation) {
        for v in self.state.color.targets.iter_mut() {
            v.equation_rgb = rgb;
            v.equation_alpha = alpha;
        }

        self.touch(Frontend::BLEND);
    }

    /// Sets the blend state of a single draw buffer.
    pub fn set_target_blend(&mut self, index: usize, target: RenderTargetState) {
        assert!(index < MAX_COLOR_BUFS, "Draw buffer {} out of range.", index);
        self.state.color.targets[index] = target;
        self.touch(Frontend::BLEND);
    }

    pub fn set_independent_blend(&mut self, enabled: bool) {
        self.state.color.independent_blend = enabled;
        self.touch(Frontend::BLEND);
    }

    pub fn set_blend_color(&mut self, color: [f32; 4]) {
        self.state.color.blend_color = color;
        self.touch(Frontend::BLEND);
    }

    pub fn set_color_write(&mut self, mask: (bool, bool, bool, bool)) {
        for v in self.state.color.targets.iter_mut() {
            v.color_write = mask;
        }

        self.touch(Frontend::BLEND);
    }

    pub fn set_logic_op(&mut self, op: Option<LogicOp>) {
        self.state.color.logic_op = op;
        self.touch(Frontend::BLEND);
    }

    pub fn set_dither(&mut self, enabled: bool) {
        self.state.color.dither = enabled;
        self.touch(Frontend::BLEND);
    }

    pub fn set_depth_test(&mut self, enabled: bool) {
        self.state.depth.test_enabled = enabled;
        self.touch(Frontend::DEPTH);
    }

    pub fn set_depth_func(&mut self, func: Comparison) {
        self.state.depth.func = func;
        self.touch(Frontend::DEPTH);
    }

    pub fn set_depth_write(&mut self, enabled: bool) {
        self.state.depth.write = enabled;
        self.touch(Frontend::DEPTH);
    }

    pub fn set_stencil_test(&mut self, enabled: bool) {
        self.state.stencil.enabled = enabled;
        self.touch(Frontend::STENCIL);
    }

    /// Sets the stencil state of both faces, or of the front face alone and
    /// the back face separately when `back` is given.
    pub fn set_stencil_faces(&mut self, front: StencilFaceState, back: Option<StencilFaceState>) {
        self.state.stencil.front = front;
        self.state.stencil.two_sided = back.is_some();
        self.state.stencil.back = back.unwrap_or(front);
        self.touch(Frontend::STENCIL);
    }

    pub fn set_alpha_test(&mut self, enabled: bool) {
        self.state.alpha.test_enabled = enabled;
        self.touch(Frontend::ALPHA);
    }

    pub fn set_alpha_func(&mut self, func: Comparison, reference: f32) {
        self.state.alpha.func = func;
        self.state.alpha.reference = reference;
        self.touch(Frontend::ALPHA);
    }

    pub fn set_cull_face(&mut self, face: Option<CullFace>) {
        self.state.polygon.cull_face = face;
        self.touch(Frontend::POLYGON);
    }

    pub fn set_front_face(&mut self, order: FrontFaceOrder) {
        self.state.polygon.front_face = order;
        self.touch(Frontend::POLYGON);
    }

    pub fn set_polygon_mode(&mut self, front: PolygonMode, back: PolygonMode) {
        self.state.polygon.mode_front = front;
        self.state.polygon.mode_back = back;
        self.touch(Frontend::POLYGON);
    }

    /// Sets the depth offset of filled polygons, `None` disables it.
    pub fn set_polygon_offset(&mut self, offset: Option<(f32, f32)>) {
        let polygon = &mut self.state.polygon;
        polygon.offset_fill = offset.is_some();
        if let Some((factor, units)) = offset {
            polygon.offset_factor = factor;
            polygon.offset_units = units;
        }

        self.touch(Frontend::POLYGON);
    }

    pub fn set_point_size(&mut self, size: f32) {
        self.state.point.size = size;
        self.touch(Frontend::POINT);
    }

    pub fn set_point_sprite(&mut self, enabled: bool, coord_replace: u16) {
        self.state.point.sprite = enabled;
        self.state.point.coord_replace = coord_replace;
        self.touch(Frontend::POINT);
    }

    pub fn set_program_point_size(&mut self, enabled: bool) {
        self.state.point.program_point_size = enabled;
        self.touch(Frontend::POINT);
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.state.line.width = width;
        self.touch(Frontend::LINE);
    }

    /// Sets the line stipple `(factor, pattern)`, `None` disables it.
    pub fn set_line_stipple(&mut self, stipple: Option<(u16, u16)>) {
        self.state.line.stipple = stipple.is_some();
        if let Some((factor, pattern)) = stipple {
            self.state.line.stipple_factor = factor;
            self.state.line.stipple_pattern = pattern;
        }

        self.touch(Frontend::LINE);
    }

    pub fn set_flat_shading(&mut self, enabled: bool) {
        self.state.light.flat_shading = enabled;
        self.touch(Frontend::LIGHT);
    }

    pub fn set_scissor_test(&mut self, enabled: bool) {
        self.state.scissor.enabled = enabled;
        self.touch(Frontend::SCISSOR);
    }

    pub fn set_scissor(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let scissor = &mut self.state.scissor;
        scissor.x = x;
        scissor.y = y;
        scissor.width = width;
        scissor.height = height;
        self.touch(Frontend::SCISSOR);
    }

    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        let viewport = &mut self.state.viewport;
        viewport.x = x;
        viewport.y = y;
        viewport.width = width;
        viewport.height = height;
        self.touch(Frontend::VIEWPORT);
    }

    pub fn set_depth_range(&mut self, near: f32, far: f32) {
        self.state.viewport.near = near;
        self.state.viewport.far = far;
        self.touch(Frontend::VIEWPORT);
    }

    /// Sets user clip plane `index`, `None` disables it.
    pub fn set_clip_plane(&mut self, index: usize, plane: Option<[f32; 4]>) {
        assert!(index < MAX_CLIP_PLANES, "Clip plane {} out of range.", index);

        let transform = &mut self.state.transform;
        match plane {
            Some(v) => {
                transform.clip_planes[index] = v;
                transform.clip_enabled |= 1 << index;
            }
            None => transform.clip_enabled &= !(1 << index),
        }

        self.touch(Frontend::TRANSFORM);
    }

    pub fn set_multisample(&mut self, enabled: bool) {
        self.state.multisample.enabled = enabled;
        self.touch(Frontend::MULTISAMPLE);
    }

    /// Enables fixed-function texturing on `unit`.
    pub fn set_texture_enabled(&mut self, unit: usize, enabled: bool) {
        self.texture_unit(unit).enabled = enabled;
        self.touch(Frontend::TEXTURE);
    }

    pub fn bind_texture(&mut self, unit: usize, texture: Option<TextureId>) {
        self.texture_unit(unit).texture = texture;
        self.touch(Frontend::TEXTURE);
    }

    pub fn set_texture_wrap(&mut self, unit: usize, s: TextureWrap, t: TextureWrap, r: TextureWrap) {
        let v = self.texture_unit(unit);
        v.wrap_s = s;
        v.wrap_t = t;
        v.wrap_r = r;
        self.touch(Frontend::TEXTURE);
    }

    pub fn set_texture_filter(&mut self, unit: usize, min: TextureFilter, mip: MipFilter, mag: TextureFilter) {
        let v = self.texture_unit(unit);
        v.min_filter = min;
        v.mip_filter = mip;
        v.mag_filter = mag;
        self.touch(Frontend::TEXTURE);
    }

    fn texture_unit(&mut self, unit: usize) -> &mut TextureUnitState {
        assert!(
            unit < self.params.max_texture_units,
            "Texture unit {} out of range.",
            unit
        );

        &mut self.state.texture.units[unit]
    }
}

impl Context {
    /// Remembers the object of `kind` bound right now, so a meta operation
    /// can bind its own state and `restore_bound` afterwards.
    ///
    /// # Panics
    ///
    /// Panics if a binding of `kind` is saved already.
    pub fn save_bound(&mut self, kind: StateKind) {
        let slot = &mut self.saved[kind.index()];
        assert!(slot.is_none(), "{:?} binding is saved already.", kind);

        *slot = Some(if kind == StateKind::Sampler {
            Saved::Samplers(self.objects.bound_samplers.clone())
        } else {
            Saved::Object(self.objects.bound[kind.index()])
        });
    }

    /// Rebinds the object saved by `save_bound`, unless it is bound already.
    ///
    /// # Panics
    ///
    /// Panics if nothing was saved for `kind`.
    pub fn restore_bound(&mut self, kind: StateKind) -> Result<()> {
        match self.saved[kind.index()].take() {
            Some(Saved::Object(handle)) => self.objects.bind(kind, handle),
            Some(Saved::Samplers(sets)) => {
                for &stage in Stage::ALL.iter() {
                    self.objects.bind_samplers(stage, &sets[stage.index()])?;
                }

                Ok(())
            }
            None => panic!("No {:?} binding was saved.", kind),
        }
    }

    /// Binds a one-off template through the cache, bypassing the draw state.
    /// The owning domain is invalidated, so the next validation puts the
    /// resolved state back. A sampler goes to unit zero of the fragment stage.
    pub fn bind_template<T: Template>(&mut self, template: &T) -> Result<ObjectHandle> {
        let handle = self.objects.find_or_create(template)?;

        if T::KIND == StateKind::Sampler {
            self.objects.bind_samplers(Stage::Fragment, &[Some(handle)])?;
        } else {
            self.objects.bind(T::KIND, Some(handle))?;
        }

        self.invalidate(rules::domain(T::KIND));
        Ok(handle)
    }

    /// Takes the object matching `template` out of the cache and destroys it.
    /// Refused if that object is bound or saved for a later restore.
    pub fn evict<T: Template>(&mut self, template: &T) -> bool {
        let handle = match self.objects.cache.find(template) {
            Some(handle) => handle,
            None => return false,
        };

        if self.objects.is_bound(T::KIND, handle) || self.is_saved(T::KIND, handle) {
            warn!("Refused to evict bound {:?} object {}.", T::KIND, handle);
            return false;
        }

        self.objects.cache.take(template);
        self.objects.backend.destroy_object(T::KIND, handle);
        self.shadows.forget(T::KIND, handle);
        true
    }

    fn is_saved(&self, kind: StateKind, handle: ObjectHandle) -> bool {
        match self.saved[kind.index()] {
            Some(Saved::Object(v)) => v == Some(handle),
            Some(Saved::Samplers(ref sets)) => sets.iter().any(|v| v.contains(&Some(handle))),
            None => false,
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let objects = &mut self.objects;

        for &kind in StateKind::ALL.iter() {
            if kind != StateKind::Sampler && objects.bound[kind.index()].is_some() {
                if let Err(err) = objects.backend.bind_object(kind, None) {
                    warn!("Failed to unbind {:?}: {}", kind, err);
                }
            }
        }

        for &stage in Stage::ALL.iter() {
            if !objects.bound_samplers[stage.index()].is_empty() {
                if let Err(err) = objects.backend.bind_samplers(stage, &[]) {
                    warn!("Failed to unbind {:?} samplers: {}", stage, err);
                }
            }

            if !objects.bound_views[stage.index()].is_empty() {
                if let Err(err) = objects.backend.set_sampler_views(stage, &[]) {
                    warn!("Failed to unbind {:?} sampler views: {}", stage, err);
                }
            }
        }

        let drained = objects.cache.drain();
        info!("Destroying context with {} state objects.", drained.len());

        for (kind, handle) in drained {
            objects.backend.destroy_object(kind, handle);
        }
    }
}
