//! State rules.
//!
//! Every cached rule follows the same steps. It translates context fields into
//! a template, compares the template against the shadow of what it bound last,
//! and only on a difference resolves it through the state object cache and
//! binds the result.

pub mod blend;
pub mod clear_color;
pub mod clip;
pub mod depth_stencil;
pub mod framebuffer;
pub mod program;
pub mod rasterizer;
pub mod sampler;
pub mod scissor;
pub mod viewport;

mod types;

use crate::backend::ObjectHandle;
use crate::context::{Objects, Stage};
use crate::dirty::{DirtyState, Frontend, Tracker};
use crate::errors::*;
use crate::pipeline::{RuleTable, StateRule};
use crate::templates::tokens::MAX_SAMPLERS;
use crate::templates::*;

/// The last template a rule resolved, and the object it resolved to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Shadow<T> {
    pub template: T,
    pub handle: ObjectHandle,
}

#[derive(Default)]
pub(crate) struct Shadows {
    pub framebuffer: Option<Shadow<FramebufferTemplate>>,
    pub depth_stencil_alpha: Option<Shadow<DepthStencilAlphaTemplate>>,
    pub clip: Option<Shadow<ClipTemplate>>,
    pub vertex_program: Option<Shadow<VertexShaderTemplate>>,
    pub fragment_program: Option<Shadow<FragmentShaderTemplate>>,
    pub rasterizer: Option<Shadow<RasterizerTemplate>>,
    pub viewport: Option<Shadow<ViewportTemplate>>,
    pub scissor: Option<Shadow<ScissorTemplate>>,
    pub blend: Option<Shadow<BlendTemplate>>,
    pub clear_color: Option<Shadow<ClearColorTemplate>>,
    /// Per stage, per texture unit.
    pub samplers: [[Option<Shadow<SamplerTemplate>>; MAX_SAMPLERS]; Stage::COUNT],
}

fn forget_if<T>(shadow: &mut Option<Shadow<T>>, handle: ObjectHandle) {
    if shadow.as_ref().map_or(false, |v| v.handle == handle) {
        *shadow = None;
    }
}

impl Shadows {
    /// Drops every shadow referring to `handle`, whose object is about to be
    /// destroyed.
    pub fn forget(&mut self, kind: StateKind, handle: ObjectHandle) {
        match kind {
            StateKind::Framebuffer => forget_if(&mut self.framebuffer, handle),
            StateKind::DepthStencilAlpha => forget_if(&mut self.depth_stencil_alpha, handle),
            StateKind::Clip => forget_if(&mut self.clip, handle),
            StateKind::VertexShader => forget_if(&mut self.vertex_program, handle),
            StateKind::FragmentShader => forget_if(&mut self.fragment_program, handle),
            StateKind::Rasterizer => forget_if(&mut self.rasterizer, handle),
            StateKind::Viewport => forget_if(&mut self.viewport, handle),
            StateKind::Scissor => forget_if(&mut self.scissor, handle),
            StateKind::Blend => forget_if(&mut self.blend, handle),
            StateKind::ClearColor => forget_if(&mut self.clear_color, handle),
            StateKind::Sampler => {
                for v in self.samplers.iter_mut().flat_map(|units| units.iter_mut()) {
                    forget_if(v, handle);
                }
            }
        }
    }
}

/// Returns the object for `template`, from the shadow when the bytes did not
/// change or from the cache otherwise. The shadow is updated only once the
/// object exists.
pub(crate) fn lookup<T: Template>(
    objects: &mut Objects,
    shadow: &mut Option<Shadow<T>>,
    template: T,
) -> Result<ObjectHandle> {
    if let Some(ref v) = *shadow {
        if v.template.same_as(&template) {
            return Ok(v.handle);
        }
    }

    let handle = objects.find_or_create(&template)?;
    *shadow = Some(Shadow { template, handle });
    Ok(handle)
}

/// Resolves `template` and binds it.
///
/// Without a change to the template and with the shadow object still bound,
/// neither the cache nor the backend is touched. After an override the shadow
/// object is rebound without a lookup.
pub(crate) fn resolve<T: Template>(
    objects: &mut Objects,
    shadow: &mut Option<Shadow<T>>,
    template: T,
) -> Result<ObjectHandle> {
    if let Some(ref v) = *shadow {
        if v.template.same_as(&template) {
            objects.bind(T::KIND, Some(v.handle))?;
            return Ok(v.handle);
        }
    }

    let handle = objects.find_or_create(&template)?;
    objects.bind(T::KIND, Some(handle))?;
    *shadow = Some(Shadow { template, handle });
    Ok(handle)
}

/// The dirty bits under which the rule owning `kind` runs again.
pub fn domain(kind: StateKind) -> DirtyState {
    match kind {
        StateKind::Blend => Frontend::BLEND.into(),
        StateKind::DepthStencilAlpha => Frontend::DEPTH.into(),
        StateKind::Rasterizer => Frontend::POLYGON.into(),
        StateKind::Sampler => Frontend::TEXTURE.into(),
        StateKind::Viewport => Frontend::VIEWPORT.into(),
        StateKind::Scissor => Frontend::SCISSOR.into(),
        StateKind::ClearColor => Frontend::CLEAR_COLOR.into(),
        StateKind::Clip => Frontend::TRANSFORM.into(),
        StateKind::Framebuffer => Frontend::BUFFERS.into(),
        StateKind::VertexShader => Tracker::VERTEX_PROGRAM.into(),
        StateKind::FragmentShader => Tracker::FRAGMENT_PROGRAM.into(),
    }
}

/// The rule table every context runs by default.
///
/// Producers precede their consumers: `framebuffer` raises
/// `Tracker::FRAMEBUFFER` and `fragment_program` raises
/// `Tracker::SAMPLER_VIEWS`. The current program is picked by a pre-pass, as
/// its outcome decides which program rules have to run.
pub fn default_table() -> RuleTable {
    let prepass = vec![StateRule::new(
        "current_program",
        Frontend::PROGRAM | Frontend::TEXTURE,
        program::update_current,
    )];

    let rules = vec![
        StateRule::new("framebuffer", Frontend::BUFFERS, framebuffer::update),
        StateRule::new(
            "depth_stencil_alpha",
            DirtyState::new(
                Frontend::DEPTH | Frontend::STENCIL | Frontend::ALPHA,
                Tracker::FRAMEBUFFER,
            ),
            depth_stencil::update,
        ),
        StateRule::new("clip", Frontend::TRANSFORM, clip::update),
        StateRule::new(
            "vertex_program",
            DirtyState::new(Frontend::TRANSFORM, Tracker::VERTEX_PROGRAM),
            program::update_vertex,
        ),
        StateRule::new(
            "fragment_program",
            Tracker::FRAGMENT_PROGRAM,
            program::update_fragment,
        ),
        StateRule::new(
            "rasterizer",
            DirtyState::new(
                Frontend::POLYGON
                    | Frontend::POINT
                    | Frontend::LINE
                    | Frontend::LIGHT
                    | Frontend::SCISSOR
                    | Frontend::MULTISAMPLE,
                Tracker::FRAMEBUFFER | Tracker::VERTEX_PROGRAM,
            ),
            rasterizer::update,
        ),
        StateRule::new(
            "viewport",
            DirtyState::new(Frontend::VIEWPORT, Tracker::FRAMEBUFFER),
            viewport::update,
        ),
        StateRule::new(
            "scissor",
            DirtyState::new(Frontend::SCISSOR, Tracker::FRAMEBUFFER),
            scissor::update,
        ),
        StateRule::new("blend", Frontend::BLEND, blend::update),
        StateRule::new("clear_color", Frontend::CLEAR_COLOR, clear_color::update),
        StateRule::new(
            "samplers",
            DirtyState::new(Frontend::TEXTURE, Tracker::SAMPLER_VIEWS),
            sampler::update_samplers,
        ),
        StateRule::new(
            "sampler_views",
            DirtyState::new(Frontend::TEXTURE, Tracker::SAMPLER_VIEWS),
            sampler::update_views,
        ),
    ];

    RuleTable::new(prepass, rules)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_table_order() {
        let table = default_table();
        let names = table.rules().iter().map(|v| v.name).collect::<Vec<_>>();

        assert_eq!(table.prepass()[0].name, "current_program");
        assert_eq!(
            names,
            vec![
                "framebuffer",
                "depth_stencil_alpha",
                "clip",
                "vertex_program",
                "fragment_program",
                "rasterizer",
                "viewport",
                "scissor",
                "blend",
                "clear_color",
                "samplers",
                "sampler_views",
            ]
        );
    }

    #[test]
    fn producers_precede_consumers() {
        let table = default_table();
        let position = |name: &str| table.rules().iter().position(|v| v.name == name);

        let framebuffer = position("framebuffer").unwrap();
        let vertex = position("vertex_program").unwrap();
        let fragment = position("fragment_program").unwrap();

        for (i, rule) in table.rules().iter().enumerate() {
            if rule.dirty.tracker.contains(Tracker::FRAMEBUFFER) {
                assert!(i > framebuffer, "{} consumes the framebuffer early", rule.name);
            }

            if rule.dirty.tracker.contains(Tracker::SAMPLER_VIEWS) {
                assert!(i > vertex && i > fragment, "{} consumes sampler views early", rule.name);
            }
        }
    }

    #[test]
    fn every_kind_has_a_domain() {
        let table = default_table();
        for &kind in StateKind::ALL.iter() {
            let bits = domain(kind);
            assert!(table.rules().iter().any(|v| v.dirty.contains(bits)));
        }
    }
}
