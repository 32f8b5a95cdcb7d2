//! Program selection and shader variants.
//!
//! The pre-pass decides which program each stage runs, the application's or
//! the generated fixed-function one, and raises the tracker bit of a stage
//! whose program changed. The stage rules then resolve the shader variant of
//! that program, keyed by the small bits of state the variant is compiled for.

use crate::context::{Context, CurrentProgram, Stage};
use crate::dirty::Tracker;
use crate::errors::*;
use crate::templates::{FragmentShaderTemplate, VertexShaderTemplate};
use crate::utils::prelude::Handle;

fn current(ctx: &Context, stage: Stage) -> Result<CurrentProgram> {
    let units_mask = (1u32 << ctx.params.max_texture_units) - 1;
    let bound = match stage {
        Stage::Vertex => ctx.state.program.vertex,
        Stage::Fragment => ctx.state.program.fragment,
    };

    if let Some(id) = bound {
        let desc = ctx.programs.get(id, stage)?;
        return Ok(CurrentProgram {
            id: Some(id),
            samplers_used: desc.samplers_used & units_mask,
            writes_point_size: desc.writes_point_size,
        });
    }

    // The generated fragment program samples every enabled unit that has a
    // texture bound.
    let mut samplers_used = 0;
    if stage == Stage::Fragment {
        for (i, v) in ctx.state.texture.units.iter().enumerate() {
            if v.enabled && v.texture.is_some() {
                samplers_used |= 1 << i;
            }
        }
    }

    Ok(CurrentProgram {
        id: None,
        samplers_used: samplers_used & units_mask,
        writes_point_size: false,
    })
}

pub fn update_current(ctx: &mut Context) -> Result<()> {
    let vertex = current(ctx, Stage::Vertex)?;
    let fragment = current(ctx, Stage::Fragment)?;

    if ctx.current.vertex != vertex {
        ctx.current.vertex = vertex;
        ctx.invalidate(Tracker::VERTEX_PROGRAM.into());
    }

    if ctx.current.fragment != fragment {
        ctx.current.fragment = fragment;
        ctx.invalidate(Tracker::FRAGMENT_PROGRAM.into());
    }

    Ok(())
}

#[inline]
fn raw(program: &CurrentProgram) -> (u32, u32, u32) {
    match program.id {
        Some(id) => {
            let handle: Handle = id.into();
            (handle.index(), handle.version(), 0)
        }
        None => (0, 0, 1),
    }
}

/// Resolves the vertex variant. A change of the sampled units raises
/// `Tracker::SAMPLER_VIEWS`, the sampler rules depend on them.
pub fn update_vertex(ctx: &mut Context) -> Result<()> {
    let (program_index, program_version, generated) = raw(&ctx.current.vertex);
    let template = VertexShaderTemplate {
        program_index,
        program_version,
        generated,
        clip_plane_mask: u32::from(ctx.state.transform.clip_enabled),
        samplers_used: ctx.current.vertex.samplers_used,
    };

    let previous = ctx
        .shadows
        .vertex_program
        .as_ref()
        .map(|v| v.template.samplers_used);

    super::resolve(&mut ctx.objects, &mut ctx.shadows.vertex_program, template)?;

    if previous != Some(template.samplers_used) {
        ctx.invalidate(Tracker::SAMPLER_VIEWS.into());
    }

    Ok(())
}

/// Resolves the fragment variant. Like the vertex variant, a change of the
/// sampled units raises `Tracker::SAMPLER_VIEWS`.
pub fn update_fragment(ctx: &mut Context) -> Result<()> {
    let (program_index, program_version, generated) = raw(&ctx.current.fragment);
    let template = FragmentShaderTemplate {
        program_index,
        program_version,
        generated,
        samplers_used: ctx.current.fragment.samplers_used,
    };

    let previous = ctx
        .shadows
        .fragment_program
        .as_ref()
        .map(|v| v.template.samplers_used);

    super::resolve(&mut ctx.objects, &mut ctx.shadows.fragment_program, template)?;

    if previous != Some(template.samplers_used) {
        ctx.invalidate(Tracker::SAMPLER_VIEWS.into());
    }

    Ok(())
}
