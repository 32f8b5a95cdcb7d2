use crate::context::{Context, GlState, StencilFaceState};
use crate::errors::*;
use crate::templates::{DepthStencilAlphaTemplate, StencilFace};

fn stencil_face(face: &StencilFaceState) -> StencilFace {
    StencilFace {
        enabled: 1,
        func: face.func.into(),
        fail_op: face.fail.into(),
        zfail_op: face.depth_fail.into(),
        zpass_op: face.pass.into(),
        valuemask: face.value_mask as u8,
        writemask: face.write_mask as u8,
        ref_value: face.reference.max(0).min(0xff) as u8,
    }
}

/// Depth and stencil tests are dropped when the draw target has no
/// depth/stencil buffer to test against.
pub fn translate(state: &GlState) -> DepthStencilAlphaTemplate {
    let mut template = DepthStencilAlphaTemplate::default();
    let has_zs = state.buffers.has_depth_stencil();

    if state.depth.test_enabled && has_zs {
        template.depth_enabled = 1;
        template.depth_writemask = state.depth.write as u8;
        template.depth_func = state.depth.func.into();
    }

    if state.stencil.enabled && has_zs {
        template.stencil[0] = stencil_face(&state.stencil.front);
        if state.stencil.two_sided {
            template.stencil[1] = stencil_face(&state.stencil.back);
        }
    }

    if state.alpha.test_enabled {
        template.alpha_enabled = 1;
        template.alpha_func = state.alpha.func.into();
        template.alpha_ref_value = state.alpha.reference.max(0.0).min(1.0);
    }

    template
}

pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(&ctx.state);
    super::resolve(&mut ctx.objects, &mut ctx.shadows.depth_stencil_alpha, template)?;
    Ok(())
}
