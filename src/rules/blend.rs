use crate::context::{ColorState, Context, Equation, RenderTargetState};
use crate::errors::*;
use crate::templates::tokens::*;
use crate::templates::{BlendTemplate, RenderTargetBlend};

fn is_minmax(eq: Equation) -> bool {
    eq == Equation::Min || eq == Equation::Max
}

fn target(state: &RenderTargetState, logic_op: bool) -> RenderTargetBlend {
    let (r, g, b, a) = state.color_write;
    let mut colormask = 0;
    if r {
        colormask |= MASK_R;
    }
    if g {
        colormask |= MASK_G;
    }
    if b {
        colormask |= MASK_B;
    }
    if a {
        colormask |= MASK_A;
    }

    // Logic ops replace blending, and disabled blending leaves the factors
    // zeroed so that it dedups regardless of them.
    if !state.blend_enabled || logic_op {
        return RenderTargetBlend {
            colormask,
            ..RenderTargetBlend::default()
        };
    }

    let mut v = RenderTargetBlend {
        blend_enable: 1,
        rgb_func: state.equation_rgb.into(),
        rgb_src_factor: state.src_rgb.into(),
        rgb_dst_factor: state.dst_rgb.into(),
        alpha_func: state.equation_alpha.into(),
        alpha_src_factor: state.src_alpha.into(),
        alpha_dst_factor: state.dst_alpha.into(),
        colormask,
    };

    // Min and max ignore their factors.
    if is_minmax(state.equation_rgb) {
        v.rgb_src_factor = BLENDFACTOR_ONE;
        v.rgb_dst_factor = BLENDFACTOR_ONE;
    }

    if is_minmax(state.equation_alpha) {
        v.alpha_src_factor = BLENDFACTOR_ONE;
        v.alpha_dst_factor = BLENDFACTOR_ONE;
    }

    v
}

/// Only the first draw buffer is described unless independent blending is
/// enabled, the others stay zeroed.
pub fn translate(color: &ColorState) -> BlendTemplate {
    let mut template = BlendTemplate::default();
    let targets = if color.independent_blend {
        MAX_COLOR_BUFS
    } else {
        1
    };

    if let Some(op) = color.logic_op {
        template.logicop_enable = 1;
        template.logicop_func = op.into();
    }

    for i in 0..targets {
        template.rt[i] = target(&color.targets[i], color.logic_op.is_some());
    }

    template.independent_blend_enable = color.independent_blend as u8;
    template.dither = color.dither as u8;
    template.color = color.blend_color;
    template
}

pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(&ctx.state.color);
    super::resolve(&mut ctx.objects, &mut ctx.shadows.blend, template)?;
    Ok(())
}
