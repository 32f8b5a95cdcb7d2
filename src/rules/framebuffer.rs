use crate::context::{BuffersState, Context, TextureId};
use crate::dirty::Tracker;
use crate::errors::*;
use crate::templates::{FramebufferTemplate, Template};
use crate::utils::prelude::Handle;

#[inline]
fn raw(id: TextureId) -> [u32; 2] {
    let handle: Handle = id.into();
    [handle.index(), handle.version()]
}

pub fn translate(buffers: &BuffersState) -> FramebufferTemplate {
    let (width, height) = buffers.size();
    let mut template = FramebufferTemplate {
        width,
        height,
        has_zsbuf: buffers.has_depth_stencil() as u32,
        ..FramebufferTemplate::default()
    };

    match buffers.offscreen {
        Some(ref target) => {
            for (i, v) in target.color.iter().enumerate() {
                if let Some(id) = *v {
                    template.cbufs[i] = raw(id);
                    template.nr_cbufs = i as u32 + 1;
                }
            }

            if let Some(id) = target.depth_stencil {
                template.zsbuf = raw(id);
            }
        }
        None => {
            template.window = 1;
            template.nr_cbufs = 1;
        }
    }

    template
}

/// Binds the draw target, and raises `Tracker::FRAMEBUFFER` when it changed
/// so the state derived from its size and orientation is revisited.
pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(&ctx.state.buffers);
    let changed = ctx
        .shadows
        .framebuffer
        .as_ref()
        .map_or(true, |v| !v.template.same_as(&template));

    super::resolve(&mut ctx.objects, &mut ctx.shadows.framebuffer, template)?;

    if changed {
        ctx.invalidate(Tracker::FRAMEBUFFER.into());
    }

    Ok(())
}
