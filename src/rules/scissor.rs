use crate::context::{BuffersState, Context, ScissorState};
use crate::errors::*;
use crate::templates::ScissorTemplate;

#[inline]
fn clamp(v: i64, max: u32) -> u32 {
    v.max(0).min(i64::from(max)) as u32
}

/// The scissor rectangle clamped to the draw target, or the whole target when
/// the test is off. Window targets flip Y.
pub fn translate(scissor: &ScissorState, buffers: &BuffersState) -> ScissorTemplate {
    let (width, height) = buffers.size();

    let (minx, miny, maxx, maxy) = if scissor.enabled {
        let x = i64::from(scissor.x);
        let y = i64::from(scissor.y);
        let minx = clamp(x, width);
        let miny = clamp(y, height);
        let maxx = clamp(x + i64::from(scissor.width), width).max(minx);
        let maxy = clamp(y + i64::from(scissor.height), height).max(miny);
        (minx, miny, maxx, maxy)
    } else {
        (0, 0, width, height)
    };

    if buffers.is_window() {
        ScissorTemplate {
            minx,
            miny: height - maxy,
            maxx,
            maxy: height - miny,
        }
    } else {
        ScissorTemplate {
            minx,
            miny,
            maxx,
            maxy,
        }
    }
}

pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(&ctx.state.scissor, &ctx.state.buffers);
    super::resolve(&mut ctx.objects, &mut ctx.shadows.scissor, template)?;
    Ok(())
}
