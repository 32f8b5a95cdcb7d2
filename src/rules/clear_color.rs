use crate::context::Context;
use crate::errors::*;
use crate::templates::ClearColorTemplate;

pub fn translate(color: [f32; 4]) -> ClearColorTemplate {
    let mut template = ClearColorTemplate::default();
    for (dst, src) in template.color.iter_mut().zip(color.iter()) {
        *dst = src.max(0.0).min(1.0);
    }

    template
}

pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(ctx.state.color.clear_color);
    super::resolve(&mut ctx.objects, &mut ctx.shadows.clear_color, template)?;
    Ok(())
}
