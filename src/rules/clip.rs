use crate::context::{Context, TransformState};
use crate::errors::*;
use crate::templates::tokens::MAX_CLIP_PLANES;
use crate::templates::ClipTemplate;

/// Packs the enabled user clip planes densely, in index order.
pub fn translate(transform: &TransformState) -> ClipTemplate {
    let mut template = ClipTemplate::default();

    for i in 0..MAX_CLIP_PLANES {
        if transform.clip_enabled & (1 << i) != 0 {
            template.planes[template.nr as usize] = transform.clip_planes[i];
            template.nr += 1;
        }
    }

    template
}

pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(&ctx.state.transform);
    super::resolve(&mut ctx.objects, &mut ctx.shadows.clip, template)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn planes_are_packed() {
        let mut transform = TransformState::default();
        transform.clip_planes[1] = [1.0, 0.0, 0.0, 0.0];
        transform.clip_planes[4] = [0.0, 1.0, 0.0, 2.0];
        transform.clip_enabled = 0b10010;

        let template = translate(&transform);
        assert_eq!(template.nr, 2);
        assert_eq!(template.planes[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(template.planes[1], [0.0, 1.0, 0.0, 2.0]);
        assert_eq!(template.planes[2], [0.0; 4]);
    }
}
