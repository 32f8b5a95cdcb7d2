use cgmath::Vector3;

use crate::context::{BuffersState, Context, ViewportState};
use crate::errors::*;
use crate::templates::ViewportTemplate;

/// Maps normalized device coordinates to window coordinates. Window targets
/// have their origin at the top, so Y is flipped against the target height.
pub fn translate(viewport: &ViewportState, buffers: &BuffersState) -> ViewportTemplate {
    let half = Vector3::new(
        viewport.width as f32 * 0.5,
        viewport.height as f32 * 0.5,
        (viewport.far - viewport.near) * 0.5,
    );

    let center = Vector3::new(
        viewport.x as f32 + half.x,
        viewport.y as f32 + half.y,
        viewport.near + half.z,
    );

    let (scale, translate) = if buffers.is_window() {
        let (_, height) = buffers.size();
        (
            Vector3::new(half.x, -half.y, half.z),
            Vector3::new(center.x, height as f32 - center.y, center.z),
        )
    } else {
        (half, center)
    };

    ViewportTemplate {
        scale: scale.extend(1.0).into(),
        translate: translate.extend(0.0).into(),
    }
}

pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(&ctx.state.viewport, &ctx.state.buffers);
    super::resolve(&mut ctx.objects, &mut ctx.shadows.viewport, template)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::context::Offscreen;

    #[test]
    fn offscreen() {
        let viewport = ViewportState {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
            near: 0.0,
            far: 1.0,
        };

        let buffers = BuffersState {
            offscreen: Some(Offscreen {
                width: 200,
                height: 100,
                ..Offscreen::default()
            }),
            ..BuffersState::default()
        };

        let template = translate(&viewport, &buffers);
        assert_eq!(template.scale, [50.0, 25.0, 0.5, 1.0]);
        assert_eq!(template.translate, [60.0, 45.0, 0.5, 0.0]);
    }

    #[test]
    fn window_flips_y() {
        let viewport = ViewportState {
            x: 10,
            y: 20,
            width: 100,
            height: 50,
            near: 0.0,
            far: 1.0,
        };

        let buffers = BuffersState {
            offscreen: None,
            window_size: (200, 100),
            window_depth: false,
        };

        let template = translate(&viewport, &buffers);
        assert_eq!(template.scale, [50.0, -25.0, 0.5, 1.0]);
        assert_eq!(template.translate, [60.0, 55.0, 0.5, 0.0]);
    }
}
