use crate::context::{Context, ContextParams, CurrentProgram, FrontFaceOrder, GlState};
use crate::errors::*;
use crate::templates::tokens::FACE_NONE;
use crate::templates::RasterizerTemplate;

#[inline]
fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

/// Point size clamped to the attenuation bounds of the application. Only the
/// upper limit of the rasterizer applies to those bounds.
pub fn point_size(state: &GlState, params: &ContextParams) -> f32 {
    let (_, limit_max) = params.point_size_range;
    let min = state.point.min_size.min(limit_max);
    let max = state.point.max_size.min(limit_max).max(min);
    clamp(state.point.size, min, max)
}

pub fn translate(state: &GlState, params: &ContextParams, vertex: &CurrentProgram) -> RasterizerTemplate {
    let polygon = &state.polygon;
    let point = &state.point;
    let line = &state.line;

    // Window targets are drawn with an inverted Y axis, which also inverts
    // the winding of every primitive.
    let ccw = polygon.front_face == FrontFaceOrder::CounterClockwise;
    let front_ccw = ccw != state.buffers.is_window();

    let (line_min, line_max) = params.line_width_range;

    RasterizerTemplate {
        flatshade: state.light.flat_shading as u8,
        light_twoside: state.light.two_side as u8,
        front_ccw: front_ccw as u8,
        cull_face: polygon.cull_face.map_or(FACE_NONE, |v| v.into()),
        fill_front: polygon.mode_front.into(),
        fill_back: polygon.mode_back.into(),
        offset_point: polygon.offset_point as u8,
        offset_line: polygon.offset_line as u8,
        offset_tri: polygon.offset_fill as u8,
        scissor: state.scissor.enabled as u8,
        poly_smooth: polygon.smooth as u8,
        poly_stipple_enable: polygon.stipple as u8,
        point_smooth: point.smooth as u8,
        point_quad_rasterization: point.sprite as u8,
        point_size_per_vertex: (point.program_point_size && vertex.writes_point_size) as u8,
        multisample: state.multisample.enabled as u8,
        line_smooth: line.smooth as u8,
        line_stipple_enable: line.stipple as u8,
        line_last_pixel: 0,
        line_stipple_factor: if line.stipple {
            (line.stipple_factor.max(1).min(256) - 1) as u8
        } else {
            0
        },
        line_stipple_pattern: if line.stipple { line.stipple_pattern } else { 0 },
        sprite_coord_enable: if point.sprite { point.coord_replace } else { 0 },
        line_width: clamp(line.width, line_min, line_max),
        point_size: point_size(state, params),
        offset_units: if polygon.offset_fill { polygon.offset_units } else { 0.0 },
        offset_scale: if polygon.offset_fill { polygon.offset_factor } else { 0.0 },
        offset_clamp: if polygon.offset_fill { polygon.offset_clamp } else { 0.0 },
    }
}

pub fn update(ctx: &mut Context) -> Result<()> {
    let template = translate(&ctx.state, &ctx.params, &ctx.current.vertex);
    super::resolve(&mut ctx.objects, &mut ctx.shadows.rasterizer, template)?;
    Ok(())
}
