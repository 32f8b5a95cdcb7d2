//! Flat state templates, one per kind of backend state object.
//!
//! Every template is `#[repr(C)]` with explicit padding, so two templates
//! describe the same state exactly when their bytes are equal.

use bytemuck::{Pod, Zeroable};

use super::tokens::*;

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct RenderTargetBlend {
    pub blend_enable: u8,
    pub rgb_func: u8,
    pub rgb_src_factor: u8,
    pub rgb_dst_factor: u8,
    pub alpha_func: u8,
    pub alpha_src_factor: u8,
    pub alpha_dst_factor: u8,
    pub colormask: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct BlendTemplate {
    pub independent_blend_enable: u8,
    pub logicop_enable: u8,
    pub logicop_func: u8,
    pub dither: u8,
    /// Only `rt[0]` is meaningful unless independent blending is enabled, the
    /// remaining entries are kept zeroed.
    pub rt: [RenderTargetBlend; MAX_COLOR_BUFS],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct StencilFace {
    pub enabled: u8,
    pub func: u8,
    pub fail_op: u8,
    pub zfail_op: u8,
    pub zpass_op: u8,
    pub valuemask: u8,
    pub writemask: u8,
    pub ref_value: u8,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct DepthStencilAlphaTemplate {
    pub depth_enabled: u8,
    pub depth_writemask: u8,
    pub depth_func: u8,
    pub alpha_enabled: u8,
    pub alpha_func: u8,
    pub _pad: [u8; 3],
    pub alpha_ref_value: f32,
    /// Front face first, back face second.
    pub stencil: [StencilFace; 2],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct RasterizerTemplate {
    pub flatshade: u8,
    pub light_twoside: u8,
    pub front_ccw: u8,
    pub cull_face: u8,
    pub fill_front: u8,
    pub fill_back: u8,
    pub offset_point: u8,
    pub offset_line: u8,
    pub offset_tri: u8,
    pub scissor: u8,
    pub poly_smooth: u8,
    pub poly_stipple_enable: u8,
    pub point_smooth: u8,
    pub point_quad_rasterization: u8,
    pub point_size_per_vertex: u8,
    pub multisample: u8,
    pub line_smooth: u8,
    pub line_stipple_enable: u8,
    pub line_last_pixel: u8,
    pub line_stipple_factor: u8,
    pub line_stipple_pattern: u16,
    pub sprite_coord_enable: u16,
    pub line_width: f32,
    pub point_size: f32,
    pub offset_units: f32,
    pub offset_scale: f32,
    pub offset_clamp: f32,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct SamplerTemplate {
    pub wrap_s: u8,
    pub wrap_t: u8,
    pub wrap_r: u8,
    pub min_img_filter: u8,
    pub min_mip_filter: u8,
    pub mag_img_filter: u8,
    pub compare_mode: u8,
    pub compare_func: u8,
    pub normalized_coords: u8,
    pub seamless_cube_map: u8,
    pub max_anisotropy: u8,
    pub _pad: u8,
    pub lod_bias: f32,
    pub min_lod: f32,
    pub max_lod: f32,
    pub border_color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct ViewportTemplate {
    pub scale: [f32; 4],
    pub translate: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct ScissorTemplate {
    pub minx: u32,
    pub miny: u32,
    pub maxx: u32,
    pub maxy: u32,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct ClearColorTemplate {
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct ClipTemplate {
    /// Number of leading entries of `planes` in use.
    pub nr: u32,
    pub planes: [[f32; 4]; MAX_CLIP_PLANES],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct FramebufferTemplate {
    pub width: u32,
    pub height: u32,
    pub nr_cbufs: u32,
    /// Non-zero when rendering to the window-system surface, whose origin is
    /// the top-left corner.
    pub window: u32,
    /// Non-zero when the target has a depth/stencil buffer.
    pub has_zsbuf: u32,
    /// Texture ids as `[index, version]` pairs, a zero version means no
    /// attachment. Both are zero for the window surface.
    pub cbufs: [[u32; 2]; MAX_COLOR_BUFS],
    pub zsbuf: [u32; 2],
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct VertexShaderTemplate {
    pub program_index: u32,
    pub program_version: u32,
    pub generated: u32,
    /// Enabled user clip planes, the variant emits one distance per bit.
    pub clip_plane_mask: u32,
    /// Texture units the vertex stage fetches from.
    pub samplers_used: u32,
}

#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct FragmentShaderTemplate {
    pub program_index: u32,
    pub program_version: u32,
    pub generated: u32,
    /// Texture units sampled by this variant.
    pub samplers_used: u32,
}
