//! The mutable, application-visible draw state.
//!
//! Fields are grouped like the GL attribute groups. Each group is guarded by
//! one front-end dirty bit, see `Context::state_mut` for the contract of
//! writing them directly.

use crate::templates::tokens::{MAX_CLIP_PLANES, MAX_COLOR_BUFS, MAX_SAMPLERS};

use super::types::*;
use super::{ProgramId, TextureId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTargetState {
    pub blend_enabled: bool,
    pub equation_rgb: Equation,
    pub equation_alpha: Equation,
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
    pub color_write: (bool, bool, bool, bool),
}

impl Default for RenderTargetState {
    fn default() -> Self {
        RenderTargetState {
            blend_enabled: false,
            equation_rgb: Equation::Add,
            equation_alpha: Equation::Add,
            src_rgb: BlendFactor::One,
            dst_rgb: BlendFactor::Zero,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::Zero,
            color_write: (true, true, true, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorState {
    /// Blend state of each draw buffer. Only the first entry is used unless
    /// `independent_blend` is set.
    pub targets: [RenderTargetState; MAX_COLOR_BUFS],
    pub independent_blend: bool,
    pub logic_op: Option<LogicOp>,
    pub dither: bool,
    pub blend_color: [f32; 4],
    pub clear_color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    pub test_enabled: bool,
    pub func: Comparison,
    pub write: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        DepthState {
            test_enabled: false,
            func: Comparison::Less,
            write: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilFaceState {
    pub func: Comparison,
    pub reference: i32,
    pub value_mask: u32,
    pub write_mask: u32,
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

impl Default for StencilFaceState {
    fn default() -> Self {
        StencilFaceState {
            func: Comparison::Always,
            reference: 0,
            value_mask: !0,
            write_mask: !0,
            fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            pass: StencilOp::Keep,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StencilState {
    pub enabled: bool,
    /// When false the front face settings are used for both faces.
    pub two_sided: bool,
    pub front: StencilFaceState,
    pub back: StencilFaceState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaState {
    pub test_enabled: bool,
    pub func: Comparison,
    pub reference: f32,
}

impl Default for AlphaState {
    fn default() -> Self {
        AlphaState {
            test_enabled: false,
            func: Comparison::Always,
            reference: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonState {
    pub cull_face: Option<CullFace>,
    pub front_face: FrontFaceOrder,
    pub mode_front: PolygonMode,
    pub mode_back: PolygonMode,
    pub offset_point: bool,
    pub offset_line: bool,
    pub offset_fill: bool,
    pub offset_factor: f32,
    pub offset_units: f32,
    pub offset_clamp: f32,
    pub smooth: bool,
    pub stipple: bool,
}

impl Default for PolygonState {
    fn default() -> Self {
        PolygonState {
            cull_face: None,
            front_face: FrontFaceOrder::CounterClockwise,
            mode_front: PolygonMode::Fill,
            mode_back: PolygonMode::Fill,
            offset_point: false,
            offset_line: false,
            offset_fill: false,
            offset_factor: 0.0,
            offset_units: 0.0,
            offset_clamp: 0.0,
            smooth: false,
            stipple: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointState {
    pub size: f32,
    /// Attenuation bounds set by the application.
    pub min_size: f32,
    pub max_size: f32,
    pub smooth: bool,
    pub sprite: bool,
    /// Texture units whose coordinates are replaced when drawing sprites.
    pub coord_replace: u16,
    /// Size written by the vertex program instead of `size`.
    pub program_point_size: bool,
}

impl Default for PointState {
    fn default() -> Self {
        PointState {
            size: 1.0,
            min_size: 0.0,
            max_size: ::std::f32::MAX,
            smooth: false,
            sprite: false,
            coord_replace: 0,
            program_point_size: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineState {
    pub width: f32,
    pub smooth: bool,
    pub stipple: bool,
    /// Repeat count of each stipple bit, in `1..=256`.
    pub stipple_factor: u16,
    pub stipple_pattern: u16,
}

impl Default for LineState {
    fn default() -> Self {
        LineState {
            width: 1.0,
            smooth: false,
            stipple: false,
            stipple_factor: 1,
            stipple_pattern: 0xffff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightState {
    pub flat_shading: bool,
    pub two_side: bool,
}

/// A rectangle in window coordinates, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScissorState {
    pub enabled: bool,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Viewport in window coordinates, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        ViewportState {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            near: 0.0,
            far: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformState {
    /// User clip planes, in eye space.
    pub clip_planes: [[f32; 4]; MAX_CLIP_PLANES],
    /// Bit `i` enables `clip_planes[i]`.
    pub clip_enabled: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureUnitState {
    /// Fixed-function enable, ignored by user fragment programs.
    pub enabled: bool,
    pub texture: Option<TextureId>,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
    pub wrap_r: TextureWrap,
    pub min_filter: TextureFilter,
    pub mip_filter: MipFilter,
    pub mag_filter: TextureFilter,
    pub compare: Option<Comparison>,
    pub lod_bias: f32,
    pub min_lod: f32,
    pub max_lod: f32,
    pub max_anisotropy: u8,
    pub border_color: [f32; 4],
}

impl Default for TextureUnitState {
    fn default() -> Self {
        TextureUnitState {
            enabled: false,
            texture: None,
            wrap_s: TextureWrap::Repeat,
            wrap_t: TextureWrap::Repeat,
            wrap_r: TextureWrap::Repeat,
            min_filter: TextureFilter::Nearest,
            mip_filter: MipFilter::Linear,
            mag_filter: TextureFilter::Linear,
            compare: None,
            lod_bias: 0.0,
            min_lod: -1000.0,
            max_lod: 1000.0,
            max_anisotropy: 1,
            border_color: [0.0; 4],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextureState {
    pub units: [TextureUnitState; MAX_SAMPLERS],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgramState {
    pub vertex: Option<ProgramId>,
    pub fragment: Option<ProgramId>,
}

/// An application-created render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offscreen {
    pub width: u32,
    pub height: u32,
    pub color: [Option<TextureId>; MAX_COLOR_BUFS],
    pub depth_stencil: Option<TextureId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuffersState {
    /// The bound draw target, `None` draws into the window surface.
    pub offscreen: Option<Offscreen>,
    pub window_size: (u32, u32),
    pub window_depth: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MultisampleState {
    pub enabled: bool,
}

/// All the draw state a validation pass resolves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlState {
    pub color: ColorState,
    pub depth: DepthState,
    pub stencil: StencilState,
    pub alpha: AlphaState,
    pub polygon: PolygonState,
    pub point: PointState,
    pub line: LineState,
    pub light: LightState,
    pub scissor: ScissorState,
    pub viewport: ViewportState,
    pub transform: TransformState,
    pub texture: TextureState,
    pub program: ProgramState,
    pub buffers: BuffersState,
    pub multisample: MultisampleState,
}

impl BuffersState {
    /// Size of the bound draw target.
    pub fn size(&self) -> (u32, u32) {
        match self.offscreen {
            Some(ref v) => (v.width, v.height),
            None => self.window_size,
        }
    }

    /// True when drawing into the window surface, whose origin is the top-left
    /// corner.
    #[inline]
    pub fn is_window(&self) -> bool {
        self.offscreen.is_none()
    }

    pub fn has_depth_stencil(&self) -> bool {
        match self.offscreen {
            Some(ref v) => v.depth_stencil.is_some(),
            None => self.window_depth,
        }
    }
}
