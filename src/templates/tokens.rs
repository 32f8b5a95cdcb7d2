//! Backend tokens stored inside state templates.
//!
//! Templates are plain bytes, so every enumeration is stored as one of the
//! small integer tokens below rather than as a Rust enum.

pub const MAX_COLOR_BUFS: usize = 8;
pub const MAX_CLIP_PLANES: usize = 6;
pub const MAX_SAMPLERS: usize = 16;

pub const FUNC_NEVER: u8 = 0;
pub const FUNC_LESS: u8 = 1;
pub const FUNC_EQUAL: u8 = 2;
pub const FUNC_LEQUAL: u8 = 3;
pub const FUNC_GREATER: u8 = 4;
pub const FUNC_NOTEQUAL: u8 = 5;
pub const FUNC_GEQUAL: u8 = 6;
pub const FUNC_ALWAYS: u8 = 7;

pub const BLEND_ADD: u8 = 0;
pub const BLEND_SUBTRACT: u8 = 1;
pub const BLEND_REVERSE_SUBTRACT: u8 = 2;
pub const BLEND_MIN: u8 = 3;
pub const BLEND_MAX: u8 = 4;

pub const BLENDFACTOR_ONE: u8 = 0x1;
pub const BLENDFACTOR_SRC_COLOR: u8 = 0x2;
pub const BLENDFACTOR_SRC_ALPHA: u8 = 0x3;
pub const BLENDFACTOR_DST_ALPHA: u8 = 0x4;
pub const BLENDFACTOR_DST_COLOR: u8 = 0x5;
pub const BLENDFACTOR_SRC_ALPHA_SATURATE: u8 = 0x6;
pub const BLENDFACTOR_CONST_COLOR: u8 = 0x7;
pub const BLENDFACTOR_CONST_ALPHA: u8 = 0x8;
pub const BLENDFACTOR_ZERO: u8 = 0x11;
pub const BLENDFACTOR_INV_SRC_COLOR: u8 = 0x12;
pub const BLENDFACTOR_INV_SRC_ALPHA: u8 = 0x13;
pub const BLENDFACTOR_INV_DST_ALPHA: u8 = 0x14;
pub const BLENDFACTOR_INV_DST_COLOR: u8 = 0x15;
pub const BLENDFACTOR_INV_CONST_COLOR: u8 = 0x17;
pub const BLENDFACTOR_INV_CONST_ALPHA: u8 = 0x18;

pub const MASK_R: u8 = 0x1;
pub const MASK_G: u8 = 0x2;
pub const MASK_B: u8 = 0x4;
pub const MASK_A: u8 = 0x8;
pub const MASK_RGBA: u8 = 0xf;

pub const LOGICOP_CLEAR: u8 = 0;
pub const LOGICOP_AND: u8 = 8;
pub const LOGICOP_XOR: u8 = 6;
pub const LOGICOP_OR: u8 = 14;
pub const LOGICOP_COPY: u8 = 12;
pub const LOGICOP_INVERT: u8 = 5;
pub const LOGICOP_SET: u8 = 15;

pub const STENCIL_OP_KEEP: u8 = 0;
pub const STENCIL_OP_ZERO: u8 = 1;
pub const STENCIL_OP_REPLACE: u8 = 2;
pub const STENCIL_OP_INCR: u8 = 3;
pub const STENCIL_OP_DECR: u8 = 4;
pub const STENCIL_OP_INCR_WRAP: u8 = 5;
pub const STENCIL_OP_DECR_WRAP: u8 = 6;
pub const STENCIL_OP_INVERT: u8 = 7;

pub const FACE_NONE: u8 = 0;
pub const FACE_FRONT: u8 = 1;
pub const FACE_BACK: u8 = 2;
pub const FACE_FRONT_AND_BACK: u8 = FACE_FRONT | FACE_BACK;

pub const POLYGON_MODE_FILL: u8 = 0;
pub const POLYGON_MODE_LINE: u8 = 1;
pub const POLYGON_MODE_POINT: u8 = 2;

pub const TEX_WRAP_REPEAT: u8 = 0;
pub const TEX_WRAP_CLAMP_TO_EDGE: u8 = 1;
pub const TEX_WRAP_CLAMP_TO_BORDER: u8 = 2;
pub const TEX_WRAP_MIRROR_REPEAT: u8 = 3;

pub const TEX_FILTER_NEAREST: u8 = 0;
pub const TEX_FILTER_LINEAR: u8 = 1;

pub const TEX_MIPFILTER_NEAREST: u8 = 0;
pub const TEX_MIPFILTER_LINEAR: u8 = 1;
pub const TEX_MIPFILTER_NONE: u8 = 2;

pub const TEX_COMPARE_NONE: u8 = 0;
pub const TEX_COMPARE_R_TO_TEXTURE: u8 = 1;
