use crate::context::types::*;
use crate::templates::tokens::*;

impl From<Comparison> for u8 {
    fn from(cmp: Comparison) -> Self {
        match cmp {
            Comparison::Never => FUNC_NEVER,
            Comparison::Less => FUNC_LESS,
            Comparison::LessOrEqual => FUNC_LEQUAL,
            Comparison::Greater => FUNC_GREATER,
            Comparison::GreaterOrEqual => FUNC_GEQUAL,
            Comparison::Equal => FUNC_EQUAL,
            Comparison::NotEqual => FUNC_NOTEQUAL,
            Comparison::Always => FUNC_ALWAYS,
        }
    }
}

impl From<Equation> for u8 {
    fn from(eq: Equation) -> Self {
        match eq {
            Equation::Add => BLEND_ADD,
            Equation::Subtract => BLEND_SUBTRACT,
            Equation::ReverseSubtract => BLEND_REVERSE_SUBTRACT,
            Equation::Min => BLEND_MIN,
            Equation::Max => BLEND_MAX,
        }
    }
}

impl From<BlendFactor> for u8 {
    fn from(factor: BlendFactor) -> Self {
        match factor {
            BlendFactor::Zero => BLENDFACTOR_ZERO,
            BlendFactor::One => BLENDFACTOR_ONE,
            BlendFactor::SourceAlphaSaturate => BLENDFACTOR_SRC_ALPHA_SATURATE,
            BlendFactor::Value(BlendValue::SourceColor) => BLENDFACTOR_SRC_COLOR,
            BlendFactor::Value(BlendValue::SourceAlpha) => BLENDFACTOR_SRC_ALPHA,
            BlendFactor::Value(BlendValue::DestinationColor) => BLENDFACTOR_DST_COLOR,
            BlendFactor::Value(BlendValue::DestinationAlpha) => BLENDFACTOR_DST_ALPHA,
            BlendFactor::Value(BlendValue::ConstantColor) => BLENDFACTOR_CONST_COLOR,
            BlendFactor::Value(BlendValue::ConstantAlpha) => BLENDFACTOR_CONST_ALPHA,
            BlendFactor::OneMinusValue(BlendValue::SourceColor) => BLENDFACTOR_INV_SRC_COLOR,
            BlendFactor::OneMinusValue(BlendValue::SourceAlpha) => BLENDFACTOR_INV_SRC_ALPHA,
            BlendFactor::OneMinusValue(BlendValue::DestinationColor) => BLENDFACTOR_INV_DST_COLOR,
            BlendFactor::OneMinusValue(BlendValue::DestinationAlpha) => BLENDFACTOR_INV_DST_ALPHA,
            BlendFactor::OneMinusValue(BlendValue::ConstantColor) => BLENDFACTOR_INV_CONST_COLOR,
            BlendFactor::OneMinusValue(BlendValue::ConstantAlpha) => BLENDFACTOR_INV_CONST_ALPHA,
        }
    }
}

impl From<LogicOp> for u8 {
    fn from(op: LogicOp) -> Self {
        match op {
            LogicOp::Clear => LOGICOP_CLEAR,
            LogicOp::And => LOGICOP_AND,
            LogicOp::Xor => LOGICOP_XOR,
            LogicOp::Or => LOGICOP_OR,
            LogicOp::Copy => LOGICOP_COPY,
            LogicOp::Invert => LOGICOP_INVERT,
            LogicOp::Set => LOGICOP_SET,
        }
    }
}

impl From<StencilOp> for u8 {
    fn from(op: StencilOp) -> Self {
        match op {
            StencilOp::Keep => STENCIL_OP_KEEP,
            StencilOp::Zero => STENCIL_OP_ZERO,
            StencilOp::Replace => STENCIL_OP_REPLACE,
            StencilOp::Incr => STENCIL_OP_INCR,
            StencilOp::Decr => STENCIL_OP_DECR,
            StencilOp::IncrWrap => STENCIL_OP_INCR_WRAP,
            StencilOp::DecrWrap => STENCIL_OP_DECR_WRAP,
            StencilOp::Invert => STENCIL_OP_INVERT,
        }
    }
}

impl From<CullFace> for u8 {
    fn from(face: CullFace) -> Self {
        match face {
            CullFace::Front => FACE_FRONT,
            CullFace::Back => FACE_BACK,
            CullFace::FrontAndBack => FACE_FRONT_AND_BACK,
        }
    }
}

impl From<PolygonMode> for u8 {
    fn from(mode: PolygonMode) -> Self {
        match mode {
            PolygonMode::Fill => POLYGON_MODE_FILL,
            PolygonMode::Line => POLYGON_MODE_LINE,
            PolygonMode::Point => POLYGON_MODE_POINT,
        }
    }
}

impl From<TextureWrap> for u8 {
    fn from(wrap: TextureWrap) -> Self {
        match wrap {
            TextureWrap::Repeat => TEX_WRAP_REPEAT,
            TextureWrap::ClampToEdge => TEX_WRAP_CLAMP_TO_EDGE,
            TextureWrap::ClampToBorder => TEX_WRAP_CLAMP_TO_BORDER,
            TextureWrap::MirroredRepeat => TEX_WRAP_MIRROR_REPEAT,
        }
    }
}

impl From<TextureFilter> for u8 {
    fn from(filter: TextureFilter) -> Self {
        match filter {
            TextureFilter::Nearest => TEX_FILTER_NEAREST,
            TextureFilter::Linear => TEX_FILTER_LINEAR,
        }
    }
}

impl From<MipFilter> for u8 {
    fn from(filter: MipFilter) -> Self {
        match filter {
            MipFilter::None => TEX_MIPFILTER_NONE,
            MipFilter::Nearest => TEX_MIPFILTER_NEAREST,
            MipFilter::Linear => TEX_MIPFILTER_LINEAR,
        }
    }
}
