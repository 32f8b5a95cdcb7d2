//! State templates describe the configuration of one immutable backend
//! object. They are transient values built by the state rules and turned into
//! durable, deduplicated backend handles by the state object cache.

pub mod states;
pub mod tokens;

pub use self::states::*;

use std::fmt;

use bytemuck::Pod;
use serde::{Deserialize, Serialize};

/// The category a template belongs to. Templates of different kinds are never
/// compared against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateKind {
    Blend,
    DepthStencilAlpha,
    Rasterizer,
    Sampler,
    Viewport,
    Scissor,
    ClearColor,
    Clip,
    Framebuffer,
    VertexShader,
    FragmentShader,
}

impl StateKind {
    pub const COUNT: usize = 11;

    pub const ALL: [StateKind; StateKind::COUNT] = [
        StateKind::Blend,
        StateKind::DepthStencilAlpha,
        StateKind::Rasterizer,
        StateKind::Sampler,
        StateKind::Viewport,
        StateKind::Scissor,
        StateKind::ClearColor,
        StateKind::Clip,
        StateKind::Framebuffer,
        StateKind::VertexShader,
        StateKind::FragmentShader,
    ];

    /// Dense index, suitable for per-kind arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A flat, pointer-free description of one backend object.
pub trait Template: Pod + fmt::Debug {
    const KIND: StateKind;

    /// Wraps a copy of this template for the backend factory.
    fn wrap(&self) -> StateTemplate;

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Byte-for-byte equality, the only notion of "same state" templates have.
    #[inline]
    fn same_as(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Any template, tagged by kind.
#[derive(Debug, Clone, Copy)]
pub enum StateTemplate {
    Blend(BlendTemplate),
    DepthStencilAlpha(DepthStencilAlphaTemplate),
    Rasterizer(RasterizerTemplate),
    Sampler(SamplerTemplate),
    Viewport(ViewportTemplate),
    Scissor(ScissorTemplate),
    ClearColor(ClearColorTemplate),
    Clip(ClipTemplate),
    Framebuffer(FramebufferTemplate),
    VertexShader(VertexShaderTemplate),
    FragmentShader(FragmentShaderTemplate),
}

impl StateTemplate {
    pub fn kind(&self) -> StateKind {
        match *self {
            StateTemplate::Blend(_) => StateKind::Blend,
            StateTemplate::DepthStencilAlpha(_) => StateKind::DepthStencilAlpha,
            StateTemplate::Rasterizer(_) => StateKind::Rasterizer,
            StateTemplate::Sampler(_) => StateKind::Sampler,
            StateTemplate::Viewport(_) => StateKind::Viewport,
            StateTemplate::Scissor(_) => StateKind::Scissor,
            StateTemplate::ClearColor(_) => StateKind::ClearColor,
            StateTemplate::Clip(_) => StateKind::Clip,
            StateTemplate::Framebuffer(_) => StateKind::Framebuffer,
            StateTemplate::VertexShader(_) => StateKind::VertexShader,
            StateTemplate::FragmentShader(_) => StateKind::FragmentShader,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            StateTemplate::Blend(v) => v.as_bytes(),
            StateTemplate::DepthStencilAlpha(v) => v.as_bytes(),
            StateTemplate::Rasterizer(v) => v.as_bytes(),
            StateTemplate::Sampler(v) => v.as_bytes(),
            StateTemplate::Viewport(v) => v.as_bytes(),
            StateTemplate::Scissor(v) => v.as_bytes(),
            StateTemplate::ClearColor(v) => v.as_bytes(),
            StateTemplate::Clip(v) => v.as_bytes(),
            StateTemplate::Framebuffer(v) => v.as_bytes(),
            StateTemplate::VertexShader(v) => v.as_bytes(),
            StateTemplate::FragmentShader(v) => v.as_bytes(),
        }
    }
}

macro_rules! impl_template {
    ($name:ident, $kind:ident) => {
        impl Template for $name {
            const KIND: StateKind = StateKind::$kind;

            #[inline]
            fn wrap(&self) -> StateTemplate {
                StateTemplate::$kind(*self)
            }
        }
    };
}

impl_template!(BlendTemplate, Blend);
impl_template!(DepthStencilAlphaTemplate, DepthStencilAlpha);
impl_template!(RasterizerTemplate, Rasterizer);
impl_template!(SamplerTemplate, Sampler);
impl_template!(ViewportTemplate, Viewport);
impl_template!(ScissorTemplate, Scissor);
impl_template!(ClearColorTemplate, ClearColor);
impl_template!(ClipTemplate, Clip);
impl_template!(FramebufferTemplate, Framebuffer);
impl_template!(VertexShaderTemplate, VertexShader);
impl_template!(FragmentShaderTemplate, FragmentShader);

#[cfg(test)]
mod test {
    use std::mem;

    use super::*;

    #[test]
    fn sizes_are_word_multiples() {
        assert_eq!(mem::size_of::<BlendTemplate>(), 84);
        assert_eq!(mem::size_of::<DepthStencilAlphaTemplate>(), 28);
        assert_eq!(mem::size_of::<RasterizerTemplate>(), 44);
        assert_eq!(mem::size_of::<SamplerTemplate>(), 40);
        assert_eq!(mem::size_of::<ViewportTemplate>(), 32);
        assert_eq!(mem::size_of::<ScissorTemplate>(), 16);
        assert_eq!(mem::size_of::<ClearColorTemplate>(), 16);
        assert_eq!(mem::size_of::<ClipTemplate>(), 100);
        assert_eq!(mem::size_of::<FramebufferTemplate>(), 92);
        assert_eq!(mem::size_of::<VertexShaderTemplate>(), 20);
        assert_eq!(mem::size_of::<FragmentShaderTemplate>(), 16);
    }

    #[test]
    fn wrap_keeps_kind_and_bytes() {
        let mut blend = BlendTemplate::default();
        blend.rt[0].colormask = tokens::MASK_RGBA;

        let wrapped = blend.wrap();
        assert_eq!(wrapped.kind(), StateKind::Blend);
        assert_eq!(wrapped.as_bytes(), blend.as_bytes());
    }

    #[test]
    fn byte_equality() {
        let a = ClearColorTemplate {
            color: [0.0, 0.5, 1.0, 1.0],
        };
        let mut b = a;
        assert!(a.same_as(&b));

        b.color[0] = -0.0;
        assert!(!a.same_as(&b));
    }

    #[test]
    fn kind_indices_are_dense() {
        for (i, kind) in StateKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
