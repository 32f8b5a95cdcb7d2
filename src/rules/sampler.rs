use smallvec::SmallVec;

use crate::backend::ObjectHandle;
use crate::context::{Context, Stage, TextureId, TextureUnitState};
use crate::errors::*;
use crate::templates::tokens::*;
use crate::templates::SamplerTemplate;

pub fn translate(unit: &TextureUnitState) -> SamplerTemplate {
    let (compare_mode, compare_func) = match unit.compare {
        Some(func) => (TEX_COMPARE_R_TO_TEXTURE, func.into()),
        None => (TEX_COMPARE_NONE, 0),
    };

    SamplerTemplate {
        wrap_s: unit.wrap_s.into(),
        wrap_t: unit.wrap_t.into(),
        wrap_r: unit.wrap_r.into(),
        min_img_filter: unit.min_filter.into(),
        min_mip_filter: unit.mip_filter.into(),
        mag_img_filter: unit.mag_filter.into(),
        compare_mode,
        compare_func,
        normalized_coords: 1,
        seamless_cube_map: 0,
        max_anisotropy: unit.max_anisotropy,
        _pad: 0,
        lod_bias: unit.lod_bias,
        min_lod: unit.min_lod.max(0.0),
        max_lod: unit.max_lod.max(unit.min_lod.max(0.0)),
        border_color: unit.border_color,
    }
}

#[inline]
fn units_used(ctx: &Context, stage: Stage) -> impl Iterator<Item = (usize, bool)> {
    let used = match stage {
        Stage::Vertex => ctx.current.vertex.samplers_used,
        Stage::Fragment => ctx.current.fragment.samplers_used,
    };

    (0..ctx.params.max_texture_units).map(move |i| (i, used & (1 << i) != 0))
}

/// Drops the trailing unused units.
fn trim<T>(v: &mut SmallVec<[Option<T>; MAX_SAMPLERS]>) {
    while let Some(&None) = v.last() {
        v.pop();
    }
}

/// Resolves one sampler object per unit sampled by the current program of
/// each stage, and binds a stage's set when it differs from the bound one.
/// Both stages read the same texture units.
pub fn update_samplers(ctx: &mut Context) -> Result<()> {
    for &stage in Stage::ALL.iter() {
        let mut handles: SmallVec<[Option<ObjectHandle>; MAX_SAMPLERS]> = SmallVec::new();

        for (i, used) in units_used(ctx, stage).collect::<SmallVec<[_; MAX_SAMPLERS]>>() {
            if !used {
                handles.push(None);
                continue;
            }

            let template = translate(&ctx.state.texture.units[i]);
            let shadow = &mut ctx.shadows.samplers[stage.index()][i];
            let handle = super::lookup(&mut ctx.objects, shadow, template)?;
            handles.push(Some(handle));
        }

        trim(&mut handles);
        ctx.objects.bind_samplers(stage, &handles)?;
    }

    Ok(())
}

/// Sets the textures of the sampled units of each stage, by value.
pub fn update_views(ctx: &mut Context) -> Result<()> {
    for &stage in Stage::ALL.iter() {
        let mut views: SmallVec<[Option<TextureId>; MAX_SAMPLERS]> = units_used(ctx, stage)
            .map(|(i, used)| {
                if used {
                    ctx.state.texture.units[i].texture
                } else {
                    None
                }
            })
            .collect();

        trim(&mut views);
        ctx.objects.set_sampler_views(stage, &views)?;
    }

    Ok(())
}
