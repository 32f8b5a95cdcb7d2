extern crate env_logger;
extern crate rand;
extern crate stipple;

use std::collections::HashSet;

use rand::prng::XorShiftRng;
use rand::{Rng, SeedableRng};

use stipple::prelude::*;
use stipple::rules;

const SEED: [u8; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];

fn setup() -> (Context, HeadlessMonitor) {
    setup_with(HeadlessBackend::new())
}

fn setup_with(backend: HeadlessBackend) -> (Context, HeadlessMonitor) {
    let _ = env_logger::try_init();

    let params = ContextParams {
        validation: ValidationMode::Checked,
        ..ContextParams::default()
    };

    let monitor = backend.monitor();
    (Context::new(params, Box::new(backend)), monitor)
}

const FRONTEND: [Frontend; 16] = [
    Frontend::BUFFERS,
    Frontend::DEPTH,
    Frontend::STENCIL,
    Frontend::ALPHA,
    Frontend::TRANSFORM,
    Frontend::PROGRAM,
    Frontend::POLYGON,
    Frontend::POINT,
    Frontend::LINE,
    Frontend::LIGHT,
    Frontend::SCISSOR,
    Frontend::VIEWPORT,
    Frontend::MULTISAMPLE,
    Frontend::BLEND,
    Frontend::CLEAR_COLOR,
    Frontend::TEXTURE,
];

const TRACKER: [Tracker; 4] = [
    Tracker::FRAMEBUFFER,
    Tracker::VERTEX_PROGRAM,
    Tracker::FRAGMENT_PROGRAM,
    Tracker::SAMPLER_VIEWS,
];

fn random_word<R: Rng>(rng: &mut R) -> DirtyState {
    let mut word = DirtyState::empty();
    for _ in 0..rng.gen_range(1, 4) {
        if rng.gen_bool(0.8) {
            word |= DirtyState::from(FRONTEND[rng.gen_range(0, FRONTEND.len())]);
        } else {
            word |= DirtyState::from(TRACKER[rng.gen_range(0, TRACKER.len())]);
        }
    }

    word
}

fn comparison<R: Rng>(rng: &mut R) -> Comparison {
    [
        Comparison::Never,
        Comparison::Less,
        Comparison::LessOrEqual,
        Comparison::Greater,
        Comparison::GreaterOrEqual,
        Comparison::Equal,
        Comparison::NotEqual,
        Comparison::Always,
    ][rng.gen_range(0, 8)]
}

/// Applies one random change through the setters.
fn mutate<R: Rng>(rng: &mut R, ctx: &mut Context, programs: &[(Stage, ProgramId)]) {
    match rng.gen_range(0, 16) {
        0 => ctx.set_blend_enabled(rng.gen()),
        1 => ctx.set_depth_test(rng.gen()),
        2 => ctx.set_depth_func(comparison(rng)),
        3 => ctx.set_stencil_test(rng.gen()),
        4 => ctx.set_alpha_func(comparison(rng), rng.gen()),
        5 => ctx.set_cull_face(if rng.gen() { Some(CullFace::Back) } else { None }),
        6 => ctx.set_point_size(rng.gen_range(0.0, 100.0)),
        7 => ctx.set_line_stipple(if rng.gen() { Some((rng.gen_range(1, 4), rng.gen())) } else { None }),
        8 => ctx.set_scissor(rng.gen_range(-16, 16), rng.gen_range(-16, 16), rng.gen_range(0, 64), rng.gen_range(0, 64)),
        9 => ctx.set_viewport(0, 0, rng.gen_range(1, 128), rng.gen_range(1, 128)),
        10 => ctx.set_clip_plane(rng.gen_range(0, 6), if rng.gen() { Some([1.0, 0.0, 0.0, rng.gen()]) } else { None }),
        11 => ctx.set_clear_color([rng.gen(), 0.0, 0.0, 1.0]),
        12 => {
            let unit = rng.gen_range(0, 4);
            ctx.set_texture_enabled(unit, rng.gen());
            ctx.bind_texture(unit, Some(TextureId::new(rng.gen_range(0, 4), 1)));
        }
        13 => {
            let (stage, id) = programs[rng.gen_range(0, programs.len())];
            ctx.bind_program(stage, if rng.gen() { Some(id) } else { None });
        }
        14 => {
            if rng.gen() {
                let mut target = Offscreen {
                    width: rng.gen_range(1, 256),
                    height: rng.gen_range(1, 256),
                    ..Offscreen::default()
                };

                target.color[0] = Some(TextureId::new(9, 1));
                if rng.gen() {
                    target.depth_stencil = Some(TextureId::new(10, 1));
                }

                ctx.bind_offscreen(Some(target));
            } else {
                ctx.bind_offscreen(None);
            }
        }
        _ => ctx.resize_window(rng.gen_range(1, 256), rng.gen_range(1, 256)),
    }
}

fn create_programs(ctx: &mut Context) -> Vec<(Stage, ProgramId)> {
    let mut v = Vec::new();
    for &stage in Stage::ALL.iter() {
        for i in 0..3 {
            let id = ctx.create_program(ProgramDesc {
                stage,
                samplers_used: i,
                writes_point_size: false,
            });

            v.push((stage, id));
        }
    }

    v
}

#[test]
fn idempotence() {
    let (mut ctx, monitor) = setup();
    ctx.validate().unwrap();

    let stats = ctx.cache_stats();
    let counters = monitor.counters();

    ctx.validate().unwrap();
    assert!(ctx.last_pass().is_empty());
    assert_eq!(ctx.cache_stats(), stats);
    assert_eq!(monitor.counters(), counters);
}

#[test]
fn example_scenario() {
    let (mut ctx, monitor) = setup();
    ctx.set_depth_test(true);
    ctx.validate().unwrap();

    let n = ctx.cache().len();
    assert_eq!(n, 10);
    assert_eq!(monitor.live_objects(), n);
    assert_eq!(ctx.cache_stats().misses as usize, n);

    // A redundant write re-runs the blend rule, which takes the fast path.
    let stats = ctx.cache_stats();
    let counters = monitor.counters();
    ctx.set_blend_enabled(false);
    ctx.validate().unwrap();
    assert_eq!(ctx.last_pass(), &["blend"]);
    assert_eq!(ctx.cache_stats(), stats);
    assert_eq!(monitor.counters(), counters);

    ctx.set_depth_func(Comparison::Greater);
    ctx.validate().unwrap();
    assert_eq!(ctx.last_pass(), &["depth_stencil_alpha"]);
    assert_eq!(ctx.cache().len(), n + 1);
    assert_eq!(ctx.cache_stats().misses, stats.misses + 1);
    assert_eq!(monitor.counters().creates, counters.creates + 1);
    assert_eq!(monitor.counters().binds, counters.binds + 1);

    match monitor.bound_template(StateKind::DepthStencilAlpha) {
        Some(StateTemplate::DepthStencilAlpha(v)) => {
            assert_eq!(v.depth_enabled, 1);
            assert_eq!(v.depth_func, stipple::templates::tokens::FUNC_GREATER);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn shadow_correctness() {
    let (mut ctx, monitor) = setup();
    ctx.set_texture_enabled(0, true);
    ctx.bind_texture(0, Some(TextureId::new(0, 1)));
    ctx.set_clip_plane(2, Some([0.0, 1.0, 0.0, 0.0]));
    ctx.set_blend_enabled(true);
    ctx.validate().unwrap();

    let stats = ctx.cache_stats();
    let counters = monitor.counters();

    // Every rule recomputes its template from unchanged state.
    ctx.invalidate(DirtyState::all());
    ctx.validate().unwrap();

    assert_eq!(ctx.last_pass().len(), 13);
    assert_eq!(ctx.cache_stats(), stats);
    assert_eq!(monitor.counters(), counters);
}

#[test]
fn returning_state_reuses_objects() {
    let (mut ctx, monitor) = setup();
    ctx.validate().unwrap();

    ctx.set_clear_color([1.0, 0.0, 0.0, 1.0]);
    ctx.validate().unwrap();
    let red = ctx.bound(StateKind::ClearColor);

    ctx.set_clear_color([0.0, 0.0, 1.0, 1.0]);
    ctx.validate().unwrap();
    assert!(ctx.bound(StateKind::ClearColor) != red);

    let creates = monitor.counters().creates;
    ctx.set_clear_color([1.0, 0.0, 0.0, 1.0]);
    ctx.validate().unwrap();
    assert_eq!(ctx.bound(StateKind::ClearColor), red);
    assert_eq!(monitor.counters().creates, creates);

    // Out of range colors are clamped into the same template.
    ctx.set_clear_color([2.0, -1.0, 0.0, 1.0]);
    ctx.validate().unwrap();
    assert_eq!(ctx.bound(StateKind::ClearColor), red);
}

#[test]
fn out_of_resources() {
    let (mut ctx, monitor) = setup_with(HeadlessBackend::with_object_limit(10));
    ctx.set_depth_test(true);
    ctx.validate().unwrap();
    assert_eq!(monitor.live_objects(), 10);

    let bound = ctx.bound(StateKind::DepthStencilAlpha);
    ctx.set_depth_func(Comparison::Equal);

    match ctx.validate() {
        Err(err @ Error::OutOfResources(StateKind::DepthStencilAlpha)) => {
            assert!(err.is_recoverable())
        }
        other => panic!("unexpected {:?}", other),
    }

    // Nothing was committed.
    assert!(ctx.dirty().intersects(Frontend::DEPTH.into()));
    assert_eq!(ctx.bound(StateKind::DepthStencilAlpha), bound);
    assert_eq!(ctx.cache().len(), 10);

    // The shadow still holds the old template, so going back is free.
    let stats = ctx.cache_stats();
    ctx.set_depth_func(Comparison::Less);
    ctx.validate().unwrap();
    assert_eq!(ctx.cache_stats(), stats);
    assert!(ctx.dirty().is_empty());

    // And the failed state is retried once resources are available.
    ctx.set_depth_func(Comparison::Equal);
    assert!(ctx.validate().is_err());
    monitor.set_object_limit(None);
    ctx.validate().unwrap();
    assert!(ctx.bound(StateKind::DepthStencilAlpha) != bound);
    assert_eq!(ctx.cache().len(), 11);
}

#[test]
fn dirty_bit_conservation() {
    let (mut ctx, _) = setup();
    let table = rules::default_table();
    let mut rng = XorShiftRng::from_seed(SEED);

    ctx.validate().unwrap();

    for _ in 0..500 {
        let mut total = DirtyState::empty();
        for _ in 0..rng.gen_range(1, 4) {
            let word = random_word(&mut rng);
            ctx.invalidate(word);
            total |= word;
        }

        ctx.validate().unwrap();

        let expected = table
            .prepass()
            .iter()
            .chain(table.rules().iter())
            .filter(|v| v.dirty.intersects(total))
            .map(|v| v.name)
            .collect::<Vec<_>>();

        // Without state changes no rule raises anything, so exactly the
        // intersecting rules run.
        assert_eq!(ctx.last_pass(), &expected[..]);
    }
}

#[test]
fn dirty_bit_conservation_with_changes() {
    let (mut ctx, _) = setup();
    let programs = create_programs(&mut ctx);
    let table = rules::default_table();
    let mut rng = XorShiftRng::from_seed(SEED);

    ctx.validate().unwrap();

    for _ in 0..500 {
        for _ in 0..rng.gen_range(0, 3) {
            mutate(&mut rng, &mut ctx, &programs);
        }

        let word = random_word(&mut rng);
        ctx.invalidate(word);
        let total = ctx.dirty();

        ctx.validate().unwrap();

        let ran = ctx.last_pass().iter().cloned().collect::<HashSet<_>>();
        for rule in table.prepass().iter().chain(table.rules().iter()) {
            if rule.dirty.intersects(total) {
                assert!(ran.contains(rule.name), "{} did not run", rule.name);
            }
        }
    }
}

/// Rules raising tracker bits that other rules of the table consume.
const PRODUCERS: [&str; 3] = ["framebuffer", "vertex_program", "fragment_program"];

fn shuffled_table<R: Rng>(rng: &mut R) -> RuleTable {
    let table = rules::default_table();
    let mut rest = table
        .rules()
        .iter()
        .cloned()
        .filter(|v| !PRODUCERS.contains(&v.name))
        .collect::<Vec<_>>();

    rng.shuffle(&mut rest);

    // Producers go first, in any order.
    let mut producers = table
        .rules()
        .iter()
        .cloned()
        .filter(|v| PRODUCERS.contains(&v.name))
        .collect::<Vec<_>>();

    rng.shuffle(&mut producers);
    producers.extend(rest);
    RuleTable::new(table.prepass().to_vec(), producers)
}

#[test]
fn ordering_invariant() {
    let mut rng = XorShiftRng::from_seed(SEED);

    for i in 0..20 {
        let table = if i == 0 {
            rules::default_table()
        } else {
            shuffled_table(&mut rng)
        };

        let params = ContextParams {
            validation: ValidationMode::Checked,
            ..ContextParams::default()
        };

        let mut ctx = Context::with_table(params, Box::new(HeadlessBackend::new()), table);
        let programs = create_programs(&mut ctx);

        for _ in 0..100 {
            for _ in 0..rng.gen_range(0, 4) {
                mutate(&mut rng, &mut ctx, &programs);
            }

            ctx.invalidate(random_word(&mut rng));
            ctx.validate().unwrap();
            assert!(ctx.dirty().is_empty());
        }
    }
}

#[test]
#[should_panic]
fn ordering_violation_is_caught() {
    let table = rules::default_table();
    let mut rules = table.rules().to_vec();

    // Moves the viewport rule in front of the framebuffer rule it depends on.
    let viewport = rules.iter().position(|v| v.name == "viewport").unwrap();
    let rule = rules.remove(viewport);
    rules.insert(0, rule);

    let params = ContextParams {
        validation: ValidationMode::Checked,
        ..ContextParams::default()
    };

    let table = RuleTable::new(table.prepass().to_vec(), rules);
    let mut ctx = Context::with_table(params, Box::new(HeadlessBackend::new()), table);
    ctx.validate().unwrap();

    ctx.resize_window(100, 100);
    ctx.validate().unwrap();
}
