//! The validation pipeline.
//!
//! A `RuleTable` is an ordered list of state rules, each annotated with the
//! dirty bits it depends on. A validation pass walks the table once, front to
//! back, running every rule whose mask intersects the live dirty state. Rules
//! may raise bits for rules further down the table, and those rules see them
//! in the same pass. The dirty state is cleared only after the whole table ran
//! successfully.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::dirty::DirtyState;
use crate::errors::*;
use crate::utils::prelude::FastHashSet;

pub type UpdateFn = fn(&mut Context) -> Result<()>;

/// A unit of work that resolves one category of draw state.
#[derive(Clone, Copy)]
pub struct StateRule {
    pub name: &'static str,
    /// Dirty bits this rule depends on.
    pub dirty: DirtyState,
    pub update: UpdateFn,
}

impl StateRule {
    pub fn new<T: Into<DirtyState>>(name: &'static str, dirty: T, update: UpdateFn) -> Self {
        StateRule {
            name,
            dirty: dirty.into(),
            update,
        }
    }
}

impl fmt::Debug for StateRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("StateRule")
            .field("name", &self.name)
            .field("dirty", &self.dirty)
            .finish()
    }
}

/// Whether a validation pass asserts the table ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationMode {
    Fast,
    /// Panics as soon as a rule raises a dirty bit that a rule already
    /// visited in the same pass depends on, which means the table is
    /// misordered and that rule's state went stale.
    Checked,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ValidationMode::Checked
        } else {
            ValidationMode::Fast
        }
    }
}

/// The immutable, ordered set of rules a context runs.
#[derive(Debug, Clone)]
pub struct RuleTable {
    prepass: Vec<StateRule>,
    rules: Vec<StateRule>,
}

impl RuleTable {
    /// Builds a table. `prepass` rules run before the table is walked, and may
    /// raise any bit since nothing was examined yet.
    ///
    /// # Panics
    ///
    /// Panics if a rule has an empty dependency mask, or if two rules share a
    /// name.
    pub fn new(prepass: Vec<StateRule>, rules: Vec<StateRule>) -> Self {
        let mut names = FastHashSet::default();

        for rule in prepass.iter().chain(rules.iter()) {
            assert!(
                !rule.dirty.is_empty(),
                "Rule `{}` has an empty dependency mask.",
                rule.name
            );

            assert!(
                names.insert(rule.name),
                "Rule `{}` is registered twice.",
                rule.name
            );
        }

        RuleTable { prepass, rules }
    }

    #[inline]
    pub fn prepass(&self) -> &[StateRule] {
        &self.prepass
    }

    #[inline]
    pub fn rules(&self) -> &[StateRule] {
        &self.rules
    }

    /// Number of rules, pre-pass included.
    #[inline]
    pub fn len(&self) -> usize {
        self.prepass.len() + self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs one validation pass over `ctx`.
pub fn validate(ctx: &mut Context) -> Result<()> {
    ctx.last_pass.clear();

    if ctx.dirty.is_empty() {
        return Ok(());
    }

    debug!("Validating {}.", ctx.dirty);

    let table = ctx.table.clone();
    let checked = ctx.params.validation == ValidationMode::Checked;

    for rule in table.prepass() {
        if ctx.dirty.intersects(rule.dirty) {
            run(ctx, rule)?;
        }
    }

    let mut examined = DirtyState::empty();
    for rule in table.rules() {
        let before = ctx.dirty;

        if ctx.dirty.intersects(rule.dirty) {
            run(ctx, rule)?;
        }

        if checked {
            examined |= rule.dirty;
            let generated = before.xor(ctx.dirty);

            assert!(
                !examined.intersects(generated),
                "Rule `{}` raised {} after it was examined.",
                rule.name,
                generated
            );
        }
    }

    ctx.dirty.snapshot_and_clear();
    Ok(())
}

fn run(ctx: &mut Context, rule: &StateRule) -> Result<()> {
    trace!("Running rule `{}`.", rule.name);
    ctx.last_pass.push(rule.name);

    (rule.update)(ctx).map_err(|err| {
        warn!("Rule `{}` failed: {}", rule.name, err);
        err
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::context::ContextParams;
    use crate::dirty::{Frontend, Tracker};

    fn noop(_: &mut Context) -> Result<()> {
        Ok(())
    }

    fn raise_depth(ctx: &mut Context) -> Result<()> {
        ctx.invalidate(Frontend::DEPTH.into());
        Ok(())
    }

    fn raise_framebuffer(ctx: &mut Context) -> Result<()> {
        ctx.invalidate(Tracker::FRAMEBUFFER.into());
        Ok(())
    }

    fn fail(_: &mut Context) -> Result<()> {
        Err(Error::Backend("unavailable".into()))
    }

    fn context(rules: Vec<StateRule>) -> Context {
        let params = ContextParams {
            validation: ValidationMode::Checked,
            ..ContextParams::default()
        };

        let table = RuleTable::new(Vec::new(), rules);
        Context::with_table(params, Box::new(HeadlessBackend::new()), table)
    }

    #[test]
    #[should_panic]
    fn empty_mask() {
        RuleTable::new(Vec::new(), vec![StateRule::new("a", DirtyState::empty(), noop)]);
    }

    #[test]
    #[should_panic]
    fn duplicated_name() {
        RuleTable::new(
            vec![StateRule::new("a", Frontend::BLEND, noop)],
            vec![StateRule::new("a", Frontend::DEPTH, noop)],
        );
    }

    #[test]
    fn runs_intersecting_rules() {
        let mut ctx = context(vec![
            StateRule::new("blend", Frontend::BLEND, noop),
            StateRule::new("depth", Frontend::DEPTH, noop),
            StateRule::new("both", Frontend::BLEND | Frontend::DEPTH, noop),
        ]);

        ctx.validate().unwrap();
        assert_eq!(ctx.last_pass(), &["blend", "depth", "both"]);

        ctx.invalidate(Frontend::DEPTH.into());
        ctx.validate().unwrap();
        assert_eq!(ctx.last_pass(), &["depth", "both"]);
        assert!(ctx.dirty().is_empty());
    }

    #[test]
    fn clean_pass_runs_nothing() {
        let mut ctx = context(vec![StateRule::new("blend", Frontend::BLEND, noop)]);
        ctx.validate().unwrap();
        assert_eq!(ctx.last_pass(), &["blend"]);

        ctx.validate().unwrap();
        assert!(ctx.last_pass().is_empty());
    }

    #[test]
    fn downstream_bits_are_seen() {
        let mut ctx = context(vec![
            StateRule::new("producer", Frontend::BLEND, raise_framebuffer),
            StateRule::new("consumer", Tracker::FRAMEBUFFER, noop),
        ]);

        ctx.validate().unwrap();
        ctx.invalidate(Frontend::BLEND.into());
        ctx.validate().unwrap();
        assert_eq!(ctx.last_pass(), &["producer", "consumer"]);
        assert!(ctx.dirty().is_empty());
    }

    #[test]
    #[should_panic]
    fn misordered_table() {
        let mut ctx = context(vec![
            StateRule::new("consumer", Frontend::DEPTH, noop),
            StateRule::new("producer", Frontend::BLEND, raise_depth),
        ]);

        ctx.dirty.snapshot_and_clear();
        ctx.invalidate(Frontend::BLEND.into());
        ctx.validate().unwrap();
    }

    #[test]
    fn misordered_table_is_tolerated_when_fast() {
        let mut ctx = context(vec![
            StateRule::new("consumer", Frontend::DEPTH, noop),
            StateRule::new("producer", Frontend::BLEND, raise_depth),
        ]);

        ctx.params.validation = ValidationMode::Fast;
        ctx.dirty.snapshot_and_clear();
        ctx.invalidate(Frontend::BLEND.into());
        ctx.validate().unwrap();
        assert_eq!(ctx.last_pass(), &["producer"]);
    }

    #[test]
    fn failure_keeps_dirty_state() {
        let mut ctx = context(vec![
            StateRule::new("blend", Frontend::BLEND, noop),
            StateRule::new("depth", Frontend::DEPTH, fail),
            StateRule::new("scissor", Frontend::SCISSOR, noop),
        ]);

        assert!(ctx.validate().is_err());
        assert_eq!(ctx.last_pass(), &["blend", "depth"]);
        assert_eq!(ctx.dirty(), DirtyState::all());
    }
}
