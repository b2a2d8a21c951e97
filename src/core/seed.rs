//! Seed Scope Manager
//!
//! A [`SeedContext`] owns the session seed string, the session RNG stream and a
//! stack of saved RNG states. Entering a scope swaps the active stream for one
//! derived from `(seed, offset, salt)`; the returned [`ScopeGuard`] puts the
//! previous stream back when it is dropped, on every exit path.
//!
//! ```
//! use hatchery::core::seed::SeedContext;
//!
//! let mut ctx = SeedContext::new("TESTSEED");
//! let before = ctx.rng().state();
//!
//! let a = ctx.with_seed_offset(42, "EGG", |ctx| ctx.rng().next_u64());
//! let b = ctx.with_seed_offset(42, "EGG", |ctx| ctx.rng().next_u64());
//!
//! assert_eq!(a, b);
//! assert_eq!(ctx.rng().state(), before);
//! ```

use std::ops::{Deref, DerefMut};

use tracing::trace;

use super::rng::DeterministicRng;

/// A stream that was active before a scope was entered.
#[derive(Clone, Debug)]
struct SavedScope {
    state: [u64; 2],
    offset: u64,
}

/// Per-session seed state.
///
/// Not shareable between logical callers: every draw needs `&mut self`, so
/// the borrow checker enforces a single writer per context.
#[derive(Clone, Debug)]
pub struct SeedContext {
    seed: String,
    rng: DeterministicRng,
    scopes: Vec<SavedScope>,
}

impl SeedContext {
    /// Create a context for a session seed.
    pub fn new(seed: impl Into<String>) -> Self {
        let seed = seed.into();
        let rng = DeterministicRng::for_session(&seed);
        Self {
            seed,
            rng,
            scopes: Vec::new(),
        }
    }

    /// The session seed string.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The active stream: the innermost scope's, or the session stream.
    pub fn rng(&mut self) -> &mut DeterministicRng {
        &mut self.rng
    }

    /// Number of scopes currently entered.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Offset of the innermost active scope.
    pub fn current_offset(&self) -> Option<u64> {
        // Each saved entry records the offset of the scope that pushed it.
        self.scopes.last().map(|s| s.offset)
    }

    /// Enter a scope seeded from `(seed, offset, salt)`.
    ///
    /// The sub-seed never depends on the current stream position, so the same
    /// arguments always replay the same draws.
    pub fn enter_scope(&mut self, offset: u64, salt: &str) -> ScopeGuard<'_> {
        self.scopes.push(SavedScope {
            state: self.rng.state(),
            offset,
        });
        self.rng = DeterministicRng::for_scope(&self.seed, offset, salt);
        let depth = self.scopes.len();

        trace!(offset, salt, depth, "entered seed scope");

        ScopeGuard { ctx: self, depth }
    }

    /// Run `f` inside a scope seeded from `(seed, offset, salt)`.
    ///
    /// The previous stream is restored before the result is returned, including
    /// when `f` returns early through `?` or unwinds.
    pub fn with_seed_offset<T, F>(&mut self, offset: u64, salt: &str, f: F) -> T
    where
        F: FnOnce(&mut SeedContext) -> T,
    {
        let mut guard = self.enter_scope(offset, salt);
        f(&mut *guard)
    }

    /// Pop every scope at or above `depth` and restore the stream saved by the
    /// scope at `depth`.
    fn exit_to(&mut self, depth: usize) {
        if depth == 0 || depth > self.scopes.len() {
            return;
        }
        // Scopes above `depth` can only be left over if their guards leaked.
        if let Some(saved) = self.scopes.drain(depth - 1..).next() {
            self.rng.set_state(saved.state);
        }

        trace!(depth, "exited seed scope");
    }
}

/// Restores the previous RNG stream when dropped.
///
/// Derefs to the [`SeedContext`], so draws and nested scopes go through the
/// guard. Nested guards borrow their parent, which makes out-of-order exits
/// impossible to write.
pub struct ScopeGuard<'a> {
    ctx: &'a mut SeedContext,
    depth: usize,
}

impl Deref for ScopeGuard<'_> {
    type Target = SeedContext;

    fn deref(&self) -> &SeedContext {
        self.ctx
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut SeedContext {
        self.ctx
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.ctx.exit_to(self.depth);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn draws(ctx: &mut SeedContext, n: usize) -> Vec<u64> {
        (0..n).map(|_| ctx.rng().next_u64()).collect()
    }

    #[test]
    fn test_same_scope_same_draws() {
        let mut ctx = SeedContext::new("TESTSEED");
        let a = ctx.with_seed_offset(42, "EGG", |ctx| draws(ctx, 16));
        let b = ctx.with_seed_offset(42, "EGG", |ctx| draws(ctx, 16));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scope_ignores_outer_consumption() {
        let mut ctx1 = SeedContext::new("TESTSEED");
        let mut ctx2 = SeedContext::new("TESTSEED");

        draws(&mut ctx2, 1000);

        let a = ctx1.with_seed_offset(7, "EGG", |ctx| draws(ctx, 8));
        let b = ctx2.with_seed_offset(7, "EGG", |ctx| draws(ctx, 8));
        assert_eq!(a, b);
    }

    #[test]
    fn test_scope_inputs_separate_streams() {
        let mut ctx = SeedContext::new("TESTSEED");
        let base = ctx.with_seed_offset(1, "EGG", |ctx| draws(ctx, 4));
        assert_ne!(base, ctx.with_seed_offset(2, "EGG", |ctx| draws(ctx, 4)));
        assert_ne!(base, ctx.with_seed_offset(1, "WAVE", |ctx| draws(ctx, 4)));

        let mut other = SeedContext::new("OTHERSEED");
        assert_ne!(base, other.with_seed_offset(1, "EGG", |ctx| draws(ctx, 4)));
    }

    #[test]
    fn test_nested_scopes_restore_in_order() {
        let mut ctx = SeedContext::new("TESTSEED");
        let session_state = ctx.rng().state();

        ctx.with_seed_offset(1, "OUTER", |outer| {
            outer.rng().next_u64();
            let outer_state = outer.rng().state();
            assert_eq!(outer.depth(), 1);

            outer.with_seed_offset(2, "INNER", |inner| {
                assert_eq!(inner.depth(), 2);
                assert_eq!(inner.current_offset(), Some(2));
                draws(inner, 5);
            });

            assert_eq!(outer.depth(), 1);
            assert_eq!(outer.current_offset(), Some(1));
            assert_eq!(outer.rng().state(), outer_state);
        });

        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.current_offset(), None);
        assert_eq!(ctx.rng().state(), session_state);
    }

    #[test]
    fn test_inner_scope_does_not_disturb_outer_sequence() {
        let mut ctx = SeedContext::new("TESTSEED");
        let plain = ctx.with_seed_offset(9, "EGG", |ctx| draws(ctx, 4));
        let interrupted = ctx.with_seed_offset(9, "EGG", |ctx| {
            let mut v = draws(ctx, 2);
            ctx.with_seed_offset(10, "EGG", |inner| draws(inner, 3));
            v.extend(draws(ctx, 2));
            v
        });
        assert_eq!(plain, interrupted);
    }

    #[test]
    fn test_restores_on_early_error_return() {
        fn reject(_draw: u64) -> Result<u64, &'static str> {
            Err("bail")
        }

        fn failing(ctx: &mut SeedContext) -> Result<u64, &'static str> {
            let mut guard = ctx.enter_scope(5, "EGG");
            let draw = reject(guard.rng().next_u64())?;
            Ok(draw + guard.rng().next_u64())
        }

        let mut ctx = SeedContext::new("TESTSEED");
        let before = ctx.rng().state();
        assert!(failing(&mut ctx).is_err());
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.rng().state(), before);
    }

    #[test]
    fn test_restores_on_panic() {
        let mut ctx = SeedContext::new("TESTSEED");
        let before = ctx.rng().state();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ctx.with_seed_offset(5, "EGG", |ctx| {
                ctx.rng().next_u64();
                panic!("generation aborted");
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.rng().state(), before);
    }

    #[test]
    fn test_leaked_inner_guard_is_cleaned_by_outer() {
        let mut ctx = SeedContext::new("TESTSEED");
        let before = ctx.rng().state();
        {
            let mut outer = ctx.enter_scope(1, "OUTER");
            std::mem::forget(outer.enter_scope(2, "INNER"));
            assert_eq!(outer.depth(), 2);
        }
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.rng().state(), before);
    }

    proptest! {
        #[test]
        fn scope_leaves_stream_untouched(
            seed in "[A-Za-z0-9]{1,24}",
            offset: u64,
            pre in 0usize..64,
            inside in 0usize..256,
        ) {
            let mut ctx = SeedContext::new(seed);
            draws(&mut ctx, pre);
            let before = ctx.rng().state();
            ctx.with_seed_offset(offset, "EGG", |ctx| draws(ctx, inside));
            prop_assert_eq!(ctx.rng().state(), before);
            prop_assert_eq!(ctx.depth(), 0);
        }

        #[test]
        fn scope_replays_identically(seed in "[A-Za-z0-9]{1,24}", offset: u64, salt in "[A-Z]{0,8}") {
            let mut ctx = SeedContext::new(seed);
            let a = ctx.with_seed_offset(offset, &salt, |ctx| draws(ctx, 32));
            let b = ctx.with_seed_offset(offset, &salt, |ctx| draws(ctx, 32));
            prop_assert_eq!(a, b);
        }
    }
}
