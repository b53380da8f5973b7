//! Pluggable splay strategies (§4.5): each controls whether an access
//! continues splaying a node toward the root, independent of the tree's
//! rotation machinery itself.
//!
//! Ported from `splay_tree/splay_tree_strategy.h`.

use crate::priority::{Priority, PriorityScore};

/// Decides, per rotation step, whether a node being accessed should keep
/// moving up past its current parent.
///
/// `should_splay` is consulted on every rotation step during an access; a
/// strategy returning `false` aborts the splay partway, leaving the node
/// closer to — but not necessarily at — the root. This is what makes the
/// splay "abortable": unlike a canonical splay tree, reaching the accessed
/// node doesn't guarantee it ends up at the root.
pub trait SplayStrategy: Default + Clone {
    /// Whether `self` (the node being splayed) should continue past a
    /// parent carrying `parent`.
    fn should_splay(&self, parent: &Self) -> bool;
    /// Called on a node visited while searching past it without matching.
    fn visited(&mut self);
    /// Called on the node a search matched.
    fn accessed(&mut self);
}

/// Always splays all the way to the root, the behavior of a classic splay
/// tree. `visited`/`accessed` are no-ops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalSplayStrategy;

impl SplayStrategy for CanonicalSplayStrategy {
    fn should_splay(&self, _parent: &Self) -> bool {
        true
    }
    fn visited(&mut self) {}
    fn accessed(&mut self) {}
}

/// Splays a node past its parent only while the node has been accessed more
/// often: popular subtrees migrate toward the root, unpopular ones stay
/// put once they fall behind their ancestors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AccessCountSplayStrategy {
    accesses: u32,
}

impl SplayStrategy for AccessCountSplayStrategy {
    fn should_splay(&self, parent: &Self) -> bool {
        self.accesses > parent.accesses
    }
    fn visited(&mut self) {}
    fn accessed(&mut self) {
        self.accesses = self.accesses.saturating_add(1);
    }
}

/// Like [`AccessCountSplayStrategy`] but with a bounded, decaying score
/// instead of an unbounded counter: each access boosts the score by
/// `SCORE_BOOST` (capped at `MAX_SCORE`), and each visit-without-match
/// decays it by `SCORE_DEGRADATION`. Nodes that stop being accessed drift
/// back down rather than keeping a permanent advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParametrizedAccessCountSplayStrategy<
    const SCORE_BOOST: u8 = 16,
    const SCORE_DEGRADATION: u8 = 1,
    const MAX_SCORE: u8 = 255,
    const INITIAL_SCORE: u8 = 0,
> {
    score: u8,
}

impl<const SCORE_BOOST: u8, const SCORE_DEGRADATION: u8, const MAX_SCORE: u8, const INITIAL_SCORE: u8>
    Default for ParametrizedAccessCountSplayStrategy<SCORE_BOOST, SCORE_DEGRADATION, MAX_SCORE, INITIAL_SCORE>
{
    fn default() -> Self {
        ParametrizedAccessCountSplayStrategy {
            score: INITIAL_SCORE,
        }
    }
}

impl<const SCORE_BOOST: u8, const SCORE_DEGRADATION: u8, const MAX_SCORE: u8, const INITIAL_SCORE: u8>
    SplayStrategy for ParametrizedAccessCountSplayStrategy<SCORE_BOOST, SCORE_DEGRADATION, MAX_SCORE, INITIAL_SCORE>
{
    fn should_splay(&self, parent: &Self) -> bool {
        self.score > parent.score
    }
    fn visited(&mut self) {
        self.score = self.score.saturating_sub(SCORE_DEGRADATION);
    }
    fn accessed(&mut self) {
        self.score = self.score.saturating_add(SCORE_BOOST).min(MAX_SCORE);
    }
}

/// Drives splaying from the same decaying [`Priority`] score the hash
/// tables and the Weighted Search Tree use, so a splay tree and a WST can
/// be compared head-to-head under an identical notion of "useful".
#[derive(Debug, Clone, Copy)]
pub struct PriorityStrategy {
    priority: Priority,
}

impl Default for PriorityStrategy {
    fn default() -> Self {
        PriorityStrategy {
            priority: Priority::new(1),
        }
    }
}

impl SplayStrategy for PriorityStrategy {
    fn should_splay(&self, parent: &Self) -> bool {
        self.priority > parent.priority
    }
    fn visited(&mut self) {
        self.priority.visit(1);
    }
    fn accessed(&mut self) {
        self.priority.access();
    }
}
