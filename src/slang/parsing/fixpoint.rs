//! Fixpoint driver
//!
//!     Runs the rewriter on its own output until a pass changes nothing. The driver is a
//!     two-state machine: while *rewriting* it applies one pass and compares the result
//!     with its input; when they are structurally equal it is *stable* and returns the
//!     tree.
//!
//!     Layers
//!
//!         The layer of a pass is the number of passes completed before it, so the first
//!         pass runs at layer 0. A rule with `min_layer = n` takes part from the n-th pass
//!         on. An unchanged tree only counts as stable once every rule of the grammar has
//!         been active for a pass, otherwise a late rule would never get its turn.
//!
//!     Termination
//!
//!         Convergence is up to the grammar. A rule that keeps re-wrapping its own output
//!         never converges; `ParseOptions::max_passes` turns that into an error instead of
//!         a hang.

use super::rewriter::Rewriter;
use super::{ParseError, ParseOptions};
use crate::slang::grammar::Grammar;
use crate::slang::tree::Node;

/// A stable tree and the number of passes it took to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converged {
    pub tree: Node,
    /// Passes run, including the final one that changed nothing
    pub passes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Rewriting,
    Stable,
}

/// Repeats rewrite passes until the tree stops changing.
#[derive(Debug, Clone)]
pub struct Fixpoint<'g> {
    rewriter: Rewriter<'g>,
    options: ParseOptions,
}

impl<'g> Fixpoint<'g> {
    pub fn new(grammar: &'g Grammar, options: ParseOptions) -> Self {
        Self {
            rewriter: Rewriter::new(grammar),
            options,
        }
    }

    pub fn run(&self, tree: Node) -> Result<Converged, ParseError> {
        let unlocked_at = self.rewriter.grammar().max_layer();
        let mut current = tree;
        let mut passes = 0;
        let mut state = State::Rewriting;

        while state == State::Rewriting {
            if let Some(limit) = self.options.max_passes {
                if passes >= limit {
                    return Err(ParseError::PassLimitExceeded { limit });
                }
            }

            let next = self.rewriter.rewrite(&current, passes)?;
            passes += 1;
            let changed = !next.deep_equals(&current);
            tracing::debug!(pass = passes, changed, children = next.size(), "fixpoint pass");

            if !changed && passes > unlocked_at {
                state = State::Stable;
            }
            current = next;
        }

        Ok(Converged {
            tree: current,
            passes,
        })
    }
}
