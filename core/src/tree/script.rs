//! Script-driven convenience wrapper around the work-list

use super::arena::{ExecutionTree, TreeState};
use crate::machine::{Command, Domain, EngineError, EngineResult};
use tracing::{debug, instrument, warn};

impl<D: Domain> ExecutionTree<D> {
    /// Run the tree, feeding one command at each pause point
    ///
    /// Stops when the script is used up, returning `Paused` with the node
    /// waiting for the next command, or when the derivation finishes.
    /// Commands left over after the derivation finished are an error.
    #[instrument(skip_all)]
    pub fn run_script<I>(&mut self, script: I) -> EngineResult<TreeState>
    where
        I: IntoIterator<Item = Command<D>>,
    {
        let mut commands = script.into_iter();
        let mut state = self.run()?;

        while let TreeState::Paused(id) = state {
            let Some(command) = commands.next() else {
                debug!(node = id.0, "script exhausted at pause point");
                break;
            };
            self.apply(command)?;
            state = self.run()?;
        }

        let remaining = commands.count();
        if remaining > 0 {
            warn!(remaining, "script commands left after evaluation finished");
            return Err(EngineError::ScriptNotExhausted { remaining });
        }

        Ok(state)
    }
}
