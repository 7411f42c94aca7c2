//! Read-only view of the bot's command registry.

use crate::Keyword;
use serde::{Deserialize, Serialize};

/// A command known to the action engine.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters, derive_new::new,
)]
pub struct Command {
    /// Keyword the command is invoked by
    #[new(into)]
    keyword: Keyword,
    /// Whether the command may currently be invoked
    is_active: bool,
}

/// Source of the commands a profile may reference.
///
/// The access-control unit only reads keywords from the registry. Whether a
/// command is active is left to the execution engine.
pub trait CommandRegistry {
    /// All known commands, in registry order.
    fn commands(&self) -> &[Command];

    /// Whether the registry knows no commands at all.
    fn is_empty(&self) -> bool {
        self.commands().is_empty()
    }
}

impl CommandRegistry for [Command] {
    fn commands(&self) -> &[Command] {
        self
    }
}

impl CommandRegistry for Vec<Command> {
    fn commands(&self) -> &[Command] {
        self
    }
}

impl<const N: usize> CommandRegistry for [Command; N] {
    fn commands(&self) -> &[Command] {
        self
    }
}
