//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for the terminal yes/no prompt behind the engine's
//! [`Confirm`] capability.

use std::io::IsTerminal;

use confsync_core::{Answer, Confirm};

/// Asks on the terminal before an existing destination is overwritten.
///
/// When stdin or stderr is not a terminal no answer can be obtained and
/// every request is [`Answer::Unavailable`]. An aborted or failed prompt is
/// `Unavailable` too.
pub struct TerminalConfirm {
    interactive: bool,
}

impl TerminalConfirm {
    pub fn new() -> Self {
        Self {
            interactive: std::io::stdin().is_terminal() && std::io::stderr().is_terminal(),
        }
    }
}

impl Default for TerminalConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> Answer {
        if !self.interactive {
            tracing::debug!(message, "Not a terminal, cannot ask");
            return Answer::Unavailable;
        }

        match dialoguer::Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact_opt()
        {
            Ok(Some(true)) => Answer::Yes,
            Ok(Some(false)) => Answer::No,
            // Esc or q: the question was left unanswered
            Ok(None) => Answer::Unavailable,
            Err(e) => {
                tracing::warn!("Prompt failed: {e}");
                Answer::Unavailable
            }
        }
    }
}
