//! Overwrite confirmation capability

use std::collections::VecDeque;

/// Answer to a confirmation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// No answer can be obtained, e.g. stdin is not a terminal
    Unavailable,
}

/// Asks whether an existing destination may be overwritten.
///
/// The engine blocks on this call; no other work is in flight meanwhile.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> Answer;
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub Answer);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, message: &str) -> Answer {
        tracing::debug!(message, answer = ?self.0, "Confirmation answered");
        self.0
    }
}

/// Gives queued answers in order and records the prompts it was shown.
///
/// Once the queue is exhausted every further request is `Unavailable`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAnswers {
    answers: VecDeque<Answer>,
    prompts: Vec<String>,
}

impl ScriptedAnswers {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    /// Every message shown so far.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl Confirm for ScriptedAnswers {
    fn confirm(&mut self, message: &str) -> Answer {
        self.prompts.push(message.to_string());
        self.answers.pop_front().unwrap_or(Answer::Unavailable)
    }
}
