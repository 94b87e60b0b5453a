//! Question prompt: owns the yes/no outcome and the attempt counter

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::evasive::{EvasiveControl, phrase_for, scale_for};

/// Outcome of the yes/no question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing clicked yet
    #[default]
    Unanswered,
    /// Rejected at least once; still interactive
    Rejected { attempts: u32 },
    /// Accepted. Terminal for the session.
    Accepted,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prompt {
    pub outcome: Outcome,
    /// Rejection clicks so far; never reset
    pub attempts: u32,
    pub evasive: EvasiveControl,
}

impl Prompt {
    pub fn is_accepted(&self) -> bool {
        self.outcome == Outcome::Accepted
    }

    pub fn no_text(&self) -> &'static str {
        phrase_for(self.attempts)
    }

    pub fn no_scale(&self) -> f32 {
        scale_for(self.attempts)
    }

    /// Handle a click on the evasive button
    pub fn reject<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.is_accepted() {
            return false;
        }
        self.attempts += 1;
        self.outcome = Outcome::Rejected {
            attempts: self.attempts,
        };
        self.evasive.jump(rng, self.attempts);
        true
    }

    /// Handle a click on the accept button. True only the first time.
    pub fn accept(&mut self) -> bool {
        if self.is_accepted() {
            return false;
        }
        self.outcome = Outcome::Accepted;
        true
    }
}
