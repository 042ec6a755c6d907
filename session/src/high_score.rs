//! Collaborators that remember the best score across matches.

/// Storage for the best score reached so far.
///
/// The session reports every finished match exactly once. Implementations
/// decide where, if anywhere, the value is kept.
pub trait HighScoreStore {
    /// Best score recorded so far, if any.
    fn best(&self) -> Option<u32>;

    /// Records the score of a finished match.
    ///
    /// Returns `true` when the score beats the previous best.
    fn submit(&mut self, score: u32) -> bool;
}

/// Store that forgets every score.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHighScores;

impl HighScoreStore for NoHighScores {
    fn best(&self) -> Option<u32> {
        None
    }

    fn submit(&mut self, _score: u32) -> bool {
        false
    }
}

/// Store that keeps the best score for the lifetime of the process.
#[derive(Clone, Debug, Default)]
pub struct InMemoryHighScores {
    best: Option<u32>,
    submissions: u32,
}

impl InMemoryHighScores {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches reported to the store.
    #[must_use]
    pub fn submissions(&self) -> u32 {
        self.submissions
    }
}

impl HighScoreStore for InMemoryHighScores {
    fn best(&self) -> Option<u32> {
        self.best
    }

    fn submit(&mut self, score: u32) -> bool {
        self.submissions = self.submissions.saturating_add(1);
        let improved = self.best.map_or(true, |best| score > best);
        if improved {
            self.best = Some(score);
        }
        improved
    }
}
