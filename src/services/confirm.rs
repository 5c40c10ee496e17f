use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

/// Human-in-the-loop yes/no gate shown before a mutating action.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Answers every prompt the same way, for headless callers.
#[derive(Debug, Default)]
pub struct PresetAnswer {
    answer: bool,
    asked: AtomicUsize,
}

impl PresetAnswer {
    pub fn yes() -> Self {
        Self {
            answer: true,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: false,
            asked: AtomicUsize::new(0),
        }
    }

    /// How many prompts were shown.
    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Confirmer for PresetAnswer {
    async fn confirm(&self, message: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        log::debug!("Confirmation '{}' answered {}", message, self.answer);
        self.answer
    }
}
