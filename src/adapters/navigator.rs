use crate::core::{Navigator, Screen};

/// Navigator for headless front-ends: logs each transition and keeps the history.
#[derive(Debug, Clone, Default)]
pub struct ScreenLog {
    history: Vec<Screen>,
}

impl ScreenLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Screen> {
        self.history.last().copied()
    }

    pub fn history(&self) -> &[Screen] {
        &self.history
    }
}

impl Navigator for ScreenLog {
    fn go_to(&mut self, screen: Screen) {
        tracing::info!("Showing {} screen", screen);
        self.history.push(screen);
    }
}
