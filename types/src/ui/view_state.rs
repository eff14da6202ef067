//! View state for rendering.
//!
//! Groups everything the renderer needs that is not sort state.

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub ui_options: UiOptions,
    /// First visible row of the ranked list on the results screen.
    pub result_scroll: usize,
    /// Show the key help overlay.
    pub show_help: bool,
}

impl ViewState {
    #[must_use]
    pub fn new(ui_options: UiOptions) -> Self {
        Self {
            ui_options,
            ..Self::default()
        }
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.result_scroll = self.result_scroll.saturating_sub(rows);
    }

    /// Scroll down, never past the last row of a list of `len` entries.
    pub fn scroll_down(&mut self, rows: usize, len: usize) {
        let max = len.saturating_sub(1);
        self.result_scroll = self.result_scroll.saturating_add(rows).min(max);
    }
}
