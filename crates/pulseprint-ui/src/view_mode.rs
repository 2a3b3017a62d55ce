//! Card/table view toggle

use pulseprint_settings::ViewMode;
use serde::Serialize;

/// Label of the card view control
pub const CARD_VIEW_LABEL: &str = "Card View";
/// Label of the table view control
pub const TABLE_VIEW_LABEL: &str = "Table View";

/// Two-state view mode toggle
///
/// Transitions take effect immediately; persisting the choice is the
/// owner's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewModeToggle {
    mode: ViewMode,
}

impl ViewModeToggle {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    /// Current mode
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch to `mode`; returns whether the mode changed
    pub fn select(&mut self, mode: ViewMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Switch to the other mode and return it
    pub fn toggle(&mut self) -> ViewMode {
        self.mode = self.mode.toggled();
        self.mode
    }

    /// Controls for the current state
    pub fn controls(&self) -> ViewToggleControls {
        ViewToggleControls {
            options: [
                ViewToggleOption {
                    mode: ViewMode::Card,
                    label: CARD_VIEW_LABEL,
                    selected: self.mode == ViewMode::Card,
                },
                ViewToggleOption {
                    mode: ViewMode::Table,
                    label: TABLE_VIEW_LABEL,
                    selected: self.mode == ViewMode::Table,
                },
            ],
        }
    }
}

/// One button of the toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewToggleOption {
    pub mode: ViewMode,
    pub label: &'static str,
    pub selected: bool,
}

/// The card/table buttons shown above the printer list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewToggleControls {
    pub options: [ViewToggleOption; 2],
}

impl ViewToggleControls {
    /// Mode of the selected option
    pub fn selected(&self) -> ViewMode {
        self.options
            .iter()
            .find(|o| o.selected)
            .map(|o| o.mode)
            .unwrap_or_default()
    }

    /// Find an option by its label
    pub fn option(&self, label: &str) -> Option<&ViewToggleOption> {
        self.options.iter().find(|o| o.label == label)
    }
}
