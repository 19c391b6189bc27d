//! Selected country and its rotating highlight color

use crate::countries::Country;

/// Highlight palette, in rotation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    LightBlue,
    LightGreen,
    LightPink,
    LightYellow,
}

pub const PALETTE: [Highlight; 4] = [
    Highlight::LightBlue,
    Highlight::LightGreen,
    Highlight::LightPink,
    Highlight::LightYellow,
];

/// How many rows the default selection reaches into the filtered list
pub const DEFAULT_SELECTION_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    code: Option<String>,
    color_index: usize,
}

impl Selection {
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn color(&self) -> Highlight {
        PALETTE[self.color_index % PALETTE.len()]
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }

    /// Manual selection: same code clears, a new code selects and advances the color
    pub fn toggle(mut self, code: &str) -> Self {
        if self.is_selected(code) {
            self.code = None;
        } else {
            self.code = Some(code.to_string());
            self.color_index = (self.color_index + 1) % PALETTE.len();
        }
        self
    }

    /// Select entry `min(len, limit) - 1`, or clear on an empty list.
    /// Leaves the color where it is.
    pub fn select_default(mut self, filtered: &[Country], limit: usize) -> Self {
        self.code = default_index(filtered.len(), limit).map(|i| filtered[i].code.clone());
        self
    }
}

/// Index picked by the default selection rule
pub fn default_index(len: usize, limit: usize) -> Option<usize> {
    len.min(limit.max(1)).checked_sub(1)
}
