use super::ReelItem;

/// Aspect grouping of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode {
    /// Tall 9:16 tiles.
    Portrait,
    /// Wide 16:9 tiles.
    Landscape,
}

impl RowMode {
    /// Even pattern slots are portrait, odd slots landscape.
    pub fn for_slot(slot: usize) -> Self {
        if slot % 2 == 0 {
            Self::Portrait
        } else {
            Self::Landscape
        }
    }

    /// Height of a tile divided by its width.
    pub fn height_ratio(self) -> f32 {
        match self {
            Self::Portrait => 16.0 / 9.0,
            Self::Landscape => 9.0 / 16.0,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Portrait => "row-portrait",
            Self::Landscape => "row-landscape",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RowItem {
    /// Unique key for this render pass.
    pub key: String,
    /// Index in the normalized input list.
    pub position: usize,
    pub reel: ReelItem,
}

#[derive(Debug, Clone)]
pub struct RowGroup {
    pub row_index: u32,
    pub mode: RowMode,
    /// Target column count; the final row may hold fewer items.
    pub columns: usize,
    pub items: Vec<RowItem>,
}

impl RowGroup {
    pub fn new(row_index: u32, mode: RowMode, columns: usize, items: Vec<RowItem>) -> Self {
        Self {
            row_index,
            mode,
            columns,
            items,
        }
    }

    pub fn is_short(&self) -> bool {
        self.items.len() < self.columns
    }
}
