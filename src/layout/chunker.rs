use crate::models::{identity_keys, ReelItem, RowGroup, RowItem, RowMode};

/// One entry of the repeating row pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    pub size: usize,
    pub mode: RowMode,
}

/// Partitions an ordered item list into rows of alternating target sizes.
///
/// Row `i` uses pattern slot `i % pattern.len()`. With the default pattern
/// that means even rows are 3-wide portrait and odd rows 2-wide landscape.
#[derive(Debug, Clone)]
pub struct LayoutChunker {
    pattern: Vec<RowSlot>,
}

impl Default for LayoutChunker {
    fn default() -> Self {
        Self::from_sizes(&[3, 2])
    }
}

impl LayoutChunker {
    /// Builds a chunker from row sizes, tagging slots portrait/landscape by
    /// slot parity. Zero sizes are dropped; an empty pattern falls back to
    /// the default.
    pub fn from_sizes(sizes: &[usize]) -> Self {
        let pattern: Vec<RowSlot> = sizes
            .iter()
            .copied()
            .filter(|size| *size > 0)
            .enumerate()
            .map(|(slot, size)| RowSlot {
                size,
                mode: RowMode::for_slot(slot),
            })
            .collect();

        if pattern.is_empty() {
            tracing::warn!(?sizes, "row pattern has no usable sizes, using default");
            return Self::default();
        }
        Self { pattern }
    }

    pub fn pattern(&self) -> &[RowSlot] {
        &self.pattern
    }

    /// Splits `items` into rows, preserving input order.
    ///
    /// The final row may be shorter than its slot's size; it is never padded.
    pub fn chunk(&self, items: &[ReelItem]) -> Vec<RowGroup> {
        if items.is_empty() {
            return Vec::new();
        }

        let keys = identity_keys(items);
        let mut rows = Vec::new();
        let mut start = 0usize;
        let mut row_index = 0u32;

        while start < items.len() {
            let slot = self.pattern[row_index as usize % self.pattern.len()];
            let end = (start + slot.size).min(items.len());
            let row_items = (start..end)
                .map(|position| RowItem {
                    key: keys[position].clone(),
                    position,
                    reel: items[position].clone(),
                })
                .collect();
            rows.push(RowGroup::new(row_index, slot.mode, slot.size, row_items));
            start = end;
            row_index += 1;
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_items(count: usize) -> Vec<ReelItem> {
        (0..count)
            .map(|i| ReelItem::new(format!("reel {}", i), format!("{}.mp4", i)))
            .collect()
    }

    fn sizes(rows: &[RowGroup]) -> Vec<usize> {
        rows.iter().map(|r| r.items.len()).collect()
    }

    #[test]
    fn test_empty_items() {
        let chunker = LayoutChunker::default();
        assert!(chunker.chunk(&[]).is_empty());
    }

    #[test]
    fn test_single_item() {
        let chunker = LayoutChunker::default();
        let rows = chunker.chunk(&make_items(1));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].items.len(), 1);
        assert_eq!(rows[0].mode, RowMode::Portrait);
        assert_eq!(rows[0].columns, 3);
        assert!(rows[0].is_short());
    }

    #[test]
    fn test_five_items_fill_one_cycle() {
        let chunker = LayoutChunker::default();
        let rows = chunker.chunk(&make_items(5));
        assert_eq!(sizes(&rows), vec![3, 2]);
        assert_eq!(rows[0].mode, RowMode::Portrait);
        assert_eq!(rows[1].mode, RowMode::Landscape);
    }

    #[test]
    fn test_seven_items_truncate_last_row() {
        let chunker = LayoutChunker::default();
        let rows = chunker.chunk(&make_items(7));
        assert_eq!(sizes(&rows), vec![3, 2, 2]);
        assert_eq!(rows[2].mode, RowMode::Portrait);
        assert_eq!(rows[2].columns, 3);
        assert!(rows[2].is_short());
    }

    #[test]
    fn test_order_preserved_without_loss() {
        let chunker = LayoutChunker::default();
        let items = make_items(23);
        let rows = chunker.chunk(&items);

        let flattened: Vec<usize> = rows
            .iter()
            .flat_map(|r| r.items.iter().map(|i| i.position))
            .collect();
        assert_eq!(flattened, (0..23).collect::<Vec<_>>());

        for (row_idx, row) in rows.iter().enumerate() {
            assert_eq!(row.row_index as usize, row_idx);
            for item in &row.items {
                assert_eq!(item.reel, items[item.position]);
            }
        }
    }

    #[test]
    fn test_keys_follow_identity() {
        let chunker = LayoutChunker::default();
        let items = vec![
            ReelItem::new("Dup", "a.mp4"),
            ReelItem::new("Dup", "b.mp4"),
        ];
        let rows = chunker.chunk(&items);
        let keys: Vec<&str> = rows[0].items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["Dup-0", "Dup-1"]);
    }

    #[test]
    fn test_custom_pattern() {
        let chunker = LayoutChunker::from_sizes(&[4, 1, 2]);
        let rows = chunker.chunk(&make_items(10));
        assert_eq!(sizes(&rows), vec![4, 1, 2, 3]);
        assert_eq!(rows[1].mode, RowMode::Landscape);
        assert_eq!(rows[2].mode, RowMode::Portrait);
        assert_eq!(rows[3].mode, RowMode::Portrait);
    }

    #[test]
    fn test_zero_sizes_are_ignored() {
        let chunker = LayoutChunker::from_sizes(&[0, 2, 0]);
        assert_eq!(chunker.pattern().len(), 1);
        assert_eq!(sizes(&chunker.chunk(&make_items(5))), vec![2, 2, 1]);

        let fallback = LayoutChunker::from_sizes(&[]);
        assert_eq!(fallback.pattern(), LayoutChunker::default().pattern());
    }
}
