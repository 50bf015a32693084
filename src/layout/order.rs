use std::collections::{HashMap, HashSet};

use super::error::LayoutError;
use super::types::ProfileLayout;

/// Rearrange a layout's blocks to match `order`, which must be an exact
/// permutation of the current block ids. Anything else (wrong count, a
/// repeated id, an id the layout does not have) fails with
/// `InvalidPermutation` and leaves the layout untouched.
pub fn reorder_blocks(layout: &mut ProfileLayout, order: &[String]) -> Result<(), LayoutError> {
    if order.len() != layout.blocks.len() {
        return Err(LayoutError::InvalidPermutation {
            detail: format!(
                "expected {} block ids, got {}",
                layout.blocks.len(),
                order.len()
            ),
        });
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(order.len());
    for id in order {
        if !seen.insert(id.as_str()) {
            return Err(LayoutError::InvalidPermutation {
                detail: format!("block id '{}' appears more than once", id),
            });
        }
    }

    for id in order {
        if !layout.blocks.iter().any(|b| b.id == *id) {
            return Err(LayoutError::InvalidPermutation {
                detail: format!("block id '{}' is not in the layout", id),
            });
        }
    }

    // Equal counts, no repeats, every id present: this is a permutation.
    let rank: HashMap<&str, usize> = order
        .iter()
        .enumerate()
        .map(|(position, id)| (id.as_str(), position))
        .collect();
    layout
        .blocks
        .sort_by_key(|block| rank.get(block.id.as_str()).copied().unwrap_or(usize::MAX));

    Ok(())
}
