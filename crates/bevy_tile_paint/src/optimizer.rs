//! Greedy merging of unit patches into rectangles

use std::collections::HashMap;

use bevy_tile_core::{TileCoordinates, TileMapTilePatch};

fn paints_like(a: &TileMapTilePatch, b: &TileMapTilePatch) -> bool {
    a.tile_coordinates == b.tile_coordinates && a.erase == b.erase
}

/// Merge adjacent single cell patches painting the same tile into rectangles.
///
/// Patches are taken in order, the first remaining one being the seed of the
/// next rectangle. The seed grows right then down as long as cells hold the
/// same tile; if the resulting rectangle is not entirely filled, the seed is
/// kept alone. Patches covering more than one cell are kept unchanged.
///
/// The result is not always minimal: a rectangle of one tile around an island
/// of another tile is split along the island.
pub fn optimize_patches(patches: Vec<TileMapTilePatch>) -> Vec<TileMapTilePatch> {
    let mut unit_patches: HashMap<TileCoordinates, usize> = HashMap::new();
    for (index, patch) in patches.iter().enumerate() {
        if patch.is_single_cell() {
            unit_patches.entry(patch.top_left_corner).or_insert(index);
        }
    }

    let mut consumed = vec![false; patches.len()];
    let mut optimized = Vec::with_capacity(patches.len());
    for index in 0..patches.len() {
        if consumed[index] {
            continue;
        }
        consumed[index] = true;
        let seed = patches[index];
        if !seed.is_single_cell() {
            optimized.push(seed);
            continue;
        }

        let origin = seed.top_left_corner;
        let mergeable = |cell: TileCoordinates, consumed: &[bool]| -> Option<usize> {
            unit_patches
                .get(&cell)
                .copied()
                .filter(|&i| !consumed[i] && paints_like(&patches[i], &seed))
        };

        let mut expand_right = 0;
        while mergeable(origin.offset(expand_right + 1, 0), &consumed).is_some() {
            expand_right += 1;
        }
        let mut expand_bottom = 0;
        while mergeable(origin.offset(0, expand_bottom + 1), &consumed).is_some() {
            expand_bottom += 1;
        }
        if expand_right == 0 && expand_bottom == 0 {
            optimized.push(seed);
            continue;
        }

        let mut merged = Vec::with_capacity(((expand_right + 1) * (expand_bottom + 1)) as usize);
        let mut filled = true;
        'rows: for dy in 0..=expand_bottom {
            for dx in 0..=expand_right {
                if dx == 0 && dy == 0 {
                    continue;
                }
                match mergeable(origin.offset(dx, dy), &consumed) {
                    Some(i) => merged.push(i),
                    None => {
                        filled = false;
                        break 'rows;
                    }
                }
            }
        }
        if !filled {
            optimized.push(seed);
            continue;
        }

        for i in merged {
            consumed[i] = true;
        }
        optimized.push(TileMapTilePatch {
            bottom_right_corner: origin.offset(expand_right, expand_bottom),
            ..seed
        });
    }
    optimized
}
