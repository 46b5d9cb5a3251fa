//! Applying terrain rules to tile grids.
//!
//! These helpers recompute autotile selections over a flat row-major grid of
//! `Option<TileId>` cells. The caller supplies the same-terrain predicate;
//! the grid itself stays a plain slice so the editor shell can own it however
//! it likes.

use crate::rules::{Rule, RuleKind, TileId};
use crate::sides::{self, eight_side, four_side};
use crate::AutotileError;

/// The tile used when first placing a cell of rule terrain, before its
/// neighborhood has been recomputed: the fully enclosed slot.
pub fn fill_tile(rule: &Rule) -> Result<TileId, AutotileError> {
    match &rule.kind {
        RuleKind::FourSided(four) => Ok(four.tile_for(four_side::ALL)),
        RuleKind::EightSided(eight) => eight.tile_for(eight_side::ALL),
        other => Err(AutotileError::InvalidRuleKind {
            expected: "four-sided or eight-sided",
            found: other.name(),
        }),
    }
}

/// Recompute autotiles for a region of the grid.
///
/// Every terrain cell inside the region, plus a one-cell border (placing or
/// removing a tile changes its neighbors' patterns too), is re-resolved
/// against `rule`. Cells whose pattern has no table entry are left unchanged
/// and logged. Random rules have no neighbor table and are rejected.
#[allow(clippy::too_many_arguments)]
pub fn apply_rule_to_region<F>(
    tiles: &mut [Option<TileId>],
    width: u32,
    height: u32,
    region_x: i32,
    region_y: i32,
    region_w: i32,
    region_h: i32,
    rule: &Rule,
    is_terrain_tile: F,
) -> Result<(), AutotileError>
where
    F: Fn(Option<TileId>) -> bool,
{
    if let RuleKind::Random(_) = rule.kind {
        return Err(AutotileError::InvalidRuleKind {
            expected: "four-sided or eight-sided",
            found: rule.kind.name(),
        });
    }

    let min_x = (region_x - 1).max(0) as u32;
    let min_y = (region_y - 1).max(0) as u32;
    let max_x = ((region_x + region_w + 1) as u32).min(width);
    let max_y = ((region_y + region_h + 1) as u32).min(height);

    let mut updates: Vec<(usize, TileId)> = Vec::new();

    for y in min_y..max_y {
        for x in min_x..max_x {
            let idx = (y * width + x) as usize;
            if !is_terrain_tile(tiles.get(idx).copied().flatten()) {
                continue;
            }

            let is_same = |nx: i32, ny: i32| {
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    return false;
                }
                let nidx = (ny as u32 * width + nx as u32) as usize;
                is_terrain_tile(tiles.get(nidx).copied().flatten())
            };

            let resolved = match &rule.kind {
                RuleKind::FourSided(four) => {
                    Some(four.tile_for(sides::four_sided_bitmask(x as i32, y as i32, is_same)))
                }
                RuleKind::EightSided(eight) => {
                    let mask = sides::eight_sided_bitmask(x as i32, y as i32, is_same);
                    match eight.tile_for(mask) {
                        Ok(id) => Some(id),
                        Err(_) => {
                            log::warn!(
                                "no tile mapping for bitmask {mask} in rule '{}'",
                                rule.name
                            );
                            None
                        }
                    }
                }
                RuleKind::Random(_) => unreachable!("random rules rejected above"),
            };

            if let Some(id) = resolved {
                updates.push((idx, id));
            }
        }
    }

    for (idx, id) in updates {
        tiles[idx] = Some(id);
    }

    Ok(())
}

/// Paint a single cell as rule terrain and fix up its neighborhood.
pub fn paint_rule<F>(
    tiles: &mut [Option<TileId>],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    rule: &Rule,
    is_terrain_tile: F,
) -> Result<(), AutotileError>
where
    F: Fn(Option<TileId>) -> bool + Copy,
{
    let fill = fill_tile(rule)?;

    let idx = (y * width + x) as usize;
    if idx < tiles.len() {
        tiles[idx] = Some(fill);
    }

    apply_rule_to_region(
        tiles,
        width,
        height,
        x as i32,
        y as i32,
        1,
        1,
        rule,
        is_terrain_tile,
    )
}

/// Erase a cell and fix up its neighborhood.
pub fn erase_rule<F>(
    tiles: &mut [Option<TileId>],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    rule: &Rule,
    is_terrain_tile: F,
) -> Result<(), AutotileError>
where
    F: Fn(Option<TileId>) -> bool + Copy,
{
    let idx = (y * width + x) as usize;
    if idx < tiles.len() {
        tiles[idx] = None;
    }

    apply_rule_to_region(
        tiles,
        width,
        height,
        x as i32,
        y as i32,
        1,
        1,
        rule,
        is_terrain_tile,
    )
}
