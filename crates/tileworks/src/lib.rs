//! Texture and tile asset model with bitmask autotiling for 2D games.
//!
//! This is the facade crate: it re-exports the data model from
//! [`tileworks_core`] and the rule engine from [`tileworks_autotile`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tileworks::{parse_texture_data, FrameIndex, Rule, RuleKind};
//!
//! // Rules map neighbor bitmask patterns to tile ids...
//! let mut rule = Rule::four_sided("ground", 1);
//! if let RuleKind::FourSided(four) = &mut rule.kind {
//!     four.assign(0b1111, 40);
//! }
//! let tile = rule.resolve_four_sided(0b1111)?;
//!
//! // ...and the frame index says how to draw the winner.
//! let texture = parse_texture_data(&std::fs::read_to_string("tiles.json")?)?;
//! let frame = FrameIndex::new(&texture).frame(tile)?;
//! ```

pub use tileworks_autotile;
pub use tileworks_core;

pub use tileworks_autotile::{
    apply_rule_to_region, erase_rule, load_rules, paint_rule, parse_rule, parse_rules, save_rules,
    AutotileError, EightSidedRule, FourSidedRule, Placement, RandomRule, RandomVariant, Rule,
    RuleBrush, RuleConfig, RuleIssue, RuleKind, SideBitmask, TileId, UNASSIGNED_TILE,
};
pub use tileworks_core::{
    load_texture_data, load_tile_data, parse_texture_data, parse_tile_data, save_texture_data,
    save_tile_data, Action, Angle, DataError, Drop, EditorSession, Frame, FrameIndex, FrameKind,
    GameId, Position, SidebarPane, Size, Sprite, TextureData, Tile, TileData,
};
