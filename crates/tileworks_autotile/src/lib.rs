//! Bitmask terrain autotile rules
//!
//! This crate decides which tile variant a cell should show, given which of
//! its neighbors share the same terrain. Rules map canonical neighbor
//! bitmask patterns to tile ids; the resolution engine computes a cell's
//! live pattern and looks it up.
//!
//! # Features
//! - Four-sided (cardinal) and eight-sided (cardinal + corner) pattern tables
//! - Probability-weighted random variation rules
//! - Diagonal masking: corner bits only count when both flanking edges match
//! - Load-time validation with repair for incomplete rule tables
//!
//! # Example
//!
//! ```rust,ignore
//! use tileworks_autotile::{paint_rule, Rule, RuleConfig, RuleKind};
//!
//! // Create a rule and assign tiles to its bitmask slots
//! let mut rule = Rule::four_sided("ground", 1);
//! if let RuleKind::FourSided(four) = &mut rule.kind {
//!     four.assign(0b1111, 40); // fully enclosed
//!     four.assign(0b0000, 55); // isolated
//!     // ... remaining slots
//! }
//!
//! // Paint onto a tile grid; neighbors are fixed up automatically
//! let mut tiles = vec![None; 100]; // 10x10 map
//! paint_rule(&mut tiles, 10, 10, 5, 5, &rule, |t| t.is_some())?;
//! ```

pub mod config;
pub mod persist;
pub mod resolve;
pub mod rules;
pub mod sides;

// Re-export main types at crate root
pub use config::{load_rules, parse_rules, save_rules, RuleBrush, RuleConfig};
pub use persist::parse_rule;
pub use resolve::{apply_rule_to_region, erase_rule, fill_tile, paint_rule};
pub use rules::{
    EightSidedRule, FourSidedRule, GameId, Placement, RandomRule, RandomVariant, Rule, RuleIssue,
    RuleKind, SideBitmask, TileId, FOUR_SIDED_SLOT_SIDES, UNASSIGNED_TILE,
};
pub use sides::{
    canonical, eight_sided_bitmask, four_sided_bitmask, CANONICAL_EIGHT_SIDED_PATTERNS,
};

// Re-export tileworks_core
pub use tileworks_core;

use thiserror::Error;

/// Errors from rule resolution and persistence.
#[derive(Debug, Error)]
pub enum AutotileError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The computed pattern has no entry in the rule's table. Recoverable:
    /// the editor prompts the artist to complete the rule.
    #[error("no tile mapping for bitmask pattern {sides}")]
    RuleLookupMiss { sides: u8 },
    /// The caller resolved a vector shape against the wrong rule kind.
    #[error("expected a {expected} rule, found {found}")]
    InvalidRuleKind {
        expected: &'static str,
        found: &'static str,
    },
    /// A loaded rule failed table validation; see the attached problems.
    #[error("rule '{rule}' has {} validation problem(s)", .problems.len())]
    RuleSetIncomplete {
        rule: String,
        problems: Vec<rules::RuleIssue>,
    },
}
