//! Terrain rule types and builders.
//!
//! A [`Rule`] maps neighbor bitmask patterns to concrete tile ids. Rules are
//! created fully populated with [`UNASSIGNED_TILE`] slots; the artist fills
//! the slots in through the editor and the resolution engine reads them back
//! at render time.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::sides;
use crate::AutotileError;

pub use tileworks_core::GameId;

/// Tile id stored in a rule slot.
pub type TileId = GameId;

/// Sentinel id for slots the artist has not assigned yet.
pub const UNASSIGNED_TILE: TileId = -1;

/// One rule slot: a canonical neighbor pattern and the tile it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideBitmask {
    pub sides: u8,
    pub id: TileId,
}

/// `sides` value of each four-sided slot, in table order: slot 0 is the
/// fully enclosed pattern, slot 15 the fully isolated one. The order is part
/// of the on-disk format and must not change.
pub const FOUR_SIDED_SLOT_SIDES: [u8; 16] = [
    0b1111, 0b1110, 0b0111, 0b0110, 0b1101, 0b1100, 0b0101, 0b0100, 0b1011, 0b1010, 0b0011,
    0b0010, 0b1001, 0b1000, 0b0001, 0b0000,
];

// ─── Issues ──────────────────────────────────────────────────────────────────

/// A single problem found while validating or loading a rule.
///
/// Issues are recoverable: the editor reports them and lets the artist fix
/// the rule, rather than refusing to open the file. The strict parse path
/// wraps them in [`AutotileError::RuleSetIncomplete`](crate::AutotileError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleIssue {
    #[error("missing slot tile{slot}")]
    MissingSlot { slot: usize },
    #[error("unexpected slot tile{slot}")]
    UnexpectedSlot { slot: usize },
    #[error("slot key '{key}' is not a tileN key")]
    MalformedSlotKey { key: String },
    #[error("slot tile{slot} has sides {found}, expected {expected}")]
    SlotSidesMismatch { slot: usize, expected: u8, found: u8 },
    #[error("slot key tile{key} does not match its sides value {sides}")]
    SlotKeyMismatch { key: usize, sides: u8 },
    #[error("pattern {sides} has diagonal bits without both flanking edges")]
    NonCanonicalPattern { sides: u8 },
    #[error("random rule has no output variants")]
    MissingOutput,
    #[error("duplicate rule id {id}")]
    DuplicateRuleId { id: i32 },
}

// ─── Four-sided rules ────────────────────────────────────────────────────────

/// Autotile table over the four cardinal neighbors.
///
/// Owns exactly one slot per 4-bit pattern, so resolution is a direct,
/// infallible lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FourSidedRule {
    slots: [SideBitmask; 16],
}

impl FourSidedRule {
    /// Build the canonical table with every slot unassigned.
    pub fn new() -> Self {
        let mut slots = [SideBitmask {
            sides: 0,
            id: UNASSIGNED_TILE,
        }; 16];
        for (slot, sides) in slots.iter_mut().zip(FOUR_SIDED_SLOT_SIDES) {
            slot.sides = sides;
        }
        Self { slots }
    }

    /// All 16 slots in table order.
    pub fn slots(&self) -> &[SideBitmask; 16] {
        &self.slots
    }

    /// The slot at a table index (0 = fully enclosed, 15 = isolated).
    pub fn slot(&self, index: usize) -> SideBitmask {
        self.slots[index]
    }

    /// Assign a tile to the slot matching `sides`.
    pub fn assign(&mut self, sides: u8, id: TileId) {
        let sides = sides & 0x0f;
        if let Some(slot) = self.slots.iter_mut().find(|s| s.sides == sides) {
            slot.id = id;
        }
    }

    /// Look up the tile for a live cardinal-neighbor bitmask.
    ///
    /// The table covers all 16 patterns, so the lookup always succeeds; the
    /// returned id is [`UNASSIGNED_TILE`] until the artist assigns one.
    pub fn tile_for(&self, sides: u8) -> TileId {
        debug_assert!(sides <= 0x0f, "four-sided bitmask out of range: {sides}");
        let sides = sides & 0x0f;
        self.slots
            .iter()
            .find(|slot| slot.sides == sides)
            .map(|slot| slot.id)
            .unwrap_or(UNASSIGNED_TILE)
    }

    /// Check the exhaustiveness invariant: every slot carries the canonical
    /// `sides` value for its position, which also guarantees all 16 patterns
    /// are present exactly once.
    pub fn validate(&self) -> Vec<RuleIssue> {
        self.slots
            .iter()
            .zip(FOUR_SIDED_SLOT_SIDES)
            .enumerate()
            .filter(|(_, (slot, expected))| slot.sides != *expected)
            .map(|(index, (slot, expected))| RuleIssue::SlotSidesMismatch {
                slot: index,
                expected,
                found: slot.sides,
            })
            .collect()
    }
}

impl Default for FourSidedRule {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Eight-sided rules ───────────────────────────────────────────────────────

/// Autotile table over all eight neighbors, keyed by canonical pattern.
///
/// The default build enumerates every canonical pattern (47 of them), so a
/// freshly created rule resolves any live neighborhood. Tables loaded from
/// older files may be sparse; resolving an absent pattern is a
/// [`RuleLookupMiss`](crate::AutotileError::RuleLookupMiss).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EightSidedRule {
    slots: BTreeMap<u8, TileId>,
}

impl EightSidedRule {
    /// Build the exhaustive table with every canonical pattern unassigned.
    pub fn new() -> Self {
        let mut slots = BTreeMap::new();
        for mask in 0u16..=255 {
            slots.entry(sides::canonical(mask as u8)).or_insert(UNASSIGNED_TILE);
        }
        Self { slots }
    }

    pub(crate) fn from_slots(slots: BTreeMap<u8, TileId>) -> Self {
        Self { slots }
    }

    /// All slots, keyed by canonical pattern.
    pub fn slots(&self) -> &BTreeMap<u8, TileId> {
        &self.slots
    }

    /// Assign a tile to a pattern. The pattern is canonicalized first, so
    /// raw editor selections with stray diagonal bits land on the right slot.
    pub fn assign(&mut self, sides: u8, id: TileId) {
        self.slots.insert(sides::canonical(sides), id);
    }

    /// Look up the tile for a live eight-neighbor bitmask.
    pub fn tile_for(&self, sides: u8) -> Result<TileId, AutotileError> {
        let canonical = sides::canonical(sides);
        self.slots
            .get(&canonical)
            .copied()
            .ok_or(AutotileError::RuleLookupMiss { sides: canonical })
    }

    /// Report slots keyed by non-canonical patterns (possible in data loaded
    /// from older files).
    pub fn validate(&self) -> Vec<RuleIssue> {
        self.slots
            .keys()
            .filter(|&&sides| sides::canonical(sides) != sides)
            .map(|&sides| RuleIssue::NonCanonicalPattern { sides })
            .collect()
    }
}

impl Default for EightSidedRule {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Random rules ────────────────────────────────────────────────────────────

/// Where a random variant's tile lands when placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[default]
    Terrain,
    Decoration,
}

/// One candidate output of a [`RandomRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomVariant {
    pub value: TileId,
    pub probability: f64,
    pub placement: Placement,
}

/// Probability-weighted tile variation, independent of neighbors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RandomRule {
    variants: Vec<RandomVariant>,
}

impl RandomRule {
    pub fn new(variants: Vec<RandomVariant>) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &[RandomVariant] {
        &self.variants
    }

    /// Pick a variant by cumulative probability: one roll in `[0, 1)`, first
    /// variant whose cumulative bound exceeds it wins. Probabilities summing
    /// below 1 leave a remainder where nothing is picked.
    pub fn pick<'a>(&'a self, rng: &mut impl Rng) -> Option<&'a RandomVariant> {
        let roll: f64 = rng.gen();
        let mut cumulative = 0.0;

        for variant in &self.variants {
            cumulative += variant.probability;
            if roll < cumulative {
                return Some(variant);
            }
        }

        None
    }

    pub fn validate(&self) -> Vec<RuleIssue> {
        if self.variants.is_empty() {
            vec![RuleIssue::MissingOutput]
        } else {
            Vec::new()
        }
    }
}

// ─── Rule ────────────────────────────────────────────────────────────────────

/// The pattern table owned by a [`Rule`], one variant per rule kind.
///
/// Each kind carries a distinct persisted discriminant; see
/// [`RuleKind::discriminant`].
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    FourSided(FourSidedRule),
    EightSided(EightSidedRule),
    Random(RandomRule),
}

impl RuleKind {
    /// Discriminant written to the JSON `type` field.
    pub fn discriminant(&self) -> u8 {
        match self {
            RuleKind::FourSided(_) => 0,
            RuleKind::EightSided(_) => 1,
            RuleKind::Random(_) => 2,
        }
    }

    /// Human-readable kind name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::FourSided(_) => "four-sided",
            RuleKind::EightSided(_) => "eight-sided",
            RuleKind::Random(_) => "random",
        }
    }
}

/// A named autotile rule. `id` is unique within a rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub id: i32,
    pub kind: RuleKind,
}

impl Rule {
    /// Create a four-sided terrain rule with all 16 slots unassigned.
    pub fn four_sided(name: impl Into<String>, id: i32) -> Self {
        Self {
            name: name.into(),
            id,
            kind: RuleKind::FourSided(FourSidedRule::new()),
        }
    }

    /// Create an eight-sided terrain rule with all 47 canonical slots
    /// unassigned.
    pub fn eight_sided(name: impl Into<String>, id: i32) -> Self {
        Self {
            name: name.into(),
            id,
            kind: RuleKind::EightSided(EightSidedRule::new()),
        }
    }

    /// Create a random-variation rule.
    pub fn random(name: impl Into<String>, id: i32, variants: Vec<RandomVariant>) -> Self {
        Self {
            name: name.into(),
            id,
            kind: RuleKind::Random(RandomRule::new(variants)),
        }
    }

    /// Resolve a four-sided neighbor bitmask against this rule.
    pub fn resolve_four_sided(&self, sides: u8) -> Result<TileId, AutotileError> {
        match &self.kind {
            RuleKind::FourSided(rule) => Ok(rule.tile_for(sides)),
            other => Err(AutotileError::InvalidRuleKind {
                expected: "four-sided",
                found: other.name(),
            }),
        }
    }

    /// Resolve an eight-sided neighbor bitmask against this rule.
    pub fn resolve_eight_sided(&self, sides: u8) -> Result<TileId, AutotileError> {
        match &self.kind {
            RuleKind::EightSided(rule) => rule.tile_for(sides),
            other => Err(AutotileError::InvalidRuleKind {
                expected: "eight-sided",
                found: other.name(),
            }),
        }
    }

    /// Pick a random variant from this rule.
    pub fn resolve_random<'a>(
        &'a self,
        rng: &mut impl Rng,
    ) -> Result<Option<&'a RandomVariant>, AutotileError> {
        match &self.kind {
            RuleKind::Random(rule) => Ok(rule.pick(rng)),
            other => Err(AutotileError::InvalidRuleKind {
                expected: "random",
                found: other.name(),
            }),
        }
    }

    /// Validate this rule's table against its kind's invariants.
    pub fn validate(&self) -> Vec<RuleIssue> {
        match &self.kind {
            RuleKind::FourSided(rule) => rule.validate(),
            RuleKind::EightSided(rule) => rule.validate(),
            RuleKind::Random(rule) => rule.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sides::{eight_side, four_side};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_four_sided_builder_is_exhaustive() {
        let rule = FourSidedRule::new();

        let mut seen: Vec<u8> = rule.slots().iter().map(|slot| slot.sides).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..16).collect::<Vec<u8>>());

        assert!(rule.slots().iter().all(|slot| slot.id == UNASSIGNED_TILE));
        assert!(rule.validate().is_empty());
    }

    #[test]
    fn test_four_sided_slot_table_order() {
        let rule = FourSidedRule::new();

        // Fully enclosed first, fully isolated last.
        assert_eq!(rule.slot(0).sides, four_side::ALL);
        assert_eq!(rule.slot(1).sides, four_side::RIGHT | four_side::BOTTOM | four_side::LEFT);
        assert_eq!(rule.slot(2).sides, four_side::TOP | four_side::RIGHT | four_side::BOTTOM);
        assert_eq!(rule.slot(7).sides, four_side::BOTTOM);
        assert_eq!(rule.slot(14).sides, four_side::TOP);
        assert_eq!(rule.slot(15).sides, four_side::NONE);
    }

    #[test]
    fn test_four_sided_assign_and_lookup() {
        let mut rule = FourSidedRule::new();
        assert_eq!(rule.tile_for(four_side::ALL), UNASSIGNED_TILE);

        rule.assign(four_side::ALL, 42);
        assert_eq!(rule.tile_for(four_side::ALL), 42);
        // Other slots untouched.
        assert_eq!(rule.tile_for(four_side::NONE), UNASSIGNED_TILE);
    }

    #[test]
    fn test_four_sided_lookup_is_deterministic() {
        let mut rule = FourSidedRule::new();
        for sides in 0..16u8 {
            rule.assign(sides, sides as TileId + 100);
        }
        for sides in 0..16u8 {
            assert_eq!(rule.tile_for(sides), rule.tile_for(sides));
            assert_eq!(rule.tile_for(sides), sides as TileId + 100);
        }
    }

    #[test]
    fn test_eight_sided_builder_covers_all_canonical_patterns() {
        let rule = EightSidedRule::new();
        assert_eq!(rule.slots().len(), crate::sides::CANONICAL_EIGHT_SIDED_PATTERNS);
        assert!(rule.slots().contains_key(&eight_side::NONE));
        assert!(rule.slots().contains_key(&eight_side::ALL));
        assert!(rule.validate().is_empty());
    }

    #[test]
    fn test_eight_sided_lookup_canonicalizes() {
        let mut rule = EightSidedRule::new();
        let corner = eight_side::TOP | eight_side::RIGHT | eight_side::TOP_RIGHT;
        rule.assign(corner, 9);

        // A stray bottom-left diagonal with no flanking edges is ignored.
        let raw = corner | eight_side::BOTTOM_LEFT;
        assert_eq!(rule.tile_for(raw).unwrap(), 9);
    }

    #[test]
    fn test_eight_sided_sparse_table_misses() {
        let rule = EightSidedRule::from_slots(BTreeMap::new());
        let result = rule.tile_for(eight_side::NONE);
        assert!(matches!(
            result,
            Err(AutotileError::RuleLookupMiss { sides: 0 })
        ));
    }

    #[test]
    fn test_random_pick_follows_cumulative_probability() {
        let mut rng = SmallRng::seed_from_u64(7);

        let certain = RandomRule::new(vec![RandomVariant {
            value: 5,
            probability: 1.0,
            placement: Placement::Terrain,
        }]);
        for _ in 0..32 {
            assert_eq!(certain.pick(&mut rng).unwrap().value, 5);
        }

        // A zero-probability variant is never chosen over a certain one.
        let skewed = RandomRule::new(vec![
            RandomVariant {
                value: 1,
                probability: 0.0,
                placement: Placement::Terrain,
            },
            RandomVariant {
                value: 2,
                probability: 1.0,
                placement: Placement::Decoration,
            },
        ]);
        for _ in 0..32 {
            assert_eq!(skewed.pick(&mut rng).unwrap().value, 2);
        }

        let empty = RandomRule::new(Vec::new());
        assert!(empty.pick(&mut rng).is_none());
        assert_eq!(empty.validate(), vec![RuleIssue::MissingOutput]);
    }

    #[test]
    fn test_rule_kind_dispatch() {
        let rule = Rule::four_sided("cliffs", 3);
        assert_eq!(rule.kind.discriminant(), 0);
        assert_eq!(rule.resolve_four_sided(four_side::NONE).unwrap(), UNASSIGNED_TILE);

        let err = rule.resolve_eight_sided(eight_side::NONE).unwrap_err();
        assert!(matches!(
            err,
            AutotileError::InvalidRuleKind {
                expected: "eight-sided",
                found: "four-sided",
            }
        ));

        let mut rng = SmallRng::seed_from_u64(0);
        assert!(rule.resolve_random(&mut rng).is_err());
    }
}
