//! JSON persistence for terrain rules.
//!
//! The on-disk shape is a flat object: `name`, `id`, `type`, then one
//! `tileN` entry per slot, or an `output` array for random rules. For
//! four-sided rules `N` is the table index (0-15); for eight-sided rules it
//! is the canonical `sides` value. Field names are shared with existing
//! saved files and must not change.
//!
//! Older files were written with colliding `type` discriminants (both
//! terrain kinds as 0, random as 1). New files use the distinct values from
//! [`RuleKind::discriminant`]; loading classifies legacy values by payload
//! shape.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use crate::rules::{
    EightSidedRule, FourSidedRule, RandomVariant, Rule, RuleIssue, RuleKind, SideBitmask, TileId,
    FOUR_SIDED_SLOT_SIDES,
};
use crate::sides;
use crate::AutotileError;

/// Loose mirror of the on-disk shape, before validation.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawRule {
    name: String,
    id: i32,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    output: Option<Vec<RandomVariant>>,
    #[serde(flatten)]
    slots: BTreeMap<String, SideBitmask>,
}

/// Parse a single rule document, rejecting files that fail validation.
///
/// Use [`parse_rules`](crate::config::parse_rules) instead when recoverable
/// problems should be repaired and reported rather than fatal.
pub fn parse_rule(json: &str) -> Result<Rule, AutotileError> {
    let raw: RawRule =
        serde_json::from_str(json).map_err(|e| AutotileError::ParseError(e.to_string()))?;
    let (rule, issues) = rule_from_raw(raw)?;

    if !issues.is_empty() {
        return Err(AutotileError::RuleSetIncomplete {
            rule: rule.name,
            problems: issues,
        });
    }

    Ok(rule)
}

/// Build a domain rule from the raw shape, collecting recoverable problems.
///
/// Missing four-sided slots are filled back to their canonical unassigned
/// defaults; slots that contradict the canonical table are skipped. The
/// caller decides whether the issues are warnings or a hard error.
pub(crate) fn rule_from_raw(raw: RawRule) -> Result<(Rule, Vec<RuleIssue>), AutotileError> {
    let mut issues = Vec::new();

    let mut slots: BTreeMap<usize, SideBitmask> = BTreeMap::new();
    for (key, slot) in &raw.slots {
        match key.strip_prefix("tile").and_then(|n| n.parse::<usize>().ok()) {
            Some(n) => {
                slots.insert(n, *slot);
            }
            None => issues.push(RuleIssue::MalformedSlotKey { key: key.clone() }),
        }
    }

    let kind = match classify(&raw, &slots)? {
        Classified::FourSided => {
            let mut rule = FourSidedRule::new();
            for (&n, slot) in &slots {
                match FOUR_SIDED_SLOT_SIDES.get(n) {
                    None => issues.push(RuleIssue::UnexpectedSlot { slot: n }),
                    Some(&expected) if slot.sides != expected => {
                        issues.push(RuleIssue::SlotSidesMismatch {
                            slot: n,
                            expected,
                            found: slot.sides,
                        });
                    }
                    Some(_) => rule.assign(slot.sides, slot.id),
                }
            }
            for n in 0..FOUR_SIDED_SLOT_SIDES.len() {
                if !slots.contains_key(&n) {
                    issues.push(RuleIssue::MissingSlot { slot: n });
                }
            }
            RuleKind::FourSided(rule)
        }
        Classified::EightSided => {
            let mut table: BTreeMap<u8, TileId> = BTreeMap::new();
            for (&n, slot) in &slots {
                if sides::canonical(slot.sides) != slot.sides {
                    issues.push(RuleIssue::NonCanonicalPattern { sides: slot.sides });
                    continue;
                }
                if n != slot.sides as usize {
                    issues.push(RuleIssue::SlotKeyMismatch {
                        key: n,
                        sides: slot.sides,
                    });
                }
                table.insert(slot.sides, slot.id);
            }
            RuleKind::EightSided(EightSidedRule::from_slots(table))
        }
        Classified::Random => {
            for &n in slots.keys() {
                issues.push(RuleIssue::UnexpectedSlot { slot: n });
            }
            let variants = raw.output.unwrap_or_default();
            if variants.is_empty() {
                issues.push(RuleIssue::MissingOutput);
            }
            RuleKind::Random(crate::rules::RandomRule::new(variants))
        }
    };

    Ok((
        Rule {
            name: raw.name,
            id: raw.id,
            kind,
        },
        issues,
    ))
}

enum Classified {
    FourSided,
    EightSided,
    Random,
}

/// Decide which kind a raw rule is, untangling the legacy discriminants.
fn classify(
    raw: &RawRule,
    slots: &BTreeMap<usize, SideBitmask>,
) -> Result<Classified, AutotileError> {
    match raw.kind {
        2 => Ok(Classified::Random),
        // Legacy files used 1 for random rules; new files use it for
        // eight-sided tables. A random payload has no slots.
        1 if raw.output.is_some() && slots.is_empty() => Ok(Classified::Random),
        1 => Ok(Classified::EightSided),
        // Legacy files used 0 for both terrain kinds. Slots that follow the
        // four-sided table convention mark a four-sided rule; anything else
        // is an eight-sided one.
        0 if slots.is_empty() || looks_four_sided(slots) => Ok(Classified::FourSided),
        0 => Ok(Classified::EightSided),
        other => Err(AutotileError::ParseError(format!(
            "unknown rule type {other}"
        ))),
    }
}

fn looks_four_sided(slots: &BTreeMap<usize, SideBitmask>) -> bool {
    slots
        .iter()
        .all(|(&n, slot)| FOUR_SIDED_SLOT_SIDES.get(n) == Some(&slot.sides))
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", &self.kind.discriminant())?;

        match &self.kind {
            RuleKind::FourSided(rule) => {
                for (index, slot) in rule.slots().iter().enumerate() {
                    map.serialize_entry(&format!("tile{index}"), slot)?;
                }
            }
            RuleKind::EightSided(rule) => {
                for (&sides, &id) in rule.slots() {
                    map.serialize_entry(&format!("tile{sides}"), &SideBitmask { sides, id })?;
                }
            }
            RuleKind::Random(rule) => {
                map.serialize_entry("output", rule.variants())?;
            }
        }

        map.end()
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRule::deserialize(deserializer)?;
        let (rule, issues) = rule_from_raw(raw).map_err(D::Error::custom)?;

        if let Some(first) = issues.first() {
            return Err(D::Error::custom(format!(
                "rule '{}' failed validation: {first}",
                rule.name
            )));
        }

        Ok(rule)
    }
}
