//! Rule-set container and editor brush state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::persist::{self, RawRule};
use crate::rules::{Rule, RuleIssue};
use crate::AutotileError;

/// All autotile rules defined for a texture, in artist order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub rules: Vec<Rule>,
}

impl RuleConfig {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Get rule by ID
    pub fn get_rule(&self, id: i32) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Get mutable rule by ID
    pub fn get_rule_mut(&mut self, id: i32) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|r| r.id == id)
    }

    /// Remove rule by ID
    pub fn remove_rule(&mut self, id: i32) -> Option<Rule> {
        if let Some(pos) = self.rules.iter().position(|r| r.id == id) {
            Some(self.rules.remove(pos))
        } else {
            None
        }
    }

    /// Check every rule's table invariants plus id uniqueness across the set.
    pub fn validate(&self) -> Vec<RuleIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for rule in &self.rules {
            if !seen.insert(rule.id) {
                issues.push(RuleIssue::DuplicateRuleId { id: rule.id });
            }
            issues.extend(rule.validate());
        }

        issues
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    rules: Vec<RawRule>,
}

/// Load a rule config from a JSON file.
pub fn load_rules(path: &Path) -> Result<RuleConfig, AutotileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| AutotileError::IoError(e.to_string()))?;

    parse_rules(&content)
}

/// Parse a rule config, repairing and logging recoverable problems.
///
/// Incomplete rule tables are filled back to their canonical defaults so the
/// artist can finish them in the editor; every repair is logged as a warning.
/// Use [`parse_rule`](crate::persist::parse_rule) when a broken file should
/// be rejected instead.
pub fn parse_rules(json: &str) -> Result<RuleConfig, AutotileError> {
    let raw: RawConfig =
        serde_json::from_str(json).map_err(|e| AutotileError::ParseError(e.to_string()))?;

    let mut config = RuleConfig::new();
    let mut seen = HashSet::new();

    for raw_rule in raw.rules {
        let (rule, issues) = persist::rule_from_raw(raw_rule)?;
        for issue in &issues {
            log::warn!("rule '{}' ({}): {issue}", rule.name, rule.id);
        }
        if !seen.insert(rule.id) {
            log::warn!("duplicate rule id {}", rule.id);
        }
        config.add_rule(rule);
    }

    Ok(config)
}

/// Save a rule config to a JSON file.
pub fn save_rules(config: &RuleConfig, path: &Path) -> Result<(), AutotileError> {
    let content =
        serde_json::to_string(config).map_err(|e| AutotileError::ParseError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| AutotileError::IoError(e.to_string()))?;

    Ok(())
}

/// Rule painting state for the editor shell.
#[derive(Debug, Clone, Default)]
pub struct RuleBrush {
    /// Currently selected rule id
    pub selected_rule: Option<i32>,
    /// Whether rule painting mode is active
    pub active: bool,
}

impl RuleBrush {
    pub fn new() -> Self {
        Self {
            selected_rule: None,
            active: false,
        }
    }

    pub fn select(&mut self, rule_id: i32) {
        self.selected_rule = Some(rule_id);
        self.active = true;
    }

    pub fn deselect(&mut self) {
        self.selected_rule = None;
        self.active = false;
    }
}
