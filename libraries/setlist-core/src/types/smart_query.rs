//! Smart playlist query descriptor
//!
//! A smart playlist stores one of these instead of a track list. Membership is
//! computed by evaluating it against the catalog every time the playlist is
//! read.

use crate::error::{Result, SetlistError};
use serde::{Deserialize, Serialize};

/// Catalog field a rule matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleField {
    Title,
    Artist,
    Album,
    Genre,
    Year,
    /// Track length in whole seconds
    Duration,
}

impl RuleField {
    /// Whether the field holds numbers rather than text
    pub fn is_numeric(self) -> bool {
        matches!(self, RuleField::Year | RuleField::Duration)
    }

    /// Stable name used in error messages and JSON
    pub fn as_str(self) -> &'static str {
        match self {
            RuleField::Title => "title",
            RuleField::Artist => "artist",
            RuleField::Album => "album",
            RuleField::Genre => "genre",
            RuleField::Year => "year",
            RuleField::Duration => "duration",
        }
    }
}

/// Comparison applied by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    Is,
    IsNot,
    Contains,
    NotContains,
    StartsWith,
    GreaterThan,
    LessThan,
}

impl RuleOperator {
    fn applies_to_text(self) -> bool {
        !matches!(self, RuleOperator::GreaterThan | RuleOperator::LessThan)
    }

    fn applies_to_numbers(self) -> bool {
        matches!(
            self,
            RuleOperator::Is | RuleOperator::IsNot | RuleOperator::GreaterThan | RuleOperator::LessThan
        )
    }
}

/// Right-hand side of a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(i64),
    Text(String),
}

/// A single `field operator value` condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartRule {
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: RuleValue,
}

impl SmartRule {
    /// Convenience constructor
    pub fn new(field: RuleField, operator: RuleOperator, value: RuleValue) -> Self {
        Self {
            field,
            operator,
            value,
        }
    }

    fn validate(&self) -> Result<()> {
        let field = self.field.as_str();
        match (&self.value, self.field.is_numeric()) {
            (RuleValue::Number(_), true) if self.operator.applies_to_numbers() => Ok(()),
            (RuleValue::Text(_), false) if self.operator.applies_to_text() => Ok(()),
            (RuleValue::Number(_), false) | (RuleValue::Text(_), true) => Err(
                SetlistError::invalid_operation(format!("rule on '{field}' has a value of the wrong type")),
            ),
            _ => Err(SetlistError::invalid_operation(format!(
                "operator {:?} cannot be applied to '{field}'",
                self.operator
            ))),
        }
    }
}

/// How rules combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every rule must match
    #[default]
    All,
    /// At least one rule must match
    Any,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Result ordering for a smart playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: RuleField,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Stored query that defines a smart playlist's membership
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartQuery {
    #[serde(default)]
    pub match_mode: MatchMode,
    pub rules: Vec<SmartRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SmartQuery {
    /// Query matching when every rule matches, unsorted and unlimited
    pub fn all(rules: Vec<SmartRule>) -> Self {
        Self {
            match_mode: MatchMode::All,
            rules,
            sort: None,
            limit: None,
        }
    }

    /// Check that the descriptor can be evaluated
    ///
    /// Rejects an empty rule list, a zero limit, and any rule whose operator or
    /// value type does not fit its field.
    pub fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(SetlistError::invalid_operation(
                "a smart playlist needs at least one rule",
            ));
        }
        if self.limit == Some(0) {
            return Err(SetlistError::invalid_operation(
                "smart playlist limit must be positive",
            ));
        }
        self.rules.iter().try_for_each(SmartRule::validate)
    }
}
