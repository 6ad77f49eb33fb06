//! Diff computation between declared and recorded resources

use crate::schema::{Config, Schema};
use crate::state::StateRecord;
use crate::types::Value;
use serde::{Deserialize, Serialize};

/// Why a resource has to be replaced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplaceReason {
    /// The previous create only partially succeeded
    Tainted,
    /// Create-only fields changed
    ForceNew(Vec<String>),
}

/// What applying a planned change will do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    NoChange,
    Create,
    Update { fields: Vec<String> },
    Replace { reason: ReplaceReason },
    Delete,
}

impl Action {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Short verb for display
    pub fn verb(&self) -> &'static str {
        match self {
            Self::NoChange => "unchanged",
            Self::Create => "create",
            Self::Update { .. } => "update",
            Self::Replace { .. } => "replace",
            Self::Delete => "delete",
        }
    }
}

/// A changed field with its recorded and desired values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDiff {
    pub field: String,
    pub from: Option<Value>,
    pub to: Option<Value>,
    pub force_new: bool,
}

/// Declared fields whose desired value differs from the recorded one
pub fn changed_fields(schema: &Schema, config: &Config, prior: &StateRecord) -> Vec<FieldDiff> {
    schema
        .declared_fields()
        .filter_map(|field| {
            let to = config.get(field.name);
            let from = prior.attributes.get(field.name);
            (to != from).then(|| FieldDiff {
                field: field.name.to_string(),
                from: from.cloned(),
                to: to.cloned(),
                force_new: field.force_new,
            })
        })
        .collect()
}

/// Classify the change needed to bring `prior` to `config`
pub fn classify(schema: &Schema, config: Option<&Config>, prior: Option<&StateRecord>) -> Action {
    match (config, prior) {
        (None, None) => Action::NoChange,
        (None, Some(_)) => Action::Delete,
        (Some(_), None) => Action::Create,
        (Some(_), Some(prior)) if prior.tainted => Action::Replace {
            reason: ReplaceReason::Tainted,
        },
        (Some(config), Some(prior)) => {
            let diffs = changed_fields(schema, config, prior);
            let force_new: Vec<String> = diffs
                .iter()
                .filter(|d| d.force_new)
                .map(|d| d.field.clone())
                .collect();
            if !force_new.is_empty() {
                Action::Replace {
                    reason: ReplaceReason::ForceNew(force_new),
                }
            } else if diffs.is_empty() {
                Action::NoChange
            } else {
                Action::Update {
                    fields: diffs.into_iter().map(|d| d.field).collect(),
                }
            }
        }
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    pub additions: usize,
    pub modifications: usize,
    pub replacements: usize,
    pub removals: usize,
}

impl DiffSummary {
    /// Create a summary from a list of actions
    pub fn from_actions<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        let mut summary = Self::default();
        for action in actions {
            match action {
                Action::NoChange => {}
                Action::Create => summary.additions += 1,
                Action::Update { .. } => summary.modifications += 1,
                Action::Replace { .. } => summary.replacements += 1,
                Action::Delete => summary.removals += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.modifications + self.replacements + self.removals
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use crate::types::FieldKind;
    use std::collections::BTreeMap;

    fn schema() -> Schema {
        Schema::new(
            "widget",
            vec![
                FieldSchema::required("name", FieldKind::String),
                FieldSchema::required("parent", FieldKind::Int).force_new(),
                FieldSchema::computed("status", FieldKind::String),
            ],
        )
    }

    fn config(name: &str, parent: i64) -> Config {
        let mut config = Config::new();
        config.insert("name".to_string(), Value::from(name));
        config.insert("parent".to_string(), Value::from(parent));
        config
    }

    fn prior(name: &str, parent: i64) -> StateRecord {
        let mut attributes: BTreeMap<String, Value> = config(name, parent).into_iter().collect();
        attributes.insert("status".to_string(), Value::from("active"));
        StateRecord {
            kind: "widget".to_string(),
            name: "w".to_string(),
            id: "1".to_string(),
            tainted: false,
            attributes,
        }
    }

    #[test]
    fn test_classify_create_and_delete() {
        let schema = schema();
        assert_eq!(classify(&schema, Some(&config("a", 1)), None), Action::Create);
        assert_eq!(classify(&schema, None, Some(&prior("a", 1))), Action::Delete);
    }

    #[test]
    fn test_classify_no_change_ignores_computed() {
        let schema = schema();
        let action = classify(&schema, Some(&config("a", 1)), Some(&prior("a", 1)));
        assert_eq!(action, Action::NoChange);
    }

    #[test]
    fn test_classify_update() {
        let schema = schema();
        let action = classify(&schema, Some(&config("b", 1)), Some(&prior("a", 1)));
        assert_eq!(
            action,
            Action::Update {
                fields: vec!["name".to_string()]
            }
        );
    }

    #[test]
    fn test_classify_force_new_wins() {
        let schema = schema();
        let action = classify(&schema, Some(&config("b", 2)), Some(&prior("a", 1)));
        assert_eq!(
            action,
            Action::Replace {
                reason: ReplaceReason::ForceNew(vec!["parent".to_string()])
            }
        );
    }

    #[test]
    fn test_classify_tainted() {
        let schema = schema();
        let mut tainted = prior("a", 1);
        tainted.tainted = true;
        let action = classify(&schema, Some(&config("a", 1)), Some(&tainted));
        assert_eq!(
            action,
            Action::Replace {
                reason: ReplaceReason::Tainted
            }
        );
    }

    #[test]
    fn test_diff_summary() {
        let actions = [
            Action::Create,
            Action::NoChange,
            Action::Delete,
            Action::Update { fields: vec![] },
        ];
        let summary = DiffSummary::from_actions(&actions);
        assert_eq!(summary.total(), 3);
        assert!(summary.has_changes());
    }
}
