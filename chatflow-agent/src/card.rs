//! Agent card metadata: the declarative description of an agent that
//! the registry serves to discovery callers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// One capability an agent advertises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSkill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Transport-level capabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    #[serde(default)]
    pub streaming: bool,
    #[serde(default = "default_true")]
    pub tools: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AgentCapabilities {
    fn default() -> Self {
        Self {
            streaming: false,
            tools: true,
        }
    }
}

/// Public identity of a registered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
    #[serde(default)]
    pub skills: Vec<AgentSkill>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AgentCard {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: String::new(),
            capabilities: AgentCapabilities::default(),
            skills: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_skill(mut self, skill: AgentSkill) -> Self {
        self.skills.push(skill);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Load agent cards from a JSON file holding a top-level array.
pub fn load_agent_cards(path: impl AsRef<Path>) -> Result<Vec<AgentCard>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|err| {
        AgentError::configuration(format!("cannot read agent cards from {}: {err}", path.display()))
    })?;
    let cards: Vec<AgentCard> = serde_json::from_str(&raw)?;
    if cards.is_empty() {
        return Err(AgentError::configuration(format!(
            "no agent cards defined in {}",
            path.display()
        )));
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_card_deserializes_with_defaults() {
        let card: AgentCard =
            serde_json::from_str(r#"{"name": "helper", "description": "helps"}"#).unwrap();
        assert_eq!(card.name, "helper");
        assert!(card.capabilities.tools);
        assert!(!card.capabilities.streaming);
        assert!(card.skills.is_empty());
    }

    #[test]
    fn test_load_agent_cards_from_file() {
        let path = std::env::temp_dir().join("chatflow-cards-test.json");
        std::fs::write(
            &path,
            r#"[{"name": "mechanic", "description": "fixes cars", "tags": ["auto"]}]"#,
        )
        .unwrap();

        let cards = load_agent_cards(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "mechanic");
        assert_eq!(cards[0].tags, vec!["auto".to_string()]);
    }

    #[test]
    fn test_missing_cards_file_is_a_configuration_error() {
        let err = load_agent_cards("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
    }

    #[test]
    fn test_builder_accumulates_skills_and_tags() {
        let card = AgentCard::new("helper", "helps")
            .with_version("1.0.0")
            .with_skill(AgentSkill {
                id: "diagnose".into(),
                name: "Diagnose".into(),
                description: "finds faults".into(),
            })
            .with_tag("automotive");
        assert_eq!(card.version, "1.0.0");
        assert_eq!(card.skills.len(), 1);
        assert_eq!(card.tags, vec!["automotive".to_string()]);
    }
}
