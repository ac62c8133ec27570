//! Concurrent agent registry with forgiving name lookup.
//!
//! Names resolve exactly first, then through a normalized form that
//! folds Latin diacritics, case and punctuation, so "São Paulo" and
//! "sao paulo" address the same agent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chatflow_core::prelude::{Message, RunConfig, last_assistant_message};
use tracing::{debug, info, warn};

use crate::card::AgentCard;
use crate::model::ChatModel;
use crate::tool_loop::run_tool_loop;

/// One registered agent: its public card plus the model that serves it.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub card: AgentCard,
    pub model: Arc<dyn ChatModel>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    by_name: HashMap<String, RegistryEntry>,
    // normalized form -> exact key in by_name
    by_normalized: HashMap<String, String>,
}

/// Shared, mutation-safe catalog of agents.
///
/// One mutex guards both maps so the exact and normalized views can
/// never disagree. The lock is never held across an await: `invoke`
/// clones the model handle out before running the conversation.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    inner: Mutex<RegistryInner>,
}

/// Fold an agent name to its lookup form: strip Latin diacritics,
/// lowercase, keep alphanumerics and spaces, collapse runs of spaces.
pub fn normalize_name(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for ch in name.chars() {
        match fold_diacritic(ch) {
            Some(base) => folded.push_str(base),
            None => folded.push(ch),
        }
    }

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;
    for ch in folded.to_lowercase().chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else if ch.is_whitespace() {
            pending_space = true;
        }
    }
    out
}

/// Map a precomposed Latin letter to its unaccented base.
fn fold_diacritic(ch: char) -> Option<&'static str> {
    Some(match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'é' | 'è' | 'ê' | 'ë' => "e",
        'É' | 'È' | 'Ê' | 'Ë' => "E",
        'í' | 'ì' | 'î' | 'ï' => "i",
        'Í' | 'Ì' | 'Î' | 'Ï' => "I",
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => "o",
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => "O",
        'ú' | 'ù' | 'û' | 'ü' => "u",
        'Ú' | 'Ù' | 'Û' | 'Ü' => "U",
        'ç' => "c",
        'Ç' => "C",
        'ñ' => "n",
        'Ñ' => "N",
        'ý' | 'ÿ' => "y",
        'Ý' => "Y",
        'æ' => "ae",
        'Æ' => "AE",
        'œ' => "oe",
        'Œ' => "OE",
        'ß' => "ss",
        'ø' => "o",
        'Ø' => "O",
        _ => return None,
    })
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under its card name. A later registration with
    /// the same (or same-normalized) name replaces the earlier one.
    pub fn register(&self, card: AgentCard, model: Arc<dyn ChatModel>) {
        let exact = card.name.clone();
        let normalized = normalize_name(&exact);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = inner.by_normalized.insert(normalized.clone(), exact.clone())
            && previous != exact
        {
            debug!(agent = %exact, replaced = %previous, "normalized name collision");
            inner.by_name.remove(&previous);
        }
        inner.by_name.insert(exact.clone(), RegistryEntry { card, model });
        info!(agent = %exact, normalized = %normalized, "agent registered");
    }

    fn resolve(&self, inner: &RegistryInner, name: &str) -> Option<RegistryEntry> {
        if let Some(entry) = inner.by_name.get(name) {
            return Some(entry.clone());
        }
        let normalized = normalize_name(name);
        let exact = inner.by_normalized.get(&normalized)?;
        inner.by_name.get(exact).cloned()
    }

    pub fn get_card(&self, name: &str) -> Option<AgentCard> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.resolve(&inner, name).map(|entry| entry.card)
    }

    pub fn get_model(&self, name: &str) -> Option<Arc<dyn ChatModel>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        self.resolve(&inner, name).map(|entry| entry.model)
    }

    /// Snapshot of every registered card, one per agent.
    pub fn list_cards(&self) -> Vec<AgentCard> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut cards: Vec<AgentCard> =
            inner.by_name.values().map(|entry| entry.card.clone()).collect();
        cards.sort_by(|a, b| a.name.cmp(&b.name));
        cards
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.by_name.clear();
        inner.by_normalized.clear();
    }

    /// Run one query against the named agent's own model and tools.
    ///
    /// Misses and failures come back as plain text: delegation is a
    /// best-effort conversation, not a fallible API.
    pub async fn invoke(&self, name: &str, query: &str) -> String {
        let model = {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            self.resolve(&inner, name).map(|entry| entry.model)
        };
        let Some(model) = model else {
            warn!(agent = %name, "delegation target not found");
            return format!("Agent '{name}' not found.");
        };

        let history = vec![Message::human(query)];
        let outcome = run_tool_loop(
            model.as_ref(),
            history,
            RunConfig::default().max_tool_iterations,
            None,
        )
        .await;

        if let Some(text) = outcome.final_text {
            return text;
        }
        if let Some(reply) = last_assistant_message(&outcome.messages)
            .filter(|m| !m.content.trim().is_empty())
        {
            return reply.content.clone();
        }
        outcome
            .error
            .unwrap_or_else(|| format!("Agent '{name}' produced no response."))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chatflow_core::prelude::ToolCall;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::ScriptedModel;

    fn register(registry: &AgentRegistry, name: &str) -> Arc<ScriptedModel> {
        let model = Arc::new(ScriptedModel::new().reply(Message::assistant("hello from agent")));
        registry.register(AgentCard::new(name, "test agent"), model.clone());
        model
    }

    #[test]
    fn test_normalize_folds_diacritics_case_and_punctuation() {
        assert_eq!(normalize_name("São Paulo"), "sao paulo");
        assert_eq!(normalize_name("  Crème   Brûlée! "), "creme brulee");
        assert_eq!(normalize_name("Agent-42"), "agent42");
    }

    #[test]
    fn test_lookup_by_exact_and_normalized_name() {
        let registry = AgentRegistry::new();
        register(&registry, "São Paulo");

        assert!(registry.get_card("São Paulo").is_some());
        assert!(registry.get_card("sao paulo").is_some());
        assert!(registry.get_model("SÃO PAULO").is_some());
        assert!(registry.get_model("SAO   PAULO").is_some());
        assert!(registry.get_card("rio").is_none());
    }

    #[test]
    fn test_reregistration_replaces_previous_entry() {
        let registry = AgentRegistry::new();
        register(&registry, "Helper");
        let second = Arc::new(ScriptedModel::new());
        registry.register(
            AgentCard::new("helper", "replacement"),
            second,
        );

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_card("HELPER").unwrap().description, "replacement");
    }

    #[test]
    fn test_list_cards_is_deduplicated_and_sorted() {
        let registry = AgentRegistry::new();
        register(&registry, "beta");
        register(&registry, "alpha");

        let names: Vec<String> = registry.list_cards().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[tokio::test]
    async fn test_invoke_unknown_agent_returns_plain_text() {
        let registry = AgentRegistry::new();
        let reply = registry.invoke("ghost", "anyone there?").await;
        assert_eq!(reply, "Agent 'ghost' not found.");
    }

    #[tokio::test]
    async fn test_invoke_returns_final_text() {
        let registry = AgentRegistry::new();
        register(&registry, "Helper");

        let reply = registry.invoke("helper", "hi").await;
        assert_eq!(reply, "hello from agent");
    }

    #[tokio::test]
    async fn test_invoke_falls_back_to_last_assistant_message() {
        let registry = AgentRegistry::new();
        let call = ToolCall::new("missing", serde_json::json!({}));
        let model = Arc::new(
            ScriptedModel::new()
                .repeating(Message::assistant_with_calls("partial thought", vec![call])),
        );
        registry.register(AgentCard::new("looper", "never finishes"), model);

        let reply = registry.invoke("looper", "hi").await;
        assert_eq!(reply, "partial thought");
    }
}
