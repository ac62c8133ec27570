//! Registry bootstrap: match declared agent cards with model builders.

use std::sync::Arc;

use tracing::{info, warn};

use crate::card::AgentCard;
use crate::error::{AgentError, Result};
use crate::model::ChatModel;
use crate::registry::AgentRegistry;

/// Rebuild the registry from a list of cards.
///
/// The builder returns `None` for cards it does not recognize; any
/// unmatched card aborts initialization, as does an empty final
/// registry. The registry is cleared first, so a failed run leaves it
/// holding only the agents registered before the failure was detected.
pub fn initialize_agents<F>(
    registry: &AgentRegistry,
    cards: Vec<AgentCard>,
    build_model: F,
) -> Result<()>
where
    F: Fn(&AgentCard) -> Option<Arc<dyn ChatModel>>,
{
    registry.clear();

    let expected = cards.len();
    let mut unmatched = Vec::new();
    for card in cards {
        match build_model(&card) {
            Some(model) => registry.register(card, model),
            None => {
                warn!(agent = %card.name, "no model builder matched card");
                unmatched.push(card.name);
            }
        }
    }

    if !unmatched.is_empty() {
        return Err(AgentError::configuration(format!(
            "no model available for agents: {}",
            unmatched.join(", ")
        )));
    }
    if registry.is_empty() {
        return Err(AgentError::configuration(
            "no agents were registered during initialization",
        ));
    }

    info!(agents = registry.len(), expected, "agent registry initialized");
    Ok(())
}
