use labyrinth_common::{Aabb, ObjectId, ObjectKind};

use crate::world::World;

/// Result of testing the player against every trigger volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    None,
    /// Coins removed from the world this tick, in id order.
    Collected(Vec<ObjectId>),
    Won { endpoint: ObjectId },
    Lost { trap: ObjectId },
}

impl TriggerOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won { .. } | Self::Lost { .. })
    }
}

/// Classify the triggers overlapping `player` and apply their effect.
///
/// Precedence is Trap, then Endpoint, then Coin. A terminal outcome leaves
/// every coin in place; otherwise each overlapped coin is despawned.
pub fn resolve_triggers(player: &Aabb, world: &mut World) -> TriggerOutcome {
    let mut trap = None;
    let mut endpoint = None;
    let mut coins = Vec::new();

    for id in world.overlapping(player) {
        let Some(object) = world.get(id) else { continue };
        match object.kind {
            ObjectKind::Trap => {
                trap.get_or_insert(id);
            }
            ObjectKind::Endpoint => {
                endpoint.get_or_insert(id);
            }
            ObjectKind::Coin => coins.push(id),
            ObjectKind::Wall | ObjectKind::Plain => {}
        }
    }

    if let Some(trap) = trap {
        tracing::debug!(%trap, "trap touched");
        return TriggerOutcome::Lost { trap };
    }
    if let Some(endpoint) = endpoint {
        tracing::debug!(%endpoint, "endpoint reached");
        return TriggerOutcome::Won { endpoint };
    }
    if coins.is_empty() {
        return TriggerOutcome::None;
    }
    for id in &coins {
        world.despawn(*id);
    }
    tracing::debug!(count = coins.len(), "coins collected");
    TriggerOutcome::Collected(coins)
}
