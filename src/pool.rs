//! Shared lifecycle for pooled gameplay entities.
//!
//! Bullets, enemies, coins and power-ups are flagged inactive the moment they
//! die (so later checks in the same frame skip them) and are despawned by
//! [`sweep_inactive`] once the frame's collision pass has finished.

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;

/// A component whose entity can be retired mid-frame.
pub trait Pooled: Component {
    fn is_active(&self) -> bool;
}

/// Despawn every entity whose `T` component has been deactivated.
pub fn sweep_inactive<T: Pooled>(mut commands: Commands, query: Query<(Entity, &T)>) {
    for (entity, item) in query.iter() {
        if !item.is_active() {
            commands.entity(entity).despawn();
        }
    }
}

/// Despawn every entity matched by `query`, active or not.
///
/// Used when a chapter begins.
pub fn despawn_all<F: QueryFilter>(commands: &mut Commands, query: &Query<Entity, F>) {
    for entity in query.iter() {
        commands.entity(entity).despawn();
    }
}
