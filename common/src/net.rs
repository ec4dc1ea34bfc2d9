use bevy_ecs::entity::Entity;
use std::collections::{HashMap, HashSet};

use crate::{combat::Vitals, protocol::NetId};

// ============================================================================
// Id-Based Reconciliation
// ============================================================================

// What to do with an incoming list of frames against the locally known entities.
// Last writer wins per field: no ordering or acknowledgement is assumed, and the caller
// does not need to know which peer authored the frames.
#[derive(Debug)]
pub struct ReconcilePlan<'a, T> {
    // Known id: overwrite the local entity's fields.
    pub update: Vec<(Entity, &'a T)>,
    // Unknown id: construct a fresh mirrored entity.
    pub spawn: Vec<&'a T>,
    // Known locally but absent from the incoming list (and allowed to be dropped).
    pub despawn: Vec<(NetId, Entity)>,
}

pub fn plan_reconcile<'a, T>(
    local: &HashMap<NetId, Entity>,
    incoming: &'a [T],
    id_of: impl Fn(&T) -> NetId,
    may_despawn: impl Fn(NetId) -> bool,
) -> ReconcilePlan<'a, T> {
    let mut update = Vec::new();
    let mut spawn = Vec::new();
    let mut seen = HashSet::with_capacity(incoming.len());

    for frame in incoming {
        let id = id_of(frame);
        seen.insert(id);
        match local.get(&id) {
            Some(entity) => update.push((*entity, frame)),
            None => spawn.push(frame),
        }
    }

    let mut despawn: Vec<(NetId, Entity)> = local
        .iter()
        .filter(|(id, _)| !seen.contains(id) && may_despawn(**id))
        .map(|(id, entity)| (*id, *entity))
        .collect();
    despawn.sort_by_key(|(id, _)| *id);

    ReconcilePlan { update, spawn, despawn }
}

// Bring a mirrored health pool to the authoritative value through the damage/heal path so
// death bookkeeping runs exactly as it would for local damage.
pub fn sync_health(vitals: &mut Vitals, authoritative: f32, dying: bool) {
    let delta = authoritative - vitals.health;
    if delta < 0.0 {
        vitals.apply_damage(-delta, None, false);
    } else if delta > 0.0 {
        vitals.heal(delta);
    }
    if dying && !vitals.dying {
        vitals.apply_damage(vitals.max_health, None, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn plan_splits_update_spawn_and_despawn() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let local: HashMap<NetId, Entity> = [(NetId(1), a), (NetId(2), b)].into_iter().collect();
        let incoming = [NetId(2), NetId(3)];

        let plan = plan_reconcile(&local, &incoming, |id| *id, |_| true);

        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0].0, b);
        assert_eq!(plan.spawn, vec![&NetId(3)]);
        assert_eq!(plan.despawn, vec![(NetId(1), a)]);
    }

    #[test]
    fn plan_keeps_entities_the_filter_protects() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let local: HashMap<NetId, Entity> = [(NetId(1), a)].into_iter().collect();
        let incoming: [NetId; 0] = [];
        let plan = plan_reconcile(&local, &incoming, |id| *id, |_| false);
        assert!(plan.despawn.is_empty());
    }

    #[test]
    fn health_sync_goes_through_damage_path() {
        let mut v = Vitals::new(100.0, 2.0);
        sync_health(&mut v, 60.0, false);
        assert_eq!(v.health, 60.0);
        sync_health(&mut v, 80.0, false);
        assert_eq!(v.health, 80.0);
        sync_health(&mut v, 0.0, true);
        assert!(v.dying);
        assert_eq!(v.killer, None);
    }
}
