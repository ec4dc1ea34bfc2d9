use bevy_ecs::prelude::*;
use bevy_tasks::Task;
use rand::{SeedableRng, rngs::StdRng};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel};

use common::{
    collision::Obstacle,
    constants::{GROUND_Y, MAP_HEIGHT, MAP_WIDTH, WORLD_MARGIN},
    geometry::Aabb,
    protocol::{DetonationFrame, NetId, PeerSnapshot, SwingFrame, WaveResultFrame},
};

use crate::{
    constants::GUEST_ID_BASE,
    enemies::EnemyKind,
    waves::{WaveBook, WaveDirector, WaveResult},
};

// ============================================================================
// World
// ============================================================================

// Static level geometry, generated once at startup.
#[derive(Resource, Debug, Clone)]
pub struct MapLayout {
    pub width: f32,
    pub height: f32,
    pub obstacles: Vec<Obstacle>,
}

impl MapLayout {
    // Flat arena: a floor plus a wall at each end.
    #[must_use]
    pub fn arena(width: f32, height: f32) -> Self {
        let floor = Aabb::new(-WORLD_MARGIN, GROUND_Y, width + 2.0 * WORLD_MARGIN, height - GROUND_Y + WORLD_MARGIN);
        let left_wall = Aabb::new(-WORLD_MARGIN, -WORLD_MARGIN, WORLD_MARGIN, GROUND_Y + WORLD_MARGIN);
        let right_wall = Aabb::new(width, -WORLD_MARGIN, WORLD_MARGIN, GROUND_Y + WORLD_MARGIN);
        let obstacles = [floor, left_wall, right_wall].into_iter().map(Obstacle::fixed).collect();
        Self {
            width,
            height,
            obstacles,
        }
    }

    // Projectiles past the map extents plus the margin are gone.
    #[must_use]
    pub fn in_bounds(&self, rect: &Aabb) -> bool {
        rect.right() > -WORLD_MARGIN
            && rect.left() < self.width + WORLD_MARGIN
            && rect.bottom() > -WORLD_MARGIN
            && rect.top() < self.height + WORLD_MARGIN
    }
}

impl Default for MapLayout {
    fn default() -> Self {
        Self::arena(MAP_WIDTH, MAP_HEIGHT)
    }
}

// Single source of randomness for the simulation.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickCount(pub u64);

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SimSettings {
    pub players: u8,
    pub autopilot: bool,
    pub wave_limit: Option<u32>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            players: 1,
            autopilot: false,
            wave_limit: None,
        }
    }
}

// ============================================================================
// Entity Registries
// ============================================================================

#[derive(Resource, Debug)]
pub struct NetIds {
    next: u32,
}

impl NetIds {
    #[must_use]
    pub const fn for_role(role: PeerRole) -> Self {
        Self {
            next: match role {
                PeerRole::Guest => GUEST_ID_BASE,
                PeerRole::Solo | PeerRole::Host => 1,
            },
        }
    }

    pub const fn allocate(&mut self) -> NetId {
        let id = NetId(self.next);
        self.next += 1;
        id
    }
}

impl Default for NetIds {
    fn default() -> Self {
        Self::for_role(PeerRole::Solo)
    }
}

#[derive(Resource, Default)]
pub struct PlayerMap(pub HashMap<NetId, Entity>);

#[derive(Resource, Default)]
pub struct EnemyMap(pub HashMap<NetId, Entity>);

// Live bullets by id. `peer` marks the ids owned by the other peer; an id is mapped as
// soon as its spawn is queued. `retired` remembers mirrored bullets this peer already ended
// so a stale snapshot does not bring them back.
#[derive(Resource, Default)]
pub struct BulletMap {
    pub entities: HashMap<NetId, Entity>,
    pub peer: HashSet<NetId>,
    pub retired: HashSet<NetId>,
}

impl BulletMap {
    #[must_use]
    pub fn mirrored(&self) -> HashMap<NetId, Entity> {
        self.entities
            .iter()
            .filter(|(id, _)| self.peer.contains(id))
            .map(|(id, entity)| (*id, *entity))
            .collect()
    }

    pub fn remove(&mut self, id: NetId) {
        self.entities.remove(&id);
        self.peer.remove(&id);
    }
}

// ============================================================================
// Waves
// ============================================================================

// Something that loads the art and sound for enemy types before a wave uses them.
pub trait AssetProvider: Send + Sync {
    fn preload(&self, kinds: &[EnemyKind]) -> anyhow::Result<()>;
}

// Nothing to load when running without a window.
pub struct HeadlessAssets;

impl AssetProvider for HeadlessAssets {
    fn preload(&self, _kinds: &[EnemyKind]) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Resource, Clone)]
pub struct EnemyAssets(pub Arc<dyn AssetProvider>);

impl Default for EnemyAssets {
    fn default() -> Self {
        Self(Arc::new(HeadlessAssets))
    }
}

#[derive(Resource, Default)]
pub struct WaveProgress {
    pub book: WaveBook,
    pub current: Option<WaveDirector>,
    pub next_index: u32,
    pub preload: Option<Task<anyhow::Result<()>>>,
    pub history: Vec<[WaveResult; 2]>,
    pub outbox: Vec<WaveResultFrame>, // host: results not yet sent to the guest
    pub received: Vec<WaveResultFrame>, // guest: results the host sent
    pub run_over: bool,
}

impl WaveProgress {
    #[must_use]
    pub fn with_book(book: WaveBook) -> Self {
        Self {
            book,
            ..Self::default()
        }
    }
}

// ============================================================================
// Peer Link
// ============================================================================

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerRole {
    #[default]
    Solo,
    Host,
    Guest,
}

impl PeerRole {
    // The host (or a solo game) owns enemies and waves.
    #[must_use]
    pub const fn is_authority(self) -> bool {
        !matches!(self, Self::Guest)
    }
}

// Encoded snapshots to and from the other peer. Whatever moves the bytes over the wire
// sits on the far side of these channels.
#[derive(Resource)]
pub struct PeerLink {
    outgoing: UnboundedSender<Vec<u8>>,
    incoming: UnboundedReceiver<Vec<u8>>,
}

impl PeerLink {
    #[must_use]
    pub const fn new(outgoing: UnboundedSender<Vec<u8>>, incoming: UnboundedReceiver<Vec<u8>>) -> Self {
        Self { outgoing, incoming }
    }

    // Two links wired back to back, for running both peers in one process.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let (to_b, from_a) = unbounded_channel();
        let (to_a, from_b) = unbounded_channel();
        (Self::new(to_b, from_b), Self::new(to_a, from_a))
    }

    pub fn send(&self, bytes: Vec<u8>) -> bool {
        self.outgoing.send(bytes).is_ok()
    }

    pub fn try_recv(&mut self) -> Result<Vec<u8>, TryRecvError> {
        self.incoming.try_recv()
    }
}

// Snapshots decoded this tick, applied by the mirror systems.
#[derive(Resource, Default)]
pub struct PeerInbox(pub Vec<PeerSnapshot>);

// Guest attacks waiting for the next snapshot; the host resolves them.
#[derive(Resource, Default)]
pub struct PeerOutbox {
    pub swings: Vec<SwingFrame>,
    pub detonations: Vec<DetonationFrame>,
}
