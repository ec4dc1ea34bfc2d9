pub mod director;
pub mod pool;
pub mod result;
pub mod spawn;
pub mod template;

pub use director::{SpawnOrder, WaveDirector, WavePhase};
pub use pool::SpawnPool;
pub use result::WaveResult;
pub use spawn::{jitter_stats, sample_spawn_x};
pub use template::{EnemyTemplate, WaveBook, WaveTemplate};
