pub mod blast;
pub mod bullet;
pub mod burn;
pub mod charge;

pub use blast::Blast;
pub use bullet::{Bullet, BulletState, BulletStrike};
pub use burn::BurnZone;
pub use charge::{Charge, ChargeState, Detonation};
