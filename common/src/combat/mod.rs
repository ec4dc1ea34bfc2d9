pub mod damage;
pub mod falloff;
pub mod knockback;
pub mod pierce;

pub use damage::{DamageOutcome, Vitals};
pub use falloff::{linear_falloff, range_falloff, splash_falloff};
pub use knockback::{directional_knockback, radial_knockback};
pub use pierce::{HitLedger, Pierce, PierceVerdict};
