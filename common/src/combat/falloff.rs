// Linear damage falloff across a band: full damage up to `min`, nothing from `max` on.
// The same law serves travel-distance falloff for bullets and radius falloff for splash.
#[must_use]
pub fn linear_falloff(total: f32, distance: f32, min: f32, max: f32) -> f32 {
    if distance <= min {
        return total;
    }
    if distance >= max || max <= min {
        return 0.0;
    }
    (total * (1.0 - (distance - min) / (max - min))).max(0.0)
}

#[must_use]
pub fn range_falloff(total_damage: f32, traveled: f32, min_range: f32, max_range: f32) -> f32 {
    linear_falloff(total_damage, traveled, min_range, max_range)
}

#[must_use]
pub fn splash_falloff(total_damage: f32, distance_from_center: f32, min_radius: f32, max_radius: f32) -> f32 {
    linear_falloff(total_damage, distance_from_center, min_radius, max_radius)
}
