use crate::models::Person;

/// Ten full turns added to every resting rotation.
pub const EXTRA_TURNS_DEG: f64 = 3600.0;

pub fn segment_angle(count: usize) -> f64 {
    360.0 / count as f64
}

/// Position of `winner_id` among the wedges.
pub fn winner_index(eligible: &[Person], winner_id: i64) -> Option<usize> {
    eligible.iter().position(|p| p.id == winner_id)
}

/// Rotation in `(0, 360]` that brings the middle of wedge `index` under the
/// pointer at 12 o'clock.
pub fn target_angle(index: usize, count: usize) -> f64 {
    let seg = segment_angle(count);
    360.0 - (index as f64 * seg + seg / 2.0)
}

/// Resting rotation of the wheel once the draw for `winner_id` settles.
///
/// `eligible` must be the present persons in the same order as the wedges.
/// Returns `None` when the winner is not among them; callers keep the
/// current rotation in that case.
pub fn final_rotation(eligible: &[Person], winner_id: i64) -> Option<f64> {
    let index = winner_index(eligible, winner_id)?;
    Some(EXTRA_TURNS_DEG + target_angle(index, eligible.len()))
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_angle(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Wedge sitting under the pointer when the wheel is turned by `rotation`.
pub fn pointer_index(rotation: f64, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let seg = segment_angle(count);
    let under = normalize_angle(-rotation);
    Some(((under / seg) as usize).min(count - 1))
}
