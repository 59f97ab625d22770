//! Limb angle computation from landmark positions.
//!
//! Angles are measured in image space, where `y` grows downward, so the
//! reference vertical `(0, 1)` points from the shoulder toward the floor.
//! An arm hanging at the side reads close to 0°, an arm held out
//! horizontally reads 90°, and an arm raised overhead approaches 180°.

use crate::constants::EPSILON;
use crate::{Error, Result};
use nalgebra::{SVector, Vector2, Vector3};

/// Angle of the limb `proximal → distal` relative to the image-space vertical.
///
/// Only the `x` and `y` components take part; depth estimates from monocular
/// pose models are too noisy to be useful here.
///
/// # Errors
///
/// Returns [`Error::DegenerateVector`] when the two points coincide in the
/// image plane or carry non-finite coordinates.
pub fn limb_angle_from_vertical(proximal: &Vector3<f64>, distal: &Vector3<f64>) -> Result<f64> {
    let limb = Vector2::new(distal.x - proximal.x, distal.y - proximal.y);
    let vertical = Vector2::new(0.0, 1.0);

    angle_between(&limb, &vertical)
}

/// Angle at `vertex` between the rays toward `a` and `b`, using all three axes.
///
/// # Errors
///
/// Returns [`Error::DegenerateVector`] when either ray has zero length.
pub fn joint_angle(vertex: &Vector3<f64>, a: &Vector3<f64>, b: &Vector3<f64>) -> Result<f64> {
    angle_between(&(a - vertex), &(b - vertex))
}

fn angle_between<const D: usize>(u: &SVector<f64, D>, v: &SVector<f64, D>) -> Result<f64> {
    let denom = u.norm() * v.norm();
    if !denom.is_finite() || denom < EPSILON {
        return Err(Error::DegenerateVector);
    }

    // Rounding can push the ratio a hair outside acos' domain
    let cos_angle = (u.dot(v) / denom).clamp(-1.0, 1.0);
    Ok(cos_angle.acos().to_degrees())
}
