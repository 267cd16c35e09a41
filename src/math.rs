//! Vector and rotation algebra for the flight model.
//!
//! Total helpers over `DVec3`/`DQuat`: degenerate input (zero-length
//! vectors, zero axes, non-finite quaternions) yields a neutral value instead
//! of panicking, because those cases come up routinely in normal play.

use bevy::math::{DQuat, DVec3};

/// Local forward axis of the ship and camera.
pub const FORWARD: DVec3 = DVec3::Z;
/// Local up axis.
pub const UP: DVec3 = DVec3::Y;
/// Local right axis.
pub const RIGHT: DVec3 = DVec3::X;

/// Below this length a vector is treated as zero.
const ZERO_EPSILON: f64 = 1e-12;

/// Unit vector in the direction of `v`, or the zero vector if `v` has no
/// usable direction.
pub fn normalize(v: DVec3) -> DVec3 {
    let len = v.length();
    if !len.is_finite() || len < ZERO_EPSILON {
        DVec3::ZERO
    } else {
        v / len
    }
}

/// Rotation of `angle_rad` about `axis`. The axis need not be unit length;
/// a zero axis gives the identity rotation.
pub fn quat_from_axis_angle(axis: DVec3, angle_rad: f64) -> DQuat {
    let axis = normalize(axis);
    if axis == DVec3::ZERO || !angle_rad.is_finite() {
        return DQuat::IDENTITY;
    }
    let (s, c) = (angle_rad * 0.5).sin_cos();
    DQuat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c)
}

/// Hamilton product `a·b`. Applied to a vector, `b` acts first.
pub fn quat_multiply(a: DQuat, b: DQuat) -> DQuat {
    DQuat::from_xyzw(
        a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
        a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
        a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
    )
}

/// Conjugate; the inverse of a unit quaternion.
pub fn quat_conjugate(q: DQuat) -> DQuat {
    DQuat::from_xyzw(-q.x, -q.y, -q.z, q.w)
}

/// Rescale to unit length. Falls back to identity when `q` is zero or not finite.
pub fn quat_normalize(q: DQuat) -> DQuat {
    let len = (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt();
    if !len.is_finite() || len < ZERO_EPSILON {
        return DQuat::IDENTITY;
    }
    DQuat::from_xyzw(q.x / len, q.y / len, q.z / len, q.w / len)
}

/// Rotate `v` by `q`: `q·v·q⁻¹`.
pub fn rotate_vec(v: DVec3, q: DQuat) -> DVec3 {
    let p = DQuat::from_xyzw(v.x, v.y, v.z, 0.0);
    let r = quat_multiply(quat_multiply(q, p), quat_conjugate(q));
    DVec3::new(r.x, r.y, r.z)
}

/// Compose a local-frame rotation onto `orientation` and renormalize.
pub fn compose_local(orientation: DQuat, delta: DQuat) -> DQuat {
    quat_normalize(quat_multiply(orientation, delta))
}

/// Orientation whose forward axis points along `dir`, keeping `up` as close
/// to the local up axis as possible.
pub fn look_rotation(dir: DVec3, up: DVec3) -> DQuat {
    let forward = normalize(dir);
    if forward == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let mut right = normalize(up.cross(forward));
    if right == DVec3::ZERO {
        // `up` is parallel to `dir`; any perpendicular will do.
        right = normalize(DVec3::X.cross(forward));
        if right == DVec3::ZERO {
            right = normalize(DVec3::Y.cross(forward));
        }
    }
    let true_up = forward.cross(right);
    quat_normalize(DQuat::from_mat3(&bevy::math::DMat3::from_cols(
        right, true_up, forward,
    )))
}

/// Quaternion norm, used by drift checks.
pub fn quat_length(q: DQuat) -> f64 {
    (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt()
}
