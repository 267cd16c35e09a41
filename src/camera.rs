//! Camera and perspective projection onto the character grid.
//!
//! The camera rides on the ship: world points are moved into camera space
//! with the conjugate of the ship's rotation, then projected with a pinhole
//! model. Terminal cells are taller than they are wide, so the vertical
//! offset is divided by the cell aspect ratio.

use bevy::math::{DQuat, DVec3};

use crate::math::{quat_conjugate, rotate_vec};

/// Below this camera-space depth the perspective divide is unusable.
const DEGENERATE_DEPTH: f64 = 1e-12;

/// Viewpoint for one frame.
#[derive(Clone, Copy, Debug)]
pub struct ViewCamera {
    pub position: DVec3,
    pub rotation: DQuat,
    /// Horizontal field of view in degrees.
    pub fov_deg: f64,
}

impl ViewCamera {
    pub fn new(position: DVec3, rotation: DQuat, fov_deg: f64) -> Self {
        Self {
            position,
            rotation,
            fov_deg,
        }
    }

    /// Transform a world point into camera space (+Z forward).
    pub fn to_camera_space(&self, world: DVec3) -> DVec3 {
        rotate_vec(world - self.position, quat_conjugate(self.rotation))
    }

    fn half_fov_tan(&self) -> f64 {
        (self.fov_deg.to_radians() * 0.5).tan()
    }
}

/// Size of the character grid being drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    /// Cell height divided by cell width.
    pub cell_aspect: f64,
}

impl Viewport {
    pub fn new(width: usize, height: usize, cell_aspect: f64) -> Self {
        Self {
            width,
            height,
            cell_aspect,
        }
    }

    /// Screen-space centre of the grid.
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 * 0.5, self.height as f64 * 0.5)
    }

    /// Whether a fractional screen coordinate lands on a grid cell.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64
    }
}

/// A projected point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Fractional column.
    pub x: f64,
    /// Fractional row (grows downwards).
    pub y: f64,
    /// Camera-space depth along the view axis.
    pub depth: f64,
}

impl Projected {
    /// Cell containing this point (may be outside the grid).
    pub fn cell(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// Project a world point. Returns `None` for points behind or too close to
/// the camera and for any degenerate input.
pub fn project(
    world: DVec3,
    camera: &ViewCamera,
    viewport: &Viewport,
    near_plane: f64,
) -> Option<Projected> {
    let cam = camera.to_camera_space(world);
    project_camera_space(cam, camera, viewport, near_plane)
}

/// Project a point that is already in camera space.
pub fn project_camera_space(
    cam: DVec3,
    camera: &ViewCamera,
    viewport: &Viewport,
    near_plane: f64,
) -> Option<Projected> {
    if !cam.is_finite() || cam.z < near_plane || cam.z.abs() < DEGENERATE_DEPTH {
        return None;
    }
    let tan_half = camera.half_fov_tan();
    if !(tan_half > 0.0) || !tan_half.is_finite() || !(viewport.cell_aspect > 0.0) {
        return None;
    }

    let (cx, cy) = viewport.center();
    let half_w = viewport.width as f64 * 0.5;
    let ndc_x = cam.x / (cam.z * tan_half);
    let ndc_y = cam.y / (cam.z * tan_half);

    let x = cx + ndc_x * half_w;
    let y = cy - ndc_y * half_w / viewport.cell_aspect;
    if !x.is_finite() || !y.is_finite() {
        return None;
    }

    Some(Projected {
        x,
        y,
        depth: cam.z,
    })
}

/// Horizontal cells covered by one AU at the given depth.
pub fn pixels_per_unit(fov_deg: f64, viewport: &Viewport, depth: f64) -> f64 {
    let tan_half = (fov_deg.to_radians() * 0.5).tan();
    if depth.abs() < DEGENERATE_DEPTH || !(tan_half > 0.0) {
        return 0.0;
    }
    viewport.width as f64 * 0.5 / (depth * tan_half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{quat_from_axis_angle, UP};
    use approx::assert_relative_eq;

    fn viewport() -> Viewport {
        Viewport::new(120, 40, 2.0)
    }

    #[test]
    fn test_forward_point_projects_to_center() {
        let camera = ViewCamera::new(DVec3::ZERO, DQuat::IDENTITY, 75.0);
        for d in [0.001, 0.5, 3.0, 1000.0] {
            let p = project(DVec3::new(0.0, 0.0, d), &camera, &viewport(), 1e-6).unwrap();
            assert_relative_eq!(p.x, 60.0);
            assert_relative_eq!(p.y, 20.0);
            assert_relative_eq!(p.depth, d);
        }
    }

    #[test]
    fn test_behind_camera_is_rejected() {
        let camera = ViewCamera::new(DVec3::ZERO, DQuat::IDENTITY, 75.0);
        assert!(project(DVec3::new(0.0, 0.0, -1.0), &camera, &viewport(), 1e-6).is_none());
        assert!(project(DVec3::new(0.0, 0.0, 1e-7), &camera, &viewport(), 1e-6).is_none());
    }

    #[test]
    fn test_non_finite_is_rejected() {
        let camera = ViewCamera::new(DVec3::ZERO, DQuat::IDENTITY, 75.0);
        assert!(project(DVec3::new(f64::NAN, 0.0, 1.0), &camera, &viewport(), 1e-6).is_none());
    }

    #[test]
    fn test_edge_of_fov_maps_to_edge_of_grid() {
        let camera = ViewCamera::new(DVec3::ZERO, DQuat::IDENTITY, 90.0);
        // tan(45°) = 1, so x == z lands on the right edge.
        let p = project(DVec3::new(2.0, 0.0, 2.0), &camera, &viewport(), 1e-6).unwrap();
        assert_relative_eq!(p.x, 120.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_offset_divided_by_aspect() {
        let camera = ViewCamera::new(DVec3::ZERO, DQuat::IDENTITY, 90.0);
        let right = project(DVec3::new(0.5, 0.0, 1.0), &camera, &viewport(), 1e-6).unwrap();
        let up = project(DVec3::new(0.0, 0.5, 1.0), &camera, &viewport(), 1e-6).unwrap();
        assert_relative_eq!(right.x - 60.0, 30.0, epsilon = 1e-9);
        assert_relative_eq!(20.0 - up.y, 15.0, epsilon = 1e-9);
    }

    #[test]
    fn test_camera_rotation_is_applied() {
        // Turned 90° to the right, the camera now looks down world +X.
        let rotation = quat_from_axis_angle(UP, std::f64::consts::FRAC_PI_2);
        let camera = ViewCamera::new(DVec3::new(1.0, 0.0, 0.0), rotation, 75.0);
        let p = project(DVec3::new(3.0, 0.0, 0.0), &camera, &viewport(), 1e-6).unwrap();
        assert_relative_eq!(p.x, 60.0, epsilon = 1e-9);
        assert_relative_eq!(p.depth, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pixels_per_unit_scales_inversely_with_depth() {
        let near = pixels_per_unit(90.0, &viewport(), 1.0);
        let far = pixels_per_unit(90.0, &viewport(), 2.0);
        assert_relative_eq!(near, 60.0, epsilon = 1e-9);
        assert_relative_eq!(far, 30.0, epsilon = 1e-9);
        assert_eq!(pixels_per_unit(90.0, &viewport(), 0.0), 0.0);
    }
}
