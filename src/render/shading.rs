//! Per-cell surface shading for stars, planets and stations.
//!
//! Planet cells rebuild a sphere normal from their position inside the
//! projected ellipse, then light it from the system's star. Gas giants get
//! latitude bands that drift with the date; rocky worlds get fixed dark
//! patches seeded from the body id. Stars flicker through their palette.

use bevy::color::{Mix, Srgba};
use bevy::math::{DQuat, DVec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

use crate::math::{normalize, rotate_vec};
use crate::system::{BodyId, PlanetKind, StarClass};

/// Glyphs from darkest to brightest.
pub const BRIGHTNESS_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Phase drift of gas-giant bands, radians per day.
const BAND_DRIFT_PER_DAY: f64 = 0.8;

/// Number of bands from pole to pole.
const BAND_FREQUENCY: f64 = 7.0;

const PATCH_COUNT: usize = 6;

/// Cosine of the angular radius of a surface patch.
const PATCH_COS: f64 = 0.9;

const STATION_HULL: Srgba = Srgba::rgb(0.62, 0.66, 0.72);
const STATION_PORT: Srgba = Srgba::rgb(1.0, 0.65, 0.2);

/// Map a brightness in 0..=1 to a glyph.
pub fn ramp_glyph(brightness: f64) -> char {
    let b = if brightness.is_finite() { brightness.clamp(0.0, 1.0) } else { 0.0 };
    let idx = (b * (BRIGHTNESS_RAMP.len() - 1) as f64).round() as usize;
    BRIGHTNESS_RAMP[idx.min(BRIGHTNESS_RAMP.len() - 1)]
}

/// Position of a cell inside a projected ellipse, in unit-disc coordinates:
/// `u` to the right, `v` downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscPoint {
    pub u: f64,
    pub v: f64,
}

impl DiscPoint {
    pub fn radius_sq(&self) -> f64 {
        self.u * self.u + self.v * self.v
    }

    /// Camera-space sphere normal under this point (facing the viewer).
    pub fn camera_normal(&self) -> DVec3 {
        let w = (1.0 - self.radius_sq()).max(0.0).sqrt();
        DVec3::new(self.u, -self.v, -w)
    }

    /// World-space sphere normal given the camera rotation.
    pub fn world_normal(&self, camera_rotation: DQuat) -> DVec3 {
        normalize(rotate_vec(self.camera_normal(), camera_rotation))
    }
}

/// Fixed dark regions on a rocky planet, derived from its id.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfacePatches {
    centers: Vec<DVec3>,
}

impl SurfacePatches {
    pub fn for_body(id: BodyId) -> Self {
        let mut rng = StdRng::seed_from_u64(0x5eed_0000 ^ u64::from(id.0));
        let centers = (0..PATCH_COUNT)
            .map(|_| {
                let z: f64 = rng.gen_range(-1.0..1.0);
                let theta: f64 = rng.gen_range(0.0..TAU);
                let r = (1.0 - z * z).max(0.0).sqrt();
                DVec3::new(r * theta.cos(), z, r * theta.sin())
            })
            .collect();
        Self { centers }
    }

    pub fn covers(&self, normal: DVec3) -> bool {
        self.centers.iter().any(|c| c.dot(normal) >= PATCH_COS)
    }
}

/// Inputs shared by every cell of one planet.
#[derive(Clone, Debug)]
pub struct PlanetShading {
    pub kind: PlanetKind,
    pub patches: SurfacePatches,
    /// World direction from the planet to its star.
    pub light_dir: DVec3,
    pub camera_rotation: DQuat,
    pub date_days: f64,
    pub ambient: f64,
}

impl PlanetShading {
    /// Glyph and colour for one cell.
    pub fn shade(&self, point: DiscPoint) -> (char, Srgba) {
        let normal = point.world_normal(self.camera_rotation);
        let lambert = normal.dot(self.light_dir).max(0.0);
        let brightness = self.ambient + (1.0 - self.ambient) * lambert;

        let base = self.kind.base_color();
        let surface = if self.kind.is_gas_giant() {
            let phase = normal.y * BAND_FREQUENCY * std::f64::consts::PI
                + self.date_days * BAND_DRIFT_PER_DAY;
            if phase.sin() > 0.0 {
                base
            } else {
                base.mix(&Srgba::BLACK, 0.35)
            }
        } else if self.patches.covers(normal) {
            base.mix(&Srgba::BLACK, 0.45)
        } else {
            base
        };

        let color = Srgba::BLACK.mix(&surface, brightness as f32);
        (ramp_glyph(brightness), color)
    }
}

/// Stable hash of a cell and a time bucket.
pub fn cell_hash(x: i64, y: i64, bucket: i64) -> u64 {
    let mut h = (x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    h ^= (y as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= (bucket as u64).wrapping_mul(0x1656_67B1_9E37_79F9);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h
}

/// Flicker bucket for a moment of flight time.
pub fn flicker_bucket(flight_secs: f64, bucket_secs: f64) -> i64 {
    if bucket_secs > 0.0 && flight_secs.is_finite() {
        (flight_secs / bucket_secs).floor() as i64
    } else {
        0
    }
}

/// Glyph and colour for one star cell.
pub fn shade_star(class: StarClass, point: DiscPoint, x: i64, y: i64, bucket: i64) -> (char, Srgba) {
    let palette = class.palette();
    let h = cell_hash(x, y, bucket);
    let color = palette[(h % palette.len() as u64) as usize];
    let core = 1.0 - 0.35 * point.radius_sq();
    let glyph = if h % 11 == 0 { '*' } else { ramp_glyph(core) };
    (glyph, color)
}

/// Glyph and colour for one station cell. Cells whose surface faces along
/// the port axis carry the port marking.
pub fn shade_station(point: DiscPoint, camera_rotation: DQuat, port_axis: DVec3) -> (char, Srgba) {
    let normal = point.world_normal(camera_rotation);
    if normal.dot(port_axis) >= 0.85 {
        ('O', STATION_PORT)
    } else if point.radius_sq() > 0.7 {
        ('#', STATION_HULL.mix(&Srgba::BLACK, 0.3))
    } else {
        ('=', STATION_HULL)
    }
}

/// Single-cell glyph for a body too small to draw as a disc.
pub fn point_glyph(kind: PointKind) -> char {
    match kind {
        PointKind::Star => '*',
        PointKind::Planet => 'o',
        PointKind::Station => '+',
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointKind {
    Star,
    Planet,
    Station,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(kind: PlanetKind, light_dir: DVec3) -> PlanetShading {
        PlanetShading {
            kind,
            patches: SurfacePatches { centers: Vec::new() },
            light_dir,
            camera_rotation: DQuat::IDENTITY,
            date_days: 0.0,
            ambient: 0.08,
        }
    }

    #[test]
    fn test_ramp_ends() {
        assert_eq!(ramp_glyph(0.0), ' ');
        assert_eq!(ramp_glyph(1.0), '@');
        assert_eq!(ramp_glyph(f64::NAN), ' ');
        assert_eq!(ramp_glyph(7.0), '@');
    }

    #[test]
    fn test_disc_centre_faces_camera() {
        let n = DiscPoint { u: 0.0, v: 0.0 }.world_normal(DQuat::IDENTITY);
        assert_eq!(n, DVec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_terminator_lit_side_is_brighter() {
        // Star to the camera's right.
        let shading = planet(PlanetKind::Terrestrial, DVec3::X);
        let (lit_glyph, lit) = shading.shade(DiscPoint { u: 0.8, v: 0.0 });
        let (dark_glyph, dark) = shading.shade(DiscPoint { u: -0.8, v: 0.0 });
        assert!(lit.red + lit.green + lit.blue > dark.red + dark.green + dark.blue);
        let rank = |g| BRIGHTNESS_RAMP.iter().position(|&c| c == g);
        assert!(rank(lit_glyph) > rank(dark_glyph));
    }

    #[test]
    fn test_night_side_keeps_ambient_floor() {
        let shading = planet(PlanetKind::Ocean, DVec3::Z);
        let (_, color) = shading.shade(DiscPoint { u: 0.0, v: 0.0 });
        assert!(color.red + color.green + color.blue > 0.0);
    }

    #[test]
    fn test_gas_giant_bands_drift_with_date() {
        let mut shading = planet(PlanetKind::GasGiant, DVec3::new(0.0, 0.0, -1.0));
        let column: Vec<Srgba> = (0..10)
            .map(|i| shading.shade(DiscPoint { u: 0.0, v: -0.9 + i as f64 * 0.2 }).1)
            .collect();
        shading.date_days = 2.0;
        let later: Vec<Srgba> = (0..10)
            .map(|i| shading.shade(DiscPoint { u: 0.0, v: -0.9 + i as f64 * 0.2 }).1)
            .collect();
        assert_ne!(column, later);
    }

    #[test]
    fn test_patches_are_stable_per_body() {
        assert_eq!(SurfacePatches::for_body(BodyId(3)), SurfacePatches::for_body(BodyId(3)));
        assert_ne!(SurfacePatches::for_body(BodyId(3)), SurfacePatches::for_body(BodyId(4)));
    }

    #[test]
    fn test_star_flicker_changes_with_bucket_only() {
        let p = DiscPoint { u: 0.1, v: 0.1 };
        let a = shade_star(StarClass::Yellow, p, 4, 5, 10);
        assert_eq!(a, shade_star(StarClass::Yellow, p, 4, 5, 10));
        let changed = (11..40).any(|b| shade_star(StarClass::Yellow, p, 4, 5, b) != a);
        assert!(changed);
    }

    #[test]
    fn test_flicker_bucket_is_coarse() {
        assert_eq!(flicker_bucket(0.0, 0.25), 0);
        assert_eq!(flicker_bucket(0.24, 0.25), 0);
        assert_eq!(flicker_bucket(0.26, 0.25), 1);
    }
}
