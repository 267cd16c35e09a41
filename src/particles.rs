//! Backdrop stars and the dust field that gives a sense of motion.
//!
//! The starfield is a fixed set of directions drawn at a huge distance
//! around the ship, so it turns with the view but never parallaxes. Dust is
//! a small working set kept within a range of the ship: particles that fall
//! out of range are culled and respawned ahead of the ship.

use bevy::math::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

use crate::config::FlightConfig;
use crate::math::normalize;
use crate::ship::Ship;

/// A backdrop star: a direction and a brightness class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackdropStar {
    pub direction: DVec3,
    /// 0..1; brighter stars get heavier glyphs.
    pub brightness: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Starfield {
    stars: Vec<BackdropStar>,
}

impl Starfield {
    /// Generate `count` uniformly distributed directions from a seed.
    pub fn generate(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..count)
            .map(|_| BackdropStar {
                direction: random_unit(&mut rng),
                // Most stars are faint.
                brightness: rng.gen_range(0.0f32..1.0).powi(3),
            })
            .collect();
        Self { stars }
    }

    pub fn stars(&self) -> &[BackdropStar] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// World positions of every star, centred on `center`.
    pub fn positions_around(&self, center: DVec3, radius: f64) -> impl Iterator<Item = DVec3> + '_ {
        self.stars.iter().map(move |s| center + s.direction * radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DustParticle {
    pub position: DVec3,
}

/// Bounded set of dust particles around the ship.
#[derive(Clone, Debug)]
pub struct DustField {
    particles: Vec<DustParticle>,
    rng: StdRng,
}

impl DustField {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[DustParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Add a particle at an explicit position.
    pub fn push(&mut self, position: DVec3) {
        self.particles.push(DustParticle { position });
    }

    /// Drop every particle (e.g. after a jump).
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Cull out-of-range particles and top the set back up. Returns how many
    /// were culled.
    pub fn update(&mut self, ship: &Ship, config: &FlightConfig) -> usize {
        let range = dust_range(ship, config);
        let before = self.particles.len();
        self.particles
            .retain(|p| p.position.distance(ship.position) <= range);
        let culled = before - self.particles.len();

        while self.particles.len() < config.dust_count {
            let position = self.spawn_position(ship, config);
            self.particles.push(DustParticle { position });
        }
        culled
    }

    /// Pick a respawn point. Directions lean towards the velocity so the
    /// ship flies into fresh dust; distances land either in the main band or
    /// in the edge band just inside the cutoff.
    fn spawn_position(&mut self, ship: &Ship, config: &FlightConfig) -> DVec3 {
        let range = dust_range(ship, config);
        let random_dir = random_unit(&mut self.rng);
        let heading = normalize(ship.velocity);
        let direction = if heading == DVec3::ZERO {
            random_dir
        } else {
            let bias = config.dust_velocity_bias;
            let mixed = normalize(heading * bias + random_dir * (1.0 - bias));
            if mixed == DVec3::ZERO { random_dir } else { mixed }
        };

        let (lo, hi) = if self.rng.gen_range(0.0..1.0) < config.dust_edge_probability {
            (config.dust_spawn_max_fraction, 1.0)
        } else {
            (config.dust_spawn_min_fraction, config.dust_spawn_max_fraction)
        };
        let distance = range * self.rng.gen_range(lo..hi);
        ship.position + direction * distance
    }
}

/// Distance beyond which dust is culled.
pub fn dust_range(ship: &Ship, config: &FlightConfig) -> f64 {
    ship.size_au * config.dust_range_factor
}

/// Glyph for a dust particle given its apparent screen motion (in cells,
/// y down). Small motions render as a dot.
pub fn streak_glyph(dx: f64, dy: f64, cell_aspect: f64) -> char {
    // Compare in visual units: a row is `cell_aspect` columns tall.
    let vy = -dy * cell_aspect;
    let vx = dx;
    if !(vx.is_finite() && vy.is_finite()) || (vx == 0.0 && vy == 0.0) {
        return '.';
    }
    let angle = vy.atan2(vx).rem_euclid(std::f64::consts::PI);
    let sector = (angle / (std::f64::consts::PI / 8.0)).floor() as i32;
    match sector {
        0 | 7 => '-',
        1 | 2 => '/',
        3 | 4 => '|',
        _ => '\\',
    }
}

fn random_unit(rng: &mut StdRng) -> DVec3 {
    let z: f64 = rng.gen_range(-1.0..1.0);
    let theta: f64 = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    DVec3::new(r * theta.cos(), r * theta.sin(), z)
}
