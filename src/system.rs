//! World data consumed by the flight engine: star systems and their bodies.
//!
//! Systems live in an indexed arena ([`Galaxy`]); ships and portals refer to
//! them by [`SystemId`] rather than by reference. Bodies are a tagged union so
//! each variant carries exactly the fields it needs.

use bevy::color::Srgba;
use bevy::math::{DQuat, DVec3};
use std::f64::consts::TAU;

use crate::math::{quat_from_axis_angle, rotate_vec, FORWARD, UP};

/// Index of a system in the [`Galaxy`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub usize);

/// Identifier of a body, unique within its system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// A body anywhere in the galaxy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyRef {
    pub system: SystemId,
    pub body: BodyId,
}

/// Circular orbit around the system origin, evaluated against the in-game date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitDescriptor {
    /// Orbit radius in AU.
    pub semi_major_au: f64,
    /// Days per revolution.
    pub period_days: f64,
    /// Phase at date zero, in revolutions (0..1).
    pub phase: f64,
    /// Tilt of the orbital plane about the X axis, in radians.
    pub inclination: f64,
}

impl OrbitDescriptor {
    pub fn new(semi_major_au: f64, period_days: f64, phase: f64) -> Self {
        Self {
            semi_major_au,
            period_days,
            phase,
            inclination: 0.0,
        }
    }

    /// Angle around the orbit at a date, in radians.
    pub fn angle_at(&self, date_days: f64) -> f64 {
        let turns = if self.period_days.abs() > f64::EPSILON {
            self.phase + date_days / self.period_days
        } else {
            self.phase
        };
        turns.rem_euclid(1.0) * TAU
    }

    /// Position on the orbit at a date (orbital plane is XZ before tilt).
    pub fn position_at(&self, date_days: f64) -> DVec3 {
        let (s, c) = self.angle_at(date_days).sin_cos();
        let flat = DVec3::new(c * self.semi_major_au, 0.0, s * self.semi_major_au);
        if self.inclination == 0.0 {
            flat
        } else {
            rotate_vec(flat, quat_from_axis_angle(DVec3::X, self.inclination))
        }
    }
}

/// Where a body is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Static(DVec3),
    Orbit(OrbitDescriptor),
}

impl Placement {
    pub fn position_at(&self, date_days: f64) -> DVec3 {
        match self {
            Placement::Static(pos) => *pos,
            Placement::Orbit(orbit) => orbit.position_at(date_days),
        }
    }
}

/// Spectral class of a star, which drives its colour palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarClass {
    Blue,
    White,
    Yellow,
    Orange,
    Red,
}

impl StarClass {
    /// Flicker palette; index 0 is the nominal colour.
    pub fn palette(&self) -> [Srgba; 3] {
        match self {
            StarClass::Blue => [
                Srgba::rgb(0.65, 0.75, 1.0),
                Srgba::rgb(0.80, 0.88, 1.0),
                Srgba::rgb(0.55, 0.65, 0.95),
            ],
            StarClass::White => [
                Srgba::rgb(0.95, 0.95, 1.0),
                Srgba::rgb(1.0, 1.0, 1.0),
                Srgba::rgb(0.85, 0.88, 0.95),
            ],
            StarClass::Yellow => [
                Srgba::rgb(1.0, 0.92, 0.45),
                Srgba::rgb(1.0, 0.98, 0.70),
                Srgba::rgb(0.95, 0.80, 0.30),
            ],
            StarClass::Orange => [
                Srgba::rgb(1.0, 0.70, 0.30),
                Srgba::rgb(1.0, 0.82, 0.45),
                Srgba::rgb(0.90, 0.55, 0.20),
            ],
            StarClass::Red => [
                Srgba::rgb(0.95, 0.40, 0.25),
                Srgba::rgb(1.0, 0.55, 0.35),
                Srgba::rgb(0.80, 0.28, 0.18),
            ],
        }
    }
}

/// Surface type of a planet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanetKind {
    Terrestrial,
    Ocean,
    Desert,
    Ice,
    Lava,
    GasGiant,
}

impl PlanetKind {
    pub fn base_color(&self) -> Srgba {
        match self {
            PlanetKind::Terrestrial => Srgba::rgb(0.35, 0.60, 0.35),
            PlanetKind::Ocean => Srgba::rgb(0.20, 0.45, 0.85),
            PlanetKind::Desert => Srgba::rgb(0.85, 0.70, 0.45),
            PlanetKind::Ice => Srgba::rgb(0.80, 0.90, 0.95),
            PlanetKind::Lava => Srgba::rgb(0.85, 0.30, 0.15),
            PlanetKind::GasGiant => Srgba::rgb(0.85, 0.70, 0.55),
        }
    }

    pub fn is_gas_giant(&self) -> bool {
        matches!(self, PlanetKind::GasGiant)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub id: BodyId,
    pub name: String,
    pub class: StarClass,
    pub radius_au: f64,
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Planet {
    pub id: BodyId,
    pub name: String,
    pub kind: PlanetKind,
    pub radius_au: f64,
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub id: BodyId,
    pub name: String,
    pub radius_au: f64,
    pub placement: Placement,
    /// Days per full turn about the station's local up axis.
    pub spin_period_days: f64,
}

impl Station {
    /// Current orientation; spins with the in-game date.
    pub fn rotation_at(&self, date_days: f64) -> DQuat {
        if self.spin_period_days.abs() <= f64::EPSILON {
            return DQuat::IDENTITY;
        }
        let turns = (date_days / self.spin_period_days).rem_euclid(1.0);
        quat_from_axis_angle(UP, turns * TAU)
    }

    /// World-space direction of the docking port at a date.
    pub fn port_axis_at(&self, date_days: f64) -> DVec3 {
        rotate_vec(FORWARD, self.rotation_at(date_days))
    }
}

/// A celestial body in a star system.
#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Star(Star),
    Planet(Planet),
    Station(Station),
}

impl Body {
    pub fn id(&self) -> BodyId {
        match self {
            Body::Star(s) => s.id,
            Body::Planet(p) => p.id,
            Body::Station(s) => s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Body::Star(s) => &s.name,
            Body::Planet(p) => &p.name,
            Body::Station(s) => &s.name,
        }
    }

    pub fn radius_au(&self) -> f64 {
        match self {
            Body::Star(s) => s.radius_au,
            Body::Planet(p) => p.radius_au,
            Body::Station(s) => s.radius_au,
        }
    }

    pub fn placement(&self) -> &Placement {
        match self {
            Body::Star(s) => &s.placement,
            Body::Planet(p) => &p.placement,
            Body::Station(s) => &s.placement,
        }
    }

    pub fn position_at(&self, date_days: f64) -> DVec3 {
        self.placement().position_at(date_days)
    }

    /// Short type name for HUD display.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Body::Star(_) => "star",
            Body::Planet(p) if p.kind.is_gas_giant() => "gas giant",
            Body::Planet(_) => "planet",
            Body::Station(_) => "station",
        }
    }
}

/// A ship or beacon sharing the system with the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    pub id: u32,
    pub name: String,
    pub position: DVec3,
    pub hostile: bool,
}

/// One star system.
#[derive(Clone, Debug, PartialEq)]
pub struct StarSystem {
    pub name: String,
    /// Galactic position in light-years.
    pub position_ly: DVec3,
    pub bodies: Vec<Body>,
    pub contacts: Vec<Contact>,
}

impl StarSystem {
    pub fn new(name: impl Into<String>, position_ly: DVec3) -> Self {
        Self {
            name: name.into(),
            position_ly,
            bodies: Vec::new(),
            contacts: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.bodies.push(body);
        self
    }

    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn stars(&self) -> impl Iterator<Item = &Star> {
        self.bodies.iter().filter_map(|b| match b {
            Body::Star(s) => Some(s),
            _ => None,
        })
    }

    /// Position of the primary star (first star, or the origin).
    pub fn primary_star_position(&self, date_days: f64) -> DVec3 {
        self.stars()
            .next()
            .map_or(DVec3::ZERO, |s| s.placement.position_at(date_days))
    }
}

/// Arena of all star systems.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Galaxy {
    systems: Vec<StarSystem>,
}

impl Galaxy {
    pub fn new(systems: Vec<StarSystem>) -> Self {
        Self { systems }
    }

    pub fn add(&mut self, system: StarSystem) -> SystemId {
        self.systems.push(system);
        SystemId(self.systems.len() - 1)
    }

    pub fn get(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SystemId, &StarSystem)> {
        self.systems.iter().enumerate().map(|(i, s)| (SystemId(i), s))
    }

    /// Distance between two systems in light-years.
    pub fn distance_ly(&self, a: SystemId, b: SystemId) -> Option<f64> {
        Some(self.get(a)?.position_ly.distance(self.get(b)?.position_ly))
    }

    /// Nearest other system, used as the default warp target.
    pub fn nearest_neighbor(&self, from: SystemId) -> Option<SystemId> {
        let origin = self.get(from)?.position_ly;
        self.iter()
            .filter(|(id, _)| *id != from)
            .min_by(|(_, a), (_, b)| {
                a.position_ly
                    .distance(origin)
                    .total_cmp(&b.position_ly.distance(origin))
            })
            .map(|(id, _)| id)
    }
}
