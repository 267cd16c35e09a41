//! Warp portals: placement, expansion, expiry and jump.
//!
//! A portal opens a fixed distance ahead of the ship and grows to full size
//! over a few seconds of flight time (paused time does not count). Flying
//! into it consumes the warp fuel and hands off to the target system. An
//! untouched portal collapses after its lifetime.

use bevy::log::{debug, info};
use bevy::math::DVec3;

use crate::config::FlightConfig;
use crate::ship::Ship;
use crate::system::{Galaxy, SystemId};
use crate::time::SimClock;

/// Why a portal could not be opened or used. `Display` is the HUD message.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PortalError {
    #[error("TOO CLOSE TO {0} - CANNOT OPEN PORTAL")]
    TooCloseTo(String),

    #[error("PORTAL ALREADY OPEN")]
    AlreadyOpen,

    #[error("NO WARP TARGET")]
    InvalidTarget,

    #[error("NOT ENOUGH FUEL TO WARP ({required:.1} NEEDED)")]
    InsufficientFuel { required: f64, available: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalPhase {
    Expanding,
    Active,
    Consumed,
    Expired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    pub position: DVec3,
    /// Flight seconds at which the portal opened.
    pub opened_at: f64,
    pub target: SystemId,
    pub distance_ly: f64,
    pub phase: PortalPhase,
}

impl Portal {
    /// Seconds of flight time since opening.
    pub fn age(&self, now_secs: f64) -> f64 {
        (now_secs - self.opened_at).max(0.0)
    }

    /// Current radius: eases from zero to full over the expansion time.
    pub fn radius_at(&self, now_secs: f64, config: &FlightConfig) -> f64 {
        let t = self.age(now_secs) / config.portal_expand_secs;
        config.portal_radius * ease_out_cubic(t)
    }

    /// Still expanding or waiting for the ship.
    pub fn is_live(&self) -> bool {
        matches!(self.phase, PortalPhase::Expanding | PortalPhase::Active)
    }

    fn live_phase(&self, now_secs: f64, config: &FlightConfig) -> PortalPhase {
        if self.age(now_secs) < config.portal_expand_secs {
            PortalPhase::Expanding
        } else {
            PortalPhase::Active
        }
    }

    fn has_expired(&self, now_secs: f64, config: &FlightConfig) -> bool {
        self.age(now_secs) >= config.portal_expand_secs + config.portal_lifetime_secs
    }
}

/// What happened to the portal this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum PortalEvent {
    /// Ship entered the portal; fuel has been deducted.
    Warp { target: SystemId, cost: f64 },
    /// Lifetime ran out without contact.
    Expired,
    /// Ship reached the portal but could no longer pay for the jump.
    Collapsed(PortalError),
}

/// `1 - (1 - t)³` with `t` clamped to `0..=1`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    1.0 - (1.0 - t).powi(3)
}

/// Fuel needed to jump `distance_ly`.
pub fn warp_cost(distance_ly: f64, config: &FlightConfig) -> f64 {
    config.warp_base_cost + config.warp_cost_per_ly * distance_ly.max(0.0)
}

/// Owns at most one portal. A consumed or expired portal stays in place
/// until the next one replaces it, but is no longer visible.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PortalController {
    portal: Option<Portal>,
}

impl PortalController {
    /// The live portal, if any.
    pub fn portal(&self) -> Option<&Portal> {
        self.portal.as_ref().filter(|p| p.is_live())
    }

    /// The most recent portal in whatever phase it ended up.
    pub fn last_portal(&self) -> Option<&Portal> {
        self.portal.as_ref()
    }

    pub fn clear(&mut self) {
        self.portal = None;
    }

    /// Try to open a portal ahead of the ship towards `target`. On error the
    /// controller is left exactly as it was.
    pub fn open(
        &mut self,
        ship: &Ship,
        galaxy: &Galaxy,
        target: SystemId,
        clock: &SimClock,
        config: &FlightConfig,
    ) -> Result<&Portal, PortalError> {
        if self.portal().is_some() {
            return Err(PortalError::AlreadyOpen);
        }
        if target == ship.system || galaxy.get(target).is_none() {
            return Err(PortalError::InvalidTarget);
        }
        let distance_ly = galaxy
            .distance_ly(ship.system, target)
            .ok_or(PortalError::InvalidTarget)?;
        let system = galaxy.get(ship.system).ok_or(PortalError::InvalidTarget)?;

        let position = ship.position + ship.forward() * config.portal_spawn_distance;
        for body in &system.bodies {
            let clearance = body.radius_au() * config.portal_clearance_scale + config.portal_radius;
            if position.distance(body.position_at(clock.date_days)) < clearance {
                debug!("Portal rejected near {}", body.name());
                return Err(PortalError::TooCloseTo(body.name().to_uppercase()));
            }
        }

        let required = warp_cost(distance_ly, config);
        if ship.fuel < required {
            return Err(PortalError::InsufficientFuel {
                required,
                available: ship.fuel,
            });
        }

        info!(
            "Portal opened towards system {} ({:.2} ly)",
            target.0, distance_ly
        );
        Ok(&*self.portal.insert(Portal {
            position,
            opened_at: clock.flight_secs,
            target,
            distance_ly,
            phase: PortalPhase::Expanding,
        }))
    }

    /// Advance the portal: update its phase, detect ship contact and expiry.
    pub fn update(
        &mut self,
        ship: &mut Ship,
        clock: &SimClock,
        config: &FlightConfig,
    ) -> Option<PortalEvent> {
        let portal = self.portal.as_mut().filter(|p| p.is_live())?;
        let now = clock.flight_secs;
        portal.phase = portal.live_phase(now, config);

        let radius = portal.radius_at(now, config);
        if radius > 0.0 && ship.position.distance(portal.position) <= radius {
            let cost = warp_cost(portal.distance_ly, config);
            let target = portal.target;
            if ship.fuel < cost {
                portal.phase = PortalPhase::Expired;
                return Some(PortalEvent::Collapsed(PortalError::InsufficientFuel {
                    required: cost,
                    available: ship.fuel,
                }));
            }
            ship.fuel -= cost;
            portal.phase = PortalPhase::Consumed;
            info!("Entered portal to system {} ({:.1} fuel)", target.0, cost);
            return Some(PortalEvent::Warp { target, cost });
        }

        if portal.has_expired(now, config) {
            portal.phase = PortalPhase::Expired;
            info!("Portal collapsed unused");
            return Some(PortalEvent::Expired);
        }
        None
    }
}
