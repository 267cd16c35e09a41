//! Boost state machine.
//!
//! `Idle → Boosting` needs fuel, the idle state and some forward momentum.
//! `Boosting → Cooldown` happens on release or when fuel runs dry, on the
//! same tick. During cooldown the speed cap slides linearly from the boosted
//! cap back to base; it ends when speed has settled or the timer runs out.

use bevy::log::{debug, info};

use crate::config::FlightConfig;
use crate::ship::Ship;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoostState {
    Idle,
    Boosting,
    Cooldown {
        /// Seconds since the boost ended.
        elapsed: f64,
        /// Speed cap in force when the boost ended.
        start_cap: f64,
    },
}

/// Why a boost request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoostBlock {
    NoFuel,
    TooSlow,
    CoolingDown,
}

impl BoostBlock {
    /// HUD text for the refusal.
    pub fn message(&self) -> &'static str {
        match self {
            BoostBlock::NoFuel => "NO FUEL - BOOST UNAVAILABLE",
            BoostBlock::TooSlow => "BOOST NEEDS MOMENTUM",
            BoostBlock::CoolingDown => "BOOST COOLING DOWN",
        }
    }
}

/// What happened to the boost on one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoostUpdate {
    pub started: bool,
    pub ended: bool,
    pub blocked: Option<BoostBlock>,
    /// Fuel burned this tick.
    pub fuel_used: f64,
}

/// Boost state plus edge tracking for the boost key.
#[derive(Clone, Debug, PartialEq)]
pub struct BoostController {
    pub state: BoostState,
    was_held: bool,
}

impl Default for BoostController {
    fn default() -> Self {
        Self {
            state: BoostState::Idle,
            was_held: false,
        }
    }
}

impl BoostController {
    pub fn is_boosting(&self) -> bool {
        matches!(self.state, BoostState::Boosting)
    }

    /// Turning is locked while boosting.
    pub fn allows_turning(&self) -> bool {
        !self.is_boosting()
    }

    /// Phase name for the HUD.
    pub fn label(&self) -> &'static str {
        match self.state {
            BoostState::Idle => "",
            BoostState::Boosting => "BOOST",
            BoostState::Cooldown { .. } => "COOLDOWN",
        }
    }

    pub fn accel_multiplier(&self, config: &FlightConfig) -> f64 {
        if self.is_boosting() {
            config.boost_multiplier
        } else {
            1.0
        }
    }

    /// Effective max speed for the current state.
    pub fn speed_cap(&self, base_max: f64, config: &FlightConfig) -> f64 {
        match self.state {
            BoostState::Idle => base_max,
            BoostState::Boosting => base_max * config.boost_multiplier,
            BoostState::Cooldown { elapsed, start_cap } => {
                let t = (elapsed / config.boost_cooldown_secs).clamp(0.0, 1.0);
                start_cap + (base_max - start_cap) * t
            }
        }
    }

    /// Advance the state machine by one tick, draining fuel while boosting.
    pub fn update(
        &mut self,
        held: bool,
        ship: &mut Ship,
        base_max: f64,
        dt: f64,
        config: &FlightConfig,
    ) -> BoostUpdate {
        let mut report = BoostUpdate::default();
        let pressed = held && !self.was_held;
        self.was_held = held;
        let speed = ship.speed();

        match self.state {
            BoostState::Idle if held => {
                if ship.fuel <= 0.0 {
                    if pressed {
                        report.blocked = Some(BoostBlock::NoFuel);
                    }
                } else if speed < base_max * config.boost_min_speed_fraction {
                    if pressed {
                        report.blocked = Some(BoostBlock::TooSlow);
                    }
                } else {
                    self.state = BoostState::Boosting;
                    report.started = true;
                    info!("Boost engaged at {:.5} AU/s", speed);
                }
            }
            BoostState::Cooldown { elapsed, start_cap } => {
                let elapsed = elapsed + dt;
                if elapsed >= config.boost_cooldown_secs
                    || speed <= base_max * config.boost_cooldown_exit_fraction
                {
                    self.state = BoostState::Idle;
                    debug!("Boost cooldown complete");
                } else {
                    self.state = BoostState::Cooldown { elapsed, start_cap };
                    if pressed {
                        report.blocked = Some(BoostBlock::CoolingDown);
                    }
                }
            }
            _ => {}
        }

        if self.is_boosting() {
            if held && ship.fuel > 0.0 {
                let burn = (config.boost_fuel_per_sec * dt).min(ship.fuel);
                ship.fuel -= burn;
                report.fuel_used = burn;
            }
            if !held || ship.fuel <= 0.0 {
                ship.fuel = ship.fuel.max(0.0);
                self.state = BoostState::Cooldown {
                    elapsed: 0.0,
                    start_cap: base_max * config.boost_multiplier,
                };
                report.ended = true;
                info!(
                    "Boost ended ({})",
                    if held { "fuel exhausted" } else { "released" }
                );
            }
        }

        report
    }
}
