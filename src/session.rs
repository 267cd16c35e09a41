//! The flight engine as one explicit object.
//!
//! [`FlightSession`] owns everything that lives for the duration of
//! in-system flight and advances it once per frame with [`FlightSession::tick`].
//! A tick either renders a frame and continues, or stops early with a
//! hand-off (dock, warp, encounter, destruction). After a hand-off the
//! session refuses to tick until [`FlightSession::resume`] hands the ship
//! back.

use bevy::log::{info, warn};
use bevy::prelude::Resource;
use std::collections::HashSet;

use crate::camera::Viewport;
use crate::config::{ConfigError, FlightConfig};
use crate::docking::{dock_entry_pose, ContactEvent, DockingDetector, Pose};
use crate::flight::{apply_star_hazards, FlightController, LaserBank};
use crate::hud::{status_lines, Hud, HudContext, TargetReadout};
use crate::input::FlightInput;
use crate::particles::{DustField, Starfield};
use crate::portal::{PortalController, PortalEvent, PortalError};
use crate::render::{
    compose_frame, rasterize_scene, DepthBuffer, HoveredBody, Overlay, RenderedFrame, Scene,
};
use crate::ship::Ship;
use crate::system::{Body, BodyRef, Galaxy, StarSystem, SystemId};
use crate::time::{clamp_frame_dt, SimClock};

/// Seed mixed into per-system starfields and dust.
const PARTICLE_SEED: u64 = 0x57A2_F1E1_D000_0000;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("ship is in unknown system {0:?}")]
    UnknownSystem(SystemId),

    #[error("ship state contains non-finite or negative values")]
    MalformedShip,

    #[error("flight is suspended until the ship is handed back")]
    Suspended,

    #[error("viewport has no cells")]
    EmptyViewport,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// How a tick ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    Continue,
    /// Docking started. Stations also give the entry placement from their
    /// spin on the docking date.
    Dock { body: BodyRef, entry: Option<Pose> },
    Warp(SystemId),
    /// Hostile contact by id.
    Encounter(u32),
    Destroyed,
}

impl FrameOutcome {
    pub fn is_handoff(&self) -> bool {
        !matches!(self, FrameOutcome::Continue)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameResult {
    pub outcome: FrameOutcome,
    /// The rendered frame; `None` when the tick exited early for a hand-off.
    pub frame: Option<RenderedFrame>,
}

impl FrameResult {
    fn handoff(outcome: FrameOutcome) -> Self {
        Self {
            outcome,
            frame: None,
        }
    }
}

/// In-system flight state.
#[derive(Resource)]
pub struct FlightSession {
    galaxy: Galaxy,
    ship: Ship,
    clock: SimClock,
    config: FlightConfig,
    controller: FlightController,
    lasers: LaserBank,
    portals: PortalController,
    docking: DockingDetector,
    starfield: Starfield,
    dust: DustField,
    hud: Hud,
    hovered: HoveredBody,
    buffer: DepthBuffer,
    warp_target: Option<SystemId>,
    /// Hostile contacts already engaged during this visit.
    engaged: HashSet<u32>,
    suspended: bool,
}

impl FlightSession {
    /// Start flight with a ship snapshot. The clock's date drives orbital
    /// phase; its rate is taken from the config.
    pub fn new(
        galaxy: Galaxy,
        ship: Ship,
        clock: SimClock,
        config: FlightConfig,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        validate_ship(&galaxy, &ship)?;

        let mut clock = clock;
        clock.days_per_second = config.days_per_second;
        let seed = particle_seed(ship.system);
        info!(
            "Entering flight in {} at {:?}",
            system_name(&galaxy, ship.system),
            ship.position
        );

        Ok(Self {
            starfield: Starfield::generate(config.starfield_count, seed),
            dust: DustField::new(seed ^ 1),
            galaxy,
            ship,
            clock,
            config,
            controller: FlightController::default(),
            lasers: LaserBank::default(),
            portals: PortalController::default(),
            docking: DockingDetector::default(),
            hud: Hud::default(),
            hovered: HoveredBody::default(),
            buffer: DepthBuffer::new(0, 0),
            warp_target: None,
            engaged: HashSet::new(),
            suspended: false,
        })
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn galaxy(&self) -> &Galaxy {
        &self.galaxy
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn controller(&self) -> &FlightController {
        &self.controller
    }

    pub fn portals(&self) -> &PortalController {
        &self.portals
    }

    pub fn dust(&self) -> &DustField {
        &self.dust
    }

    pub fn hovered(&self) -> Option<BodyRef> {
        self.hovered.body
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn current_system(&self) -> Option<&StarSystem> {
        self.galaxy.get(self.ship.system)
    }

    /// Mutable ship access for scripted setups and tests.
    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    /// Mutable dust access for scripted setups and tests.
    pub fn dust_mut(&mut self) -> &mut DustField {
        &mut self.dust
    }

    /// System the next portal will lead to. Defaults to the nearest neighbour.
    pub fn warp_target(&self) -> Option<SystemId> {
        self.warp_target
            .or_else(|| self.galaxy.nearest_neighbor(self.ship.system))
    }

    pub fn set_warp_target(&mut self, target: Option<SystemId>) -> Result<(), PortalError> {
        if let Some(id) = target
            && (id == self.ship.system || self.galaxy.get(id).is_none())
        {
            return Err(PortalError::InvalidTarget);
        }
        self.warp_target = target;
        Ok(())
    }

    /// Advance one frame. `real_dt` is wall-clock seconds since the last
    /// frame; it is clamped before it reaches the simulation.
    pub fn tick(
        &mut self,
        input: &FlightInput,
        real_dt: f64,
        viewport: Viewport,
    ) -> Result<FrameResult, SessionError> {
        if self.suspended {
            return Err(SessionError::Suspended);
        }
        if viewport.width == 0 || viewport.height == 0 {
            return Err(SessionError::EmptyViewport);
        }
        let dt = clamp_frame_dt(real_dt, self.config.max_frame_dt);
        self.hud.advance(real_dt, &self.config);

        if input.toggle_pause {
            let paused = self.clock.toggle_pause();
            info!("Flight {}", if paused { "paused" } else { "resumed" });
        }

        if !self.clock.paused
            && let Some(outcome) = self.simulate(input, dt)
        {
            self.suspended = true;
            return Ok(FrameResult::handoff(outcome));
        }

        let frame = self.render(input, viewport)?;
        Ok(FrameResult {
            outcome: FrameOutcome::Continue,
            frame: Some(frame),
        })
    }

    /// Physics and checks for one unpaused step. Returns a hand-off if one
    /// was triggered.
    fn simulate(&mut self, input: &FlightInput, dt: f64) -> Option<FrameOutcome> {
        let config = &self.config;
        let report = self.controller.step(&mut self.ship, input, dt, config);
        if let Some(block) = report.boost.blocked {
            self.hud.post(block.message());
        }
        if input.fire && !self.lasers.fire(&mut self.ship, config) {
            self.hud.post("LASERS RECHARGING");
        }
        self.lasers.update(&mut self.ship, dt, config);
        self.clock.advance(dt);

        let system = self.galaxy.get(self.ship.system)?;
        let hazard = apply_star_hazards(&mut self.ship, system, self.clock.date_days, dt, config);
        if hazard.in_heat {
            self.hud.post("WARNING: HULL HEATING");
        }
        if self.ship.is_destroyed() {
            warn!("{} destroyed", self.ship.name);
            return Some(FrameOutcome::Destroyed);
        }

        let system_id = self.ship.system;
        match self
            .docking
            .check(&mut self.ship, system_id, system, &self.clock, config)
        {
            Some(ContactEvent::Dock(body)) => {
                let entry = match system.body(body.body) {
                    Some(Body::Station(station)) => {
                        Some(dock_entry_pose(station, self.clock.date_days, config))
                    }
                    _ => None,
                };
                return Some(FrameOutcome::Dock { body, entry });
            }
            Some(ContactEvent::Impact { body, .. }) => {
                let name = system.body(body.body).map_or("", |b| b.name());
                self.hud.post(format!("COLLISION WITH {}", name.to_uppercase()));
                if self.ship.is_destroyed() {
                    warn!("{} destroyed in collision", self.ship.name);
                    return Some(FrameOutcome::Destroyed);
                }
            }
            None => {}
        }

        if input.open_portal {
            match self.warp_target() {
                Some(target) => {
                    match self
                        .portals
                        .open(&self.ship, &self.galaxy, target, &self.clock, config)
                    {
                        Ok(_) => self.hud.post("PORTAL OPENING"),
                        Err(err) => self.hud.post(err.to_string()),
                    }
                }
                None => self.hud.post(PortalError::InvalidTarget.to_string()),
            }
        }
        match self.portals.update(&mut self.ship, &self.clock, config) {
            Some(PortalEvent::Warp { target, .. }) => return Some(FrameOutcome::Warp(target)),
            Some(PortalEvent::Expired) => self.hud.post("PORTAL COLLAPSED"),
            Some(PortalEvent::Collapsed(err)) => self.hud.post(err.to_string()),
            None => {}
        }

        let system = self.galaxy.get(self.ship.system)?;
        let hostile = system.contacts.iter().find(|c| {
            c.hostile
                && !self.engaged.contains(&c.id)
                && c.position.distance(self.ship.position) <= config.encounter_radius
        });
        if let Some(contact) = hostile {
            info!("Hostile contact {} engaged", contact.name);
            self.engaged.insert(contact.id);
            return Some(FrameOutcome::Encounter(contact.id));
        }

        self.dust.update(&self.ship, config);
        None
    }

    fn render(&mut self, input: &FlightInput, viewport: Viewport) -> Result<RenderedFrame, SessionError> {
        if self.buffer.width() != viewport.width || self.buffer.height() != viewport.height {
            self.buffer = DepthBuffer::new(viewport.width, viewport.height);
        }
        let system = self
            .galaxy
            .get(self.ship.system)
            .ok_or(SessionError::UnknownSystem(self.ship.system))?;

        let scene = Scene {
            ship: &self.ship,
            system_id: self.ship.system,
            system,
            clock: &self.clock,
            starfield: &self.starfield,
            dust: &self.dust,
            lasers: self.lasers.bolts(),
            portal: self.portals.portal(),
        };
        let infos = rasterize_scene(&mut self.buffer, &scene, &viewport, &self.config);
        let hovered = self
            .hovered
            .update(input.cursor, &self.buffer, &infos, self.config.pick_epsilon);

        let target = hovered.and_then(|h| system.body(h.body)).map(|body| TargetReadout {
            name: body.name().to_string(),
            kind: body.kind_label(),
            distance_au: body.position_at(self.clock.date_days).distance(self.ship.position),
        });
        let warp_name = self
            .warp_target()
            .and_then(|id| self.galaxy.get(id))
            .map(|s| s.name.as_str());
        let hud_lines = status_lines(
            &HudContext {
                ship: &self.ship,
                controller: &self.controller,
                clock: &self.clock,
                system_name: &system.name,
                target,
                portal: self.portals.portal(),
                warp_target: warp_name,
            },
            &self.config,
        );

        Ok(compose_frame(
            &mut self.buffer,
            Overlay {
                system,
                infos,
                hovered,
                paused: self.clock.paused,
                hud_lines,
                hud: &self.hud,
                ship: &self.ship,
            },
            &viewport,
        ))
    }

    /// Hand the ship back after a hand-off and continue flying. If the ship
    /// changed system, per-system state is rebuilt.
    pub fn resume(&mut self, ship: Ship) -> Result<(), SessionError> {
        validate_ship(&self.galaxy, &ship)?;
        if ship.system != self.ship.system {
            let seed = particle_seed(ship.system);
            self.starfield = Starfield::generate(self.config.starfield_count, seed);
            self.dust = DustField::new(seed ^ 1);
            self.engaged.clear();
            self.warp_target = None;
            info!("Arrived in {}", system_name(&self.galaxy, ship.system));
        } else {
            self.dust.clear();
        }
        self.portals.clear();
        self.docking.clear();
        self.lasers.clear();
        self.controller = FlightController::default();
        self.hovered = HoveredBody::default();
        self.ship = ship;
        self.suspended = false;
        Ok(())
    }
}

fn validate_ship(galaxy: &Galaxy, ship: &Ship) -> Result<(), SessionError> {
    if galaxy.get(ship.system).is_none() {
        return Err(SessionError::UnknownSystem(ship.system));
    }
    if !ship.is_well_formed() {
        return Err(SessionError::MalformedShip);
    }
    Ok(())
}

fn particle_seed(system: SystemId) -> u64 {
    PARTICLE_SEED ^ system.0 as u64
}

fn system_name(galaxy: &Galaxy, id: SystemId) -> &str {
    galaxy.get(id).map_or("?", |s| s.name.as_str())
}
