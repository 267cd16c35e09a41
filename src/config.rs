//! Tunable constants for flight, rendering and transitions.
//!
//! Every empirically tuned value lives in [`FlightConfig`]; nothing in the
//! engine hard-codes its own copy.

use bevy::prelude::*;

/// Errors reported by [`FlightConfig::validate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("field of view must be in (0, 180) degrees, got {0}")]
    FieldOfView(f64),

    #[error("near plane must be positive, got {0}")]
    NearPlane(f64),

    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be within [0, 1], got {value}")]
    NotFraction { name: &'static str, value: f64 },

    #[error("heat range factor must exceed 1.0, got {0}")]
    HeatRange(f64),

    #[error("dust spawn band is empty ({min} .. {max})")]
    DustBand { min: f64, max: f64 },
}

/// Configuration for the flight engine.
#[derive(Resource, Clone, Debug)]
pub struct FlightConfig {
    // --- camera & projection ---
    /// Horizontal field of view in degrees. Default: 75.
    pub fov_deg: f64,
    /// Points closer than this along the view axis are not drawn (AU). Default: 1e-6.
    pub near_plane: f64,
    /// Multiplier applied to body radii when sizing them on screen. Default: 1.0.
    pub screen_scale: f64,

    // --- frame scheduling ---
    /// Upper bound on a single frame step in seconds. Default: 0.05.
    pub max_frame_dt: f64,
    /// Calendar days per simulated flight second. Default: 1/60.
    pub days_per_second: f64,

    // --- flight model ---
    /// Base max speed = size × engine × this (1/s). Default: 40.
    pub speed_per_size_engine: f64,
    /// Base acceleration = size × engine × this (1/s²). Default: 20.
    pub accel_per_size_engine: f64,
    /// Braking deceleration as a multiple of base acceleration. Default: 1.5.
    pub brake_factor: f64,
    /// Yaw/pitch rate in radians per second. Default: 1.4.
    pub turn_rate: f64,
    /// Fraction of velocity lost per second while coasting. Default: 0 (inertial).
    pub coast_drag: f64,

    // --- boost ---
    /// Speed and acceleration multiplier while boosting. Default: 2.5.
    pub boost_multiplier: f64,
    /// Fuel drained per second of boost. Default: 4.
    pub boost_fuel_per_sec: f64,
    /// Minimum speed (fraction of base max) required to start a boost. Default: 0.25.
    pub boost_min_speed_fraction: f64,
    /// Seconds for the speed cap to decay back to base after a boost. Default: 3.
    pub boost_cooldown_secs: f64,
    /// Cooldown ends early once speed falls to this fraction of base max. Default: 1.0.
    pub boost_cooldown_exit_fraction: f64,

    // --- star hazard ---
    /// Heat zone outer bound as a multiple of star radius. Default: 4.
    pub heat_range_factor: f64,
    /// Damage per second at the star surface. Default: 30.
    pub heat_damage_per_sec: f64,

    // --- docking & collisions ---
    /// Planet docking trigger radius as a multiple of body radius. Default: 1.5.
    pub planet_dock_factor: f64,
    /// Station contact radius as a multiple of body radius. Default: 1.2.
    pub station_dock_factor: f64,
    /// Max angle between approach and docking port axis (degrees). Default: 25.
    pub dock_alignment_deg: f64,
    /// Max closing speed for a docking approach, as a fraction of base max speed. Default: 0.6.
    pub max_dock_speed_fraction: f64,
    /// Hull damage per unit of (speed / base max speed) on impact. Default: 15.
    pub impact_damage: f64,
    /// Seconds during which the same body cannot collide again. Default: 1.0.
    pub collision_debounce_secs: f64,
    /// Distance outside the port at which a docked/undocking ship is placed,
    /// as a multiple of station radius. Default: 2.0.
    pub undock_distance_factor: f64,

    // --- hostile contacts ---
    /// Distance at which a hostile contact starts an encounter (AU). Default: 0.002.
    pub encounter_radius: f64,

    // --- portal ---
    /// Distance ahead of the ship where a portal spawns (AU). Default: 0.01.
    pub portal_spawn_distance: f64,
    /// Fully expanded portal radius (AU). Default: 0.0015.
    pub portal_radius: f64,
    /// Body radius multiplier for portal placement clearance. Default: 3.
    pub portal_clearance_scale: f64,
    /// Seconds of flight time to expand fully. Default: 2.5.
    pub portal_expand_secs: f64,
    /// Seconds a fully open portal waits for contact before collapsing. Default: 30.
    pub portal_lifetime_secs: f64,
    /// Flat fuel cost of any warp. Default: 5.
    pub warp_base_cost: f64,
    /// Fuel cost per light-year of warp distance. Default: 2.
    pub warp_cost_per_ly: f64,

    // --- lasers ---
    /// Laser bolt speed relative to the ship (AU/s). Default: 0.05.
    pub laser_speed: f64,
    /// Seconds before a bolt fizzles. Default: 1.2.
    pub laser_lifetime_secs: f64,
    /// Laser charges regenerated per second. Default: 0.5.
    pub laser_recharge_per_sec: f64,

    // --- particles ---
    /// Number of backdrop stars. Default: 220.
    pub starfield_count: usize,
    /// Distance at which backdrop stars are drawn (AU). Default: 1e6.
    pub starfield_radius: f64,
    /// Dust working-set size. Default: 48.
    pub dust_count: usize,
    /// Dust cull range as a multiple of ship size. Default: 40.
    pub dust_range_factor: f64,
    /// Inner edge of the main spawn band, as a fraction of range. Default: 0.15.
    pub dust_spawn_min_fraction: f64,
    /// Outer edge of the main spawn band, as a fraction of range. Default: 0.8.
    pub dust_spawn_max_fraction: f64,
    /// Probability a respawn lands in the edge band (max fraction .. 1). Default: 0.3.
    pub dust_edge_probability: f64,
    /// How strongly respawns lean towards the direction of travel (0..1). Default: 0.7.
    pub dust_velocity_bias: f64,
    /// Above this speed (fraction of base max) dust renders as streaks. Default: 0.05.
    pub dust_streak_speed_fraction: f64,

    // --- picking, labels & HUD ---
    /// Depth tolerance for hover picking (AU). Default: 0.01.
    pub pick_epsilon: f64,
    /// Seconds a transient HUD message stays up. Default: 2.5.
    pub message_secs: f64,
    /// Length in flight seconds of one star-flicker bucket. Default: 0.25.
    pub flicker_bucket_secs: f64,
    /// Brightness floor on the night side of planets (0..1). Default: 0.08.
    pub ambient_light: f64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            fov_deg: 75.0,
            near_plane: 1e-6,
            screen_scale: 1.0,

            max_frame_dt: 0.05,
            days_per_second: 1.0 / 60.0,

            speed_per_size_engine: 40.0,
            accel_per_size_engine: 20.0,
            brake_factor: 1.5,
            turn_rate: 1.4,
            coast_drag: 0.0,

            boost_multiplier: 2.5,
            boost_fuel_per_sec: 4.0,
            boost_min_speed_fraction: 0.25,
            boost_cooldown_secs: 3.0,
            boost_cooldown_exit_fraction: 1.0,

            heat_range_factor: 4.0,
            heat_damage_per_sec: 30.0,

            planet_dock_factor: 1.5,
            station_dock_factor: 1.2,
            dock_alignment_deg: 25.0,
            max_dock_speed_fraction: 0.6,
            impact_damage: 15.0,
            collision_debounce_secs: 1.0,
            undock_distance_factor: 2.0,

            encounter_radius: 0.002,

            portal_spawn_distance: 0.01,
            portal_radius: 0.0015,
            portal_clearance_scale: 3.0,
            portal_expand_secs: 2.5,
            portal_lifetime_secs: 30.0,
            warp_base_cost: 5.0,
            warp_cost_per_ly: 2.0,

            laser_speed: 0.05,
            laser_lifetime_secs: 1.2,
            laser_recharge_per_sec: 0.5,

            starfield_count: 220,
            starfield_radius: 1e6,
            dust_count: 48,
            dust_range_factor: 40.0,
            dust_spawn_min_fraction: 0.15,
            dust_spawn_max_fraction: 0.8,
            dust_edge_probability: 0.3,
            dust_velocity_bias: 0.7,
            dust_streak_speed_fraction: 0.05,

            pick_epsilon: 0.01,
            message_secs: 2.5,
            flicker_bucket_secs: 0.25,
            ambient_light: 0.08,
        }
    }
}

impl FlightConfig {
    /// Check that every tunable is in a usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_deg > 0.0 && self.fov_deg < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_deg));
        }
        if !(self.near_plane > 0.0) {
            return Err(ConfigError::NearPlane(self.near_plane));
        }

        let positive = [
            ("screen_scale", self.screen_scale),
            ("max_frame_dt", self.max_frame_dt),
            ("speed_per_size_engine", self.speed_per_size_engine),
            ("accel_per_size_engine", self.accel_per_size_engine),
            ("boost_multiplier", self.boost_multiplier),
            ("boost_cooldown_secs", self.boost_cooldown_secs),
            ("portal_radius", self.portal_radius),
            ("portal_expand_secs", self.portal_expand_secs),
            ("portal_lifetime_secs", self.portal_lifetime_secs),
            ("starfield_radius", self.starfield_radius),
            ("dust_range_factor", self.dust_range_factor),
            ("pick_epsilon", self.pick_epsilon),
            ("flicker_bucket_secs", self.flicker_bucket_secs),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let fractions = [
            ("boost_min_speed_fraction", self.boost_min_speed_fraction),
            ("dust_edge_probability", self.dust_edge_probability),
            ("dust_velocity_bias", self.dust_velocity_bias),
            ("ambient_light", self.ambient_light),
            ("coast_drag", self.coast_drag),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::NotFraction { name, value });
            }
        }

        if !(self.heat_range_factor > 1.0) {
            return Err(ConfigError::HeatRange(self.heat_range_factor));
        }

        if !(0.0 <= self.dust_spawn_min_fraction
            && self.dust_spawn_min_fraction < self.dust_spawn_max_fraction
            && self.dust_spawn_max_fraction < 1.0)
        {
            return Err(ConfigError::DustBand {
                min: self.dust_spawn_min_fraction,
                max: self.dust_spawn_max_fraction,
            });
        }

        Ok(())
    }
}
