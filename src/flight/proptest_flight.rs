//! Property-based tests for the flight model using proptest.
//!
//! These verify the speed cap and boost fuel invariants across arbitrary
//! input sequences.

use bevy::math::DVec3;
use proptest::prelude::*;

use super::{base_max_speed, BoostState, FlightController};
use crate::config::FlightConfig;
use crate::input::FlightInput;
use crate::ship::Ship;
use crate::system::SystemId;

fn input_strategy() -> impl Strategy<Value = FlightInput> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        -1.0f64..=1.0,
        -1.0f64..=1.0,
    )
        .prop_map(|(thrust, brake, boost, yaw, pitch)| FlightInput {
            thrust,
            brake,
            boost,
            yaw,
            pitch,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Speed never exceeds the effective cap after any tick.
    #[test]
    fn prop_speed_never_exceeds_cap(
        inputs in prop::collection::vec((input_strategy(), 0.001f64..0.05), 1..300),
        fuel in 0.0f64..20.0,
        start_speed in 0.0f64..0.05,
    ) {
        let config = FlightConfig::default();
        let mut ship = Ship::new("Prop", SystemId(0), DVec3::ZERO);
        ship.fuel = fuel;
        ship.velocity = DVec3::new(0.0, 0.0, start_speed);
        let mut controller = FlightController::default();

        for (input, dt) in &inputs {
            let report = controller.step(&mut ship, input, *dt, &config);
            prop_assert!(
                ship.speed() <= report.speed_cap * (1.0 + 1e-9),
                "speed {} exceeds cap {}", ship.speed(), report.speed_cap
            );
        }
    }

    /// While boosting, fuel strictly decreases; boost ends on the tick it hits zero.
    #[test]
    fn prop_boost_burns_fuel_until_empty(
        fuel in 0.01f64..3.0,
        dt in 0.005f64..0.05,
    ) {
        let config = FlightConfig::default();
        let mut ship = Ship::new("Prop", SystemId(0), DVec3::ZERO);
        ship.fuel = fuel;
        ship.velocity = DVec3::new(0.0, 0.0, base_max_speed(&ship, &config));
        let mut controller = FlightController::default();
        let input = FlightInput { boost: true, thrust: true, ..Default::default() };

        let mut ended = false;
        for _ in 0..10_000 {
            let before = ship.fuel;
            let report = controller.step(&mut ship, &input, dt, &config);
            if report.boost.ended {
                prop_assert_eq!(ship.fuel, 0.0);
                let in_cooldown = matches!(controller.boost.state, BoostState::Cooldown { .. });
                prop_assert!(in_cooldown);
                ended = true;
                break;
            }
            prop_assert!(controller.boost.is_boosting());
            prop_assert!(ship.fuel < before);
        }
        prop_assert!(ended);
    }

    /// Boost never starts without fuel.
    #[test]
    fn prop_no_boost_without_fuel(speed in 0.0f64..0.1, dt in 0.001f64..0.05) {
        let config = FlightConfig::default();
        let mut ship = Ship::new("Prop", SystemId(0), DVec3::ZERO);
        ship.fuel = 0.0;
        ship.velocity = DVec3::new(0.0, 0.0, speed);
        let mut controller = FlightController::default();
        let input = FlightInput { boost: true, ..Default::default() };
        let report = controller.step(&mut ship, &input, dt, &config);
        prop_assert!(!report.boost.started);
        prop_assert!(!controller.boost.is_boosting());
    }
}
