//! Seed scenarios from the planning specification (straight line, quarter
//! circle, degenerate/infeasible inputs, wire-format field names), driven
//! through the public `motion` API end to end.

use motion::{Path, PlannerError, Robot, Vector2, VelocityProfile, Waypoint};

fn straight_line() -> Vec<Waypoint> {
    vec![
        Waypoint::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::ZERO),
        Waypoint::new(Vector2::new(10.0, 0.0), Vector2::new(1.0, 0.0), Vector2::ZERO),
    ]
}

#[test]
fn straight_line_profile_ramps_symmetrically() {
    let path = Path::from_waypoints(&straight_line()).unwrap();
    let robot = Robot::new(2.0, 5.0, 5.0).unwrap();
    let profile = VelocityProfile::build(&path, &robot, 1.0).unwrap();

    let points = profile.points();
    assert!((9..=13).contains(&points.len()), "got {} points", points.len());

    assert_eq!(points.first().unwrap().actual_velocity, 0.0);
    assert_eq!(points.last().unwrap().actual_velocity, 0.0);

    for p in points {
        assert!((p.max_velocity - 5.0).abs() < 1e-9);
        assert!((p.left_velocity - p.right_velocity).abs() < 1e-9);
    }

    // Ramp up then down: the peak should sit strictly inside the sequence,
    // not at either end, for a move this long relative to the accel limit.
    let peak_index = points
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.actual_velocity.total_cmp(&b.1.actual_velocity))
        .map(|(i, _)| i)
        .unwrap();
    assert!(peak_index > 0 && peak_index < points.len() - 1);

    // total_time ~= 2*sqrt(v_peak_accel_time) + cruise: within 5% of spec's
    // worked answer of 3.0s for this scenario.
    assert!((profile.total_time() - 3.0).abs() / 3.0 < 0.05);
}

#[test]
fn quarter_circle_outer_wheel_is_faster_on_a_left_turn() {
    let waypoints = vec![
        Waypoint::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.88), Vector2::new(-1.88, 0.0)),
        Waypoint::new(Vector2::new(0.0, 1.0), Vector2::new(-1.88, 0.0), Vector2::new(0.0, -1.88)),
    ];
    let path = Path::from_waypoints(&waypoints).unwrap();
    let robot = Robot::new(0.2, 1.0, 10.0).unwrap();
    let profile = VelocityProfile::build(&path, &robot, 0.1).unwrap();

    let expected_max_v = 1.0 / 1.1;
    for p in profile.points() {
        assert!((p.max_velocity - expected_max_v).abs() < 0.05);
    }
    let mid = &profile.points()[profile.points().len() / 2];
    assert!(mid.right_velocity > mid.left_velocity);
}

#[test]
fn single_waypoint_is_rejected_as_degenerate_input() {
    let single = vec![Waypoint::new(Vector2::ZERO, Vector2::ZERO, Vector2::ZERO)];
    assert_eq!(Path::from_waypoints(&single), Err(PlannerError::DegenerateInput(1)));
}

#[test]
fn coincident_waypoints_surface_a_degenerate_tangent() {
    // Both waypoints share position/velocity/acceleration: every control
    // point collapses to the same point, so the tangent is zero everywhere
    // and the very first resample sample (t = 0) cannot compute a heading.
    let degenerate = vec![
        Waypoint::new(Vector2::ZERO, Vector2::ZERO, Vector2::ZERO),
        Waypoint::new(Vector2::ZERO, Vector2::ZERO, Vector2::ZERO),
    ];
    let path = Path::from_waypoints(&degenerate).unwrap();
    let robot = Robot::new(1.0, 1.0, 1.0).unwrap();
    let err = VelocityProfile::build(&path, &robot, 0.1).unwrap_err();
    assert_eq!(err, PlannerError::DegenerateTangent { t: 0.0 });
}

#[test]
fn measured_wheel_acceleration_never_exceeds_converged_ceiling() {
    // A fairly tight S-curve: wide enough relative to the turn radius that
    // stage 6 may need to shrink its working ceiling at least once.
    let waypoints = vec![
        Waypoint::new(Vector2::new(0.0, 0.0), Vector2::new(2.0, 0.0), Vector2::ZERO),
        Waypoint::new(Vector2::new(2.0, 1.0), Vector2::new(0.0, 3.0), Vector2::new(-4.0, 0.0)),
        Waypoint::new(Vector2::new(4.0, 0.0), Vector2::new(2.0, -3.0), Vector2::new(0.0, 4.0)),
        Waypoint::new(Vector2::new(6.0, 0.0), Vector2::new(2.0, 0.0), Vector2::ZERO),
    ];
    let path = Path::from_waypoints(&waypoints).unwrap();
    let robot = Robot::new(0.6, 3.0, 4.0).unwrap();
    let profile = VelocityProfile::build(&path, &robot, 0.1).unwrap();

    let ceiling = profile.converged_max_acceleration();
    assert!(ceiling <= robot.max_acceleration);

    for w in profile.points().windows(2) {
        let dt = w[1].external_time - w[0].external_time;
        if dt <= 0.0 {
            continue;
        }
        let left_a = (w[1].left_velocity - w[0].left_velocity).abs() / dt;
        let right_a = (w[1].right_velocity - w[0].right_velocity).abs() / dt;
        assert!(left_a.max(right_a) <= ceiling + 1e-6);
    }
}

#[test]
fn wire_format_field_names_are_preserved_verbatim() {
    // The core doesn't serialize (that's `planner-host`'s job), but the
    // field names it promises in its public API documentation must line up
    // 1:1 with what the wire format needs: time, heading, left/right speed.
    let path = Path::from_waypoints(&straight_line()).unwrap();
    let robot = Robot::new(2.0, 5.0, 5.0).unwrap();
    let profile = VelocityProfile::build(&path, &robot, 1.0).unwrap();
    let p = profile.points().first().unwrap();
    let _: f64 = p.external_time;
    let _: f64 = p.heading;
    let _: f64 = p.left_velocity;
    let _: f64 = p.right_velocity;
}
