mod common;

use campus_nav_lib::{
    plan_route, render_route, AccessibilityProfile, EngineConfig, Error, RouteError,
    RouteRenderMode, RouteRequest, RouteSummary, TraversalKind, Waypoint,
};

use common::sample_graph;

fn plan(from: &str, to: &str, profile: AccessibilityProfile) -> campus_nav_lib::RoutePlan {
    let graph = sample_graph();
    let request = RouteRequest::new(from, to).with_profile(profile);
    plan_route(&graph, &request, &EngineConfig::default()).expect("route exists")
}

#[test]
fn default_profile_takes_elevator_to_second_floor() {
    let plan = plan(
        "Robotics Lab (101)",
        "Design Studio (201)",
        AccessibilityProfile::default(),
    );
    assert_eq!(
        plan.route.instructions(),
        vec![
            "Walk to Engineering Elevator",
            "Take the elevator to Floor 2",
            "Walk to Design Studio (201)",
        ]
    );
    assert_eq!(plan.route.segments[0].distance, 30.0);
    assert!((plan.route.distance - (50.0 + 50.0_f64.sqrt())).abs() < 1e-9);
}

#[test]
fn unpenalized_profile_takes_the_stairs() {
    let plan = plan("eng-101", "eng-201", AccessibilityProfile::unrestricted());
    assert_eq!(
        plan.route.instructions(),
        vec![
            "Walk to Engineering Stair",
            "Take the stairs to Floor 2",
            "Walk to Design Studio (201)",
        ]
    );
}

#[test]
fn consecutive_elevator_floors_merge_into_one_ride() {
    let plan = plan("eng-101", "eng-301", AccessibilityProfile::elevators_only());
    let rides: Vec<_> = plan
        .route
        .segments
        .iter()
        .filter(|segment| segment.kind == TraversalKind::Elevator)
        .collect();
    assert_eq!(rides.len(), 1);
    assert_eq!(rides[0].instruction, "Take the elevator to Floor 3");
    assert_eq!(rides[0].floors_crossed, 2);
    assert_eq!(rides[0].distance, 40.0);
    assert_eq!(plan.floor_transitions(&sample_graph()), 2);
}

#[test]
fn cross_campus_route_uses_outdoor_path_and_ramp() {
    let plan = plan("eng-101", "Reading Room (201)", AccessibilityProfile::default());
    assert_eq!(
        plan.route.instructions(),
        vec![
            "Walk to Engineering Entrance",
            "Walk to (95.0, 10.0)",
            "Use the ramp to Library Entrance",
            "Walk to Library Elevator",
            "Take the elevator to Floor 2",
            "Walk to Reading Room (201)",
        ]
    );
    assert!(plan.route.is_contiguous());
    assert_eq!(plan.route.segments[1].floor.as_str(), "grounds");

    let outdoor = 3125.0_f64.sqrt() + 2125.0_f64.sqrt();
    let expected_distance = 20.0 + 5.0 + outdoor + 5.0 + 20.0 + 20.0 + 25.0;
    assert!((plan.route.distance - expected_distance).abs() < 1e-9);
}

#[test]
fn eta_includes_walking_and_elevator_time() {
    let plan = plan("eng-101", "eng-201", AccessibilityProfile::elevators_only());
    let travel = EngineConfig::default().travel;
    let expected = plan.route.distance / travel.walking_speed
        + travel.elevator_seconds_per_ride
        + travel.elevator_seconds_per_floor;
    assert!((plan.route.eta_seconds - expected).abs() < 1e-9);
}

#[test]
fn located_start_snaps_to_nearest_node() {
    let graph = sample_graph();
    let start = Waypoint::position("eng-2", 24.0, 24.0);
    let request = RouteRequest::new(start, "Dean's Office (301)")
        .with_profile(AccessibilityProfile::elevators_only());
    let plan = plan_route(&graph, &request, &EngineConfig::default()).expect("route exists");
    assert_eq!(plan.start.as_str(), "eng-201");
    assert_eq!(
        plan.route.instructions().last().copied(),
        Some("Walk to Dean's Office (301)")
    );
}

#[test]
fn misspelled_destination_suggests_close_matches() {
    let graph = sample_graph();
    let request = RouteRequest::new("eng-101", "Reading Rom (201)");
    let err = plan_route(&graph, &request, &EngineConfig::default()).expect_err("unknown");
    match &err {
        Error::Route(RouteError::UnknownNode { suggestions, .. }) => {
            assert!(suggestions.contains(&"Reading Room (201)".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("location not found"));
    assert!(message.contains("Did you mean"));
}

#[test]
fn summary_renders_endpoints_from_plan() {
    let graph = sample_graph();
    let request = RouteRequest::new("eng-101", "eng-201");
    let plan = plan_route(&graph, &request, &EngineConfig::default()).expect("route exists");
    let text = RouteSummary::from_plan(&graph, &plan).render(RouteRenderMode::PlainText);

    let header = text.lines().next().expect("header line");
    assert!(header.starts_with("Route: Robotics Lab (101) -> Design Studio (201)"));
    assert!(header.ends_with("3 steps, algorithm: dijkstra)"));
    assert!(text.contains("  2. Take the elevator to Floor 2 (20.0)"));

    let rich = render_route(&plan.route, RouteRenderMode::RichText);
    assert!(rich.contains("(`elevator`, 20.0)"));
}

#[test]
fn plan_serializes_to_json() {
    let plan = plan("eng-101", "eng-201", AccessibilityProfile::default());
    let json = serde_json::to_value(&plan).expect("serialize plan");
    assert_eq!(json["algorithm"], "dijkstra");
    assert_eq!(json["start"], "eng-101");
    assert_eq!(json["route"]["segments"][1]["kind"], "elevator");
}
