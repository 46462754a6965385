use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use sk8map_core::{haversine_miles, Bounds};
use sk8map_overpass::OverpassError;

use super::*;

/// Minimal surface: tracks which handles are live.
#[derive(Default)]
struct LiveMap {
    next: u32,
    live: BTreeSet<u32>,
    views: usize,
}

impl MapSurface for LiveMap {
    type Marker = u32;

    fn create_view(&mut self, _center: Coordinate, _zoom: u8) {
        self.views += 1;
    }
    fn set_view(&mut self, _center: Coordinate, _zoom: u8) {}
    fn add_marker(&mut self, _at: Coordinate, _title: &str) -> u32 {
        self.next += 1;
        self.live.insert(self.next);
        self.next
    }
    fn move_marker(&mut self, _marker: &mut u32, _at: Coordinate) {}
    fn remove_marker(&mut self, marker: u32) {
        self.live.remove(&marker);
    }
    fn bind_popup(&mut self, _marker: &mut u32, _content: &str) {}
    fn open_popup(&mut self, _marker: &u32) {}
    fn fit_bounds(&mut self, _bounds: Bounds, _max_zoom: u8) {}
    fn fly_to(&mut self, _center: Coordinate, _zoom: u8, _duration: Duration) {}
}

const HOME: Coordinate = Coordinate::new(45.0, -122.0);

fn park(id: i64, lat: f64, lon: f64, indoor: bool) -> RawResult {
    let mut attributes = BTreeMap::new();
    if indoor {
        attributes.insert("indoor".to_string(), "yes".to_string());
    }
    RawResult {
        id,
        name: format!("park {id}"),
        coordinate: Coordinate::new(lat, lon),
        attributes,
    }
}

/// A park roughly `miles` due north of `HOME`.
fn park_north(id: i64, miles: f64, indoor: bool) -> RawResult {
    park(id, HOME.lat + miles / 69.093, HOME.lon, indoor)
}

fn view_ids(controller: &DiscoveryController<LiveMap>) -> Vec<i64> {
    controller.view().iter().map(EnrichedResult::id).collect()
}

fn query_failure() -> DiscoveryError {
    DiscoveryError::QueryFailed(OverpassError::UnexpectedStatus {
        status: 500,
        url: "http://localhost/api/interpreter".to_string(),
    })
}

/// Drive the controller to `Querying` and return the query request.
fn located(controller: &mut DiscoveryController<LiveMap>) -> QueryRequest {
    let token = controller.begin_locating().expect("idle controller starts");
    controller.on_fix(token, Ok(HOME)).expect("fix accepted")
}

#[test]
fn starts_idle_and_not_loading() {
    let controller = DiscoveryController::new(LiveMap::default());
    assert_eq!(controller.state(), DiscoveryState::Idle);
    assert!(!controller.is_loading());
    assert!(controller.reference().is_none());
    assert_eq!(controller.filter(), FilterState::default());
}

#[test]
fn fix_moves_to_querying_with_hundred_mile_radius() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let token = controller.begin_locating().unwrap();
    assert_eq!(controller.state(), DiscoveryState::Locating);
    assert!(controller.is_loading());

    let request = controller.on_fix(token, Ok(HOME)).unwrap();
    assert_eq!(request.center, HOME);
    assert_eq!(request.radius_meters, 160_934);
    assert_eq!(controller.state(), DiscoveryState::Querying);
    assert!(controller.is_loading());
    assert_eq!(controller.reference(), Some(HOME));
    assert_eq!(
        controller.markers().surface().views,
        1,
        "map created at fix"
    );
    assert_eq!(
        controller.markers().surface().live.len(),
        1,
        "only the user marker"
    );
}

#[test]
fn location_failure_records_message_and_stops_loading() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let token = controller.begin_locating().unwrap();
    let denied = DiscoveryError::LocationError("User denied Geolocation".to_string());
    let next = controller.on_fix(token, Err(denied));

    assert!(next.is_none());
    assert_eq!(controller.state(), DiscoveryState::LocationFailed);
    assert!(!controller.is_loading());
    assert_eq!(controller.error(), Some("User denied Geolocation"));
}

#[test]
fn unavailable_location_has_its_own_message() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let token = controller.begin_locating().unwrap();
    controller.on_fix(token, Err(DiscoveryError::LocationUnavailable));
    assert_eq!(
        controller.error(),
        Some("Geolocation is not supported on this device.")
    );
}

#[test]
fn ready_view_is_filtered_and_sorted() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);

    let near = park_north(1, 2.0, true);
    let far = park_north(2, 50.0, false);
    let results = vec![far, near];
    assert!(controller.on_query_result(request.token, Ok(results)));

    assert_eq!(controller.state(), DiscoveryState::Ready);
    assert!(!controller.is_loading());
    assert_eq!(view_ids(&controller), vec![1, 2]);
    assert_eq!(controller.markers().displayed_ids(), BTreeSet::from([1, 2]));

    let first = &controller.view()[0];
    let expected = haversine_miles(HOME, first.coordinate());
    assert!((first.distance_miles - expected).abs() < 1e-9);
    assert!((first.distance_miles - 2.0).abs() < 0.01);
    assert!(first.is_indoor);
}

#[test]
fn toggling_indoor_off_removes_indoor_result_and_marker() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    controller.on_query_result(
        request.token,
        Ok(vec![park_north(1, 2.0, true), park_north(2, 50.0, false)]),
    );

    controller.set_show_indoor(false);
    assert_eq!(controller.state(), DiscoveryState::Ready);
    assert_eq!(view_ids(&controller), vec![2]);
    assert_eq!(controller.markers().displayed_ids(), BTreeSet::from([2]));
    // user marker + one result marker
    assert_eq!(controller.markers().surface().live.len(), 2);

    controller.set_show_indoor(true);
    assert_eq!(view_ids(&controller), vec![1, 2]);
    assert_eq!(controller.raw_results().len(), 2, "no re-query needed");
}

#[test]
fn toggling_outdoor_off_keeps_only_indoor() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    controller.on_query_result(
        request.token,
        Ok(vec![
            park_north(1, 2.0, true),
            park_north(2, 5.0, false),
            park(3, 45.01, -122.0, false),
        ]),
    );

    controller.set_show_outdoor(false);
    assert_eq!(view_ids(&controller), vec![1]);
}

#[test]
fn empty_results_are_ready_not_failed() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    controller.on_query_result(request.token, Ok(Vec::new()));

    assert_eq!(controller.state(), DiscoveryState::Ready);
    assert!(controller.view().is_empty());
    assert!(controller.markers().is_empty());
    assert!(controller.error().is_none());
}

#[test]
fn query_failure_is_generic_and_keeps_nothing() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    controller.on_query_result(request.token, Err(query_failure()));

    assert_eq!(controller.state(), DiscoveryState::QueryFailed);
    assert!(!controller.is_loading());
    assert_eq!(
        controller.error(),
        Some("Failed to load skateparks. Please try again.")
    );
    assert!(controller.raw_results().is_empty());
    assert!(controller.view().is_empty());
    assert!(controller.markers().is_empty());
}

#[test]
fn filter_before_ready_is_recorded_but_shows_nothing() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    controller.set_show_indoor(false);
    assert!(!controller.filter().show_indoor);
    assert!(controller.view().is_empty());
    assert!(controller.markers().is_empty());

    let request = located(&mut controller);
    controller.set_show_outdoor(true);
    assert!(controller.view().is_empty(), "still querying");

    controller.on_query_result(
        request.token,
        Ok(vec![park_north(1, 2.0, true), park_north(2, 50.0, false)]),
    );
    assert_eq!(
        view_ids(&controller),
        vec![2],
        "recorded filter applies at Ready"
    );
}

#[test]
fn filter_applies_after_failed_retry_from_ready() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    controller.on_query_result(
        request.token,
        Ok(vec![park_north(1, 2.0, true), park_north(2, 50.0, false)]),
    );

    let retry = controller.begin_locating().unwrap();
    let timeout = DiscoveryError::LocationError("timeout".to_string());
    controller.on_fix(retry, Err(timeout));
    assert_eq!(controller.state(), DiscoveryState::LocationFailed);

    controller.set_show_indoor(false);
    assert_eq!(view_ids(&controller), vec![2]);
    assert_eq!(controller.markers().displayed_ids(), BTreeSet::from([2]));
}

#[test]
fn cannot_begin_while_request_outstanding() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    controller.begin_locating().unwrap();
    assert!(controller.begin_locating().is_none());

    let mut controller = DiscoveryController::new(LiveMap::default());
    located(&mut controller);
    assert!(controller.begin_locating().is_none(), "no second query");
    assert_eq!(controller.state(), DiscoveryState::Querying);
}

#[test]
fn late_fix_from_superseded_attempt_is_discarded() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let first = controller.begin_locating().unwrap();
    let timeout = DiscoveryError::LocationError("timeout".to_string());
    controller.on_fix(first, Err(timeout));

    let second = controller.begin_locating().expect("retry after failure");
    assert!(controller.error().is_none(), "retry clears the old message");
    assert!(controller.on_fix(first, Ok(HOME)).is_none());
    assert_eq!(controller.state(), DiscoveryState::Locating);
    assert!(controller.reference().is_none());

    assert!(controller.on_fix(second, Ok(HOME)).is_some());
}

#[test]
fn duplicate_query_delivery_is_discarded() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    let results = vec![park_north(1, 2.0, false)];
    assert!(controller.on_query_result(request.token, Ok(results)));

    let failure = query_failure();
    assert!(!controller.on_query_result(request.token, Err(failure)));
    assert_eq!(controller.state(), DiscoveryState::Ready);
    assert_eq!(view_ids(&controller), vec![1]);
}

#[test]
fn query_result_with_fix_token_is_discarded() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let fix_token = controller.begin_locating().unwrap();
    let request = controller.on_fix(fix_token, Ok(HOME)).unwrap();
    assert_ne!(fix_token, request.token);

    let results = vec![park_north(1, 1.0, false)];
    assert!(!controller.on_query_result(fix_token, Ok(results)));
    assert_eq!(controller.state(), DiscoveryState::Querying);
}

#[test]
fn requery_after_ready_replaces_results() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    controller.on_query_result(
        request.token,
        Ok(vec![park_north(1, 2.0, false), park_north(2, 3.0, false)]),
    );

    let request = located(&mut controller);
    assert_eq!(controller.markers().surface().views, 1, "view created once");
    controller.on_query_result(
        request.token,
        Ok(vec![park_north(2, 3.0, false), park_north(3, 4.0, false)]),
    );
    assert_eq!(controller.markers().displayed_ids(), BTreeSet::from([2, 3]));
}

#[test]
fn focus_known_and_unknown_ids() {
    let mut controller = DiscoveryController::new(LiveMap::default());
    let request = located(&mut controller);
    controller.on_query_result(
        request.token,
        Ok(vec![park_north(1, 2.0, true), park_north(2, 50.0, false)]),
    );
    controller.set_show_indoor(false);

    assert!(controller.focus(2));
    assert!(controller.focus(1), "filtered-out result still focusable");
    assert!(!controller.focus(42));
}

#[test]
fn state_display_is_snake_case() {
    assert_eq!(DiscoveryState::QueryFailed.to_string(), "query_failed");
    assert_eq!(DiscoveryState::Ready.to_string(), "ready");
}
