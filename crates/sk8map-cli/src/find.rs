//! `find` command: run one discovery session and print the result view.

use std::env::VarError;
use std::time::Duration;

use sk8map_core::{build_app_config, AppConfig, Coordinate, EnrichedResult, FilterState};
use sk8map_discovery::{DiscoveryController, DiscoveryState, FixOptions, GeoLocator};
use sk8map_overpass::OverpassClient;

use crate::console::{ConsoleMap, StaticPosition};

const RADIUS_VAR: &str = "SK8MAP_SEARCH_RADIUS_MILES";

#[derive(Debug, Clone)]
pub(crate) struct FindArgs {
    pub(crate) origin: Option<Coordinate>,
    pub(crate) hide_indoor: bool,
    pub(crate) hide_outdoor: bool,
    pub(crate) focus: Option<i64>,
}

impl FindArgs {
    fn filter(&self) -> FilterState {
        FilterState {
            show_indoor: !self.hide_indoor,
            show_outdoor: !self.hide_outdoor,
        }
    }
}

/// Load configuration from the process environment, with `--radius-miles`
/// taking the place of `SK8MAP_SEARCH_RADIUS_MILES` when given.
///
/// # Errors
///
/// Returns an error if the override is not a positive finite number or any
/// environment value is invalid.
pub(crate) fn load_config(radius_miles: Option<f64>) -> anyhow::Result<AppConfig> {
    if let Some(miles) = radius_miles {
        if !miles.is_finite() || miles <= 0.0 {
            anyhow::bail!("--radius-miles must be positive, got {miles}");
        }
    }
    let lookup = with_radius_override(radius_miles, |key| std::env::var(key));
    Ok(build_app_config(lookup)?)
}

fn with_radius_override<F>(
    radius_miles: Option<f64>,
    lookup: F,
) -> impl Fn(&str) -> Result<String, VarError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    move |key| match radius_miles {
        Some(miles) if key == RADIUS_VAR => Ok(miles.to_string()),
        _ => lookup(key),
    }
}

/// Run a discovery session and print the displayed parks.
///
/// Location and query failures are reported to the user, not returned as
/// errors.
///
/// # Errors
///
/// Returns an error if the Overpass client cannot be constructed.
pub(crate) async fn run_find(config: &AppConfig, args: &FindArgs) -> anyhow::Result<()> {
    let client = OverpassClient::from_config(config)?;
    let locator = GeoLocator::with_options(
        StaticPosition::new(args.origin),
        FixOptions {
            timeout: Duration::from_secs(config.location_timeout_secs),
            ..FixOptions::default()
        },
    );

    let surface = ConsoleMap::default();
    let mut controller = DiscoveryController::with_radius(surface, config.search_radius_meters());
    controller.set_filter(args.filter());

    let state = controller.run(&locator, &client).await;
    if state != DiscoveryState::Ready {
        let message = controller.error().unwrap_or("discovery did not complete");
        println!("{message}");
        return Ok(());
    }

    print_view(controller.view(), controller.raw_results().len());

    if let Some(id) = args.focus {
        if !controller.focus(id) {
            println!("no skatepark with id {id} in the results");
        }
    }

    tracing::debug!(
        live_markers = controller.markers().surface().live_markers(),
        "session finished"
    );
    Ok(())
}

fn print_view(view: &[EnrichedResult], total: usize) {
    if view.is_empty() {
        println!("No skateparks found ({total} before filtering).");
        return;
    }

    println!(
        "{} skatepark(s), nearest first ({total} found):",
        view.len()
    );
    for result in view {
        println!("{}", format_row(result));
    }
}

fn format_row(result: &EnrichedResult) -> String {
    let kind = if result.is_indoor { "indoor" } else { "outdoor" };
    format!(
        "  {:>7.1} mi  {:<32} {:<8} #{}",
        result.distance_miles,
        result.raw.display_label(),
        kind,
        result.id()
    )
}
