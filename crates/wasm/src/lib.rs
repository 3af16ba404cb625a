use std::sync::Mutex;

use journey_core::filter::ActivityFilter;
use journey_core::layout::{LayoutCache, LayoutMode, UnknownModeError};
use journey_core::model::{Activity, dates};
use journey_core::views::timeline;
use journey_protocol::Viewport;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// The page re-lays out on every resize tick; consecutive calls with the
/// same snapshot and width are served from here.
static CACHE: Mutex<Option<LayoutCache>> = Mutex::new(None);

#[derive(Debug, Error)]
enum BridgeError {
    #[error("invalid activities JSON: {0}")]
    Activities(#[source] serde_json::Error),
    #[error("invalid filter JSON: {0}")]
    Filter(#[source] serde_json::Error),
    #[error(transparent)]
    Mode(#[from] UnknownModeError),
    #[error("invalid date `{0}`")]
    Date(String),
    #[error("failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("layout cache is poisoned")]
    Poisoned,
}

fn parse_activities(json: &str) -> Result<Vec<Activity>, BridgeError> {
    serde_json::from_str(json).map_err(BridgeError::Activities)
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, BridgeError> {
    serde_json::to_string(value).map_err(BridgeError::Encode)
}

fn with_cache<T>(f: impl FnOnce(&mut LayoutCache) -> T) -> Result<T, BridgeError> {
    let mut guard = CACHE.lock().map_err(|_| BridgeError::Poisoned)?;
    Ok(f(guard.get_or_insert_with(LayoutCache::default)))
}

fn layout_to_json(
    activities_json: &str,
    available_width: f64,
    mode: &str,
) -> Result<String, BridgeError> {
    let activities = parse_activities(activities_json)?;
    let mode: LayoutMode = mode.parse()?;
    with_cache(|cache| encode(cache.get_or_compute(&activities, available_width, mode)))?
}

fn render_to_json(
    activities_json: &str,
    available_width: f64,
    mode: &str,
    viewport: &Viewport,
) -> Result<String, BridgeError> {
    let activities = parse_activities(activities_json)?;
    let mode: LayoutMode = mode.parse()?;
    let commands = with_cache(|cache| {
        let config = *cache.config();
        let result = cache.get_or_compute(&activities, available_width, mode);
        timeline::render_timeline(result, &activities, &config, viewport)
    })?;
    encode(&commands)
}

fn filter_to_json(
    activities_json: &str,
    filter_json: &str,
    today: &str,
) -> Result<String, BridgeError> {
    let activities = parse_activities(activities_json)?;
    let filter: ActivityFilter = serde_json::from_str(filter_json).map_err(BridgeError::Filter)?;
    let today = dates::parse_date(today).ok_or_else(|| BridgeError::Date(today.to_string()))?;
    encode(&filter.apply(&activities, today))
}

/// Lay out activities (a JSON array) for the given width and mode
/// (`"inline"` or `"outline"`). Returns the layout result as JSON.
#[wasm_bindgen]
pub fn compute_layout(
    activities_json: &str,
    available_width: f64,
    mode: &str,
) -> Result<String, JsError> {
    Ok(layout_to_json(activities_json, available_width, mode)?)
}

/// Lay out and render activities, returning render commands as JSON.
///
/// `x` is the horizontal scroll offset into overflowing content.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn render_timeline(
    activities_json: &str,
    available_width: f64,
    mode: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    dpr: f64,
) -> Result<String, JsError> {
    let viewport = Viewport {
        x,
        y,
        width,
        height,
        dpr,
    };
    Ok(render_to_json(activities_json, available_width, mode, &viewport)?)
}

/// Apply an activity filter (JSON) relative to `today` (`YYYY-MM-DD`).
/// Returns the matching activities as JSON, in input order.
#[wasm_bindgen]
pub fn filter_activities(
    activities_json: &str,
    filter_json: &str,
    today: &str,
) -> Result<String, JsError> {
    Ok(filter_to_json(activities_json, filter_json, today)?)
}

/// Drop the memoized layout (e.g. after switching timelines).
#[wasm_bindgen]
pub fn reset_layout_cache() -> Result<(), JsError> {
    Ok(with_cache(LayoutCache::invalidate)?)
}
