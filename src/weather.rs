use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::config::OpenDataConfig;
use crate::render::{SECTION_SEPARATOR, int_or, text_or};
use crate::upstream::UpstreamClient;

const MAX_FORECAST_PERIODS: usize = 5;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetAlertsRequest {
    #[schemars(description = "Two-letter US state code, e.g. CA or NY")]
    pub state: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetForecastRequest {
    #[schemars(description = "Latitude of the location")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location")]
    pub longitude: f64,
}

pub async fn alerts(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: GetAlertsRequest,
) -> String {
    let state = request.state.to_uppercase();
    let Ok(url) = config.nws_base.join(&format!("alerts/active/area/{}", state)) else {
        return "Unable to fetch alerts or no alerts found.".to_string();
    };

    let Some(data) = upstream.get_nws(url).await else {
        return "Unable to fetch alerts or no alerts found.".to_string();
    };
    let Some(features) = data.get("features").and_then(Value::as_array) else {
        return "Unable to fetch alerts or no alerts found.".to_string();
    };
    if features.is_empty() {
        return "No active alerts for this state.".to_string();
    }

    features
        .iter()
        .map(format_alert)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

pub async fn forecast(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: GetForecastRequest,
) -> String {
    let Ok(points_url) = config
        .nws_base
        .join(&format!("points/{},{}", request.latitude, request.longitude))
    else {
        return "Unable to fetch forecast data for this location.".to_string();
    };

    let Some(points) = upstream.get_nws(points_url).await else {
        return "Unable to fetch forecast data for this location.".to_string();
    };
    // The points lookup yields the grid-specific forecast URL to follow.
    let Some(forecast_url) = points
        .get("properties")
        .and_then(|p| p.get("forecast"))
        .and_then(Value::as_str)
        .and_then(|raw| Url::parse(raw).ok())
    else {
        return "Unable to fetch forecast data for this location.".to_string();
    };

    let Some(data) = upstream.get_nws(forecast_url).await else {
        return "Unable to fetch detailed forecast.".to_string();
    };
    let Some(periods) = data
        .get("properties")
        .and_then(|p| p.get("periods"))
        .and_then(Value::as_array)
    else {
        return "Unable to fetch detailed forecast.".to_string();
    };

    periods
        .iter()
        .take(MAX_FORECAST_PERIODS)
        .map(format_period)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

fn format_alert(feature: &Value) -> String {
    let null = Value::Null;
    let props = feature.get("properties").unwrap_or(&null);
    format!(
        "\nEvent: {}\nArea: {}\nSeverity: {}\nDescription: {}\nInstructions: {}\n",
        text_or(props, "event", "Unknown"),
        text_or(props, "areaDesc", "Unknown"),
        text_or(props, "severity", "Unknown"),
        text_or(props, "description", "No description available"),
        text_or(props, "instruction", "No specific instructions provided"),
    )
}

fn format_period(period: &Value) -> String {
    format!(
        "\n{}:\nTemperature: {}°{}\nWind: {} {}\nForecast: {}\n",
        text_or(period, "name", "Unknown"),
        int_or(period, "temperature"),
        text_or(period, "temperatureUnit", "F"),
        text_or(period, "windSpeed", "Unknown"),
        text_or(period, "windDirection", "Unknown"),
        text_or(period, "detailedForecast", "No description available"),
    )
}
