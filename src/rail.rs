use std::fmt::Write;

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::config::OpenDataConfig;
use crate::render::scalar_or;
use crate::upstream::UpstreamClient;

pub const KEY_NOT_CONFIGURED: &str = "Indian Rail API key not configured";

const MAX_STATIONS: usize = 5;
const MAX_ROUTE_STOPS: usize = 10;
const MAX_STATION_TRAINS: usize = 15;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StationNameToCodeRequest {
    #[schemars(description = "Station name to look up, e.g. 'New Delhi'")]
    pub station_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TrainScheduleRequest {
    #[schemars(description = "Train number, e.g. '12951'")]
    pub train_number: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TrainsAtStationRequest {
    #[schemars(description = "Station code, e.g. 'NDLS'")]
    pub station_code: String,
}

pub async fn station_name_to_code(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: StationNameToCodeRequest,
) -> String {
    let Some(key) = &config.rail_api_key else {
        return KEY_NOT_CONFIGURED.to_string();
    };
    let name = request.station_name.to_uppercase();
    let Ok(url) = config.rail_base.join(&format!(
        "StationNameToCode/apikey/{}/StationName/{}",
        key, name
    )) else {
        return "Unable to fetch station data".to_string();
    };

    let Some(data) = upstream.get_rail(url).await else {
        return "Unable to fetch station data".to_string();
    };

    let stations = match data.get("Station").and_then(Value::as_array) {
        Some(stations) if response_ok(&data) && !stations.is_empty() => stations,
        _ => return format!("No stations found for '{}'", name),
    };

    let mut result = "Station codes found:\n".to_string();
    for station in stations.iter().take(MAX_STATIONS) {
        let _ = write!(
            result,
            "Name: {}\nCode: {}\nState: {}\n---\n",
            scalar_or(station, "StationName", "N/A"),
            scalar_or(station, "StationCode", "N/A"),
            scalar_or(station, "StateName", "N/A"),
        );
    }
    result
}

pub async fn train_schedule(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: TrainScheduleRequest,
) -> String {
    let Some(key) = &config.rail_api_key else {
        return KEY_NOT_CONFIGURED.to_string();
    };
    let Ok(url) = config.rail_base.join(&format!(
        "TrainSchedule/apikey/{}/TrainNumber/{}",
        key, request.train_number
    )) else {
        return "Unable to fetch train schedule".to_string();
    };

    let Some(data) = upstream.get_rail(url).await else {
        return "Unable to fetch train schedule".to_string();
    };

    let route = match data.get("Route").and_then(Value::as_array) {
        Some(route) if response_ok(&data) && !route.is_empty() => route,
        _ => return format!("No schedule found for train {}", request.train_number),
    };

    let mut result = format!(
        "Train {} Schedule:\nTrain Name: {}\nTrain Number: {}\n\nSchedule:\n",
        request.train_number,
        scalar_or(&data, "TrainName", "N/A"),
        scalar_or(&data, "TrainNumber", "N/A"),
    );
    for stop in route.iter().take(MAX_ROUTE_STOPS) {
        let _ = write!(
            result,
            "Station: {} ({})\nArrival: {} | Departure: {}\nDistance: {} km\n---\n",
            scalar_or(stop, "StationName", "N/A"),
            scalar_or(stop, "StationCode", "N/A"),
            scalar_or(stop, "ArrivalTime", "N/A"),
            scalar_or(stop, "DepartureTime", "N/A"),
            scalar_or(stop, "DistanceFromSource", "N/A"),
        );
    }
    result
}

pub async fn trains_at_station(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: TrainsAtStationRequest,
) -> String {
    let Some(key) = &config.rail_api_key else {
        return KEY_NOT_CONFIGURED.to_string();
    };
    let code = request.station_code.to_uppercase();
    let Ok(url) = config.rail_base.join(&format!(
        "AllTrainOnStation/apikey/{}/StationCode/{}",
        key, code
    )) else {
        return "Unable to fetch trains for station".to_string();
    };

    let Some(data) = upstream.get_rail(url).await else {
        return "Unable to fetch trains for station".to_string();
    };

    let trains = match data.get("Trains").and_then(Value::as_array) {
        Some(trains) if response_ok(&data) && !trains.is_empty() => trains,
        _ => return format!("No trains found for station {}", code),
    };

    let mut result = format!("Trains at station {}:\n", code);
    for train in trains.iter().take(MAX_STATION_TRAINS) {
        let _ = write!(
            result,
            "Train: {} ({})\nArrival: {} | Departure: {}\nSource: {} | Destination: {}\n---\n",
            scalar_or(train, "TrainName", "N/A"),
            scalar_or(train, "TrainNumber", "N/A"),
            scalar_or(train, "ArrivalTime", "N/A"),
            scalar_or(train, "DepartureTime", "N/A"),
            scalar_or(train, "SourceStationName", "N/A"),
            scalar_or(train, "DestinationStationName", "N/A"),
        );
    }
    result
}

// The rail API reports success in-band; 200 may arrive as number or string.
fn response_ok(data: &Value) -> bool {
    match data.get("ResponseCode") {
        Some(Value::Number(n)) => n.as_i64() == Some(200),
        Some(Value::String(s)) => s == "200",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_ok_accepts_numeric_and_string_codes() {
        assert!(response_ok(&json!({"ResponseCode": 200})));
        assert!(response_ok(&json!({"ResponseCode": "200"})));
        assert!(!response_ok(&json!({"ResponseCode": 404})));
        assert!(!response_ok(&json!({})));
    }
}
