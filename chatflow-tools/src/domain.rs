//! Built-in domain tools: trip feasibility, car status, weather forecast and
//! travel recommendations. Business logic is intentionally canned; what
//! matters is the invocation contract.

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::{
    core::{Tool, ToolParameters, ToolResult, empty_schema},
    error::Result,
};

/// Checks whether a trip is feasible given distance, autonomy and fuel.
#[derive(Debug, Default)]
pub struct TripFeasibilityTool;

#[async_trait]
impl Tool for TripFeasibilityTool {
    fn name(&self) -> &str {
        "is_trip_possible"
    }

    fn description(&self) -> &str {
        "Check if a trip is possible given distance (km), fuel autonomy (km/L) and gas (L)"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "distance": { "type": "number", "description": "Trip distance in kilometers" },
                "autonomy": { "type": "number", "description": "Fuel autonomy in km per liter" },
                "gas": { "type": "number", "description": "Available gas in liters" }
            },
            "required": ["distance", "autonomy", "gas"]
        })
    }

    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult> {
        let distance = parameters.get_f64("distance")?;
        let autonomy = parameters.get_f64("autonomy")?;
        let gas = parameters.get_f64("gas")?;

        info!(distance, autonomy, gas, "checking trip feasibility");
        let possible = distance / autonomy >= gas;
        Ok(ToolResult::success(possible.to_string()))
    }
}

/// Reports the car's current fuel level and autonomy.
#[derive(Debug, Default)]
pub struct CarStatusTool;

#[async_trait]
impl Tool for CarStatusTool {
    fn name(&self) -> &str {
        "get_car_status"
    }

    fn description(&self) -> &str {
        "Get the current status of the car (fuel level and autonomy)"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        empty_schema()
    }

    async fn execute(&self, _parameters: ToolParameters) -> Result<ToolResult> {
        let gas_liters = fastrand::u32(25..=55);
        let autonomy = fastrand::u32(7..=12);
        info!(gas_liters, autonomy, "car status read");
        Ok(ToolResult::success(format!(
            "The car has {gas_liters} liters of gas and a current autonomy of {autonomy} km/liters."
        )))
    }
}

/// Predicts tomorrow's weather.
#[derive(Debug, Default)]
pub struct WeatherTool;

const WEATHER_CONDITIONS: [&str; 3] = ["sunny", "cloudy", "rainy"];

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_predicted_weather"
    }

    fn description(&self) -> &str {
        "Get the predicted weather for the next day"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        empty_schema()
    }

    async fn execute(&self, _parameters: ToolParameters) -> Result<ToolResult> {
        let condition = WEATHER_CONDITIONS[fastrand::usize(..WEATHER_CONDITIONS.len())];
        info!(condition, "weather predicted");
        Ok(ToolResult::success(condition))
    }
}

/// Recommends travel destinations for a free-text query.
#[derive(Debug, Default)]
pub struct TravelRecommendationsTool;

struct Destination {
    name: &'static str,
    distance_km: u32,
    weather: &'static str,
    description: &'static str,
    travel_time: &'static str,
    kind: &'static str,
}

const DESTINATIONS: [Destination; 5] = [
    Destination {
        name: "Florianópolis",
        distance_km: 300,
        weather: "Sunny",
        description: "Beautiful island with beaches and Azorean culture",
        travel_time: "3h30min",
        kind: "beach",
    },
    Destination {
        name: "Campos do Jordão",
        distance_km: 180,
        weather: "Partly cloudy",
        description: "Mountain town with European climate and architecture",
        travel_time: "2h15min",
        kind: "mountain",
    },
    Destination {
        name: "Santos",
        distance_km: 80,
        weather: "Sunny",
        description: "Coastal city with the largest port in the Americas",
        travel_time: "1h20min",
        kind: "beach",
    },
    Destination {
        name: "Ouro Preto",
        distance_km: 450,
        weather: "Cloudy",
        description: "Colonial town with baroque architecture",
        travel_time: "5h30min",
        kind: "historic",
    },
    Destination {
        name: "Ubatuba",
        distance_km: 250,
        weather: "Sunny",
        description: "Ecological paradise with 100+ beaches and rainforest",
        travel_time: "3h00min",
        kind: "beach",
    },
];

#[async_trait]
impl Tool for TravelRecommendationsTool {
    fn name(&self) -> &str {
        "recommend_locations"
    }

    fn description(&self) -> &str {
        "Recommend travel destinations with distance, weather and description"
    }

    fn parameter_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Desired destination type (beach, mountain, historic, ...)"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, parameters: ToolParameters) -> Result<ToolResult> {
        let query = parameters.get_string("query")?.to_lowercase();
        info!(%query, "recommending destinations");

        let selected: Vec<&Destination> = if ["beach", "sea", "coast"]
            .iter()
            .any(|kw| query.contains(kw))
        {
            DESTINATIONS.iter().filter(|d| d.kind == "beach").collect()
        } else if ["mountain", "cold", "hills"].iter().any(|kw| query.contains(kw)) {
            DESTINATIONS.iter().filter(|d| d.kind == "mountain").collect()
        } else if ["histor", "cultur"].iter().any(|kw| query.contains(kw)) {
            DESTINATIONS.iter().filter(|d| d.kind == "historic").collect()
        } else {
            // generic query: one destination of each kind for variety
            ["beach", "mountain", "historic"]
                .iter()
                .filter_map(|kind| DESTINATIONS.iter().find(|d| d.kind == *kind))
                .collect()
        };

        let payload: Vec<serde_json::Value> = selected
            .into_iter()
            .take(3)
            .map(|d| {
                json!({
                    "name": d.name,
                    "distance_km": d.distance_km,
                    "weather": d.weather,
                    "description": d.description,
                    "travel_time": d.travel_time,
                    "type": d.kind,
                })
            })
            .collect();

        Ok(ToolResult::success(serde_json::to_string(&payload)?))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn trip_feasibility_matches_formula() {
        let tool = TripFeasibilityTool;
        let params = ToolParameters::new(json!({
            "distance": 300.0, "autonomy": 10.0, "gas": 20.0
        }));
        let result = tool.execute(params).await.unwrap();
        // 300 / 10 = 30 >= 20
        assert_eq!(result.content, "true");

        let params = ToolParameters::new(json!({
            "distance": 100.0, "autonomy": 10.0, "gas": 20.0
        }));
        let result = tool.execute(params).await.unwrap();
        assert_eq!(result.content, "false");
    }

    #[tokio::test]
    async fn car_status_reports_ranges() {
        let tool = CarStatusTool;
        let result = tool.execute(ToolParameters::empty()).await.unwrap();
        assert!(result.content.contains("liters of gas"));
        assert!(result.content.contains("autonomy"));
    }

    #[tokio::test]
    async fn weather_is_one_of_known_conditions() {
        let tool = WeatherTool;
        let result = tool.execute(ToolParameters::empty()).await.unwrap();
        assert!(WEATHER_CONDITIONS.contains(&result.content.as_str()));
    }

    #[tokio::test]
    async fn travel_filters_by_type_and_caps_at_three() {
        let tool = TravelRecommendationsTool;

        let result = tool
            .execute(ToolParameters::new(json!({"query": "beach trip"})))
            .await
            .unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&result.content).unwrap();
        assert!(!parsed.is_empty() && parsed.len() <= 3);
        assert!(parsed.iter().all(|d| d["type"] == "beach"));

        let result = tool
            .execute(ToolParameters::new(json!({"query": "anywhere nice"})))
            .await
            .unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&result.content).unwrap();
        assert_eq!(parsed.len(), 3);
    }
}
