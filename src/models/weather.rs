use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions shown on the dashboard header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Resolved location name
    pub location: String,
    /// Chance of precipitation, percent
    pub precipitation: u8,
    /// Relative humidity, percent
    pub humidity: u8,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Local sunset time label, e.g. "18:42"
    pub sunset: String,
    /// Condition code understood by the icon set
    pub condition: String,
}

/// One entry of the 7-day forecast strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// Day label, e.g. "Mon"
    pub day: String,
    /// Temperature in degrees Celsius
    pub temperature: f64,
    /// Condition code understood by the icon set
    pub condition: String,
    pub is_today: bool,
}

/// Weather state for one owner, overwritten wholesale on each
/// successful fetch. Either half may be absent when its fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub current: Option<CurrentConditions>,
    pub forecast: Vec<ForecastDay>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    pub fn new(current: Option<CurrentConditions>, forecast: Vec<ForecastDay>) -> Self {
        Self {
            current,
            forecast,
            fetched_at: Utc::now(),
        }
    }

    /// True when neither fetch produced data.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.forecast.is_empty()
    }

    /// The forecast entry flagged as today, when present.
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.iter().find(|d| d.is_today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_current() -> CurrentConditions {
        CurrentConditions {
            temperature: 24.5,
            location: "Eldoret".to_string(),
            precipitation: 40,
            humidity: 62,
            wind_speed: 12.0,
            sunset: "18:42".to_string(),
            condition: "partly-cloudy".to_string(),
        }
    }

    fn sample_forecast() -> Vec<ForecastDay> {
        vec![
            ForecastDay {
                day: "Mon".to_string(),
                temperature: 24.0,
                condition: "sunny".to_string(),
                is_today: true,
            },
            ForecastDay {
                day: "Tue".to_string(),
                temperature: 21.0,
                condition: "rain".to_string(),
                is_today: false,
            },
        ]
    }

    #[test]
    fn test_is_empty() {
        assert!(WeatherSnapshot::new(None, Vec::new()).is_empty());
        assert!(!WeatherSnapshot::new(Some(sample_current()), Vec::new()).is_empty());
        assert!(!WeatherSnapshot::new(None, sample_forecast()).is_empty());
    }

    #[test]
    fn test_today_lookup() {
        let snapshot = WeatherSnapshot::new(Some(sample_current()), sample_forecast());
        assert_eq!(snapshot.today().unwrap().day, "Mon");

        let no_today = WeatherSnapshot::new(None, Vec::new());
        assert!(no_today.today().is_none());
    }

    #[test]
    fn test_json_roundtrip_keeps_camel_case() {
        let snapshot = WeatherSnapshot::new(Some(sample_current()), sample_forecast());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"isToday\""));
        assert!(json.contains("\"windSpeed\""));

        let parsed: WeatherSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
