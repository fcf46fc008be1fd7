//! JSON payload decoding.

use super::feed::FeedRecord;
use serde::Deserialize;

/// Data Miner response envelope. Pagination metadata and links are ignored.
#[derive(Debug, Deserialize)]
struct Envelope<R> {
    items: Vec<R>,
}

/// Decode a response body into records, preserving the order the API sent them.
pub fn decode<R: FeedRecord>(payload: &[u8]) -> Result<Vec<R>, serde_json::Error> {
    let envelope: Envelope<R> = serde_json::from_slice(payload)?;
    Ok(envelope.items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::{LoadForecast, WindForecast};

    #[test]
    fn decodes_items_in_order() {
        let payload = br#"{
            "totalRows": 2,
            "items": [
                {"evaluated_at_utc": "a", "forecast_area": "RTO", "forecast_load_mw": 90000},
                {"evaluated_at_utc": "b", "forecast_area": "MIDATL", "forecast_load_mw": 31000}
            ],
            "links": []
        }"#;
        let records: Vec<LoadForecast> = decode(payload).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].forecast_area, "RTO");
        assert_eq!(records[1].forecast_load_mw, 31000);
    }

    #[test]
    fn empty_items_is_ok() {
        let records: Vec<WindForecast> = decode(br#"{"items": []}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_items_is_an_error() {
        assert!(decode::<WindForecast>(br#"{"errors": ["bad"]}"#).is_err());
    }

    #[test]
    fn wrong_field_type_is_an_error() {
        let payload = br#"{"items": [{"wind_forecast_mwh": "lots"}]}"#;
        assert!(decode::<WindForecast>(payload).is_err());
    }

    #[test]
    fn non_json_is_an_error() {
        assert!(decode::<LoadForecast>(b"<html>maintenance</html>").is_err());
    }
}
