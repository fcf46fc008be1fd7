//! Feed definitions — the four Data Miner record shapes and their query constants.
//!
//! A [`Feed`] carries everything that differs between endpoints (sort field,
//! field list, range filter, CSV header). A [`FeedRecord`] is the typed row
//! decoded from that endpoint. The fetch pipeline is generic over the record
//! type, so adding a feed means adding one enum arm and one struct.

use serde::{Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// Sort direction accepted by the `order` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "Asc",
            SortOrder::Desc => "Desc",
        }
    }
}

/// One of the supported Data Miner feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Historical load forecasts (`load_frcstd_hist`).
    LoadForecast,
    /// Real-time hourly locational marginal prices (`rt_hrl_lmps`).
    RealTimeLmp,
    /// Hourly solar power forecast.
    SolarForecast,
    /// Hourly wind power forecast.
    WindForecast,
}

impl Feed {
    pub const ALL: [Feed; 4] = [
        Feed::LoadForecast,
        Feed::RealTimeLmp,
        Feed::SolarForecast,
        Feed::WindForecast,
    ];

    /// API endpoint name, also used as the output directory name.
    pub fn endpoint(self) -> &'static str {
        match self {
            Feed::LoadForecast => "load_frcstd_hist",
            Feed::RealTimeLmp => "rt_hrl_lmps",
            Feed::SolarForecast => "hourly_solar_power_forecast",
            Feed::WindForecast => "hourly_wind_power_forecast",
        }
    }

    pub fn sort_field(self) -> &'static str {
        match self {
            Feed::LoadForecast => "forecast_hour_beginning_utc",
            Feed::RealTimeLmp => "datetime_beginning_ept",
            Feed::SolarForecast | Feed::WindForecast => "evaluated_at_utc",
        }
    }

    pub fn sort_order(self) -> SortOrder {
        match self {
            Feed::LoadForecast | Feed::RealTimeLmp => SortOrder::Asc,
            Feed::SolarForecast | Feed::WindForecast => SortOrder::Desc,
        }
    }

    /// Fields requested from the API, in the order the API documents them.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Feed::LoadForecast => &[
                "evaluated_at_ept",
                "evaluated_at_utc",
                "forecast_area",
                "forecast_hour_beginning_ept",
                "forecast_hour_beginning_utc",
                "forecast_load_mw",
            ],
            Feed::RealTimeLmp => &[
                "congestion_price_rt",
                "datetime_beginning_ept",
                "datetime_beginning_utc",
                "equipment",
                "marginal_loss_price_rt",
                "pnode_id",
                "pnode_name",
                "row_is_current",
                "system_energy_price_rt",
                "total_lmp_rt",
                "type",
                "version_nbr",
                "voltage",
                "zone",
            ],
            Feed::SolarForecast => &[
                "datetime_beginning_ept",
                "datetime_beginning_utc",
                "datetime_ending_ept",
                "datetime_ending_utc",
                "evaluated_at_ept",
                "evaluated_at_utc",
                "solar_forecast_btm_mwh",
                "solar_forecast_mwh",
            ],
            Feed::WindForecast => &[
                "datetime_beginning_ept",
                "datetime_beginning_utc",
                "datetime_ending_ept",
                "datetime_ending_utc",
                "evaluated_at_ept",
                "evaluated_at_utc",
                "wind_forecast_mwh",
            ],
        }
    }

    /// Name of the query parameter that carries the `<start>to<end>` filter.
    pub fn range_param(self) -> &'static str {
        match self {
            Feed::LoadForecast => "forecast_hour_beginning_ept",
            Feed::RealTimeLmp => "datetime_beginning_ept",
            Feed::SolarForecast | Feed::WindForecast => "evaluated_at_ept",
        }
    }

    /// CSV header row, matching the column order of [`FeedRecord::to_row`].
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Feed::LoadForecast => &[
                "Evaluated At UTC",
                "Evaluated At EPT",
                "Forecast Hour Beginning UTC",
                "Forecast Hour Beginning EPT",
                "Forecast Area",
                "Forecast Load MW",
            ],
            Feed::RealTimeLmp => &[
                "Datetime Beginning UTC",
                "Datetime Beginning EPT",
                "Pnode ID",
                "Pnode Name",
                "Voltage",
                "Equipment",
                "Type",
                "Zone",
                "System Energy Price RT",
                "Total LMP RT",
                "Congestion Price RT",
                "Marginal Loss Price RT",
                "Row Is Current",
                "Version Number",
            ],
            Feed::SolarForecast => &[
                "Evaluated At UTC",
                "Evaluated At EPT",
                "Datetime Beginning UTC",
                "Datetime Beginning EPT",
                "Datetime Ending UTC",
                "Datetime Ending EPT",
                "Solar Forecast MWH",
                "Solar Forecast BTM MWH",
            ],
            Feed::WindForecast => &[
                "Evaluated At UTC",
                "Evaluated At EPT",
                "Datetime Beginning UTC",
                "Datetime Beginning EPT",
                "Datetime Ending UTC",
                "Datetime Ending EPT",
                "Wind Forecast MWH",
            ],
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for Feed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "load" | "load_frcstd_hist" => Ok(Feed::LoadForecast),
            "lmp" | "rt_hrl_lmps" => Ok(Feed::RealTimeLmp),
            "solar" | "hourly_solar_power_forecast" => Ok(Feed::SolarForecast),
            "wind" | "hourly_wind_power_forecast" => Ok(Feed::WindForecast),
            other => Err(format!(
                "unknown feed '{other}'. Valid: load, lmp, solar, wind (or the endpoint name)"
            )),
        }
    }
}

/// A typed row of one feed.
pub trait FeedRecord: DeserializeOwned + Clone + fmt::Debug + Send + Sync {
    const FEED: Feed;

    /// Render the row in [`Feed::header`] order.
    fn to_row(&self) -> Vec<String>;
}

/// Treat JSON `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn price(v: f64) -> String {
    format!("{v:.6}")
}

fn energy(v: f64) -> String {
    format!("{v:.3}")
}

/// Load forecast for one area and forecast hour.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoadForecast {
    #[serde(deserialize_with = "nullable")]
    pub evaluated_at_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub evaluated_at_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub forecast_hour_beginning_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub forecast_hour_beginning_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub forecast_area: String,
    #[serde(deserialize_with = "nullable")]
    pub forecast_load_mw: i64,
}

impl FeedRecord for LoadForecast {
    const FEED: Feed = Feed::LoadForecast;

    fn to_row(&self) -> Vec<String> {
        vec![
            self.evaluated_at_utc.clone(),
            self.evaluated_at_ept.clone(),
            self.forecast_hour_beginning_utc.clone(),
            self.forecast_hour_beginning_ept.clone(),
            self.forecast_area.clone(),
            self.forecast_load_mw.to_string(),
        ]
    }
}

/// Real-time hourly LMP for one pricing node.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RealTimeLmp {
    #[serde(deserialize_with = "nullable")]
    pub datetime_beginning_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_beginning_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub pnode_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub pnode_name: String,
    #[serde(deserialize_with = "nullable")]
    pub voltage: String,
    #[serde(deserialize_with = "nullable")]
    pub equipment: String,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub node_type: String,
    #[serde(deserialize_with = "nullable")]
    pub zone: String,
    #[serde(deserialize_with = "nullable")]
    pub system_energy_price_rt: f64,
    #[serde(deserialize_with = "nullable")]
    pub total_lmp_rt: f64,
    #[serde(deserialize_with = "nullable")]
    pub congestion_price_rt: f64,
    #[serde(deserialize_with = "nullable")]
    pub marginal_loss_price_rt: f64,
    #[serde(deserialize_with = "nullable")]
    pub row_is_current: bool,
    #[serde(deserialize_with = "nullable")]
    pub version_nbr: i64,
}

impl FeedRecord for RealTimeLmp {
    const FEED: Feed = Feed::RealTimeLmp;

    fn to_row(&self) -> Vec<String> {
        vec![
            self.datetime_beginning_utc.clone(),
            self.datetime_beginning_ept.clone(),
            self.pnode_id.to_string(),
            self.pnode_name.clone(),
            self.voltage.clone(),
            self.equipment.clone(),
            self.node_type.clone(),
            self.zone.clone(),
            price(self.system_energy_price_rt),
            price(self.total_lmp_rt),
            price(self.congestion_price_rt),
            price(self.marginal_loss_price_rt),
            self.row_is_current.to_string(),
            self.version_nbr.to_string(),
        ]
    }
}

/// Hourly solar forecast, grid-connected and behind-the-meter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolarForecast {
    #[serde(deserialize_with = "nullable")]
    pub evaluated_at_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub evaluated_at_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_beginning_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_beginning_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_ending_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_ending_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub solar_forecast_mwh: f64,
    #[serde(deserialize_with = "nullable")]
    pub solar_forecast_btm_mwh: f64,
}

impl FeedRecord for SolarForecast {
    const FEED: Feed = Feed::SolarForecast;

    fn to_row(&self) -> Vec<String> {
        vec![
            self.evaluated_at_utc.clone(),
            self.evaluated_at_ept.clone(),
            self.datetime_beginning_utc.clone(),
            self.datetime_beginning_ept.clone(),
            self.datetime_ending_utc.clone(),
            self.datetime_ending_ept.clone(),
            energy(self.solar_forecast_mwh),
            energy(self.solar_forecast_btm_mwh),
        ]
    }
}

/// Hourly wind forecast.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindForecast {
    #[serde(deserialize_with = "nullable")]
    pub evaluated_at_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub evaluated_at_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_beginning_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_beginning_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_ending_utc: String,
    #[serde(deserialize_with = "nullable")]
    pub datetime_ending_ept: String,
    #[serde(deserialize_with = "nullable")]
    pub wind_forecast_mwh: f64,
}

impl FeedRecord for WindForecast {
    const FEED: Feed = Feed::WindForecast;

    fn to_row(&self) -> Vec<String> {
        vec![
            self.evaluated_at_utc.clone(),
            self.evaluated_at_ept.clone(),
            self.datetime_beginning_utc.clone(),
            self.datetime_beginning_ept.clone(),
            self.datetime_ending_utc.clone(),
            self.datetime_ending_ept.clone(),
            energy(self.wind_forecast_mwh),
        ]
    }
}
