use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A candle interval supported by the analysis pipeline.
///
/// `ThreeDay` is never fetched directly from an upstream source; it is always
/// aggregated from `OneDay` (see `application::market_data::aggregation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntervalCode {
    OneMin,
    ThreeMin,
    FiveMin,
    FifteenMin,
    ThirtyMin,
    OneHour,
    FourHour,
    OneDay,
    ThreeDay,
    OneWeek,
    OneMonth,
}

impl IntervalCode {
    pub fn to_minutes(&self) -> u64 {
        match self {
            IntervalCode::OneMin => 1,
            IntervalCode::ThreeMin => 3,
            IntervalCode::FiveMin => 5,
            IntervalCode::FifteenMin => 15,
            IntervalCode::ThirtyMin => 30,
            IntervalCode::OneHour => 60,
            IntervalCode::FourHour => 240,
            IntervalCode::OneDay => 1440,
            IntervalCode::ThreeDay => 4320,
            IntervalCode::OneWeek => 10080,
            IntervalCode::OneMonth => 43200,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            IntervalCode::OneMin => "1m",
            IntervalCode::ThreeMin => "3m",
            IntervalCode::FiveMin => "5m",
            IntervalCode::FifteenMin => "15m",
            IntervalCode::ThirtyMin => "30m",
            IntervalCode::OneHour => "1h",
            IntervalCode::FourHour => "4h",
            IntervalCode::OneDay => "1d",
            IntervalCode::ThreeDay => "3d",
            IntervalCode::OneWeek => "1w",
            IntervalCode::OneMonth => "1M",
        }
    }

    /// Whether this interval can be fetched directly from an upstream source,
    /// or must be aggregated from a supported interval.
    pub fn is_natively_supported(&self) -> bool {
        !matches!(self, IntervalCode::ThreeDay)
    }

    /// The interval to aggregate from, and the chunk size, for intervals that
    /// are not natively supported.
    pub fn aggregation_source(&self) -> Option<(IntervalCode, usize)> {
        match self {
            IntervalCode::ThreeDay => Some((IntervalCode::OneDay, 3)),
            _ => None,
        }
    }

    /// Whether this interval completes within a single trading day.
    /// VWAP is only meaningful within that window — across daily+ candles
    /// the typical-price*volume accumulation loses its intraday anchor.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            IntervalCode::OneMin
                | IntervalCode::ThreeMin
                | IntervalCode::FiveMin
                | IntervalCode::FifteenMin
                | IntervalCode::ThirtyMin
                | IntervalCode::OneHour
                | IntervalCode::FourHour
        )
    }
}

impl FromStr for IntervalCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1m" => Ok(IntervalCode::OneMin),
            "3m" => Ok(IntervalCode::ThreeMin),
            "5m" => Ok(IntervalCode::FiveMin),
            "15m" => Ok(IntervalCode::FifteenMin),
            "30m" => Ok(IntervalCode::ThirtyMin),
            "1h" => Ok(IntervalCode::OneHour),
            "4h" => Ok(IntervalCode::FourHour),
            "1d" => Ok(IntervalCode::OneDay),
            "3d" => Ok(IntervalCode::ThreeDay),
            "1w" => Ok(IntervalCode::OneWeek),
            "1M" => Ok(IntervalCode::OneMonth),
            _ => Err(anyhow!(
                "Invalid interval: '{}'. Valid options: 1m,3m,5m,15m,30m,1h,4h,1d,3d,1w,1M",
                s
            )),
        }
    }
}

impl fmt::Display for IntervalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Parses a comma-separated interval list, e.g. `"4h,1h,15m,5m"`.
pub fn parse_interval_list(s: &str) -> Result<Vec<IntervalCode>> {
    s.split(',')
        .map(|part| IntervalCode::from_str(part.trim()))
        .collect()
}
