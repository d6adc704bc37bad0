//! Conversion abstractions and core types

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::core::error::ClientError;

/// Which side of the reference currency a conversion computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `amount` units of the selected currency into the reference currency.
    ToReference,
    /// `amount` units of the reference currency into the selected currency.
    FromReference,
}

impl Direction {
    /// Path segment of the conversion endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Direction::ToReference => "toManat",
            Direction::FromReference => "fromManat",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::ToReference => "to manat",
                Direction::FromReference => "from manat",
            }
        )
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "to" | "tomanat" | "to-manat" => Ok(Direction::ToReference),
            "from" | "frommanat" | "from-manat" => Ok(Direction::FromReference),
            _ => Err(anyhow::anyhow!("Invalid direction: {}", s)),
        }
    }
}

/// Body of a conversion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRequest {
    pub date: NaiveDate,
    pub currency: String,
    pub amount: f64,
}

/// A completed conversion, tagged with the inputs it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub direction: Direction,
    pub amount_in: f64,
    pub result: f64,
    pub date: NaiveDate,
    pub currency_code: String,
}

#[async_trait]
pub trait ConversionProvider: Send + Sync {
    async fn convert(
        &self,
        direction: Direction,
        request: &ConversionRequest,
    ) -> Result<f64, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("to".parse::<Direction>().unwrap(), Direction::ToReference);
        assert_eq!(
            "fromManat".parse::<Direction>().unwrap(),
            Direction::FromReference
        );
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_request_serializes_iso_date() {
        let request = ConversionRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            currency: "USD".to_string(),
            amount: 100.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": "2024-03-05", "currency": "USD", "amount": 100.0})
        );
    }
}
