use crate::errors::{ParseError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use vultr_core::MISSING_PLACEHOLDER;

/// Format of `date_created` on servers
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the dates in bandwidth series
pub const BANDWIDTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Trait for parsing the API's text-typed values
pub trait Parser {
    type Output;

    fn parse(&self, input: &str) -> Result<Self::Output>;
}

/// Parses byte counts such as `"81072581"`
pub struct ByteCountParser;

impl Parser for ByteCountParser {
    type Output = u64;

    fn parse(&self, input: &str) -> Result<Self::Output> {
        let input = present(input, "byte count")?;

        if let Ok(bytes) = input.parse::<u64>() {
            return Ok(bytes);
        }

        // Some reports carry whole numbers as floats ("1024.0")
        match input.parse::<f64>() {
            Ok(value) if value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 => {
                Ok(value as u64)
            }
            _ => Err(ParseError::InvalidValue(format!("Invalid byte count: {}", input)).into()),
        }
    }
}

/// Parses server creation timestamps (`2013-12-19 14:45:41`)
pub struct CreatedAtParser;

impl Parser for CreatedAtParser {
    type Output = NaiveDateTime;

    fn parse(&self, input: &str) -> Result<Self::Output> {
        let input = present(input, "date_created")?;
        NaiveDateTime::parse_from_str(input, CREATED_AT_FORMAT).map_err(|e| {
            ParseError::InvalidFormat(format!("Invalid timestamp '{}': {}", input, e)).into()
        })
    }
}

/// Parses bandwidth sample dates (`2014-06-10`)
pub struct BandwidthDateParser;

impl Parser for BandwidthDateParser {
    type Output = NaiveDate;

    fn parse(&self, input: &str) -> Result<Self::Output> {
        let input = present(input, "date")?;
        NaiveDate::parse_from_str(input, BANDWIDTH_DATE_FORMAT).map_err(|e| {
            ParseError::InvalidFormat(format!("Invalid date '{}': {}", input, e)).into()
        })
    }
}

// Rejects empty input and the missing-field placeholder
fn present<'a>(input: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed == MISSING_PLACEHOLDER {
        return Err(ParseError::MissingValue(what.to_string()).into());
    }
    Ok(trimmed)
}

// Convenience functions
pub fn parse_byte_count(input: &str) -> Result<u64> {
    ByteCountParser.parse(input)
}

pub fn parse_created_at(input: &str) -> Result<NaiveDateTime> {
    CreatedAtParser.parse(input)
}

pub fn parse_bandwidth_date(input: &str) -> Result<NaiveDate> {
    BandwidthDateParser.parse(input)
}
