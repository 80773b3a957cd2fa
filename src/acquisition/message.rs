use super::{Reading, SensorStatus};
use thiserror::Error;

pub const ADC_KEY: &str = "ADC =";
pub const STATUS_KEY: &str = "STATUS =";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("datagram is not valid UTF-8")]
    InvalidUtf8,
    #[error("message has no ADC/STATUS markers")]
    MissingMarkers,
    #[error("message has no \"{0}\" delimiter")]
    MissingDelimiter(&'static str),
    #[error("ADC value {0:?} is not an integer")]
    InvalidAdc(String),
    #[error("status token is empty")]
    EmptyStatus,
}

/// Parses `"ADC = <int> | ... STATUS = <token>"`.
///
/// The ADC value runs from the first `ADC =` up to the next `|`. The status is
/// everything after the first `STATUS =`, trimmed and upper-cased.
///
/// Values outside the `i64` range are rejected as [`ParseError::InvalidAdc`].
pub fn parse_message(text: &str) -> Result<Reading, ParseError> {
    let msg = text.trim().replace('\n', "");

    if !msg.contains("ADC") || !msg.contains("STATUS") {
        return Err(ParseError::MissingMarkers);
    }

    let adc_text = msg
        .split(ADC_KEY)
        .nth(1)
        .ok_or(ParseError::MissingDelimiter(ADC_KEY))?
        .split('|')
        .next()
        .unwrap_or_default()
        .trim();
    let adc = adc_text
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidAdc(adc_text.to_string()))?;

    let token = msg
        .split(STATUS_KEY)
        .nth(1)
        .ok_or(ParseError::MissingDelimiter(STATUS_KEY))?
        .trim();
    if token.is_empty() {
        return Err(ParseError::EmptyStatus);
    }

    Ok(Reading {
        adc,
        status: SensorStatus::from_token(token),
    })
}

pub fn decode_datagram(payload: &[u8]) -> Result<Reading, ParseError> {
    let text = std::str::from_utf8(payload).map_err(|_| ParseError::InvalidUtf8)?;
    parse_message(text)
}

/// Formats a reading the way the sensor puts it on the wire.
pub fn format_message(reading: &Reading) -> String {
    format!("{} {} | {} {}", ADC_KEY, reading.adc, STATUS_KEY, reading.status)
}
