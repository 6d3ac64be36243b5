use crate::utils::error::{HydroError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const NOT_A_NUMBER: &str = "Please enter a valid number.";
pub const NOT_POSITIVE: &str = "Value must be a positive number";

pub fn validate_database_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(HydroError::invalid_argument(
            field_name,
            url_str,
            "Database URL cannot be empty",
        ));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "sqlite" => Ok(()),
            scheme => Err(HydroError::invalid_argument(
                field_name,
                url_str,
                format!("Unsupported database scheme: {}", scheme),
            )),
        },
        Err(e) => Err(HydroError::invalid_argument(
            field_name,
            url_str,
            format!("Invalid database URL: {}", e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HydroError::invalid_argument(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(HydroError::invalid_argument(field_name, value, NOT_POSITIVE));
    }
    Ok(())
}

pub fn validate_positive_real(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(HydroError::invalid_argument(field_name, value, NOT_POSITIVE));
    }
    Ok(())
}

/// Parses console input into a strictly positive integer.
pub fn parse_positive_integer(field_name: &str, raw: &str) -> Result<i64> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| HydroError::invalid_argument(field_name, raw.trim(), NOT_A_NUMBER))?;
    validate_positive_number(field_name, value)?;
    Ok(value)
}

/// Parses console input into a strictly positive, finite real.
pub fn parse_positive_real(field_name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| HydroError::invalid_argument(field_name, raw.trim(), NOT_A_NUMBER))?;
    if value.is_nan() {
        return Err(HydroError::invalid_argument(field_name, raw.trim(), NOT_A_NUMBER));
    }
    validate_positive_real(field_name, value)?;
    Ok(value)
}
