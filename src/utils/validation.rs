use crate::utils::error::{AppError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> AppError {
    AppError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 供應商 base URL 只接受 http/https
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be blank"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// 預算需為有限正數
pub fn validate_budget(budget: f64) -> Result<f64> {
    if budget.is_finite() && budget > 0.0 {
        Ok(budget)
    } else {
        Err(AppError::invalid_input("Please enter a valid budget amount."))
    }
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(AppError::invalid_input(
            "Coordinates are out of range (lat -90..90, lng -180..180).",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("google.base_url", "https://example.com").is_ok());
        assert!(validate_url("google.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("google.base_url", "").is_err());
        assert!(validate_url("google.base_url", "invalid-url").is_err());
        assert!(validate_url("google.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("selector.max_results", 5, 1).is_ok());
        assert!(validate_positive_number("selector.max_results", 0, 1).is_err());
    }

    #[test]
    fn test_validate_budget() {
        assert_eq!(validate_budget(12.5).unwrap(), 12.5);
        assert!(validate_budget(0.0).is_err());
        assert!(validate_budget(-3.0).is_err());
        assert!(validate_budget(f64::NAN).is_err());
        assert!(validate_budget(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(40.7, -74.0).is_ok());
        assert!(validate_coordinates(91.0, 0.0).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
    }
}
