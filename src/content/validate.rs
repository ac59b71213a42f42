//! Field validation shared by all content kinds.

use thiserror::Error;

/// The first field of a request body that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub type FieldResult = Result<(), FieldError>;

/// Body-level checks run before any write.
pub trait Validate {
    fn validate(&self) -> FieldResult;
}

pub fn required(field: &'static str, value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "is required"));
    }
    Ok(())
}

pub fn max_len(field: &'static str, value: &str, max: usize) -> FieldResult {
    if value.chars().count() > max {
        return Err(FieldError::new(field, format!("must be at most {max} characters")));
    }
    Ok(())
}

/// Lowercase ASCII words joined by single hyphens.
pub fn slug(field: &'static str, value: &str) -> FieldResult {
    required(field, value)?;
    let well_formed = value
        .split('-')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    if !well_formed {
        return Err(FieldError::new(
            field,
            "must be lowercase letters and digits separated by single hyphens",
        ));
    }
    max_len(field, value, 120)
}

pub fn optional_slug(field: &'static str, value: Option<&str>) -> FieldResult {
    value.map_or(Ok(()), |v| slug(field, v))
}

pub fn url(field: &'static str, value: Option<&str>) -> FieldResult {
    match value {
        Some(v) if !(v.starts_with("https://") || v.starts_with("http://")) => {
            Err(FieldError::new(field, "must be an http(s) URL"))
        }
        _ => Ok(()),
    }
}

pub fn email(field: &'static str, value: &str) -> FieldResult {
    required(field, value)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(FieldError::new(field, "must be a valid email address"));
    }
    Ok(())
}

/// ISO 4217 style: three uppercase letters.
pub fn currency(field: &'static str, value: &str) -> FieldResult {
    if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(FieldError::new(field, "must be a three-letter currency code"));
    }
    Ok(())
}

pub fn in_range<T>(field: &'static str, value: T, min: T, max: T) -> FieldResult
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(FieldError::new(field, format!("must be between {min} and {max}")));
    }
    Ok(())
}

pub fn not_before<T: PartialOrd>(field: &'static str, value: &T, start: &T, start_name: &str) -> FieldResult {
    if value < start {
        return Err(FieldError::new(field, format!("must not be before {start_name}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_rules() {
        assert!(slug("slug", "bali-7-nights").is_ok());
        assert!(slug("slug", "kathmandu").is_ok());
        assert!(slug("slug", "").is_err());
        assert!(slug("slug", "Bali").is_err());
        assert!(slug("slug", "bali--trip").is_err());
        assert!(slug("slug", "-bali").is_err());
        assert!(slug("slug", "bali trip").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(email("email", "guest@example.com").is_ok());
        assert!(email("email", "guest@example").is_err());
        assert!(email("email", "@example.com").is_err());
        assert!(email("email", "guest example@x.com").is_err());
    }

    #[test]
    fn test_error_names_field() {
        let err = in_range("rating", 6u8, 1, 5).unwrap_err();
        assert_eq!(err.to_string(), "rating: must be between 1 and 5");
    }

    #[test]
    fn test_currency_and_url() {
        assert!(currency("currency", "USD").is_ok());
        assert!(currency("currency", "usd").is_err());
        assert!(url("image", Some("ftp://x")).is_err());
        assert!(url("image", None).is_ok());
    }
}
