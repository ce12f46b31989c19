use thiserror::Error;

/// A physical parameter outside its valid domain.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ParamError {
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be at least {min}, got {value}")]
    TooFew {
        field: &'static str,
        value: usize,
        min: usize,
    },

    #[error("{field} must be at most {max}, got {value}")]
    TooMany {
        field: &'static str,
        value: usize,
        max: usize,
    },
}

impl ParamError {
    /// Returns the name of the offending parameter.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            ParamError::NotPositive { field, .. }
            | ParamError::Negative { field, .. }
            | ParamError::NotFinite { field, .. }
            | ParamError::OutOfRange { field, .. }
            | ParamError::TooFew { field, .. }
            | ParamError::TooMany { field, .. } => field,
        }
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64, ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ParamError::NotPositive { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64, ParamError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParamError::Negative { field, value })
    }
}

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64, ParamError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParamError::NotFinite { field, value })
    }
}

pub(crate) fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ParamError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ParamError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_negative_and_non_finite() {
        assert_eq!(positive("mass", 2.0), Ok(2.0));
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(positive("mass", value).unwrap_err().field(), "mass");
        }
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative("drag", 0.0), Ok(0.0));
        assert!(non_negative("drag", -0.1).is_err());
    }

    #[test]
    fn within_checks_both_bounds() {
        assert!(within("incline", 0.5, 0.0, 1.0).is_ok());
        assert!(within("incline", 1.5, 0.0, 1.0).is_err());
        assert!(within("incline", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn messages_name_the_field() {
        let err = positive("length", -2.0).unwrap_err();
        assert_eq!(err.to_string(), "length must be positive and finite, got -2");
        assert!(finite("x", f64::NAN).is_err());
    }
}
