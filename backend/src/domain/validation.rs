//! Field validation shared by guest submissions and admin patches.
//!
//! Submissions derive [`validator::Validate`]; the helpers here turn the
//! crate's error map into the itemised `[{field, message}]` list carried by
//! `BAD_REQUEST` errors.

use validator::{Validate, ValidationError, ValidationErrors};

use super::{Error, FieldViolation};

/// Run derived validation plus any extra violations computed by the caller.
///
/// Violations are ordered by field name so responses are stable.
pub(crate) fn ensure_valid<T: Validate>(
    value: &T,
    extra: Vec<FieldViolation>,
) -> Result<(), Error> {
    let mut violations = match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => violations_from(&errors),
    };
    violations.extend(extra);
    if violations.is_empty() {
        return Ok(());
    }
    violations.sort_by(|left, right| left.field.cmp(&right.field));
    Err(Error::validation(violations))
}

fn violations_from(errors: &ValidationErrors) -> Vec<FieldViolation> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors
                .iter()
                .map(move |error| FieldViolation::new(field.to_string(), describe(error)))
        })
        .collect()
}

fn describe(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map_or_else(|| format!("failed {} check", error.code), ToString::to_string)
}

/// Trim surrounding whitespace.
pub(crate) fn trimmed(value: &str) -> String {
    value.trim().to_owned()
}

/// Trim an optional value, mapping blank strings to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 3, message = "must be 1-3 characters"))]
        name: String,
        #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
        count: i32,
    }

    #[rstest]
    fn valid_values_pass() {
        let sample = Sample {
            name: "ann".to_owned(),
            count: 2,
        };
        assert!(ensure_valid(&sample, Vec::new()).is_ok());
    }

    #[rstest]
    fn violations_are_sorted_by_field() {
        let sample = Sample {
            name: String::new(),
            count: 11,
        };
        let err = ensure_valid(&sample, vec![FieldViolation::new("attendance", "unknown")])
            .expect_err("invalid sample");
        let details = err.details().expect("details present");
        let fields: Vec<&str> = details
            .as_array()
            .expect("array details")
            .iter()
            .filter_map(|item| item.get("field").and_then(serde_json::Value::as_str))
            .collect();
        assert_eq!(fields, vec!["attendance", "count", "name"]);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    #[case(Some("  vegan "), Some("vegan"))]
    fn optional_text_trims_and_drops_blank(
        #[case] input: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let result = optional_text(input.map(str::to_owned));
        assert_eq!(result.as_deref(), expected);
    }
}
