//! Registration input validation for medications and drones.
//!
//! Incoming payloads are deserialized into the `*Registration` structs with
//! every field optional, so a missing field is reported the same way as a
//! malformed one: as a per-field message in [`CoreError::InvalidFields`].
//! Numeric fields accept JSON numbers as well as numeric strings, so a
//! wrongly typed value is reported per field instead of failing the body.
//! Presence and length rules come from the `validator` derive; the
//! character-class patterns and numeric checks are applied here.
//! A successful validation yields a `New*` value with defaults filled in.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::drone::{DroneModel, DEFAULT_WEIGHT_LIMIT};
use crate::error::{CoreError, FieldErrors};

// ---------------------------------------------------------------------------
// Patterns and messages
// ---------------------------------------------------------------------------

/// Medication names: letters, digits, `-` and `_`.
static MEDICATION_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").expect("valid regex"));

/// Medication codes: upper case letters, digits and `_`.
static MEDICATION_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_]*$").expect("valid regex"));

pub const MSG_REQUIRED: &str = "This field is required.";
pub const MSG_INVALID_NAME: &str = "Name must be Alphanumeric";
pub const MSG_INVALID_CODE: &str = "upper case letters, underscore, and numbers allowed";
pub const MSG_INVALID_WEIGHT: &str = "Weight must be a positive number";
pub const MSG_INVALID_BATTERY: &str = "Battery capacity must be a number between 0 and 100";
pub const MSG_INVALID_WEIGHT_LIMIT: &str = "Weight limit must be a positive number";
pub const MSG_NOT_A_NUMBER: &str = "A valid number is required.";
pub const MSG_NOT_AN_INTEGER: &str = "A valid integer is required.";

// ---------------------------------------------------------------------------
// Numeric input
// ---------------------------------------------------------------------------

/// A numeric field as submitted by the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Booleans, arrays, objects.
    #[serde(skip_serializing)]
    Other(IgnoredAny),
}

impl NumericInput {
    /// The value as a finite float, if it reads as one.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Integer(n) => *n as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse().ok()?,
            Self::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// The value as an integer. Floats and strings qualify only when they
    /// carry no fractional part (`50`, `50.0`, `"50"`).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(s) => {
                let s = s.trim();
                s.parse().ok().or_else(|| integral(s.parse().ok()?))
            }
            Self::Float(f) => integral(*f),
            Self::Other(_) => None,
        }
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}

// ---------------------------------------------------------------------------
// Medication
// ---------------------------------------------------------------------------

/// Raw medication registration payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MedicationRegistration {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Name must be 1-100 characters")
    )]
    pub name: Option<String>,
    #[validate(required(message = "This field is required."))]
    pub weight: Option<NumericInput>,
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Code must be 1-100 characters")
    )]
    pub code: Option<String>,
    /// Opaque reference to a stored image.
    pub image: Option<String>,
}

/// A medication that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedication {
    pub name: String,
    pub weight: f64,
    pub code: String,
    pub image: Option<String>,
}

impl MedicationRegistration {
    /// Validate every field, reporting all failures at once.
    pub fn into_validated(self) -> Result<NewMedication, CoreError> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            collect_field_errors(&e, &mut errors);
        }

        if let Some(name) = &self.name {
            if !MEDICATION_NAME_RE.is_match(name) {
                push_error(&mut errors, "name", MSG_INVALID_NAME);
            }
        }
        if let Some(code) = &self.code {
            if !MEDICATION_CODE_RE.is_match(code) {
                push_error(&mut errors, "code", MSG_INVALID_CODE);
            }
        }
        let weight = self
            .weight
            .as_ref()
            .and_then(|raw| positive_number(raw, "weight", MSG_INVALID_WEIGHT, &mut errors));

        match (self.name, weight, self.code) {
            (Some(name), Some(weight), Some(code)) if errors.is_empty() => Ok(NewMedication {
                name,
                weight,
                code,
                image: self.image.filter(|s| !s.is_empty()),
            }),
            _ => Err(CoreError::InvalidFields(errors)),
        }
    }
}

// ---------------------------------------------------------------------------
// Drone
// ---------------------------------------------------------------------------

/// Raw drone registration payload.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct DroneRegistration {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 100, message = "Serial number must be 1-100 characters")
    )]
    pub serial_number: Option<String>,
    /// One of the [`DroneModel`] names; `Lightweight` when omitted.
    pub model: Option<String>,
    /// Defaults to [`DEFAULT_WEIGHT_LIMIT`] when omitted.
    pub weight_limit: Option<NumericInput>,
    #[validate(required(message = "This field is required."))]
    pub battery_capacity: Option<NumericInput>,
}

/// A drone that passed validation and is ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDrone {
    pub serial_number: String,
    pub model: DroneModel,
    pub weight_limit: f64,
    pub battery_capacity: i32,
}

impl DroneRegistration {
    /// Validate every field and apply defaults for `model` and `weight_limit`.
    pub fn into_validated(self) -> Result<NewDrone, CoreError> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            collect_field_errors(&e, &mut errors);
        }

        let model = match self.model.as_deref() {
            None => Some(DroneModel::default()),
            Some(s) => match DroneModel::from_str_value(s) {
                Ok(m) => Some(m),
                Err(msg) => {
                    push_error(&mut errors, "model", &msg);
                    None
                }
            },
        };

        let weight_limit = match &self.weight_limit {
            None => Some(DEFAULT_WEIGHT_LIMIT),
            Some(raw) => positive_number(raw, "weight_limit", MSG_INVALID_WEIGHT_LIMIT, &mut errors),
        };

        let battery_capacity = match self.battery_capacity.as_ref().map(NumericInput::as_i64) {
            None => None,
            Some(None) => {
                push_error(&mut errors, "battery_capacity", MSG_NOT_AN_INTEGER);
                None
            }
            Some(Some(b)) if (0..=100).contains(&b) => i32::try_from(b).ok(),
            Some(Some(_)) => {
                push_error(&mut errors, "battery_capacity", MSG_INVALID_BATTERY);
                None
            }
        };

        match (self.serial_number, model, weight_limit, battery_capacity) {
            (Some(serial_number), Some(model), Some(weight_limit), Some(battery_capacity))
                if errors.is_empty() =>
            {
                Ok(NewDrone {
                    serial_number,
                    model,
                    weight_limit,
                    battery_capacity,
                })
            }
            _ => Err(CoreError::InvalidFields(errors)),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a strictly positive number, recording `invalid` when it is not.
fn positive_number(
    raw: &NumericInput,
    field: &str,
    invalid: &str,
    errors: &mut FieldErrors,
) -> Option<f64> {
    match raw.as_f64() {
        None => {
            push_error(errors, field, MSG_NOT_A_NUMBER);
            None
        }
        Some(value) if value <= 0.0 => {
            push_error(errors, field, invalid);
            None
        }
        Some(value) => Some(value),
    }
}

fn push_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Flatten `validator` errors into the field-keyed message map.
fn collect_field_errors(source: &ValidationErrors, errors: &mut FieldErrors) {
    for (field, field_errors) in source.field_errors() {
        let messages = errors.entry(field.to_string()).or_default();
        for err in field_errors.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            messages.push(message);
        }
    }
}
