//! Draft validation and normalization.
//!
//! Validation never touches the network: a draft either becomes a
//! [`BloodRequest`] ready to send, or a field-keyed [`ValidationErrors`] map
//! the caller shows next to the offending inputs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::request::{BloodRequest, BloodRequestDraft, DraftField};

/// Phone numbers must be exactly ten digits once separators are stripped.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("phone regex is valid"));

pub const MIN_PATIENT_AGE: u8 = 0;
pub const MAX_PATIENT_AGE: u8 = 120;
pub const MIN_UNITS: u8 = 1;
pub const MAX_UNITS: u8 = 10;

/// Field-keyed validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<DraftField, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Drop the message for one field, e.g. once the user edits it.
    pub fn clear(&mut self, field: DraftField) -> Option<String> {
        self.0.remove(&field)
    }

    #[must_use]
    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = DraftField> + '_ {
        self.0.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Strip the separators people commonly type into phone numbers.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '.' | '(' | ')'))
        .collect()
}

fn required_text(
    errors: &mut ValidationErrors,
    field: DraftField,
    raw: &str,
    message: &str,
) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.insert(field, message);
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn bounded_integer(
    errors: &mut ValidationErrors,
    field: DraftField,
    raw: &str,
    range: std::ops::RangeInclusive<u8>,
    message: &str,
) -> Option<u8> {
    match raw.trim().parse::<u8>() {
        Ok(value) if range.contains(&value) => Some(value),
        _ => {
            errors.insert(field, message);
            None
        }
    }
}

impl BloodRequestDraft {
    /// Validate every field and normalize the draft into a [`BloodRequest`].
    ///
    /// All fields are checked so the caller receives every problem at once.
    /// `today` becomes the request's `createdAt` and `updatedAt`.
    pub fn validate(&self, today: NaiveDate) -> Result<BloodRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let requester_name = required_text(
            &mut errors,
            DraftField::RequesterName,
            &self.requester_name,
            "Requester name required",
        );

        let phone = normalize_phone(&self.requester_phone);
        let requester_phone = if PHONE_RE.is_match(&phone) {
            Some(phone)
        } else {
            errors.insert(
                DraftField::RequesterPhone,
                "Valid 10-digit phone number required",
            );
            None
        };

        let email = self.requester_email.trim();
        let requester_email = (!email.is_empty()).then(|| email.to_owned());

        let patient_name = required_text(
            &mut errors,
            DraftField::PatientName,
            &self.patient_name,
            "Patient name required",
        );
        let patient_age = bounded_integer(
            &mut errors,
            DraftField::PatientAge,
            &self.patient_age,
            MIN_PATIENT_AGE..=MAX_PATIENT_AGE,
            "Valid patient age required (0-120)",
        );

        let patient_gender = self.patient_gender.parse().ok();
        if patient_gender.is_none() {
            errors.insert(DraftField::PatientGender, "Patient gender required");
        }
        let blood_group = self.blood_group.parse().ok();
        if blood_group.is_none() {
            errors.insert(DraftField::BloodGroup, "Blood group required");
        }

        let units_required = bounded_integer(
            &mut errors,
            DraftField::UnitsRequired,
            &self.units_required,
            MIN_UNITS..=MAX_UNITS,
            "Between 1 and 10 units required",
        );

        let required_date = match self.required_date.trim() {
            "" => {
                errors.insert(DraftField::RequiredDate, "Required date is mandatory");
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.insert(
                        DraftField::RequiredDate,
                        "Required date must be a calendar date (YYYY-MM-DD)",
                    );
                    None
                }
            },
        };

        let hospital_name = required_text(
            &mut errors,
            DraftField::HospitalName,
            &self.hospital_name,
            "Hospital name required",
        );
        let hospital_address = required_text(
            &mut errors,
            DraftField::HospitalAddress,
            &self.hospital_address,
            "Hospital address required",
        );
        let location = required_text(
            &mut errors,
            DraftField::Location,
            &self.location,
            "Location required",
        );

        match (
            requester_name,
            requester_phone,
            patient_name,
            patient_age,
            patient_gender,
            blood_group,
            units_required,
            required_date,
            hospital_name,
            hospital_address,
            location,
        ) {
            (
                Some(requester_name),
                Some(requester_phone),
                Some(patient_name),
                Some(patient_age),
                Some(patient_gender),
                Some(blood_group),
                Some(units_required),
                Some(required_date),
                Some(hospital_name),
                Some(hospital_address),
                Some(location),
            ) if errors.is_empty() => Ok(BloodRequest {
                requester_name,
                requester_phone,
                requester_email,
                patient_name,
                patient_age,
                patient_gender,
                blood_group,
                units_required,
                required_date,
                hospital_name,
                hospital_address,
                location,
                created_at: today,
                updated_at: today,
            }),
            _ => Err(errors),
        }
    }
}
