use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::blood::{BloodGroup, Gender};

/// A validated blood request, normalized for the request-intake collaborator.
///
/// Created once by request submission and never mutated afterwards. The
/// same value is sent on the wire, written to the workflow store, and later
/// embedded verbatim in the bulk notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub requester_name: String,
    /// Exactly ten ASCII digits.
    pub requester_phone: String,
    /// Serialized as `""` when absent.
    #[serde(default, with = "optional_text")]
    pub requester_email: Option<String>,
    pub patient_name: String,
    pub patient_age: u8,
    pub patient_gender: Gender,
    pub blood_group: BloodGroup,
    pub units_required: u8,
    pub required_date: NaiveDate,
    pub hospital_name: String,
    pub hospital_address: String,
    /// Free-text city or area.
    pub location: String,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

/// The workflow store entry: the submitted request plus when it was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRequest {
    pub request: BloodRequest,
    pub captured_at: DateTime<Utc>,
}

impl StoredRequest {
    /// Stamp a request with the current time.
    #[must_use]
    pub fn capture(request: BloodRequest) -> Self {
        Self {
            request,
            captured_at: Utc::now(),
        }
    }
}

/// Field keys of a blood request form, named as on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    RequesterName,
    RequesterPhone,
    RequesterEmail,
    PatientName,
    PatientAge,
    PatientGender,
    BloodGroup,
    UnitsRequired,
    RequiredDate,
    HospitalName,
    HospitalAddress,
    Location,
}

impl DraftField {
    pub const ALL: [Self; 12] = [
        Self::RequesterName,
        Self::RequesterPhone,
        Self::RequesterEmail,
        Self::PatientName,
        Self::PatientAge,
        Self::PatientGender,
        Self::BloodGroup,
        Self::UnitsRequired,
        Self::RequiredDate,
        Self::HospitalName,
        Self::HospitalAddress,
        Self::Location,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequesterName => "requesterName",
            Self::RequesterPhone => "requesterPhone",
            Self::RequesterEmail => "requesterEmail",
            Self::PatientName => "patientName",
            Self::PatientAge => "patientAge",
            Self::PatientGender => "patientGender",
            Self::BloodGroup => "bloodGroup",
            Self::UnitsRequired => "unitsRequired",
            Self::RequiredDate => "requiredDate",
            Self::HospitalName => "hospitalName",
            Self::HospitalAddress => "hospitalAddress",
            Self::Location => "location",
        }
    }

    /// Whether the field must be filled before submission.
    #[must_use]
    pub fn is_mandatory(self) -> bool {
        !matches!(self, Self::RequesterEmail)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A blood request as typed into a form: every value is raw text.
///
/// Use [`BloodRequestDraft::validate`] to turn it into a [`BloodRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BloodRequestDraft {
    pub requester_name: String,
    pub requester_phone: String,
    pub requester_email: String,
    pub patient_name: String,
    pub patient_age: String,
    pub patient_gender: String,
    pub blood_group: String,
    pub units_required: String,
    pub required_date: String,
    pub hospital_name: String,
    pub hospital_address: String,
    pub location: String,
}

impl Default for BloodRequestDraft {
    fn default() -> Self {
        Self {
            requester_name: String::new(),
            requester_phone: String::new(),
            requester_email: String::new(),
            patient_name: String::new(),
            patient_age: String::new(),
            patient_gender: String::new(),
            blood_group: String::new(),
            // A fresh form starts at one unit.
            units_required: "1".to_owned(),
            required_date: String::new(),
            hospital_name: String::new(),
            hospital_address: String::new(),
            location: String::new(),
        }
    }
}

impl BloodRequestDraft {
    /// Current raw value of a field.
    #[must_use]
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::RequesterName => &self.requester_name,
            DraftField::RequesterPhone => &self.requester_phone,
            DraftField::RequesterEmail => &self.requester_email,
            DraftField::PatientName => &self.patient_name,
            DraftField::PatientAge => &self.patient_age,
            DraftField::PatientGender => &self.patient_gender,
            DraftField::BloodGroup => &self.blood_group,
            DraftField::UnitsRequired => &self.units_required,
            DraftField::RequiredDate => &self.required_date,
            DraftField::HospitalName => &self.hospital_name,
            DraftField::HospitalAddress => &self.hospital_address,
            DraftField::Location => &self.location,
        }
    }

    /// Replace the raw value of a field.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::RequesterName => &mut self.requester_name,
            DraftField::RequesterPhone => &mut self.requester_phone,
            DraftField::RequesterEmail => &mut self.requester_email,
            DraftField::PatientName => &mut self.patient_name,
            DraftField::PatientAge => &mut self.patient_age,
            DraftField::PatientGender => &mut self.patient_gender,
            DraftField::BloodGroup => &mut self.blood_group,
            DraftField::UnitsRequired => &mut self.units_required,
            DraftField::RequiredDate => &mut self.required_date,
            DraftField::HospitalName => &mut self.hospital_name,
            DraftField::HospitalAddress => &mut self.hospital_address,
            DraftField::Location => &mut self.location,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: DraftField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }
}

impl From<&BloodRequest> for BloodRequestDraft {
    fn from(request: &BloodRequest) -> Self {
        Self {
            requester_name: request.requester_name.clone(),
            requester_phone: request.requester_phone.clone(),
            requester_email: request.requester_email.clone().unwrap_or_default(),
            patient_name: request.patient_name.clone(),
            patient_age: request.patient_age.to_string(),
            patient_gender: request.patient_gender.to_string(),
            blood_group: request.blood_group.to_string(),
            units_required: request.units_required.to_string(),
            required_date: request.required_date.to_string(),
            hospital_name: request.hospital_name.clone(),
            hospital_address: request.hospital_address.clone(),
            location: request.location.clone(),
        }
    }
}

/// `Option<String>` carried as a plain string, empty meaning absent.
mod optional_text {
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.trim().is_empty()))
    }
}
