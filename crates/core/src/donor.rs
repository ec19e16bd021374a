use std::fmt::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::search::SearchParameters;

/// A donor record as returned by the donor directory.
///
/// Owned by the directory; this crate only reads and displays it, so every
/// field is optional on input, `null` reads as absent, and nothing is
/// validated. Older directory builds send the number as `phone_no`, newer
/// ones as `phone`, and some send both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Donor {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub blood_group: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    pub phone: Option<String>,
    #[serde(rename = "phone_no", skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub availability_status: bool,
    pub last_donation_date: Option<NaiveDate>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Donor {
    /// Contact number, whichever key the directory used.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        [&self.phone, &self.phone_no]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|p| !p.is_empty())
    }

    #[must_use]
    pub fn availability_label(&self) -> &'static str {
        if self.availability_status {
            "Available"
        } else {
            "Not Available"
        }
    }

    /// One-line description used by list renderers.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} [{}] {} | age {} | {} | {}",
            self.name,
            self.blood_group,
            self.availability_label(),
            self.age.map_or_else(|| "N/A".to_owned(), |a| a.to_string()),
            self.gender.as_deref().unwrap_or("N/A"),
            self.location,
        );
        if let Some(phone) = self.phone() {
            let _ = write!(line, " | tel:{phone}");
        }
        if let Some(date) = self.last_donation_date {
            let _ = write!(line, " | last donated {date}");
        }
        line
    }
}

/// The ordered result of one donor match query.
///
/// Stale as soon as the search parameters change; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorMatchSet {
    pub parameters: SearchParameters,
    pub donors: Vec<Donor>,
}

impl DonorMatchSet {
    #[must_use]
    pub fn new(parameters: SearchParameters, donors: Vec<Donor>) -> Self {
        Self { parameters, donors }
    }

    /// An empty set for the given parameters.
    #[must_use]
    pub fn empty(parameters: SearchParameters) -> Self {
        Self::new(parameters, Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.donors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Donor> {
        self.donors.iter()
    }

    /// `"Found 3 donors"` / `"Found 1 donor"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let n = self.len();
        format!("Found {n} donor{}", if n == 1 { "" } else { "s" })
    }
}

impl<'a> IntoIterator for &'a DonorMatchSet {
    type Item = &'a Donor;
    type IntoIter = std::slice::Iter<'a, Donor>;

    fn into_iter(self) -> Self::IntoIter {
        self.donors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_directory_record() {
        let donor: Donor = serde_json::from_value(serde_json::json!({
            "name": "Kumar",
            "bloodGroup": "O-",
            "location": "Chennai",
            "phone_no": "9000000001",
            "availabilityStatus": true,
            "lastDonationDate": "2026-05-01",
            "somethingElse": 1
        }))
        .unwrap();
        assert_eq!(donor.phone(), Some("9000000001"));
        assert_eq!(donor.age, None);
        assert_eq!(donor.availability_label(), "Available");
        assert_eq!(
            donor.last_donation_date,
            NaiveDate::from_ymd_opt(2026, 5, 1)
        );
    }

    #[test]
    fn both_phone_keys_are_accepted() {
        let donor: Donor = serde_json::from_value(serde_json::json!({
            "name": "Asha",
            "phone": null,
            "phone_no": "9000000001"
        }))
        .unwrap();
        assert_eq!(donor.phone(), Some("9000000001"));

        let donor: Donor = serde_json::from_value(serde_json::json!({
            "phone": "9000000002",
            "phone_no": "9000000001"
        }))
        .unwrap();
        assert_eq!(donor.phone(), Some("9000000002"));
        assert!(donor.summary_line().contains("tel:9000000002"));
    }

    #[test]
    fn null_fields_read_as_absent() {
        let donor: Donor = serde_json::from_value(serde_json::json!({
            "name": null,
            "bloodGroup": null,
            "location": null,
            "availabilityStatus": null,
            "phone_no": "9000000003"
        }))
        .unwrap();
        assert_eq!(donor.name, "");
        assert_eq!(donor.location, "");
        assert!(!donor.availability_status);
        assert_eq!(donor.phone(), Some("9000000003"));
    }

    #[test]
    fn summary_line_marks_missing_values() {
        let donor = Donor {
            name: "Meena".into(),
            blood_group: "A+".into(),
            location: "Madurai".into(),
            ..Donor::default()
        };
        let line = donor.summary_line();
        assert!(line.contains("Not Available"));
        assert!(line.contains("age N/A"));
    }

    #[test]
    fn match_set_summary_pluralizes() {
        let params = SearchParameters::new("O-", "Chennai");
        let mut set = DonorMatchSet::empty(params);
        assert_eq!(set.summary(), "Found 0 donors");
        set.donors.push(Donor::default());
        assert_eq!(set.summary(), "Found 1 donor");
        set.donors.push(Donor::default());
        assert_eq!(set.summary(), "Found 2 donors");
    }
}
