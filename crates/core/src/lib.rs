//! Core types for the Bloodlink request workflow.
//!
//! Everything here is plain data plus validation: no I/O. The wire format is
//! JSON with camelCase keys and ISO calendar dates, matching the request
//! intake, donor directory, and notification collaborators.

pub mod blood;
pub mod donor;
pub mod error;
pub mod notification;
pub mod request;
pub mod search;
pub mod validation;

pub use blood::{BloodGroup, Gender};
pub use donor::{Donor, DonorMatchSet};
pub use error::ParseError;
pub use notification::{NotificationOutcome, NotificationRequest};
pub use request::{BloodRequest, BloodRequestDraft, DraftField, StoredRequest};
pub use search::SearchParameters;
pub use validation::{ValidationErrors, normalize_phone};
