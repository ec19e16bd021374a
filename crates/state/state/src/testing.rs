//! Conformance suite shared by every [`WorkflowStore`] backend.

use bloodlink_core::{BloodGroup, BloodRequest, Gender, StoredRequest};
use chrono::{NaiveDate, TimeZone, Utc};

use crate::error::StateError;
use crate::key::SessionId;
use crate::store::WorkflowStore;

fn session(id: &str) -> SessionId {
    SessionId::new(id).expect("test session ids are valid")
}

/// A fully populated stored request for backend tests.
#[must_use]
pub fn sample_entry(location: &str) -> StoredRequest {
    let day = NaiveDate::from_ymd_opt(2026, 10, 17).expect("valid date");
    StoredRequest {
        request: BloodRequest {
            requester_name: "Asha".into(),
            requester_phone: "9876543210".into(),
            requester_email: Some("asha@example.com".into()),
            patient_name: "Ravi".into(),
            patient_age: 45,
            patient_gender: Gender::Male,
            blood_group: BloodGroup::ONegative,
            units_required: 2,
            required_date: day.succ_opt().expect("valid date"),
            hospital_name: "City Hospital".into(),
            hospital_address: "12 Main Road".into(),
            location: location.into(),
            created_at: day,
            updated_at: day,
        },
        captured_at: Utc
            .with_ymd_and_hms(2026, 10, 17, 9, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Run the full workflow store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if the backend fails an operation; assertion failures
/// panic.
pub async fn run_store_conformance_tests(store: &dyn WorkflowStore) -> Result<(), StateError> {
    test_get_missing(store).await?;
    test_put_and_get(store).await?;
    test_last_write_wins(store).await?;
    test_clear(store).await?;
    test_sessions_are_isolated(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn WorkflowStore) -> Result<(), StateError> {
    let val = store.get(&session("missing")).await?;
    assert!(val.is_none(), "get on an empty session should return None");
    Ok(())
}

async fn test_put_and_get(store: &dyn WorkflowStore) -> Result<(), StateError> {
    let id = session("put-get");
    let entry = sample_entry("Chennai");
    store.put(&id, &entry).await?;
    let val = store.get(&id).await?;
    assert_eq!(val, Some(entry), "stored entry should read back field-for-field");
    Ok(())
}

async fn test_last_write_wins(store: &dyn WorkflowStore) -> Result<(), StateError> {
    let id = session("overwrite");
    store.put(&id, &sample_entry("Chennai")).await?;
    let second = sample_entry("Madurai");
    store.put(&id, &second).await?;
    let val = store.get(&id).await?;
    assert_eq!(val, Some(second), "second write should replace the first");
    Ok(())
}

async fn test_clear(store: &dyn WorkflowStore) -> Result<(), StateError> {
    let id = session("to-clear");
    store.put(&id, &sample_entry("Chennai")).await?;
    let existed = store.clear(&id).await?;
    assert!(existed, "clear should return true for an occupied slot");
    assert!(store.get(&id).await?.is_none(), "get after clear should return None");

    let existed = store.clear(&id).await?;
    assert!(!existed, "clear on an empty slot should return false");
    Ok(())
}

async fn test_sessions_are_isolated(store: &dyn WorkflowStore) -> Result<(), StateError> {
    let a = session("tab-a");
    let b = session("tab-b");
    store.put(&a, &sample_entry("Chennai")).await?;
    assert!(store.get(&b).await?.is_none(), "sessions must not share a slot");
    store.put(&b, &sample_entry("Vellore")).await?;
    let a_entry = store.get(&a).await?.expect("session a still populated");
    assert_eq!(a_entry.request.location, "Chennai");
    Ok(())
}
