use bloodlink_state::SessionStore;

use crate::OutputFormat;

pub async fn run(store: &SessionStore, format: &OutputFormat) -> anyhow::Result<()> {
    let entry = store.get().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Text => {
            let Some(entry) = entry else {
                println!("No stored request in session '{}'.", store.session());
                return Ok(());
            };
            let r = &entry.request;
            println!("Request captured {}", entry.captured_at.to_rfc3339());
            println!("  Requester:  {} ({})", r.requester_name, r.requester_phone);
            if let Some(email) = &r.requester_email {
                println!("  Email:      {email}");
            }
            println!(
                "  Patient:    {}, {} years, {}",
                r.patient_name, r.patient_age, r.patient_gender
            );
            println!(
                "  Needs:      {} unit(s) of {} by {}",
                r.units_required, r.blood_group, r.required_date
            );
            println!("  Hospital:   {}, {}", r.hospital_name, r.hospital_address);
            println!("  Location:   {}", r.location);
        }
    }
    Ok(())
}
