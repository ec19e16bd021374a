use bloodlink_core::{BloodRequestDraft, DraftField};
use bloodlink_workflow::{WorkflowController, WorkflowError};
use clap::Args;

use crate::OutputFormat;
use crate::commands::donors;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// JSON draft to start from (`@path` or inline JSON). Flags override it.
    #[arg(long)]
    pub draft: Option<String>,
    #[arg(long)]
    pub requester_name: Option<String>,
    /// Ten digits; spaces, dashes, dots and parentheses are ignored.
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub patient_name: Option<String>,
    #[arg(long)]
    pub age: Option<String>,
    /// Male, Female or Other.
    #[arg(long)]
    pub gender: Option<String>,
    /// One of A+ A- B+ B- AB+ AB- O+ O-.
    #[arg(long)]
    pub blood_group: Option<String>,
    #[arg(long)]
    pub units: Option<String>,
    /// Date the blood is needed by (YYYY-MM-DD).
    #[arg(long)]
    pub required_date: Option<String>,
    #[arg(long)]
    pub hospital: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// City or area.
    #[arg(long)]
    pub location: Option<String>,
}

impl RequestArgs {
    pub fn to_draft(&self) -> anyhow::Result<BloodRequestDraft> {
        let mut draft: BloodRequestDraft = match &self.draft {
            Some(raw) => {
                let content = match raw.strip_prefix('@') {
                    Some(path) => std::fs::read_to_string(path)?,
                    None => raw.clone(),
                };
                serde_json::from_str(&content)?
            }
            None => BloodRequestDraft::default(),
        };

        let overrides = [
            (DraftField::RequesterName, &self.requester_name),
            (DraftField::RequesterPhone, &self.phone),
            (DraftField::RequesterEmail, &self.email),
            (DraftField::PatientName, &self.patient_name),
            (DraftField::PatientAge, &self.age),
            (DraftField::PatientGender, &self.gender),
            (DraftField::BloodGroup, &self.blood_group),
            (DraftField::UnitsRequired, &self.units),
            (DraftField::RequiredDate, &self.required_date),
            (DraftField::HospitalName, &self.hospital),
            (DraftField::HospitalAddress, &self.address),
            (DraftField::Location, &self.location),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                draft.set(field, value.as_str());
            }
        }
        Ok(draft)
    }
}

pub async fn run(
    mut workflow: WorkflowController,
    args: &RequestArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let draft = args.to_draft()?;

    let submitted = match workflow.submit(&draft).await {
        Ok(submitted) => submitted,
        Err(WorkflowError::Validation(errors)) => {
            match format {
                OutputFormat::Json => {
                    let body = serde_json::json!({ "errors": &errors });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                OutputFormat::Text => {
                    for (field, message) in errors.iter() {
                        eprintln!("  {field}: {message}");
                    }
                }
            }
            anyhow::bail!("{} field(s) need attention", errors.len());
        }
        Err(err) => return Err(err.into()),
    };

    if let OutputFormat::Text = format {
        println!("{}", submitted.acknowledgement.as_str());
    }

    // The submission hands its own blood group and location to matching.
    let loaded = workflow.load_matches().await.map(|_| ());

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "acknowledgement": submitted.acknowledgement.as_str(),
                "stored": &submitted.entry,
                "matches": donors::view(&workflow),
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => donors::print_text(&workflow),
    }

    loaded.map_err(Into::into)
}
