use bloodlink_workflow::WorkflowController;

use crate::OutputFormat;
use crate::commands::donors::{self, SearchArgs};

pub async fn run(
    mut workflow: WorkflowController,
    args: &SearchArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    donors::load(&mut workflow, args).await??;

    if let OutputFormat::Text = format {
        donors::print_text(&workflow);
        println!("Sending notifications...");
    }

    let outcome = workflow.notify().await?;

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "matches": donors::view(&workflow),
                "outcome": outcome,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Text => println!("{}", outcome.message),
    }
    Ok(())
}
