use bloodlink_core::{Donor, SearchParameters};
use bloodlink_workflow::{ParameterSource, WorkflowController};
use clap::Args;
use serde::Serialize;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Blood group to search for instead of the stored request's.
    #[arg(long, requires = "location")]
    pub blood_group: Option<String>,
    /// Location to search in instead of the stored request's.
    #[arg(long, requires = "blood_group")]
    pub location: Option<String>,
}

impl SearchArgs {
    /// Parameters typed on the command line, if both were given.
    pub fn manual(&self) -> Option<SearchParameters> {
        match (&self.blood_group, &self.location) {
            (Some(group), Some(location)) => {
                Some(SearchParameters::new(group.as_str(), location.as_str()))
            }
            _ => None,
        }
    }
}

/// What the matches page shows.
#[derive(Debug, Serialize)]
pub struct MatchesView<'a> {
    pub source: ParameterSource,
    pub parameters: &'a SearchParameters,
    pub donors: &'a [Donor],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub notify_enabled: bool,
}

pub fn view(workflow: &WorkflowController) -> Option<MatchesView<'_>> {
    let search = workflow.search()?;
    let matches = workflow.matches()?;
    Some(MatchesView {
        source: search.source,
        parameters: &search.parameters,
        donors: &matches.donors,
        error: workflow.match_error(),
        notify_enabled: workflow.can_notify(),
    })
}

/// Text rendering of the matches page. Failed queries print nothing here;
/// the error is reported by the caller.
pub fn print_text(workflow: &WorkflowController) {
    let (Some(search), Some(matches)) = (workflow.search(), workflow.matches()) else {
        return;
    };
    if workflow.match_error().is_some() {
        return;
    }

    println!("Donors for {} ({})", search.parameters, search.source);
    if matches.is_empty() {
        println!("No donors found for {}.", search.parameters);
        return;
    }
    println!("{}:", matches.summary());
    for donor in matches {
        println!("  {}", donor.summary_line());
    }
    println!("[{}]", workflow.notify_label());
}

/// Open the matches page and load donors. Typed flags are a manual search;
/// without them the stored request is used. The workflow is left in the
/// ready state whether or not the query succeeded.
pub async fn load(
    workflow: &mut WorkflowController,
    args: &SearchArgs,
) -> anyhow::Result<Result<(), bloodlink_workflow::WorkflowError>> {
    match args.manual() {
        Some(params) => workflow.open_manual(params)?,
        None => workflow.open_matches(None).await?,
    };
    Ok(workflow.load_matches().await.map(|_| ()))
}

pub async fn run(
    mut workflow: WorkflowController,
    args: &SearchArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let loaded = load(&mut workflow, args).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view(&workflow))?);
        }
        OutputFormat::Text => print_text(&workflow),
    }

    loaded.map_err(Into::into)
}
