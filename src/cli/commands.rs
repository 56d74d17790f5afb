use std::collections::BTreeMap;
use std::time::Instant;

use crate::cli::config::Commands;
use crate::report::console::format_console_report;
use crate::report::html::{generate_html_report, render_page_html};
use crate::report::report_model::RunReport;
use crate::script::runner::ScriptRunner;
use crate::script::script_model::{FillValue, SessionScript};
use crate::trace::logger::TraceLogger;
use crate::transport::Transport;
use crate::transport::http::{Credentials, HttpTransport};
use crate::ui::controller::{ActionOutcome, UiController};

/// Connection and tracing settings after CLI/config/env resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub credentials: Option<Credentials>,
    pub trace_path: Option<String>,
}

pub fn build_controller(settings: &Settings) -> UiController<HttpTransport> {
    let mut transport = HttpTransport::new(&settings.base_url);
    if let Some(creds) = &settings.credentials {
        transport = transport.with_credentials(creds.clone());
    }

    let tracer = match &settings.trace_path {
        Some(path) => TraceLogger::new(path),
        None => TraceLogger::disabled(),
    };

    UiController::new(transport).with_tracer(tracer)
}

// ============================================================================
// Single actions (form, submit, analyze, review, profile, home)
// ============================================================================

/// Run one user action and show the resulting page.
///
/// Returns whether the action completed. `Run` is not an action and is
/// handled by `cmd_run`.
pub fn cmd_action<T: Transport>(
    controller: &mut UiController<T>,
    command: &Commands,
    save_page: Option<&str>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let outcome = match command {
        Commands::Form => controller.fetch_form()?,
        Commands::Submit { answers } => submit_with_answers(controller, answers.as_deref())?,
        Commands::Analyze => controller.analyze()?,
        Commands::Review => controller.view_input()?,
        Commands::Profile => controller.view_profile()?,
        Commands::Home => controller.return_home()?,
        Commands::Run { .. } => return Err("`run` is not a single action".into()),
    };

    match save_page {
        Some(path) => {
            std::fs::write(path, render_page_html(controller.state()))?;
            tracing::info!("page written to {}", path);
        }
        None => println!("{}", controller.state().target_text()),
    }

    Ok(outcome == ActionOutcome::Completed)
}

/// Open the form, fill it from the answers file and submit it. Without a
/// file nothing is on the page, so the server receives the repeat sentinel.
fn submit_with_answers<T: Transport>(
    controller: &mut UiController<T>,
    answers: Option<&str>,
) -> Result<ActionOutcome, Box<dyn std::error::Error>> {
    let Some(path) = answers else {
        return Ok(controller.submit_form()?);
    };

    let values = load_answers(path)?;
    if controller.fetch_form()? == ActionOutcome::Aborted {
        return Ok(ActionOutcome::Aborted);
    }
    for (field, value) in &values {
        controller.fill_field(field, &value.to_values())?;
    }
    Ok(controller.submit_form()?)
}

/// Load a field → value(s) mapping from YAML (or JSON, which YAML accepts).
pub fn load_answers(path: &str) -> Result<BTreeMap<String, FillValue>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

// ============================================================================
// run subcommand
// ============================================================================

/// Run every script found at `script_path`, each on a fresh page, and emit
/// a report. Returns whether all scripts passed.
pub fn cmd_run(
    script_path: &str,
    format: &str,
    output: Option<&str>,
    settings: &Settings,
) -> Result<bool, Box<dyn std::error::Error>> {
    let scripts = load_scripts(script_path)?;
    tracing::info!("loaded {} script(s) from {}", scripts.len(), script_path);

    let start = Instant::now();
    let mut results = Vec::new();
    for script in &scripts {
        tracing::info!("running script: {}", script.name);
        let mut controller = build_controller(settings);
        results.push(ScriptRunner::run(script, &mut controller));
    }

    let report = RunReport::from_results(script_path, results)
        .with_duration(start.elapsed().as_millis());
    let all_passed = report.all_passed();

    let content = match format {
        "html" => generate_html_report(&report),
        _ => format_console_report(&report),
    };

    match output {
        Some(path) => std::fs::write(path, &content)?,
        None => print!("{}", content),
    }

    Ok(all_passed)
}

/// Load session scripts from a single YAML/JSON file or a directory of them.
pub fn load_scripts(path: &str) -> Result<Vec<SessionScript>, Box<dyn std::error::Error>> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        let mut scripts = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let p = entry?.path();
            if p
                .extension()
                .is_some_and(|e| e == "yaml" || e == "yml" || e == "json")
            {
                let content = std::fs::read_to_string(&p)?;
                scripts.push(serde_yaml::from_str::<SessionScript>(&content)?);
            }
        }
        // Sort by name for deterministic order
        scripts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(scripts)
    } else {
        let content = std::fs::read_to_string(path)?;
        Ok(vec![serde_yaml::from_str(&content)?])
    }
}
