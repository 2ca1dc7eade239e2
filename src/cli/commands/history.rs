//! History command - Inspect and prune stored audits

use colored::Colorize;

use super::{emit, open_store, resolve_target, HistoryArgs, OutputFormat};
use crate::cli::exit_codes;
use crate::cli::output::{HistoryRenderer, JsonOutput, TerminalOutput};
use crate::config::Config;
use crate::error::ComplyScanError;
use crate::store::{repository_id, Audit, PersistenceGateway};

pub async fn execute(args: HistoryArgs, mut config: Config) -> Result<i32, ComplyScanError> {
    if let Some(store) = &args.store {
        config.store.path = store.display().to_string();
    }

    let target = resolve_target(&args.source)?;
    let store = open_store(&config).await?;

    let Some(repository) = store
        .get_repository(&repository_id(&target.owner, &target.name))
        .await?
    else {
        eprintln!(
            "{} No audits recorded for {}",
            "Info:".blue().bold(),
            target.full_name().cyan()
        );
        return Ok(exit_codes::SUCCESS);
    };
    let audits = store.list_audits(&repository.id).await?;

    let renderer: Box<dyn HistoryRenderer> = match args.format {
        OutputFormat::Json => Box::new(JsonOutput::new()),
        OutputFormat::Terminal | OutputFormat::Markdown => Box::new(TerminalOutput::new()),
    };

    if let Some(prefix) = &args.delete {
        let audit = find_audit(&audits, prefix)?;
        store.delete_audit(&audit.id).await?;
        eprintln!(
            "{} Deleted audit {}",
            "Success:".green().bold(),
            audit.id.cyan()
        );
        return Ok(exit_codes::SUCCESS);
    }

    let rendered = match &args.show {
        Some(prefix) => {
            let audit = find_audit(&audits, prefix)?;
            let violations = store.list_violations(&audit.id).await?;
            renderer.render_audit(&repository, audit, &violations)?
        }
        None => {
            let shown = args.limit.min(audits.len());
            renderer.render_history(&repository, &audits[..shown])?
        }
    };
    emit(&rendered, None)?;

    Ok(exit_codes::SUCCESS)
}

/// Find the single audit whose id starts with `prefix`
fn find_audit<'a>(audits: &'a [Audit], prefix: &str) -> Result<&'a Audit, ComplyScanError> {
    let prefix = prefix.trim().to_ascii_lowercase();
    let matches: Vec<&Audit> = audits
        .iter()
        .filter(|a| !prefix.is_empty() && a.id.starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [audit] => Ok(*audit),
        others => Err(ComplyScanError::AmbiguousAuditId {
            prefix,
            matches: others.len(),
        }),
    }
}
