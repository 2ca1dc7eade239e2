//! Policy command - Show the dependency policy a repository declares

use colored::Colorize;
use serde::Serialize;

use super::{emit, resolve_source, OutputFormat, PolicyArgs};
use crate::cli::exit_codes;
use crate::config::Config;
use crate::error::ComplyScanError;
use crate::manifest::{locate_manifest, DependencyPolicy};

#[derive(Serialize)]
struct PolicyOutput<'a> {
    repository: String,
    manifest: &'a str,
    #[serde(flatten)]
    policy: &'a DependencyPolicy,
}

pub async fn execute(args: PolicyArgs, config: Config) -> Result<i32, ComplyScanError> {
    let (provider, target) = resolve_source(&args.source, &config)?;
    let manifest = locate_manifest(
        provider.as_ref(),
        &target.owner,
        &target.name,
        &config.manifest.filenames,
        &config.manifest.branches,
    )
    .await?;
    let policy = manifest.policy();

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&PolicyOutput {
            repository: target.full_name(),
            manifest: &manifest.path,
            policy: &policy,
        })?,
        OutputFormat::Terminal | OutputFormat::Markdown => {
            render_terminal(&target.full_name(), &manifest.path, &policy)
        }
    };
    emit(&rendered, None)?;

    Ok(exit_codes::SUCCESS)
}

fn render_terminal(repository: &str, manifest: &str, policy: &DependencyPolicy) -> String {
    let mut output = format!(
        "\n{} {}\n{} {}\n\n",
        "Repository:".dimmed(),
        repository.white().bold(),
        "Manifest:".dimmed(),
        manifest.cyan()
    );

    output.push_str(&format!(
        "{} ({})\n",
        "Allowed".green().bold(),
        policy.allowed.len()
    ));
    for name in &policy.allowed {
        output.push_str(&format!("  {} {}\n", "+".green(), name));
    }

    output.push_str(&format!(
        "\n{} ({})\n",
        "Forbidden".red().bold(),
        policy.forbidden.len()
    ));
    for name in &policy.forbidden {
        output.push_str(&format!("  {} {}\n", "-".red(), name));
    }

    output
}
