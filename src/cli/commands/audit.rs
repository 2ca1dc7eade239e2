//! Audit command - Run one compliance audit and render the report

use colored::Colorize;
use tracing::info;

use super::{emit, open_gateway, resolve_source, AuditArgs, OutputFormat};
use crate::audit::AuditOrchestrator;
use crate::cli::exit_codes;
use crate::cli::output::{JsonOutput, MarkdownReport, ReportRenderer, TerminalOutput};
use crate::config::Config;
use crate::error::ComplyScanError;

pub async fn execute(args: AuditArgs, mut config: Config) -> Result<i32, ComplyScanError> {
    args.apply_overrides(&mut config);

    let (provider, target) = resolve_source(&args.source, &config)?;
    let store = open_gateway(&config, args.no_store).await?;

    if args.format == OutputFormat::Terminal && args.output.is_none() {
        eprintln!(
            "{} {}",
            "Auditing".dimmed(),
            target.full_name().cyan().bold()
        );
    }

    let orchestrator = AuditOrchestrator::new(provider, store, config)?;
    let report = orchestrator.run(&target).await?;

    let renderer: Box<dyn ReportRenderer> = match args.format {
        OutputFormat::Terminal => Box::new(TerminalOutput::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
        OutputFormat::Markdown => Box::new(MarkdownReport::new(args.detailed)),
    };
    let rendered = renderer.render_report(&report)?;
    emit(&rendered, args.output.as_deref())?;

    let exit_code = exit_codes::for_severity(report.max_severity());
    info!(audit = %report.audit.id, exit_code, "Audit command finished");
    Ok(exit_code)
}
