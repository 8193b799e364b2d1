//! Run orchestration.
//!
//! [`run_dedup`] is the host-agnostic flow: selection, tolerance prompts,
//! engine, selection update, report. [`run_app`] wires it to the CLI, the
//! scene file and the configured output.

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, ConfigArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{
    DedupEngine, DuplicateSet, EngineConfig, EntityId, Kind, ResolveOrder, RunSummary, Tolerances,
};
use crate::error::{DedupError, ExitCode};
use crate::host::{
    GeometryProvider, InputPrompt, ObjectSource, PresetAnswer, PresetPrompt, SceneDocument,
    SelectionFile, SelectionSink, TerminalPrompt,
};
use crate::logging::init_logging;
use crate::output::{CsvOutput, JsonOutput};
use crate::progress::{Progress, ProgressCallback};
use crate::report::{self, Report};

/// Prompt label for the distance tolerance.
pub const DISTANCE_LABEL: &str = "Distance tolerance";
/// Prompt label for the angle tolerance.
pub const ANGLE_LABEL: &str = "Angle tolerance (degrees)";

/// Settings for one run that do not come from the prompts.
#[derive(Clone)]
pub struct RunOptions {
    /// Offered as the distance default, normally the document tolerance.
    pub default_distance: f64,
    pub default_angle_degrees: f64,
    pub order: ResolveOrder,
    pub progress: Option<Arc<dyn ProgressCallback>>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            default_distance: 0.001,
            default_angle_degrees: 1.0,
            order: ResolveOrder::default(),
            progress: None,
        }
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub tolerances: Tolerances,
    pub duplicates: DuplicateSet,
    pub summary: RunSummary,
    pub report: Report,
}

impl RunOutcome {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.report.found_any() {
            ExitCode::Success
        } else {
            ExitCode::NoDuplicates
        }
    }
}

/// Run one deduplication against host collaborators.
///
/// Nothing is applied to `sink` unless the run gets past both prompts and
/// the engine finishes; then it is applied exactly once.
///
/// # Errors
///
/// - [`DedupError::NoSelection`] if the source selects nothing
/// - [`DedupError::Cancelled`] if a prompt is cancelled
/// - [`DedupError::InvalidTolerance`] if a value is out of range
/// - any error from the sink
pub fn run_dedup(
    source: &dyn ObjectSource,
    provider: &dyn GeometryProvider,
    prompt: &mut dyn InputPrompt,
    sink: Option<&mut dyn SelectionSink>,
    options: &RunOptions,
) -> Result<RunOutcome> {
    let selection = source.get_selection();
    if selection.is_empty() {
        return Err(DedupError::NoSelection.into());
    }

    let distance = prompt
        .get_real(DISTANCE_LABEL, options.default_distance, 0.0, None)
        .ok_or(DedupError::Cancelled("distance"))?;
    let angle = prompt
        .get_real(ANGLE_LABEL, options.default_angle_degrees, 0.0, Some(180.0))
        .ok_or(DedupError::Cancelled("angle"))?;
    let tolerances = Tolerances::from_degrees(distance, angle)?;
    log::info!(
        "Checking {} object(s), distance tolerance {}, angle tolerance {}°",
        selection.len(),
        tolerances.distance(),
        tolerances.angle_degrees()
    );

    let mut config = EngineConfig::new(tolerances).with_order(options.order);
    if let Some(progress) = &options.progress {
        config = config.with_progress_callback(Arc::clone(progress));
    }
    let (duplicates, summary) = DedupEngine::new(config).find_duplicates(&selection, provider);

    if let Some(sink) = sink {
        report::publish(&duplicates, sink).context("Failed to apply the duplicate selection")?;
    }

    let report = Report::from_run(&duplicates, &summary);
    Ok(RunOutcome {
        tolerances,
        duplicates,
        summary,
        report,
    })
}

/// Entry point used by the binary.
///
/// # Errors
///
/// Returns an error if the scene cannot be loaded, the run aborts, or the
/// output cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref());
    match &cli.command {
        Commands::Scan(args) => {
            config.merge_scan_args(args);
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            run_scan(args, &config, cli.quiet, cli.verbose, &mut out)
        }
        Commands::Config(args) => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            run_config(args, &cli, &config, &mut out)
        }
    }
}

/// Run the scan subcommand with an already merged configuration.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_scan(
    args: &ScanArgs,
    config: &Config,
    quiet: bool,
    verbose: u8,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let mut scene = SceneDocument::load(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    if !args.select.is_empty() {
        scene = scene.with_selection(args.select.iter().copied().map(EntityId).collect());
    }

    let options = RunOptions {
        default_distance: scene.absolute_tolerance(),
        default_angle_degrees: config.angle_tolerance_degrees,
        order: config.resolve_order,
        progress: (!quiet && !config.output.is_machine_readable())
            .then(|| Arc::new(Progress::new(false)) as Arc<dyn ProgressCallback>),
    };

    let mut sink = args
        .save_selection
        .as_ref()
        .map(|path| SelectionFile::new(path, scene.name()));
    let sink_ref = sink.as_mut().map(|s| s as &mut dyn SelectionSink);

    let outcome = if config.interactive {
        let mut prompt = TerminalPrompt::stdio();
        run_dedup(&scene, &scene, &mut prompt, sink_ref, &options)?
    } else {
        let mut prompt = PresetPrompt::new([
            PresetAnswer::from(config.distance_tolerance),
            PresetAnswer::Value(config.angle_tolerance_degrees),
        ]);
        run_dedup(&scene, &scene, &mut prompt, sink_ref, &options)?
    };

    let exit_code = outcome.exit_code();
    write_outcome(&outcome, &scene, config.output, exit_code, verbose, out)?;
    Ok(exit_code)
}

fn write_outcome(
    outcome: &RunOutcome,
    provider: &dyn GeometryProvider,
    format: OutputFormat,
    exit_code: ExitCode,
    verbose: u8,
    out: &mut dyn Write,
) -> Result<()> {
    let kinds: BTreeMap<EntityId, Kind> = outcome
        .duplicates
        .ids()
        .into_iter()
        .filter_map(|id| provider.resolve(id).map(|g| (id, g.kind())))
        .collect();

    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", outcome.report.styled_message())?;
            if verbose > 0 && outcome.report.found_any() {
                writeln!(out, "{}", outcome.report.detail(&outcome.duplicates))?;
            }
        }
        OutputFormat::Json => {
            JsonOutput::new(
                &outcome.duplicates,
                &kinds,
                &outcome.summary,
                &outcome.tolerances,
                exit_code,
            )
            .write_to(out)
            .context("Failed to write JSON output")?;
        }
        OutputFormat::Csv => {
            CsvOutput::new(&outcome.duplicates, &kinds)
                .write_to(&mut *out)
                .context("Failed to write CSV output")?;
        }
    }
    Ok(())
}

fn run_config(args: &ConfigArgs, cli: &Cli, config: &Config, out: &mut dyn Write) -> Result<ExitCode> {
    let rendered = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    write!(out, "{rendered}")?;
    if args.save {
        let path = cli
            .config
            .clone()
            .or_else(Config::default_path)
            .context("No configuration directory available")?;
        config.save_to_path(&path)?;
        log::info!("Saved configuration to {}", path.display());
    }
    Ok(ExitCode::Success)
}
