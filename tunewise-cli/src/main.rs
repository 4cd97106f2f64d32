mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, RecommendOverrides, ReportFormat};
use fs_err as fs;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io::Read;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tunewise_catalog::Catalog;
use tunewise_core::adapters::{FsWritePort, catalog_source, enricher};
use tunewise_core::intake::InputValidator;
use tunewise_core::pipeline::{ToolError, ToolInfo, run_recommend, write_report_artifacts};
use tunewise_core::settings::RecommendSettings;
use tunewise_render::{money, render_report_md, render_report_text};
use tunewise_types::{
    BudgetTier, Category, EngineType, ExperienceTier, Goal, Preferences, RecommendationRequest,
    Vehicle,
};

#[derive(Debug, Parser)]
#[command(
    name = "tunewise",
    version,
    about = "Deterministic recommendations for automotive modifications."
)]
struct Cli {
    /// Config file (default: ./tunewise.toml when present).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Catalog file (JSON or TOML) to use instead of the built-in table.
    #[arg(long, global = true)]
    catalog: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Recommend modifications for a vehicle and a set of preferences.
    Recommend(RecommendArgs),
    /// Check a request for errors and warnings without recommending.
    Validate(ValidateArgs),
    /// List accepted enumeration values and known makes and models.
    Options(FormatArgs),
    /// Print a sample request JSON.
    Sample,
    /// Suggest makes or models from partial input.
    Suggest {
        #[command(subcommand)]
        target: SuggestTarget,
    },
    /// List catalog modifications.
    ListMods(FormatArgs),
    /// Explain what a modification does, its risks and its constraints.
    Explain(ExplainArgs),
}

#[derive(Debug, Subcommand)]
enum SuggestTarget {
    /// Makes containing the partial text.
    Make { partial: String },
    /// Models of a make containing the partial text.
    Model { make: String, partial: String },
}

/// Request input: a JSON file or individual flags.
#[derive(Debug, clap::Args)]
struct RequestArgs {
    /// Request JSON file ("-" reads stdin). Replaces the vehicle and preference flags.
    #[arg(long, conflicts_with_all = ["make", "model", "year", "goals"])]
    request: Option<Utf8PathBuf>,

    /// Vehicle make (e.g. Toyota, BMW, Tesla).
    #[arg(long, required_unless_present = "request")]
    make: Option<String>,

    /// Vehicle model (e.g. Camry, 3 Series, Model 3).
    #[arg(long, required_unless_present = "request")]
    model: Option<String>,

    /// Model year.
    #[arg(long, required_unless_present = "request")]
    year: Option<u16>,

    /// Engine type (petrol, diesel, hybrid, electric).
    #[arg(long, value_parser = parse_token::<EngineType>, default_value = "petrol")]
    engine: EngineType,

    /// Installed modification, by catalog id, name, or free text. Repeatable.
    #[arg(long = "installed")]
    installed: Vec<String>,

    /// Goal (performance, fuel_economy, daily_comfort, track_use, off_roading). Repeatable.
    #[arg(
        long = "goal",
        value_parser = parse_token::<Goal>,
        value_delimiter = ',',
        required_unless_present = "request"
    )]
    goals: Vec<Goal>,

    /// Budget tier (budget, moderate, premium, unlimited).
    #[arg(long, value_parser = parse_token::<BudgetTier>, default_value = "moderate")]
    budget: BudgetTier,

    /// Experience tier (beginner, intermediate, advanced).
    #[arg(long, value_parser = parse_token::<ExperienceTier>, default_value = "intermediate")]
    experience: ExperienceTier,

    /// Hard spending ceiling in USD. Overrides the tier's upper bound.
    #[arg(long, allow_negative_numbers = true)]
    max_budget: Option<f64>,
}

#[derive(Debug, Parser)]
struct RecommendArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Stdout format (default: text, or [output] format from config).
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Write report.json, report.md and run.json to this directory.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Run the configured enricher on the finished report.
    #[arg(long, default_value_t = false)]
    enrich: bool,

    /// Never run the enricher, even when the config enables it.
    #[arg(long, default_value_t = false, conflicts_with = "enrich")]
    no_enrich: bool,

    /// Reject a budget below the cheapest matching modification instead of returning an empty report.
    #[arg(long, default_value_t = false)]
    strict_budget: bool,

    /// Skip the make/model/installed-text checks and pass free text to the engine.
    #[arg(long, default_value_t = false)]
    no_validate: bool,
}

#[derive(Debug, Parser)]
struct ValidateArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Modification id or name to explain (e.g., "stage1_ecu_remap", "big-brake-kit").
    modification: String,
}

#[derive(Debug, Parser)]
struct FormatArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Options shared by every subcommand.
struct Globals {
    config: Option<Utf8PathBuf>,
    catalog: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        error!("{:?}", e);
        let code = e.downcast_ref::<ToolError>().map_or(1, ToolError::exit_code);
        return ExitCode::from(code);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli {
        config,
        catalog,
        cmd,
    } = Cli::parse();
    let globals = Globals { config, catalog };

    match cmd {
        Command::Recommend(args) => cmd_recommend(&globals, args),
        Command::Validate(args) => cmd_validate(args),
        Command::Options(args) => cmd_options(args),
        Command::Sample => cmd_sample(),
        Command::Suggest { target } => cmd_suggest(target),
        Command::ListMods(args) => cmd_list_mods(&globals, args),
        Command::Explain(args) => cmd_explain(&globals, args),
    }
}

fn load_file_config(globals: &Globals) -> anyhow::Result<config::TunewiseConfig> {
    config::load_or_default(globals.config.as_deref(), Utf8Path::new("."))
        .context("load tunewise.toml config")
}

fn cmd_recommend(globals: &Globals, args: RecommendArgs) -> anyhow::Result<()> {
    let file_config = load_file_config(globals)?;
    let merged = ConfigMerger::new(file_config).merge_recommend_args(RecommendOverrides {
        catalog: globals.catalog.clone(),
        strict_budget: args.strict_budget,
        enrich: args.enrich,
        no_enrich: args.no_enrich,
        no_validate: args.no_validate,
        out_dir: args.out_dir,
        format: args.format,
    });
    let settings = &merged.settings;

    debug!(
        "merged config: catalog={:?}, strict_budget={}, validate={}, enrich={}",
        settings.catalog_path, settings.strict_budget, settings.validate, settings.enrich
    );
    if settings.enrich && settings.enrich_command.is_none() {
        warn!("enrichment requested but no [enrichment] command is configured");
    }

    let request = args.request.into_request()?;
    let catalogs = catalog_source(settings);
    let enricher = enricher(settings);
    let outcome = run_recommend(settings, &request, catalogs.as_ref(), enricher.as_ref())?;

    for warning in &outcome.validation.warnings {
        warn!("{}", warning);
    }

    match merged.format {
        ReportFormat::Text => print!("{}", render_report_text(&outcome.report)),
        ReportFormat::Markdown => print!("{}", render_report_md(&outcome.report)),
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        }
    }

    if let Some(out_dir) = &settings.out_dir {
        write_report_artifacts(&outcome, out_dir, &tool_info(), &FsWritePort)?;
        info!("wrote report artifacts to {}", out_dir);
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let request = args.request.into_request()?;
    let validation = InputValidator::new().validate(&request);

    match args.format {
        OutputFormat::Text => {
            if validation.errors.is_empty() && validation.warnings.is_empty() {
                println!("ok: request is valid");
            }
            for e in &validation.errors {
                println!("error: {}", e);
            }
            for w in &validation.warnings {
                println!("warning: {}", w);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&validation)?);
        }
    }

    if !validation.is_ok() {
        return Err(ToolError::InputRejected(validation.errors).into());
    }
    Ok(())
}

fn cmd_options(args: FormatArgs) -> anyhow::Result<()> {
    let validator = InputValidator::new();

    match args.format {
        OutputFormat::Text => {
            println!(
                "Engine types:      {}",
                join(&EngineType::ALL.map(EngineType::as_str))
            );
            println!("Goals:             {}", join(&Goal::ALL.map(Goal::as_str)));
            println!(
                "Experience tiers:  {}",
                join(&ExperienceTier::ALL.map(ExperienceTier::as_str))
            );
            println!(
                "Categories:        {}",
                join(&Category::ALL.map(Category::as_str))
            );
            println!();
            println!("Budget tiers:");
            for tier in BudgetTier::ALL {
                let range = tier.range();
                println!(
                    "  {:<10} {} - {}",
                    tier.as_str(),
                    money(range.min),
                    money(range.max)
                );
            }
            println!();
            println!("Known makes:");
            println!("  {}", join(validator.makes()));
            println!();
            println!("Known models:");
            for (make, models) in validator.model_table() {
                println!("  {:<14} {}", make, join(models));
            }
        }
        OutputFormat::Json => {
            let tiers: Vec<_> = BudgetTier::ALL
                .iter()
                .map(|tier| {
                    let range = tier.range();
                    serde_json::json!({
                        "tier": tier,
                        "min": range.min,
                        "max": range.max,
                    })
                })
                .collect();
            let models: BTreeMap<&str, &[&str]> =
                validator.model_table().iter().copied().collect();
            let options = serde_json::json!({
                "engine_types": EngineType::ALL,
                "goals": Goal::ALL,
                "budget_tiers": tiers,
                "experience_tiers": ExperienceTier::ALL,
                "categories": Category::ALL,
                "makes": validator.makes(),
                "models": models,
            });
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
    }
    Ok(())
}

fn sample_request() -> RecommendationRequest {
    RecommendationRequest {
        vehicle: Vehicle {
            make: "BMW".to_string(),
            model: "3 Series".to_string(),
            year: 2021,
            engine_type: EngineType::Petrol,
            installed_modifications: vec![
                "Sport exhaust".to_string(),
                "Lowered suspension".to_string(),
            ],
        },
        preferences: Preferences {
            goals: vec![Goal::Performance, Goal::TrackUse],
            budget_tier: BudgetTier::Premium,
            experience: ExperienceTier::Advanced,
            max_budget: Some(15_000.0),
        },
    }
}

fn cmd_sample() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&sample_request())?);
    Ok(())
}

fn cmd_suggest(target: SuggestTarget) -> anyhow::Result<()> {
    let validator = InputValidator::new();
    let suggestions = match &target {
        SuggestTarget::Make { partial } => validator.suggest_makes(partial),
        SuggestTarget::Model { make, partial } => validator.suggest_models(make, partial),
    };
    for s in suggestions {
        println!("{}", s);
    }
    Ok(())
}

fn load_catalog(globals: &Globals) -> anyhow::Result<Catalog> {
    let file_config = load_file_config(globals)?;
    let settings = RecommendSettings {
        catalog_path: ConfigMerger::new(file_config).catalog_path(globals.catalog.clone()),
        ..RecommendSettings::default()
    };
    catalog_source(&settings).load_catalog()
}

fn cmd_list_mods(globals: &Globals, args: FormatArgs) -> anyhow::Result<()> {
    use explain::format_safety;

    let catalog = load_catalog(globals)?;
    match args.format {
        OutputFormat::Text => {
            println!("Available modifications:\n");
            println!(
                "  {:<24} {:<14} {:<8} {:<13} COST",
                "ID", "CATEGORY", "SAFETY", "EXPERIENCE"
            );
            println!(
                "  {:<24} {:<14} {:<8} {:<13} ----",
                "--", "--------", "------", "----------"
            );
            for m in catalog.iter() {
                println!(
                    "  {:<24} {:<14} {:<8} {:<13} {} - {}",
                    m.id,
                    m.category.as_str(),
                    format_safety(m.safety),
                    m.experience.as_str(),
                    money(m.cost.min),
                    money(m.cost.max)
                );
            }
            println!();
            println!("Use 'tunewise explain <id>' for details.");
        }
        OutputFormat::Json => {
            let mods: Vec<_> = catalog
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "id": m.id,
                        "name": m.name,
                        "category": m.category,
                        "safety": m.safety,
                        "experience": m.experience,
                        "engine_types": m.engine_types,
                        "cost": m.cost,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&mods)?);
        }
    }
    Ok(())
}

fn cmd_explain(globals: &Globals, args: ExplainArgs) -> anyhow::Result<()> {
    use explain::{format_safety, list_modification_ids, lookup_modification, safety_meaning};

    let catalog = load_catalog(globals)?;
    let Some(m) = lookup_modification(&catalog, &args.modification) else {
        let available = list_modification_ids(&catalog).join(", ");
        anyhow::bail!(
            "Unknown modification: '{}'\n\nAvailable modifications: {}",
            args.modification,
            available
        );
    };
    let rule = "--------------------------------------------------------------------------------";

    // Title and basic info
    println!("================================================================================");
    println!("MODIFICATION: {}", m.name);
    println!("================================================================================");
    println!();
    println!("Id:          {}", m.id);
    println!("Category:    {}", m.category.as_str());
    println!("Cost:        {} - {}", money(m.cost.min), money(m.cost.max));
    println!("Safety:      {}", format_safety(m.safety));
    if m.guided {
        println!("Experience:  {} (guided)", m.experience.as_str());
    } else {
        println!("Experience:  {}", m.experience.as_str());
    }
    println!(
        "Engines:     {}",
        m.engine_types
            .iter()
            .map(|e| e.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    println!("DESCRIPTION");
    println!("{rule}");
    println!("{}", m.description);
    println!();

    if !m.benefits.is_empty() {
        println!("BENEFITS");
        println!("{rule}");
        for b in &m.benefits {
            println!("  - {}", b);
        }
        println!();
    }

    println!("SAFETY LEVEL: {}", format_safety(m.safety));
    println!("{rule}");
    println!("{}", safety_meaning(m.safety));
    for w in &m.safety_warnings {
        println!("  ! {}", w);
    }
    println!();

    println!("LEGAL");
    println!("{rule}");
    println!("Warranty:    {}", m.legal.warranty.as_str());
    println!("Emissions:   {}", m.legal.emissions.as_str());
    println!("Insurance:   {}", m.legal.insurance.as_str());
    for c in &m.legal_considerations {
        println!("  - {}", c);
    }
    println!();

    println!("COMPATIBILITY");
    println!("{rule}");
    println!("Requires:        {}", list(&m.prerequisites));
    println!("Conflicts with:  {}", list(&m.conflicts));
    println!();

    println!("INSTALLATION");
    println!("{rule}");
    if let Some(difficulty) = &m.installation_difficulty {
        println!("{}", difficulty);
    }
    if m.professional_required {
        println!("Professional installation required.");
    }
    println!();

    Ok(())
}

impl RequestArgs {
    fn into_request(self) -> Result<RecommendationRequest, ToolError> {
        if let Some(path) = &self.request {
            return read_request(path);
        }

        Ok(RecommendationRequest {
            vehicle: Vehicle {
                make: self.make.unwrap_or_default(),
                model: self.model.unwrap_or_default(),
                year: self.year.unwrap_or_default(),
                engine_type: self.engine,
                installed_modifications: self.installed,
            },
            preferences: Preferences {
                goals: self.goals,
                budget_tier: self.budget,
                experience: self.experience,
                max_budget: self.max_budget,
            },
        })
    }
}

fn read_request(path: &Utf8Path) -> Result<RecommendationRequest, ToolError> {
    let text = if path.as_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read request from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("read request {}", path))?
    };

    serde_json::from_str(&text)
        .map_err(|e| ToolError::InputRejected(vec![format!("malformed request {}: {}", path, e)]))
}

/// Parses a lowercase enumeration token; `-` and spaces count as `_`.
fn parse_token<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let token = raw.trim().to_lowercase().replace(['-', ' '], "_");
    serde_json::from_value(serde_json::Value::String(token))
        .map_err(|_| format!("unrecognized value '{}'", raw))
}

fn join(items: &[&str]) -> String {
    items.join(", ")
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "tunewise".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
