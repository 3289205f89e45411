mod ui;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use fourthdown_client::{HttpRecommendationClient, RecommendationClient};
use fourthdown_dashboard::{render, Dashboard};
use fourthdown_ops::init_tracing;
use fourthdown_types::{
    config::{DashboardConfig, API_URL_ENV},
    form::{coerce, FormField, RawForm},
};
use tracing::{info, warn};

const DEFAULT_TUI_LOG_FILE: &str = "fourthdown.log";

#[derive(Debug, Parser)]
#[command(name = "fourthdown", version, about = "Fourth-down decision dashboard")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "FOURTHDOWN_CONFIG")]
    config: Option<PathBuf>,

    /// Decision-service origin; overrides the config file and environment.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive terminal dashboard (default).
    Dashboard,
    /// Request a single recommendation and print it.
    Ask(AskArgs),
}

/// Raw form values; passed through the same coercion as the dashboard form.
#[derive(Debug, Args)]
struct AskArgs {
    #[arg(long, default_value = "4")]
    down: String,
    #[arg(long, default_value = "10")]
    ydstogo: String,
    #[arg(long = "yardline-100", default_value = "50")]
    yardline_100: String,
    #[arg(long = "time-remaining", default_value = "900")]
    time_remaining: String,
    #[arg(long, default_value = "1")]
    qtr: String,
    #[arg(long = "score-diff", default_value = "0", allow_hyphen_values = true)]
    score_diff: String,
    #[arg(long = "offense-timeouts", default_value = "3")]
    offense_timeouts: String,
    #[arg(long = "defense-timeouts", default_value = "3")]
    defense_timeouts: String,
    #[arg(long, default_value = "false")]
    home: String,
}

impl AskArgs {
    fn to_form(&self) -> RawForm {
        [
            (FormField::Down, &self.down),
            (FormField::YardsToGo, &self.ydstogo),
            (FormField::Yardline100, &self.yardline_100),
            (FormField::TimeRemaining, &self.time_remaining),
            (FormField::Quarter, &self.qtr),
            (FormField::ScoreDiff, &self.score_diff),
            (FormField::OffenseTimeouts, &self.offense_timeouts),
            (FormField::DefenseTimeouts, &self.defense_timeouts),
            (FormField::Home, &self.home),
        ]
        .into_iter()
        .map(|(field, value)| (field.name(), value.clone()))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => {
            // stderr is hidden behind the alternate screen.
            let mut ops = config.ops.clone();
            ops.log_file.get_or_insert_with(|| DEFAULT_TUI_LOG_FILE.into());
            init_tracing(&ops)?;
            info!(base_url = %config.api.base_url, "starting dashboard");
            let client = HttpRecommendationClient::new(config.api.base_url.clone());
            let dashboard = Dashboard::new(client, config.ui.apply_policy);
            ui::run(dashboard, &config)
        }
        Command::Ask(args) => {
            let mut ops = config.ops.clone();
            ops.log_file = None;
            init_tracing(&ops)?;
            let client = HttpRecommendationClient::new(config.api.base_url.clone());
            ask(&client, &args.to_form()).await
        }
    }
}

async fn ask<C: RecommendationClient>(client: &C, form: &RawForm) -> Result<()> {
    let coerced = coerce(form);
    for anomaly in &coerced.anomalies {
        warn!(
            "{} = {:?} is not a number; sending NaN",
            anomaly.field.name(),
            anomaly.raw
        );
    }

    match client.recommend(&coerced.state).await {
        Ok(recommendation) => {
            let rendered = render(&recommendation);
            println!("Recommendation: {}", rendered.action);
            println!("{}", rendered.delta_wp);
            println!("{}", rendered.delta_ep);
            if !rendered.alternatives.is_empty() {
                println!("Alternatives:");
                for line in &rendered.alternatives {
                    println!("  {line}");
                }
            }
            if !rendered.rationale.is_empty() {
                println!("Rationale:");
                for (idx, line) in rendered.rationale.iter().enumerate() {
                    println!("  {}. {line}", idx + 1);
                }
            }
            println!("model {}", rendered.version);
            Ok(())
        }
        Err(err) => bail!("{}", err.user_message()),
    }
}

/// File (if given), then `FOURTHDOWN_API_URL`, then command-line flags.
fn load_config(cli: &Cli) -> DashboardConfig {
    let base = match cli.config.as_ref() {
        Some(path) => match DashboardConfig::from_file(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!(
                    "Failed to load config from '{}': {err}. Falling back to internal defaults.",
                    path.display()
                );
                DashboardConfig::default()
            }
        },
        None => DashboardConfig::default(),
    };

    let mut config = base
        .with_env_overrides()
        .with_base_url_override(cli.base_url.clone());
    if let Some(level) = cli.log_level.as_ref() {
        config.ops.log_level = level.clone();
    }

    if let Err(err) = config.validate() {
        eprintln!(
            "Invalid configuration ({err}); check --base-url or {API_URL_ENV}. \
             Falling back to internal defaults."
        );
        return DashboardConfig::default();
    }
    config
}
