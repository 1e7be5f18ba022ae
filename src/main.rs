use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fmt::Write;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use fibo_planner::config::Config;
use fibo_planner::core::planner::plan_now;
use fibo_planner::core::recommendation::recommend_targets;
use fibo_planner::models::request::parse_levels;
use fibo_planner::models::{CustomRequest, Direction, FiboRequest, Leg, PlanKind, PlanRequest};
use fibo_planner::presentation::tables::{
    dashboard_table, entry_plan_table, recommendations_table, tp_targets_table,
};
use fibo_planner::presentation::{
    perform, status_banner, Action, ActionOutcome, Banner, ChartWidget,
};
use fibo_planner::trading::TradeLog;

#[derive(Parser, Debug)]
#[command(name = "fibo-planner")]
#[command(about = "Fibonacci and multi-leg trade planner with risk-budgeted sizing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Account balance (overrides ACCOUNT_BALANCE)
    #[arg(long, global = true)]
    balance: Option<f64>,

    /// Trade log file (overrides TRADE_LOG_PATH)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plan entries on a Fibonacci retracement
    Fibo {
        /// Swing high
        #[arg(long)]
        high: f64,

        /// Swing low
        #[arg(long)]
        low: f64,

        /// Retracement levels, comma-separated (defaults to DEFAULT_FIBO_LEVELS)
        #[arg(long)]
        levels: Option<String>,

        /// Risk as a percentage of the account
        #[arg(long)]
        risk: Option<f64>,

        #[arg(short, long, value_parser = parse_direction)]
        direction: Direction,

        #[arg(short, long, value_enum)]
        action: Option<Action>,

        /// Also print the chart embed
        #[arg(long)]
        chart: bool,
    },

    /// Plan up to five explicit legs
    Custom {
        /// ENTRY,SL[,TP]; repeat for each leg
        #[arg(long = "leg", required = true, value_parser = parse_leg)]
        legs: Vec<Leg>,

        /// Risk as a percentage of the account
        #[arg(long)]
        risk: Option<f64>,

        #[arg(short, long, value_parser = parse_direction)]
        direction: Direction,

        #[arg(short, long, value_enum)]
        action: Option<Action>,

        /// Also print the chart embed
        #[arg(long)]
        chart: bool,
    },

    /// Show saved plans
    Dashboard,

    /// Print the chart embed for the configured symbol
    Chart,
}

fn parse_direction(s: &str) -> Result<Direction, String> {
    s.parse()
}

fn parse_leg(s: &str) -> Result<Leg, String> {
    s.parse().map_err(|e: fibo_planner::models::RequestError| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = Config::from_env();
    if let Some(balance) = cli.balance {
        cfg.account_balance = balance;
    }
    if let Some(path) = cli.log_file.clone() {
        cfg.log_path = path;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let log = TradeLog::new(cfg.log_path.clone());

    match cli.command {
        Commands::Fibo {
            high,
            low,
            levels,
            risk,
            direction,
            action,
            chart,
        } => {
            let levels = match levels {
                Some(s) => parse_levels(&s)?,
                None => cfg.default_levels.clone(),
            };
            let req = FiboRequest::new(
                high,
                low,
                levels,
                risk.unwrap_or(cfg.default_risk_pct),
                direction,
            );
            run_plan(&cfg, &log, PlanRequest::fibo(req, cfg.account_balance), action, chart)
        }
        Commands::Custom {
            legs,
            risk,
            direction,
            action,
            chart,
        } => {
            let req = CustomRequest::new(legs, risk.unwrap_or(cfg.default_risk_pct), direction)?;
            run_plan(&cfg, &log, PlanRequest::custom(req, cfg.account_balance), action, chart)
        }
        Commands::Dashboard => {
            match log.load() {
                Ok(rows) => {
                    let mut out = String::new();
                    dashboard_table(&mut out, &rows)?;
                    print!("{}", out);
                }
                Err(e) => {
                    error!("Dashboard read failed: {}", e);
                    eprintln!("{}", Banner::error(e.to_string()));
                }
            }
            Ok(())
        }
        Commands::Chart => print_chart(&ChartWidget::from_config(&cfg)),
    }
}

fn run_plan(
    cfg: &Config,
    log: &TradeLog,
    request: PlanRequest,
    action: Option<Action>,
    chart: bool,
) -> Result<()> {
    info!(
        "Planning {} {} on balance {:.2}",
        request.mode(),
        request.direction(),
        request.account_balance
    );
    let response = plan_now(&request);

    if let Some(banner) = status_banner(response.status) {
        eprintln!("{}", banner);
    }

    let mut out = String::new();
    writeln!(out)?;
    entry_plan_table(&mut out, &response)?;
    writeln!(out)?;
    match &request.kind {
        PlanKind::Fibo(_) => tp_targets_table(&mut out, &response)?,
        PlanKind::Custom(req) => {
            let recs = recommend_targets(req, &response);
            recommendations_table(&mut out, req, &response, &recs)?;
        }
    }
    print!("{}", out);

    if chart {
        println!();
        print_chart(&ChartWidget::from_config(cfg))?;
    }

    if let Some(action) = action {
        println!();
        match perform(action, &response, log) {
            Ok(ActionOutcome::Copied(text)) => println!("{}", text),
            Ok(ActionOutcome::Sent(text)) => println!("{}", text),
            Ok(ActionOutcome::Saved(path)) => println!("Saved plan to {}", path.display()),
            Err(e) => {
                error!("{:?} failed: {}", action, e);
                eprintln!("{}", Banner::error(e.to_string()));
            }
        }
    }

    Ok(())
}

fn print_chart(widget: &ChartWidget) -> Result<()> {
    println!("  CHART {} ({})", widget.symbol, widget.interval);
    println!("  {}", widget.embed_url()?);
    println!("{}", widget.embed_html()?);
    Ok(())
}
