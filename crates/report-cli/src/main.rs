//! stock-report CLI
//!
//! Collects ticker symbols, fetches their recent price history and prints a
//! short AI-written report.
//!
//! # Usage
//!
//! ```bash
//! # Backend (report-server) must be running
//! stock-report --ticker tsla --ticker aapl
//!
//! # Interactive
//! stock-report --api-base http://localhost:3001
//! ```

mod terminal;

use clap::Parser;
use report_core::{
    DateRange, PipelineController, PipelineError, Presenter, ReportConfig, ReportResult, Session,
};
use report_utils::Config;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use terminal::{Command, TerminalPresenter};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-report")]
#[command(about = "AI-powered stock reports from recent price history", long_about = None)]
struct Args {
    /// Ticker to include; repeat for more. Runs once and exits.
    #[arg(short, long = "ticker")]
    tickers: Vec<String>,

    /// Report backend base URL, overrides STOCK_REPORT_API_BASE
    #[arg(long)]
    api_base: Option<String>,

    /// Days of price history, overrides STOCK_REPORT_LOOKBACK_DAYS
    #[arg(short, long)]
    days: Option<u32>,
}

fn print_help() {
    println!(
        r"
Commands:
  <symbol>    add a ticker (3+ letters, e.g. TSLA)
  /generate   create a report for the added tickers
  /list       show added tickers
  /help       show this help
  /exit       quit
"
    );
}

fn load_config(args: &Args) -> anyhow::Result<ReportConfig> {
    let mut config = ReportConfig::from_env()?;
    if let Some(api_base) = &args.api_base {
        config.api_base.clone_from(api_base);
    }
    if let Some(days) = args.days {
        config.lookback_days = days;
    }
    config.validate()?;
    Ok(config)
}

/// Register `tickers` and run once.
///
/// Rejected symbols are reported and skipped; if none is left the run is
/// refused with `NoTickers`. Failures are already rendered by `presenter`.
async fn one_shot(
    controller: &PipelineController,
    range: &DateRange,
    tickers: &[String],
    presenter: &mut dyn Presenter,
) -> Result<ReportResult, PipelineError> {
    let mut session = Session::new();
    for raw in tickers {
        // rejection is already rendered
        let _ = session.submit_and_render(raw, presenter);
    }

    controller.run(&mut session, range, presenter).await
}

async fn interactive(controller: &PipelineController, config: &ReportConfig) -> anyhow::Result<()> {
    let mut session = Session::new();
    let mut presenter = TerminalPresenter::stdio();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Stock Report ({})", config.api_base);
    print_help();

    loop {
        print!("{}\n> ", session.input_hint());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        match Command::parse(&input) {
            Command::Ticker("") => {}
            Command::Ticker(raw) => {
                // rejection is already rendered
                let _ = session.submit_and_render(raw, &mut presenter);
            }
            Command::Generate => {
                // each run picks its own window so a long session stays current
                let range = DateRange::recent(config.lookback_days)?;
                // failures are rendered by the presenter; the registry is kept
                let _ = controller.run(&mut session, &range, &mut presenter).await;
            }
            Command::List => {
                if session.can_generate() {
                    presenter.render_tickers(session.tickers());
                } else {
                    println!("No tickers yet.");
                }
            }
            Command::Help => print_help(),
            Command::Exit => {
                println!("Goodbye!");
                break;
            }
            Command::Unknown(command) => eprintln!("Unknown command: {command} (try /help)"),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    report_utils::init_tracing_with("warn,report_core=info");

    let args = Args::parse();
    let app_config = Config::for_app("stock-report").with_env();
    let config = load_config(&args)?;
    info!(
        app = %app_config.app_name,
        api_base = %config.api_base,
        days = config.lookback_days,
        "starting"
    );

    let controller = PipelineController::from_config(&config)?;

    if args.tickers.is_empty() {
        interactive(&controller, &config).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let range = DateRange::recent(config.lookback_days)?;
    let mut presenter = TerminalPresenter::stdio();
    match one_shot(&controller, &range, &args.tickers, &mut presenter).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
