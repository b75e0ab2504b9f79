mod run;
mod tui;

use clap::{Args, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, time::Duration};
use pricing_lens_common::Config;
use pricing_lens_core::{
    export_curve_csv, export_histogram_csv, export_json, print_curve_summary, print_point,
    print_risk_view, CurveSummary, MonteCarloRequest, NoiseDistribution, NoiseSettings,
    PointRequest, RangeRequest, SimulationClient,
};
use run::{execute as execute_request, SimOutcome, SimRequest};
use tui::app::App;
use tui::events::handle_key;
use tui::session::Session;
use tui::ui::render;

#[derive(Parser)]
#[command(name = "pricing-lens", version, about = "Pricing simulation viewer")]
struct Cli {
    /// trace|debug|info|warn|error (default from config)
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// simulation service base URL (overrides config)
    #[arg(long, global = true)]
    url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct OutputArgs {
    /// open the interactive chart view
    #[arg(long)] tui: bool,
    /// write the result to a file
    #[arg(long)] export: bool,
    /// json or csv (default from config)
    #[arg(long)] format: Option<String>,
    #[arg(long)] output: Option<String>,
    /// histogram bucket count (default from config)
    #[arg(long)] bins: Option<usize>,
}

#[derive(Args)]
struct PointArgs {
    #[arg(long, default_value_t = 15.0)] price: f64,
    #[arg(long, default_value_t = 100.0)] base_demand: f64,
    #[arg(long, default_value_t = 0.1)] price_elasticity: f64,
    #[arg(long, default_value_t = 3.0)] unit_cost: f64,
    #[arg(long, default_value_t = 50.0)] fixed_cost: f64,
    /// run with demand/elasticity noise and return a profit distribution
    #[arg(long)] monte_carlo: bool,
    #[arg(long, default_value_t = NoiseDistribution::Normal)] demand_noise_distribution: NoiseDistribution,
    #[arg(long, default_value_t = 1.0)] demand_noise_sigma: f64,
    #[arg(long, default_value_t = NoiseDistribution::Normal)] elasticity_noise_distribution: NoiseDistribution,
    #[arg(long, default_value_t = 0.1)] elasticity_noise_sigma: f64,
    #[arg(long, default_value_t = 1000)] num_runs: u32,
    #[arg(long, default_value_t = 42)] random_seed: u64,
}

impl From<&PointArgs> for PointRequest {
    fn from(a: &PointArgs) -> Self {
        let noise = a.monte_carlo.then(|| NoiseSettings {
            demand_noise_distribution: a.demand_noise_distribution,
            demand_noise_sigma: a.demand_noise_sigma,
            elasticity_noise_distribution: a.elasticity_noise_distribution,
            elasticity_noise_sigma: a.elasticity_noise_sigma,
            num_runs: a.num_runs,
            random_seed: a.random_seed,
        });
        PointRequest {
            price: a.price,
            base_demand: a.base_demand,
            price_elasticity: a.price_elasticity,
            unit_cost: a.unit_cost,
            fixed_cost: a.fixed_cost,
            noise,
        }
    }
}

#[derive(Args)]
struct RangeArgs {
    #[arg(long, default_value_t = 100.0)] base_demand: f64,
    #[arg(long, default_value_t = 0.1)] price_elasticity: f64,
    #[arg(long, default_value_t = 3.0)] unit_cost: f64,
    #[arg(long, default_value_t = 50.0)] fixed_cost: f64,
    #[arg(long, default_value_t = 1.0)] min_price: f64,
    #[arg(long, default_value_t = 50.0)] max_price: f64,
    #[arg(long, default_value_t = 2.0)] step: f64,
}

impl From<&RangeArgs> for RangeRequest {
    fn from(a: &RangeArgs) -> Self {
        RangeRequest {
            base_demand: a.base_demand,
            price_elasticity: a.price_elasticity,
            unit_cost: a.unit_cost,
            fixed_cost: a.fixed_cost,
            min_price: a.min_price,
            max_price: a.max_price,
            step: a.step,
        }
    }
}

#[derive(Args)]
struct RiskArgs {
    #[arg(long, default_value_t = 15.0)] price: f64,
    #[arg(long, default_value_t = 100.0)] base_demand: f64,
    #[arg(long, default_value_t = 0.1)] elasticity_mean: f64,
    #[arg(long, default_value_t = 0.02)] elasticity_sigma: f64,
    #[arg(long, default_value_t = 3.0)] unit_cost: f64,
    #[arg(long, default_value_t = 50.0)] fixed_cost: f64,
    #[arg(long, default_value_t = 1000)] num_runs: u32,
}

impl From<&RiskArgs> for MonteCarloRequest {
    fn from(a: &RiskArgs) -> Self {
        MonteCarloRequest {
            price: a.price,
            base_demand: a.base_demand,
            elasticity_mean: a.elasticity_mean,
            elasticity_sigma: a.elasticity_sigma,
            unit_cost: a.unit_cost,
            fixed_cost: a.fixed_cost,
            num_runs: a.num_runs,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// single-point simulation (deterministic, or Monte Carlo with --monte-carlo)
    Simulate { #[command(flatten)] args: PointArgs, #[command(flatten)] out: OutputArgs },
    /// sweep a price range and report the profit-maximizing price
    Optimize { #[command(flatten)] args: RangeArgs, #[command(flatten)] out: OutputArgs },
    /// Monte Carlo risk distribution at a fixed price
    Risk { #[command(flatten)] args: RiskArgs, #[command(flatten)] out: OutputArgs },
    /// re-run the last submitted request
    Last { #[command(flatten)] out: OutputArgs },
    /// write the effective configuration (defaults, file, --url) to the config file
    InitConfig,
    /// print shell completions
    Completions { shell: clap_complete::Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(url) = cli.url { config.service.base_url = url; }
    let (request, out) = match cli.command {
        Commands::Simulate { args, out } => (SimRequest::Point((&args).into()), out),
        Commands::Optimize { args, out } => (SimRequest::Range((&args).into()), out),
        Commands::Risk { args, out } => (SimRequest::MonteCarlo((&args).into()), out),
        Commands::Last { out } => {
            let session = Session::load().ok_or_else(|| anyhow::anyhow!("No saved request; run simulate, optimize or risk first"))?;
            (session.request, out)
        }
        Commands::InitConfig => {
            let path = config.save()?;
            println!("Wrote {}", path.display());
            return Ok(());
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pricing-lens", &mut io::stdout());
            return Ok(());
        }
    };
    let bins = out.bins.unwrap_or(config.charts.histogram_bins);
    if bins == 0 { anyhow::bail!("--bins must be > 0"); }
    let level = cli.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    init_logging(&level, out.tui)?;
    let client = SimulationClient::new(&config.service)?;
    if out.tui {
        run_tui(client, request, config, bins)
    } else {
        run_headless(&client, request, bins, &out, &config).await
    }
}

/// headless runs log to stderr; the TUI logs to a file so the screen stays clean
fn init_logging(level: &str, to_file: bool) -> anyhow::Result<()> {
    let level: tracing::Level = level.parse().map_err(|_| anyhow::anyhow!("invalid log level: {level}"))?;
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);
    if to_file {
        let path = log_path();
        if let Some(parent) = path.parent() { std::fs::create_dir_all(parent)?; }
        let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        builder.with_ansi(false).with_writer(std::sync::Mutex::new(file)).init();
    } else {
        builder.with_writer(io::stderr).init();
    }
    Ok(())
}

fn log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pricing-lens")
        .join("pricing-lens.log")
}

fn save_session(request: &SimRequest) {
    let theme = Session::load().and_then(|s| s.theme);
    if let Err(e) = (Session { request: request.clone(), theme }).save() {
        tracing::warn!(error = %e, "could not save session");
    }
}

async fn run_headless(client: &SimulationClient, request: SimRequest, bins: usize, out: &OutputArgs, config: &Config) -> anyhow::Result<()> {
    save_session(&request);
    let outcome = execute_request(client, &request, bins).await?;
    match &outcome {
        SimOutcome::Point(o) => print_point(o),
        SimOutcome::Curve { result, mismatch } => print_curve_summary(&CurveSummary {
            curve: &result.curve,
            optimal_price: result.optimal_price,
            max_profit: result.max_profit,
            mismatch: *mismatch,
        }),
        SimOutcome::Risk(view) => print_risk_view(view),
    }
    if out.export {
        let format = out.format.clone().unwrap_or_else(|| config.export.format.clone());
        let out_path = export_path(out.output.as_deref(), &config.export.output_dir, &format);
        if let Some(parent) = out_path.parent() {
            if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
        }
        export_outcome(&out_path, &format, &outcome)?;
        println!("Exported to {}", out_path.display());
    }
    Ok(())
}

fn export_path(output: Option<&str>, output_dir: &str, format: &str) -> PathBuf {
    match output {
        Some(o) => PathBuf::from(o),
        None => std::path::Path::new(output_dir).join(format!("simulation.{format}")),
    }
}

fn export_outcome(path: &std::path::Path, format: &str, outcome: &SimOutcome) -> anyhow::Result<()> {
    match (format, outcome) {
        ("json", o) => export_json(path, o)?,
        ("csv", SimOutcome::Curve { result, .. }) => export_curve_csv(path, &result.curve)?,
        ("csv", SimOutcome::Risk(view)) => export_histogram_csv(path, &view.histogram)?,
        ("csv", SimOutcome::Point(_)) => anyhow::bail!("csv export needs a curve or a distribution; use --format json"),
        (other, _) => anyhow::bail!("Unknown format: {other} (use json or csv)"),
    }
    Ok(())
}

fn run_tui(client: SimulationClient, request: SimRequest, config: Config, bins: usize) -> anyhow::Result<()> {
    let mut app = App::new(client.base_url().to_owned(), request, config);
    app.config.charts.histogram_bins = bins;
    if let Some(s) = Session::load() { app.restore_from_session(&s); }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick = Duration::from_millis(66); // 15Hz
    loop {
        terminal.draw(|f| render(f, &app))?;
        // one request in flight at a time; App::request_submit refuses while Running
        if app.pending_submit {
            let (tx, rx) = std::sync::mpsc::channel();
            app.mark_dispatched(rx);
            let client = client.clone();
            let request = app.request.clone();
            let bins = app.config.charts.histogram_bins;
            tokio::spawn(async move {
                let result = execute_request(&client, &request, bins).await.map_err(|e| e.to_string());
                let _ = tx.send(result); // receiver gone => user quit, response discarded
            });
        }
        app.poll_result();
        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? { handle_key(&mut app, key); }
        }
        if app.should_quit { break; }
    }
    let _ = app.to_session().save();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
