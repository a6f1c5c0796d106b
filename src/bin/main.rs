use anyhow::Context;
use clap::Parser;
use eoka_selector::{Intent, Probe, ProbeConfig, ProbeReport};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "eoka-selector")]
#[command(about = "Find page elements by intent with ranked, self-healing selectors")]
#[command(version)]
struct Cli {
    /// Probe config file
    config: PathBuf,

    /// Run in headless mode (overrides config)
    #[arg(long)]
    headless: bool,

    /// Open this URL instead of the config's target
    #[arg(long)]
    url: Option<String>,

    /// Resolve only these intents (can be used multiple times)
    #[arg(short, long = "intent", value_name = "INTENT")]
    intents: Vec<Intent>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut config = ProbeConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if cli.headless {
        config.browser.headless = true;
    }
    if let Some(url) = cli.url {
        config.target.url = url;
    }
    if !cli.intents.is_empty() {
        config.intents = cli.intents;
    }

    if cli.check {
        println!("Config valid: {}", config.name);
        println!("  Target: {}", config.target.url);
        let intents: Vec<_> = config.intents().iter().map(|i| i.to_string()).collect();
        println!("  Intents: {}", intents.join(", "));
        println!("  Max attempts: {}", config.engine.max_attempts);
        println!("  Min confidence: {}", config.engine.min_confidence);
        if !config.overrides.is_empty() {
            println!("  Overrides: {}", config.overrides.len());
            for o in &config.overrides {
                let mode = if o.trust { "learn" } else { "validate" };
                println!("    - {} ({}): {}", o.intent, mode, o.selector);
            }
        }
        return Ok(());
    }

    let probe = Probe::new(&config.browser).await?;
    let result = probe.run(&config).await;
    probe.close().await?;
    let report = result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.unresolved().is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_report(report: &ProbeReport) {
    println!("Probe: {}", report.name);
    println!("  URL: {}", report.url);
    if let Some(ref ctx) = report.context {
        println!("  Title: {}", ctx.title);
        println!("  Inputs: {}  Buttons: {}", ctx.inputs.len(), ctx.buttons.len());
    }

    for o in &report.overrides {
        let mark = if o.accepted { '✓' } else { '✗' };
        let mode = if o.trusted { "learned" } else { "validated" };
        println!("  {} {} {}: {}", mark, mode, o.intent, o.selector);
    }

    for r in &report.intents {
        println!();
        match (&r.found, &r.cached) {
            (Some(selector), _) => println!("✓ {}: {}", r.intent, selector),
            (None, Some(cached)) => {
                println!("~ {}: {} ({})", r.intent, cached.selector, cached.strategy)
            }
            (None, None) => println!("✗ {}: not found", r.intent),
        }
        for c in &r.candidates {
            println!("    {}", c);
        }
    }

    if !report.failures.is_empty() {
        println!();
        println!("Failed selectors: {}", report.failures.len());
        for f in &report.failures {
            println!("    {}  ({})", f.selector, f.reason);
        }
    }
    println!();
    println!("  Duration: {}ms", report.duration_ms);
}
