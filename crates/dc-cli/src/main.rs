mod session;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use dc_core::{
    EventKind, Experiment, MAX_EVENTS_PER_DAY, MAX_PER_KIND, Quarter, ROLLUP_WINDOW, SENTINEL,
    add_days, counts_by_kind, expected_presence, gauge, gauge_label, now_unix_ms,
    observed_presence, summarize_recent, today_utc,
};
use session::Session;

#[derive(Parser)]
#[command(
    name = "dc",
    about = "Daily activity ledger: pick a quarter, log capped taps, close the day once"
)]
struct Cli {
    /// Work on a specific date instead of today
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    date: Option<String>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the working day's status
    Show,

    /// Select the day's quarter (Q1..Q4)
    Quarter {
        /// Quarter tag
        quarter: String,
    },

    /// Log one event (MIND, DEEP, BODY, FOOD, REST, BAD)
    Log {
        /// Event kind
        kind: String,
    },

    /// Remove the most recently logged event
    Undo,

    /// Close the day: compute the summary and lock the record
    Finalize,

    /// Aggregate the last 7 finalized days
    Rollup,

    /// Observed presence score, with an optional Monte Carlo projection
    Presence {
        /// Run the 90-day projection
        #[arg(long)]
        simulate: bool,

        /// Trial count for the projection
        #[arg(long)]
        trials: Option<u32>,
    },

    /// Manage the running experiment tag
    Exp {
        #[command(subcommand)]
        action: ExpAction,
    },

    /// Wipe all stored days, the experiment and the start date
    Reset {
        /// After wiping, stage the start date at tomorrow
        #[arg(long)]
        for_tomorrow: bool,
    },

    /// Export the full store to a JSON file
    Export {
        /// Output file path
        path: PathBuf,
    },

    /// Import a JSON file, replacing the current store
    Import {
        /// Input file path
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum ExpAction {
    /// Start (or rename) the experiment
    Set {
        /// Experiment name
        name: String,
    },
    /// Drop the experiment tag
    Clear,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut session = Session::open(cli.date.as_deref())?;

    match &cli.command {
        Commands::Show => cmd_show(&session),
        Commands::Quarter { quarter } => cmd_quarter(&mut session, quarter),
        Commands::Log { kind } => cmd_log(&mut session, kind),
        Commands::Undo => cmd_undo(&mut session),
        Commands::Finalize => cmd_finalize(&mut session),
        Commands::Rollup => cmd_rollup(&session),
        Commands::Presence { simulate, trials } => cmd_presence(&session, *simulate, *trials),
        Commands::Exp { action } => match action {
            ExpAction::Set { name } => cmd_exp_set(&mut session, name),
            ExpAction::Clear => cmd_exp_clear(&mut session),
        },
        Commands::Reset { for_tomorrow } => cmd_reset(&mut session, *for_tomorrow),
        Commands::Export { path } => cmd_export(&session, path),
        Commands::Import { path } => cmd_import(&session, path),
    }
}

fn cmd_show(session: &Session) -> Result<()> {
    let day = session.day()?;

    println!("date:     {}", day.date);
    println!(
        "status:   {}",
        if day.finalized { "locked" } else { "open" }
    );
    println!(
        "quarter:  {}",
        day.quarter.map(|q| q.as_str()).unwrap_or(SENTINEL)
    );

    let counts = counts_by_kind(&day.events);
    let breakdown: Vec<String> = EventKind::ALL
        .iter()
        .filter(|kind| counts[kind.index()] > 0)
        .map(|kind| format!("{} {}/{MAX_PER_KIND}", kind.as_str(), counts[kind.index()]))
        .collect();
    if breakdown.is_empty() {
        println!("events:   0/{MAX_EVENTS_PER_DAY}");
    } else {
        println!(
            "events:   {}/{MAX_EVENTS_PER_DAY} ({})",
            day.events.len(),
            breakdown.join(", ")
        );
    }

    println!("worked:   {}", day.close.worked);
    println!("hurt:     {}", day.close.hurt);
    println!("next:     {}", day.close.next);

    if let Some(exp) = session.store().experiment()? {
        match exp.day_count(&day.date) {
            Some(n) => println!("exp:      {} · Day {n}", exp.name),
            None => println!("exp:      {} (starts {})", exp.name, exp.start),
        }
    }
    if day.finalized {
        println!("(locked days reject changes)");
    }
    Ok(())
}

fn cmd_quarter(session: &mut Session, arg: &str) -> Result<()> {
    let Some(quarter) = Quarter::from_str_lossy(arg) else {
        bail!("unknown quarter: {arg} (expected Q1, Q2, Q3 or Q4)");
    };
    if !session.tap(&format!("q:{}", quarter.as_str())) {
        return Ok(());
    }

    let mut day = session.day()?;
    let outcome = day.select_quarter(quarter);
    if outcome.is_applied() {
        session.save(&day)?;
    }
    println!("{}", outcome.message());
    Ok(())
}

fn cmd_log(session: &mut Session, arg: &str) -> Result<()> {
    let Some(kind) = EventKind::from_str_lossy(arg) else {
        bail!("unknown kind: {arg} (expected MIND, DEEP, BODY, FOOD, REST or BAD)");
    };
    if !session.tap(&format!("evt:{}", kind.as_str())) {
        return Ok(());
    }

    let mut day = session.day()?;
    let outcome = day.log_event(kind, now_unix_ms() as i64);
    if outcome.is_applied() {
        session.save(&day)?;
    }
    println!("{}", outcome.message());
    Ok(())
}

fn cmd_undo(session: &mut Session) -> Result<()> {
    if !session.tap("undo") {
        return Ok(());
    }

    let mut day = session.day()?;
    let outcome = day.undo();
    if outcome.is_applied() {
        session.save(&day)?;
    }
    println!("{}", outcome.message());
    Ok(())
}

fn cmd_finalize(session: &mut Session) -> Result<()> {
    if !session.tap("finalize") {
        return Ok(());
    }

    let mut day = session.day()?;
    let outcome = day.finalize();
    if outcome.is_applied() {
        session.save(&day)?;
        println!("worked:   {}", day.close.worked);
        println!("hurt:     {}", day.close.hurt);
        println!("next:     {}", day.close.next);
    }
    println!("{}", outcome.message());
    Ok(())
}

fn cmd_rollup(session: &Session) -> Result<()> {
    let days = session.store().load_days()?;
    let rollup = summarize_recent(&days, ROLLUP_WINDOW);
    println!("worked:   {}", rollup.worked);
    println!("hurt:     {}", rollup.hurt);
    println!("next:     {}", rollup.next);
    Ok(())
}

fn cmd_presence(session: &Session, simulate: bool, trials: Option<u32>) -> Result<()> {
    let days = session.store().load_days()?;
    let observed = observed_presence(&days, session.config().presence_strategy());

    let simulated = if simulate {
        // Fresh OS-seeded rng per explicit run; the projection is never cached
        let mut rng = SmallRng::from_os_rng();
        let trials = trials.unwrap_or_else(|| session.config().trials());
        expected_presence(&session.config().sim_model(), trials, &mut rng)
    } else {
        None
    };

    println!("{}", gauge_label(observed, simulated));
    println!("{}", gauge(observed, simulated));
    Ok(())
}

fn cmd_exp_set(session: &mut Session, name: &str) -> Result<()> {
    if !session.tap("exp:set") {
        return Ok(());
    }
    let name = name.trim();
    if name.is_empty() {
        bail!("experiment name must not be blank");
    }

    // A future start date staged by reset --for-tomorrow carries over
    let start = session
        .store()
        .start_date()?
        .unwrap_or_else(|| session.date().to_string());
    let exp = Experiment {
        name: name.to_string(),
        start,
    };
    session.store().set_experiment(&exp)?;

    match exp.day_count(session.date()) {
        Some(n) => println!("{} · Day {n}", exp.name),
        None => println!("{} (starts {})", exp.name, exp.start),
    }
    Ok(())
}

fn cmd_exp_clear(session: &mut Session) -> Result<()> {
    if !session.tap("exp:clear") {
        return Ok(());
    }
    session.store().clear_experiment()?;
    println!("Experiment cleared.");
    Ok(())
}

fn cmd_reset(session: &mut Session, for_tomorrow: bool) -> Result<()> {
    if !session.tap("reset") {
        return Ok(());
    }

    let removed = session.store().reset_namespace()?;
    println!("Reset: {removed} keys removed.");

    if for_tomorrow {
        let tomorrow = add_days(&today_utc(), 1).context("failed to compute tomorrow")?;
        session.store().set_start_date(&tomorrow)?;
        println!("Fresh start staged for {tomorrow}.");
    }
    Ok(())
}

fn cmd_export(session: &Session, path: &Path) -> Result<()> {
    session
        .store()
        .export_json_file(path)
        .with_context(|| format!("failed to export to {}", path.display()))?;
    println!("exported to {}", path.display());
    Ok(())
}

fn cmd_import(session: &Session, path: &Path) -> Result<()> {
    session
        .store()
        .import_json_file(path)
        .with_context(|| format!("failed to import {}", path.display()))?;

    let days = session.store().load_days()?;
    println!("imported {} day records from {}", days.len(), path.display());
    Ok(())
}
