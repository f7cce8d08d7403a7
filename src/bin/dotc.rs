use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use dynamic_on_time::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scheduler until interrupted
    Run {
        /// Hour (0-23)
        #[arg(long, default_value_t = 8)]
        hour: u8,
        /// Minute (0-59)
        #[arg(short, long, default_value_t = 30)]
        minute: u8,
        /// Days (mon,tue,wed,thu,fri,sat,sun,all,weekdays,weekend)
        #[arg(short, long, default_value = "weekdays")]
        days: String,
        /// Message logged when the schedule fires
        #[arg(long, default_value = "Scheduled time reached")]
        message: String,
        /// External command to run when the schedule fires
        #[arg(short, long)]
        command: Option<String>,
        /// Seconds between schedule evaluations (60 or less)
        #[arg(short, long, default_value_t = 10)]
        interval: u64,
    },
    /// Print the next time the schedule would fire
    Next {
        /// Hour (0-23)
        #[arg(long, default_value_t = 8)]
        hour: u8,
        /// Minute (0-59)
        #[arg(short, long, default_value_t = 30)]
        minute: u8,
        /// Days (mon,tue,wed,thu,fri,sat,sun,all,weekdays,weekend)
        #[arg(short, long, default_value = "weekdays")]
        days: String,
    },
    /// Demonstration of a full schedule cycle on a simulated clock
    Demo {
        /// Milliseconds of real time per simulated 10-second step
        #[arg(short, long, default_value_t = 250)]
        step_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with pretty colors
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("dynamic_on_time=info,dotc=info")),
        )
        .compact()
        .init();

    // Initialize color-eyre for pretty error reporting
    color_eyre::install()?;

    let cli = Cli::parse();
    debug!("Parsed command line arguments");

    match cli.command.unwrap_or(Commands::Demo { step_ms: 250 }) {
        Commands::Run {
            hour,
            minute,
            days,
            message,
            command,
            interval,
        } => {
            if interval == 0 || interval > 60 {
                return Err(Error::ValueOutOfRange(interval as u32, 1, 60).into());
            }

            let mut actions: Vec<Box<dyn Action>> = vec![Box::new(LogAction::new(message))];
            if let Some(line) = command {
                actions.push(Box::new(CommandAction::from_line(&line)?));
            }

            let scheduler = build_scheduler(hour, minute, &days, actions)?;
            report_next(&scheduler, Local::now().naive_local());

            let runner = SchedulerRunner::new(scheduler, Arc::new(SystemClock))
                .with_period(Duration::from_secs(interval));
            runner.run_until_ctrl_c().await;
        }
        Commands::Next { hour, minute, days } => {
            let scheduler = build_scheduler(hour, minute, &days, Vec::new())?;
            match scheduler.next_occurrence(Local::now().naive_local()) {
                Some(next) => println!("{}", next.format("%a %Y-%m-%d %H:%M")),
                None => println!("never"),
            }
        }
        Commands::Demo { step_ms } => {
            run_demo(step_ms).await?;
        }
    }

    Ok(())
}

/// Builds a scheduler with fixed initial settings and the disable switch off
fn build_scheduler(
    hour: u8,
    minute: u8,
    days: &str,
    actions: Vec<Box<dyn Action>>,
) -> Result<DynamicScheduler> {
    if hour > 23 {
        return Err(Error::ValueOutOfRange(hour.into(), 0, 23).into());
    }
    if minute > 59 {
        return Err(Error::ValueOutOfRange(minute.into(), 0, 59).into());
    }

    let day_set = DaySet::parse(days)?;
    debug!(%day_set, "Parsed day selection");

    let (gates, _switches) = WeekdayGates::shared_from(day_set);
    Ok(DynamicScheduler::new(
        Arc::new(SharedNumber::with_value(hour.into())),
        Arc::new(SharedNumber::with_value(minute.into())),
        gates,
        Arc::new(SharedSwitch::with_state(false)),
        actions,
    ))
}

fn report_next(scheduler: &DynamicScheduler, now: NaiveDateTime) {
    match scheduler.next_occurrence(now) {
        Some(next) => info!(next = %next.format("%a %Y-%m-%d %H:%M"), "Next firing"),
        None => info!("Schedule will never fire with the current settings"),
    }
}

/// Walk a simulated clock through a full schedule cycle: one firing,
/// in-minute suppression, then the minute rolling over
async fn run_demo(step_ms: u64) -> Result<()> {
    info!("Running scheduler demo on a simulated clock");

    // Monday, 30 seconds before the scheduled 07:30
    let start: NaiveDateTime = "2024-01-01T07:29:30".parse()?;
    let clock = ManualClock::starting_at(start);

    let mut scheduler = build_scheduler(
        7,
        30,
        "all",
        vec![Box::new(LogAction::new("Demo schedule fired"))],
    )?;

    // 12 ticks of 10 simulated seconds: 07:29:30 through 07:31:20
    for _ in 0..12 {
        if let Some(now) = clock.now() {
            info!(time = %now.format("%H:%M:%S"), "Tick");
            scheduler.on_tick(now);
        }
        clock.advance(chrono::Duration::seconds(10));
        tokio::time::sleep(Duration::from_millis(step_ms)).await;
    }

    if let Some(now) = clock.now() {
        report_next(&scheduler, now);
    }

    info!("Demo completed!");
    Ok(())
}
