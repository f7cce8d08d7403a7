use chrono::Local;
use dynamic_on_time::*;
use std::sync::Arc;
use std::{env, io};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const DAY_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr; stdout carries the OK/ERR replies
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new("dynamic_on_time=info,dotd=info")),
        )
        .with_writer(io::stderr)
        .compact()
        .init();

    // Get the initial schedule from command line arguments.
    // If not provided, exit.
    let usage = "Usage: dotd <hour> <minute> <days> [command ...]";
    let args: Vec<_> = env::args().collect();
    if args.len() >= 2 && (args[1] == "-h" || args[1] == "--help") {
        eprintln!("{usage}");
        std::process::exit(0);
    }
    if args.len() < 4 {
        eprintln!("{usage}");
        std::process::exit(1);
    }

    let hour: u8 = match args[1].parse() {
        Ok(value) if value <= 23 => value,
        _ => {
            eprintln!("ERR Hour must be 0-23");
            std::process::exit(1);
        }
    };
    let minute: u8 = match args[2].parse() {
        Ok(value) if value <= 59 => value,
        _ => {
            eprintln!("ERR Minute must be 0-59");
            std::process::exit(1);
        }
    };
    let day_set = match DaySet::parse(&args[3]) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("ERR {e}");
            std::process::exit(1);
        }
    };

    // The action list is fixed at startup; the settings stay live
    let actions: Vec<Box<dyn Action>> = if args.len() > 4 {
        vec![Box::new(CommandAction::new(
            args[4].clone(),
            args[5..].to_vec(),
        ))]
    } else {
        vec![Box::new(LogAction::new("Scheduled time reached"))]
    };

    let hour_source = SharedNumber::with_value(hour.into());
    let minute_source = SharedNumber::with_value(minute.into());
    let disabled = SharedSwitch::with_state(false);
    let flags = day_set.to_flags();
    let switches: [SharedSwitch; 7] = std::array::from_fn(|i| SharedSwitch::with_state(flags[i]));
    let gates = WeekdayGates::new(
        Arc::new(switches[0].clone()),
        Arc::new(switches[1].clone()),
        Arc::new(switches[2].clone()),
        Arc::new(switches[3].clone()),
        Arc::new(switches[4].clone()),
        Arc::new(switches[5].clone()),
        Arc::new(switches[6].clone()),
    );

    let scheduler = DynamicScheduler::new(
        Arc::new(hour_source.clone()),
        Arc::new(minute_source.clone()),
        gates,
        Arc::new(disabled.clone()),
        actions,
    );

    let runner = SchedulerRunner::new(scheduler, Arc::new(SystemClock));
    let handle = runner.scheduler();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let loop_task = tokio::spawn(runner.run(shutdown_rx));

    // Inform about successful initialization
    println!("OK");

    // Mainloop: wait for user input, line by line
    loop {
        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        // Read command and execute it
        let mut cmd = input.trim().split(':');
        match cmd.next() {
            Some("hour") => match cmd.next().and_then(|v| v.trim().parse::<u8>().ok()) {
                Some(value) if value <= 23 => {
                    hour_source.set(value.into());
                    println!("OK");
                }
                _ => eprintln!("ERR Hour must be 0-23"),
            },
            Some("minute") => match cmd.next().and_then(|v| v.trim().parse::<u8>().ok()) {
                Some(value) if value <= 59 => {
                    minute_source.set(value.into());
                    println!("OK");
                }
                _ => eprintln!("ERR Minute must be 0-59"),
            },
            Some(day) if DAY_NAMES.contains(&day) => match parse_on_off(cmd.next()) {
                Some(on) => {
                    if let Some(index) = DAY_NAMES.iter().position(|name| *name == day) {
                        switches[index].set(on);
                        println!("OK");
                    }
                }
                None => eprintln!("ERR Use {day}:on or {day}:off"),
            },
            Some("disable") => match parse_on_off(cmd.next()) {
                Some(on) => {
                    disabled.set(on);
                    println!("OK");
                }
                None => eprintln!("ERR Use disable:on or disable:off"),
            },
            Some("status") => match handle.lock().snapshot() {
                Some(snapshot) => println!(
                    "OK {:02}:{:02} days:{} disabled:{}",
                    snapshot.hour,
                    snapshot.minute,
                    snapshot.day_set(),
                    if snapshot.disabled { "yes" } else { "no" }
                ),
                None => println!("OK settings not ready"),
            },
            Some("next") => {
                let now = Local::now().naive_local();
                match handle.lock().next_occurrence(now) {
                    Some(next) => println!("OK {}", next.format("%a %Y-%m-%d %H:%M")),
                    None => println!("OK never"),
                }
            }
            Some("quit") => break,
            Some(other) => {
                eprintln!("ERR Unknown command: {other}");
            }
            None => {
                eprintln!("ERR No command given");
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let _ = loop_task.await;
    Ok(())
}

fn parse_on_off(value: Option<&str>) -> Option<bool> {
    match value.map(str::trim) {
        Some("on") => Some(true),
        Some("off") => Some(false),
        _ => None,
    }
}
