use chrono::{DateTime, Utc};
use clap::Subcommand;
use goaltrack_core::storage::{Config, Database};
use goaltrack_core::timer::{
    CompletionNotifier, SessionKind, TimerEngine, TimerRecord, TimerState,
};
use serde::{Deserialize, Serialize};

const ENGINE_KEY: &str = "timer_engine";

/// Upper bound on replayed seconds after a long absence. A week is far
/// beyond any plausible session.
const MAX_CATCH_UP_SECS: i64 = 7 * 24 * 3600;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the timer (or resume from pause)
    Start {
        /// Timer mode: pomodoro, custom, or stopwatch
        #[arg(long)]
        mode: Option<String>,
        /// Countdown duration in minutes (custom mode)
        #[arg(long)]
        duration: Option<u64>,
        /// Small goal ID to attribute the session to
        #[arg(long)]
        goal: Option<String>,
    },
    /// Pause the running timer
    Pause,
    /// Resume a paused timer
    Resume,
    /// Stop the timer and save the session record
    Stop,
    /// Reset to idle, discarding progress
    Reset,
    /// Tick in the foreground until the current countdown completes
    Run,
    /// Print current timer state as JSON
    Status,
}

/// Engine plus the wall-clock moment it was last ticked. The engine is
/// tick-driven, so on every invocation the elapsed wall time since
/// `last_tick` is replayed as individual ticks.
#[derive(Serialize, Deserialize)]
struct PersistedTimer {
    engine: TimerEngine,
    last_tick: DateTime<Utc>,
}

struct TerminalNotifier {
    enabled: bool,
}

impl CompletionNotifier for TerminalNotifier {
    fn session_completed(&self, record: &TimerRecord) {
        if !self.enabled {
            return;
        }
        let what = if record.is_break { "break" } else { "session" };
        eprintln!(
            "{} complete: {} min",
            what,
            record.duration_secs / 60
        );
    }
}

fn load_timer(db: &Database, config: &Config) -> PersistedTimer {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(timer) = serde_json::from_str::<PersistedTimer>(&json) {
            return timer;
        }
    }
    PersistedTimer {
        engine: TimerEngine::new(config.timer),
        last_tick: Utc::now(),
    }
}

fn save_timer(db: &Database, timer: &PersistedTimer) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(timer)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Replay the wall-clock seconds elapsed since the last invocation.
/// Completed sessions are persisted and announced.
fn catch_up(
    db: &Database,
    timer: &mut PersistedTimer,
    notifier: &TerminalNotifier,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let owed = (now - timer.last_tick)
        .num_seconds()
        .clamp(0, MAX_CATCH_UP_SECS);
    for _ in 0..owed {
        if let Some(record) = timer.engine.tick() {
            db.insert_timer_record(&record)?;
            notifier.session_completed(&record);
        }
    }
    timer.last_tick = now;
    Ok(())
}

fn parse_kind(mode: &str) -> Result<SessionKind, Box<dyn std::error::Error>> {
    match mode {
        "pomodoro" => Ok(SessionKind::Pomodoro),
        "custom" => Ok(SessionKind::Custom),
        "stopwatch" => Ok(SessionKind::Stopwatch),
        other => Err(format!("unknown mode '{other}', expected pomodoro, custom, or stopwatch").into()),
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let notifier = TerminalNotifier {
        enabled: config.notifications.enabled,
    };
    let mut timer = load_timer(&db, &config);
    catch_up(&db, &mut timer, &notifier)?;

    match action {
        TimerAction::Start {
            mode,
            duration,
            goal,
        } => {
            if let Some(mode) = mode {
                let kind = parse_kind(&mode)?;
                if kind == SessionKind::Custom && duration.is_none() {
                    return Err("custom mode requires --duration".into());
                }
                if timer
                    .engine
                    .configure(kind, duration.map(|m| m * 60), goal)
                    .is_none()
                {
                    return Err("cannot reconfigure while the timer is active".into());
                }
            }
            match timer.engine.start() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&timer.engine.snapshot())?),
            }
        }
        TimerAction::Pause => match timer.engine.pause() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::to_string_pretty(&timer.engine.snapshot())?),
        },
        TimerAction::Resume => match timer.engine.start() {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{}", serde_json::to_string_pretty(&timer.engine.snapshot())?),
        },
        TimerAction::Stop => match timer.engine.stop() {
            Some(record) => {
                db.insert_timer_record(&record)?;
                notifier.session_completed(&record);
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            None => println!("{}", serde_json::to_string_pretty(&timer.engine.snapshot())?),
        },
        TimerAction::Reset => {
            if let Some(event) = timer.engine.reset() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Run => {
            if timer.engine.state() != TimerState::Running {
                return Err("timer is not running".into());
            }
            if timer.engine.target_secs().is_none() {
                return Err("stopwatch has no target; use `timer stop`".into());
            }
            loop {
                std::thread::sleep(std::time::Duration::from_secs(1));
                timer.last_tick = Utc::now();
                let completed = timer.engine.tick();
                // Persist every second so an interrupt loses nothing.
                save_timer(&db, &timer)?;
                if let Some(record) = completed {
                    db.insert_timer_record(&record)?;
                    notifier.session_completed(&record);
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    break;
                }
            }
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&timer.engine.snapshot())?);
        }
    }

    save_timer(&db, &timer)?;
    Ok(())
}
