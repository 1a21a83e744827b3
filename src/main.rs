use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{Table, Tabled};

use cuttracker::alerts::{Alert, AlertLevel};
use cuttracker::catalog::{self, ROUTINES, TRACKED_LIFTS};
use cuttracker::config::AppConfig;
use cuttracker::dates::{format_day_month, format_long, SystemClock};
use cuttracker::error::TrackerError;
use cuttracker::logging::{init_logging, LogLevel};
use cuttracker::metrics::{MetricsEngine, SLEEP_HISTORY_DAYS, WEIGHT_HISTORY_DAYS};
use cuttracker::models::{ExerciseLog, SetLog};
use cuttracker::recovery::{RecoveryBand, RecoveryScore, RecoveryScorer};
use cuttracker::session::{LogOutcome, SessionController};
use cuttracker::store::JsonFileStore;

/// CutTracker - body composition and training tracker
///
/// Logs daily weight, nutrition, sleep, steps and training sessions, and
/// derives body fat, goal projections, alerts and a daily recovery score.
#[derive(Parser)]
#[command(name = "cuttracker")]
#[command(version)]
#[command(about = "Body composition and training tracker", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides the dataset file from the config
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a daily measurement
    Log {
        #[command(subcommand)]
        entry: LogEntry,
    },

    /// Record a finished training session
    Workout {
        /// Routine name, e.g. "C – Legs"
        routine: String,

        /// A set as EXERCISE:KGxREPS, repeat for every set
        #[arg(short, long = "set", value_name = "SET")]
        sets: Vec<String>,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show today's dashboard
    Status,

    /// Show recent sleep and sleep-related alerts
    Sleep,

    /// Show the recovery score and training recommendation
    Recovery {
        /// Day to score (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// List active alerts
    Alerts,

    /// Show goal projections and the strength trend
    Projections,

    /// List the built-in routines
    Routines,

    /// Delete all logged data
    Reset {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Write the active configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum LogEntry {
    /// Morning body weight in kilograms
    Weight {
        kg: f64,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Daily calories and protein grams
    Nutrition {
        calories: u32,
        protein: u32,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Hours slept and morning energy (1-5)
    Sleep {
        hours: f64,
        energy: u8,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Daily step count
    Steps {
        steps: u32,
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

type Session = SessionController<JsonFileStore, SystemClock>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref());

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    init_logging(&log_config).context("Failed to initialize logging")?;

    let data_file = cli
        .data
        .clone()
        .unwrap_or_else(|| config.storage.resolved_data_file());
    tracing::debug!(path = %data_file.display(), "Using dataset file");

    let mut session = SessionController::open(
        JsonFileStore::new(&data_file),
        SystemClock,
        config.profile.clone(),
    );

    match cli.command {
        Commands::Log { entry } => {
            let outcome = match entry {
                LogEntry::Weight { kg, date } => {
                    let date = date.unwrap_or_else(|| session.today());
                    session.log_weight_on(date, kg)
                }
                LogEntry::Nutrition {
                    calories,
                    protein,
                    date,
                } => {
                    let date = date.unwrap_or_else(|| session.today());
                    session.log_nutrition_on(date, calories, protein)
                }
                LogEntry::Sleep {
                    hours,
                    energy,
                    date,
                } => {
                    let date = date.unwrap_or_else(|| session.today());
                    session.log_sleep_on(date, hours, energy)
                }
                LogEntry::Steps { steps, date } => {
                    let date = date.unwrap_or_else(|| session.today());
                    session.log_steps_on(date, steps)
                }
            };
            report_outcome(&outcome)?;
        }

        Commands::Workout {
            routine,
            sets,
            date,
        } => record_workout(&mut session, &routine, &sets, date)?,

        Commands::Status => print_status(&session),

        Commands::Sleep => print_sleep(&session),

        Commands::Recovery { date } => {
            let date = date.unwrap_or_else(|| session.today());
            let score = RecoveryScorer::new(session.profile()).score(date, session.dataset());
            print_recovery(date, score.as_ref());
        }

        Commands::Alerts => {
            let insights = session.insights();
            if insights.alerts.is_empty() {
                println!("{}", "✓ No alerts".green());
            }
            for alert in &insights.alerts {
                print_alert(alert);
            }
        }

        Commands::Projections => print_projections(&session),

        Commands::Routines => {
            println!(
                "{}",
                format!("Rest {}s between sets", session.profile().rest_period_secs).dimmed()
            );
            for routine in ROUTINES {
                println!("{}", routine.name.bold());
                for exercise in routine.exercises {
                    println!("  - {}", exercise);
                }
            }
        }

        Commands::Reset { yes } => {
            if !yes {
                println!("{}", "Refusing to delete data without --yes".yellow());
            } else {
                session.reset_all();
                println!("{}", "✓ All data cleared".green());
            }
        }

        Commands::InitConfig { force } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);
            if path.exists() && !force {
                bail!(
                    "Config file {} already exists, pass --force to overwrite",
                    path.display()
                );
            }
            config.save_to_file(&path)?;
            println!("{} {}", "✓ Config written to".green(), path.display());
        }
    }

    Ok(())
}

fn report_outcome(outcome: &LogOutcome) -> Result<()> {
    match outcome {
        LogOutcome::Recorded => {
            println!("{}", "✓ Saved".green());
            Ok(())
        }
        LogOutcome::Rejected(reason) => {
            bail!(TrackerError::Validation(reason.clone()).user_message())
        }
    }
}

/// Parse `EXERCISE:KGxREPS`, e.g. `Deadlift / RDL:80x6`
fn parse_set(raw: &str) -> Result<(String, SetLog)> {
    let (name, load) = raw
        .rsplit_once(':')
        .with_context(|| format!("Set '{}' is not in EXERCISE:KGxREPS form", raw))?;
    let (weight, reps) = load
        .split_once(['x', 'X'])
        .with_context(|| format!("Set '{}' is missing the KGxREPS part", raw))?;

    let weight: f64 = weight
        .trim()
        .parse()
        .with_context(|| format!("Invalid weight in set '{}'", raw))?;
    let reps: u32 = reps
        .trim()
        .parse()
        .with_context(|| format!("Invalid reps in set '{}'", raw))?;

    let name = name.trim();
    if name.is_empty() {
        bail!("Set '{}' has no exercise name", raw);
    }
    Ok((name.to_string(), SetLog::new(weight, reps)))
}

/// Group parsed sets by exercise, keeping first-seen order
fn group_sets(raw_sets: &[String]) -> Result<Vec<ExerciseLog>> {
    let mut exercises: Vec<ExerciseLog> = Vec::new();
    for raw in raw_sets {
        let (name, set) = parse_set(raw)?;
        match exercises.iter_mut().find(|e| e.name == name) {
            Some(exercise) => exercise.sets.push(set),
            None => exercises.push(ExerciseLog {
                name,
                sets: vec![set],
            }),
        }
    }
    Ok(exercises)
}

fn record_workout(
    session: &mut Session,
    routine: &str,
    raw_sets: &[String],
    date: Option<NaiveDate>,
) -> Result<()> {
    let routine = routine.trim();
    let exercises = group_sets(raw_sets)?;
    if catalog::routine(routine).is_none() {
        println!(
            "{}",
            format!("Note: '{}' is not a built-in routine", routine).dimmed()
        );
    }

    // Compare before saving so the previous session is still the latest one
    let comparisons = session.compare_workout(routine, &exercises);
    for (exercise, cmp) in exercises.iter().zip(&comparisons) {
        let change = match cmp.change_pct {
            Some(pct) if pct > 0.0 => format!("+{:.0}%", pct).green(),
            Some(pct) if cmp.strength_drop => format!("{:.0}%", pct).red(),
            Some(pct) => format!("{:.0}%", pct).normal(),
            None => "new".dimmed(),
        };
        println!(
            "  {:<24} {:>8.1} kg  {}",
            exercise.name, cmp.current_volume, change
        );
        if cmp.strength_drop {
            println!(
                "    {}",
                format!(
                    "Volume dropped more than {}%, check recovery",
                    session.profile().strength_drop_pct
                )
                .red()
            );
        }
    }

    let date = date.unwrap_or_else(|| session.today());
    let outcome = session.save_workout_on(date, routine, exercises);
    report_outcome(&outcome)
}

fn band_colored(band: RecoveryBand, text: String) -> ColoredString {
    match band {
        RecoveryBand::Green => text.green().bold(),
        RecoveryBand::Amber => text.yellow().bold(),
        RecoveryBand::Red => text.red().bold(),
    }
}

fn print_recovery(date: NaiveDate, score: Option<&RecoveryScore>) {
    let Some(score) = score else {
        println!(
            "No sleep logged for {}. Log sleep to get a recovery score.",
            date
        );
        return;
    };

    println!(
        "Recovery {}: {}",
        date,
        band_colored(score.band, format!("{} - {}", score.score, score.label()))
    );
    let b = &score.breakdown;
    println!("  Sleep      {:>2}/40", b.sleep);
    println!("  Energy     {:>2}/25", b.energy);
    println!("  Nutrition  {:>2}/20", b.nutrition);
    println!("  Rest       {:>2}/15", b.rest);
}

fn print_alert(alert: &Alert) {
    let tag = format!("[{}]", alert.level);
    let tag = match alert.level {
        AlertLevel::Blue => tag.blue(),
        AlertLevel::Amber => tag.yellow(),
        AlertLevel::Red => tag.red(),
    };
    println!("{} {}", tag, alert.message);
}

fn print_status(session: &Session) {
    let insights = session.insights();
    let profile = session.profile();

    println!("{}", format_long(insights.date).bold());
    println!(
        "Weight       {:.1} kg (7-day avg {:.1} kg)",
        insights.current_weight, insights.week_average_weight
    );
    println!(
        "Body fat     {:.1}%  lean {:.1} kg  fat {:.1} kg",
        insights.body_fat_pct, insights.lean_mass, insights.fat_mass
    );

    let nutrition = insights.today_nutrition;
    println!(
        "Nutrition    {} / {} kcal, {} / {} g protein ({:.0}%)",
        nutrition.calories,
        profile.cal_goal,
        nutrition.protein,
        profile.protein_goal,
        insights.protein.percent
    );
    match insights.week_calorie_average {
        Some(avg) => println!("Weekly avg   {} kcal", avg),
        None => println!("Weekly avg   no data"),
    }
    println!(
        "Steps        {} / {}{}",
        insights.today_steps,
        insights.steps.goal,
        if insights.steps.reached { " ✓" } else { "" }
    );
    match insights.today_sleep {
        Some(sleep) => println!("Sleep        {:.1} h, energy {}/5", sleep.hours, sleep.energy),
        None => println!("Sleep        not logged"),
    }

    if let Some(goal) = insights.goals.first() {
        println!(
            "Goal {}     {:.0}% ({:.1} kg to go)",
            goal.label, goal.progress_pct, goal.remaining_kg
        );
    }

    match &insights.recovery {
        Some(score) => println!(
            "Recovery     {}",
            band_colored(score.band, format!("{} - {}", score.score, score.label()))
        ),
        None => println!("Recovery     log sleep to compute"),
    }

    let history = MetricsEngine::new(profile).weight_history(
        session.dataset(),
        insights.date,
        WEIGHT_HISTORY_DAYS,
    );
    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        println!(
            "30 days      {:+.1} kg over {} weigh-ins",
            last.kg - first.kg,
            history.len()
        );
    }

    for alert in &insights.alerts {
        print_alert(alert);
    }
}

fn print_sleep(session: &Session) {
    let today = session.today();
    let history = MetricsEngine::new(session.profile()).sleep_history(
        session.dataset(),
        today,
        SLEEP_HISTORY_DAYS,
    );

    println!("{}", format!("Sleep, last {} days", SLEEP_HISTORY_DAYS).bold());
    if history.is_empty() {
        println!("  no nights logged");
    }
    let min_hours = session.profile().sleep_min_hours;
    for point in &history {
        let hours = format!("{:>4.1} h", point.hours);
        let hours = if point.hours < min_hours {
            hours.yellow()
        } else {
            hours.normal()
        };
        println!(
            "  {:<7} {}  energy {}/5",
            format_day_month(point.date),
            hours,
            point.energy
        );
    }

    let insights = session.insights();
    for alert in insights.alerts.iter().filter(|a| a.kind.is_sleep_related()) {
        print_alert(alert);
    }
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "To lose")]
    remaining: String,
    #[tabled(rename = "Weeks")]
    weeks: u32,
    #[tabled(rename = "ETA")]
    eta: String,
}

fn print_projections(session: &Session) {
    let insights = session.insights();
    let profile = session.profile();

    let rows: Vec<GoalRow> = insights
        .goals
        .iter()
        .map(|goal| GoalRow {
            target: goal.label.to_string(),
            weight: format!("{:.1} kg", goal.target_weight),
            progress: format!("{:.0}%", goal.progress_pct),
            remaining: format!("{:.1} kg", goal.remaining_kg),
            weeks: goal.projection.weeks,
            eta: goal.projection.display_date(),
        })
        .collect();

    println!(
        "Based on {:.2} kg/week at a {}-{} kcal/day deficit",
        profile.weekly_loss_rate, profile.deficit_low, profile.deficit_high
    );
    println!("{}", Table::new(rows));

    println!("{}", "Strength trend".bold());
    let trend = MetricsEngine::new(profile).strength_trend(session.dataset(), TRACKED_LIFTS);
    for lift in trend {
        if lift.points.is_empty() {
            println!("  {}: no sessions yet", lift.lift);
            continue;
        }
        let points: Vec<String> = lift
            .points
            .iter()
            .map(|p| format!("{} {:.0}", p.date.format("%m-%d"), p.volume))
            .collect();
        println!("  {}: {}", lift.lift, points.join(", "));
    }
}
