//! Interactive session: a 1 Hz tick source plus line-based keyboard intents.
//!
//! The ticker only exists while the clock is running. It is created fresh on
//! every start so the first tick lands one second later, and dropped as soon
//! as the clock stops, so no ticks are delivered while idle or expired.
//! Input lines and ticks are handled one at a time in the same task.

use std::time::Duration;

use clap::Args;
use focustone_core::alarm::MAX_REPEAT_COUNT;
use focustone_core::{ClockStatus, Config, Event, FocusController, Intent, SessionKind, TodoList};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use super::tone_sink;

const HELP: &str = "\
commands:
  s, start          start or resume
  p, pause          pause
  r, reset          reset the current session
  w | sb | lb       switch to work / short break / long break
  kind <kind>       switch session kind
  alarm <id>        select alarm pattern
  preview <id>      play a pattern once
  add <text>        add a todo
  done <n>          toggle todo number n
  rm <n>            delete todo number n
  todos             list todos
  status            show the timer
  q, quit           exit";

#[derive(Args)]
pub struct RunArgs {
    /// Session kind to start with (work, short_break, long_break)
    #[arg(long)]
    kind: Option<SessionKind>,
    /// Alarm pattern played on expiry
    #[arg(long)]
    alarm: Option<String>,
    /// Number of times the alarm repeats
    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_REPEAT_COUNT))
    )]
    repeat: Option<u32>,
    /// Start counting immediately
    #[arg(long)]
    start: bool,
    /// Print events as JSON lines instead of text
    #[arg(long)]
    json: bool,
}

/// A parsed input line.
#[derive(Debug, PartialEq)]
pub enum Command {
    Intent(Intent),
    Status,
    ListTodos,
    Help,
    Quit,
    Invalid(String),
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if let Some(kind) = args.kind {
        config.session.default_kind = kind;
    }
    if let Some(alarm) = &args.alarm {
        config.set("alarm.pattern", alarm)?;
    }
    if let Some(repeat) = args.repeat {
        config.set("alarm.repeat_count", &repeat.to_string())?;
    }

    let mut controller = FocusController::from_config(&config, tone_sink(&config));
    if args.start {
        controller.apply(Intent::Start);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(controller, args.json))
}

async fn session_loop(
    mut controller: FocusController,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker: Option<Interval> = None;

    if !json {
        println!("{HELP}");
    }
    render(&controller.snapshot(), &controller, json)?;

    loop {
        sync_ticker(&mut ticker, controller.clock().status());

        tokio::select! {
            _ = next_tick(&mut ticker) => {
                for event in controller.tick() {
                    render(&event, &controller, json)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line, controller.todos()) {
                    Command::Intent(intent) => match controller.apply(intent) {
                        Some(event) => render(&event, &controller, json)?,
                        None => tracing::debug!(line = %line.trim(), "intent ignored"),
                    },
                    Command::Status => render(&controller.snapshot(), &controller, json)?,
                    Command::ListTodos => print_todos(controller.todos()),
                    Command::Help => println!("{HELP}"),
                    Command::Quit => break,
                    Command::Invalid(message) => eprintln!("{message}"),
                }
            }
        }
    }
    Ok(())
}

fn sync_ticker(ticker: &mut Option<Interval>, status: ClockStatus) {
    match (status, ticker.is_some()) {
        (ClockStatus::Running, false) => {
            let period = Duration::from_secs(1);
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
        }
        (ClockStatus::Idle | ClockStatus::Expired, true) => *ticker = None,
        _ => {}
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Parse one input line. Todo numbers are 1-based positions in `todos`.
pub fn parse_command(line: &str, todos: &TodoList) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let todo_at = |arg: &str| -> Result<uuid::Uuid, String> {
        let n: usize = arg
            .parse()
            .map_err(|_| format!("expected a todo number, got '{arg}'"))?;
        n.checked_sub(1)
            .and_then(|i| todos.iter().nth(i))
            .map(|t| t.id)
            .ok_or_else(|| format!("no todo number {n}"))
    };

    match word.to_ascii_lowercase().as_str() {
        "s" | "start" => Command::Intent(Intent::Start),
        "p" | "pause" => Command::Intent(Intent::Pause),
        "r" | "reset" => Command::Intent(Intent::Reset),
        "w" | "work" => Command::Intent(Intent::SelectKind {
            kind: SessionKind::Work,
        }),
        "sb" => Command::Intent(Intent::SelectKind {
            kind: SessionKind::ShortBreak,
        }),
        "lb" => Command::Intent(Intent::SelectKind {
            kind: SessionKind::LongBreak,
        }),
        "kind" => match rest.parse::<SessionKind>() {
            Ok(kind) => Command::Intent(Intent::SelectKind { kind }),
            Err(e) => Command::Invalid(e.to_string()),
        },
        "alarm" if !rest.is_empty() => Command::Intent(Intent::SelectAlarmPattern {
            id: rest.to_string(),
        }),
        "preview" if !rest.is_empty() => Command::Intent(Intent::PreviewAlarm {
            id: rest.to_string(),
        }),
        "add" => Command::Intent(Intent::AddTodo {
            text: rest.to_string(),
        }),
        "done" => match todo_at(rest) {
            Ok(id) => Command::Intent(Intent::ToggleTodo { id }),
            Err(message) => Command::Invalid(message),
        },
        "rm" => match todo_at(rest) {
            Ok(id) => Command::Intent(Intent::DeleteTodo { id }),
            Err(message) => Command::Invalid(message),
        },
        "todos" => Command::ListTodos,
        "status" | "" => Command::Status,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        _ => Command::Invalid(format!("unknown command '{line}', type 'help'")),
    }
}

fn render(
    event: &Event,
    controller: &FocusController,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    let clock = controller.clock();
    match event {
        Event::SessionExpired { kind, .. } => {
            println!(
                "{kind} finished. Next up: {} ({} work sessions done)",
                clock.suggested_next_kind(),
                clock.completed_work_sessions()
            );
        }
        Event::AlarmScheduled { pattern_id, repeat_count, .. } => {
            println!("alarm: {pattern_id} x{repeat_count}");
        }
        Event::AlarmPatternSelected { pattern_id, .. } => println!("alarm set to {pattern_id}"),
        Event::AlarmPreviewed { pattern_id, .. } => println!("previewing {pattern_id}"),
        Event::TodoAdded { text, .. } => println!("added: {text}"),
        Event::TodoCompleted { .. } | Event::TodoReopened { .. } | Event::TodoDeleted { .. } => {
            print_todos(controller.todos());
        }
        _ => println!("{}", status_line(controller)),
    }
    Ok(())
}

pub fn status_line(controller: &FocusController) -> String {
    const WIDTH: usize = 20;
    let clock = controller.clock();
    let filled = (clock.progress_fraction() * WIDTH as f64).round() as usize;
    let state = match clock.status() {
        ClockStatus::Idle => "paused",
        ClockStatus::Running => "running",
        ClockStatus::Expired => "done",
    };
    format!(
        "{:<11} {}  [{}{}] {:>3}%  {:<7}  session {}/4",
        clock.kind().label(),
        clock.format_remaining(),
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        (clock.progress_fraction() * 100.0).round() as u32,
        state,
        clock.cycle_position(),
    )
}

fn print_todos(todos: &TodoList) {
    if todos.is_empty() {
        println!("no todos");
        return;
    }
    for (i, todo) in todos.iter().enumerate() {
        let mark = if todo.completed { "x" } else { " " };
        println!("{:>2}. [{mark}] {}", i + 1, todo.text);
    }
    println!("{} done, {} left", todos.completed_count(), todos.remaining_count());
}
