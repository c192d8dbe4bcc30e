use std::time::Duration;

use clap::Subcommand;
use focustone_core::alarm::{self, AlarmSequencer, MAX_REPEAT_COUNT};
use focustone_core::Config;

use super::tone_sink;

#[derive(Subcommand)]
pub enum AlarmAction {
    /// List the built-in alarm patterns
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a pattern once
    Preview {
        /// Pattern id (see `alarm list`)
        id: String,
    },
    /// Print the tone events a pattern would produce, without playing it
    Schedule {
        /// Pattern id (see `alarm list`)
        id: String,
        /// Number of passes through the pattern
        #[arg(
            long,
            default_value = "1",
            value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_REPEAT_COUNT))
        )]
        repeat: u32,
    },
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AlarmAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(alarm::catalog())?);
                return Ok(());
            }
            let config = Config::load_or_default();
            for pattern in alarm::catalog() {
                let marker = if pattern.id == config.alarm.pattern { "*" } else { " " };
                let freqs: Vec<String> = pattern
                    .frequencies_hz
                    .iter()
                    .map(|f| format!("{f}"))
                    .collect();
                println!(
                    "{marker} {:<8} {:<8} {:>4}ms  {:?}  [{}]",
                    pattern.id,
                    pattern.display_name,
                    (pattern.slot_duration_secs * 1000.0).round() as u64,
                    pattern.wave_shape(),
                    freqs.join(", ")
                );
            }
        }
        AlarmAction::Preview { id } => {
            let pattern = alarm::find(&id).ok_or_else(|| format!("unknown alarm pattern: {id}"))?;
            let config = Config::load_or_default();
            let sequencer = AlarmSequencer::new(tone_sink(&config));
            let events = sequencer.preview(pattern.id);
            // Stay alive until the last tone has finished.
            if let Some(last) = events.last() {
                std::thread::sleep(Duration::from_secs_f64(last.stop_offset_secs + 0.2));
            }
            println!("previewed {} ({} tones)", pattern.display_name, events.len());
        }
        AlarmAction::Schedule { id, repeat } => {
            let pattern = alarm::find(&id).ok_or_else(|| format!("unknown alarm pattern: {id}"))?;
            let events = alarm::schedule(pattern, repeat);
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }
    Ok(())
}
