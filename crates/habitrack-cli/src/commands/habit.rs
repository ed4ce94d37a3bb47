//! Habit management commands for CLI.

use clap::{ArgGroup, Subcommand};
use habitrack_core::{CompletionDate, Config, HabitDb, HabitId, HabitService, HabitStatus};
use serde_json::json;

use crate::output::print_json;

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits, newest first
    List,
    /// Get habit details
    Get {
        /// Habit ID
        id: String,
    },
    /// Create a new habit
    Create {
        /// Habit name
        name: String,
        /// Habit description
        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a habit or change its description
    Update {
        /// Habit ID
        id: String,
        /// New name
        #[arg(long)]
        name: String,
        /// New description (kept as is when omitted)
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit ID
        id: String,
    },
    /// Mark a day done, or undo it if already done
    #[command(group(ArgGroup::new("day").required(true).args(["date", "today"])))]
    Toggle {
        /// Habit ID
        id: String,
        /// Day as YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Use the local date
        #[arg(long)]
        today: bool,
    },
    /// Show completion for today and the current streak
    Status {
        /// Habit ID (all habits when omitted)
        id: Option<String>,
        /// Evaluate as of this day (YYYY-MM-DD) instead of the local date
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: HabitAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = HabitService::new(HabitDb::open(config)?);
    let pretty = config.display.pretty_json;

    match action {
        HabitAction::List => {
            print_json(&service.list()?, pretty)?;
        }
        HabitAction::Get { id } => {
            print_json(&service.get(&HabitId::from(id))?, pretty)?;
        }
        HabitAction::Create { name, description } => {
            let habit = service.create(&name, description.as_deref())?;
            print_json(&habit, pretty)?;
        }
        HabitAction::Update {
            id,
            name,
            description,
        } => {
            let habit = service.update(&HabitId::from(id), &name, description.as_deref())?;
            print_json(&habit, pretty)?;
        }
        HabitAction::Delete { id } => {
            let id = HabitId::from(id);
            service.delete(&id)?;
            print_json(&json!({ "message": "Habit deleted", "id": id }), pretty)?;
        }
        HabitAction::Toggle { id, date, today } => {
            let date = match date {
                Some(date) => date,
                None if today => CompletionDate::today().to_string(),
                None => return Err("a date is required".into()),
            };
            let habit = service.toggle(&HabitId::from(id), &date)?;
            print_json(&habit, pretty)?;
        }
        HabitAction::Status { id, today, json } => {
            let today = match today {
                Some(day) => CompletionDate::parse(&day)?,
                None => CompletionDate::today(),
            };
            let statuses = match id {
                Some(id) => vec![service.status(&HabitId::from(id), today)?],
                None => service.status_all(today)?,
            };

            if json {
                print_json(&statuses, pretty)?;
            } else {
                for status in &statuses {
                    println!("{}", format_status(status, config.display.show_description));
                }
            }
        }
    }
    Ok(())
}

/// One habit card as text: check mark, name, streak, id, optional description.
fn format_status(status: &HabitStatus, show_description: bool) -> String {
    let mark = if status.completed_today { 'x' } else { ' ' };
    let mut line = format!("[{mark}] {}", status.habit.name);
    match status.current_streak {
        0 => {}
        1 => line.push_str("  (1 day)"),
        n => line.push_str(&format!("  ({n} days)")),
    }
    line.push_str(&format!("  {}", status.habit.id));
    if show_description && !status.habit.description.is_empty() {
        line.push_str(&format!("\n    {}", status.habit.description));
    }
    line
}
