use clap::Subcommand;
use streakbot_core::config::database_path_from_env;
use streakbot_core::{streak, Database};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show a user's current streak
    Show {
        #[arg(long)]
        user: i64,
    },
    /// Set a user's streak start date (YYYY-MM-DD)
    Set {
        #[arg(long)]
        user: i64,
        date: String,
    },
    /// Reset a user's streak to today
    Reset {
        #[arg(long)]
        user: i64,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(&database_path_from_env()?)?;
    let today = chrono::Local::now().date_naive();

    match action {
        StreakAction::Show { user } => match db.record(user)? {
            Some(record) => {
                let status = streakbot_core::StreakStatus {
                    created: false,
                    days: streak::days_since(record.streak_start, today),
                    start: record.streak_start,
                };
                println!("{}", serde_json::to_string_pretty(&status)?);
            }
            None => println!("no streak record for user {user}"),
        },
        StreakAction::Set { user, date } => {
            let status = streak::override_start(&db, user, &date, today)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        StreakAction::Reset { user } => {
            streak::reset(&db, user, today)?;
            println!("streak reset to {} for user {user}", today.format(streak::DATE_FORMAT));
        }
    }
    Ok(())
}
