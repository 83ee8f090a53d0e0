use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Log workouts from the command line, online or not")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a new workout
    #[command(alias = "new")]
    Add {
        /// Workout date (YYYY-MM-DD, defaults to today)
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Exercises as "NAME SETSxREPS [@WEIGHT]", e.g. "Squat 3x5 @100"
        #[arg(required = true, value_name = "EXERCISE")]
        exercises: Vec<String>,
    },
    /// List recent workouts
    List {
        /// Number of workouts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one workout with its exercises
    Show {
        /// Workout ID or unique ID prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace a workout's data and exercises
    Edit {
        /// Workout ID or unique ID prefix
        id: String,
        /// Workout date (YYYY-MM-DD, defaults to the current date)
        #[arg(short, long, value_name = "DATE")]
        date: Option<String>,
        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Exercises as "NAME SETSxREPS [@WEIGHT]"
        #[arg(required = true, value_name = "EXERCISE")]
        exercises: Vec<String>,
    },
    /// Delete a workout
    Delete {
        /// Workout ID or unique ID prefix
        id: String,
    },
    /// Weekly training volume summary
    Stats {
        /// Number of recent weeks to include
        #[arg(short, long, default_value = "4")]
        weeks: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Past sessions of one exercise, newest first
    History {
        /// Exercise name (case-insensitive)
        exercise: String,
        /// Number of sessions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Push queued changes to the server, including parked ones
    Sync,
    /// Show sync queue and connection status
    Status,
    /// Sign in and store the session
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Sign out and clear the stored session
    Logout,
    /// Search the exercise catalog
    Catalog {
        /// Substring to search for (lists everything when omitted)
        query: Option<String>,
    },
    /// Show or change local settings
    Config {
        /// Weight display unit: kg or lb
        #[arg(long, value_name = "UNIT")]
        unit: Option<String>,
        /// Automatic sync passes: on or off
        #[arg(long, value_name = "ON|OFF")]
        auto_sync: Option<String>,
    },
}
