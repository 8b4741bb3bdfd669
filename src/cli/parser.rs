use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for agenda-checkin
#[derive(Parser)]
#[command(
    name = "agenda-checkin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Event agenda catalog and attendee check-in ledger using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Enable debug diagnostics on stderr
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Slot coordinates shared by `checkin` and `checkins`.
#[derive(Args, Debug, Clone)]
pub struct SlotArgs {
    /// Event day label (e.g. "Day 1")
    #[arg(long)]
    pub day: String,

    /// Ordinal position of the item within its day
    #[arg(long = "index", allow_negative_numbers = true)]
    pub index: i64,

    /// Target the parallel track of the slot
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage agenda items (organizer side)
    Agenda {
        #[command(subcommand)]
        action: AgendaAction,
    },

    /// Check an attendee into an agenda slot
    Checkin {
        /// Authenticated attendee id
        user: String,

        #[command(flatten)]
        slot: SlotArgs,

        #[arg(long, help = "Print the outcome as JSON")]
        json: bool,
    },

    /// Query the check-in ledger
    Checkins {
        #[arg(long, conflicts_with = "day", help = "List all check-ins of one attendee")]
        user: Option<String>,

        #[arg(long, requires = "index", help = "Count check-ins for a slot on this day")]
        day: Option<String>,

        #[arg(long = "index", requires = "day", allow_negative_numbers = true)]
        index: Option<i64>,

        #[arg(long, requires = "day")]
        parallel: bool,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum AgendaAction {
    /// Add an agenda item
    Add {
        #[arg(long)]
        day: String,

        #[arg(long = "index", allow_negative_numbers = true)]
        index: i64,

        #[arg(long, help = "Mark the item as the parallel track of its slot")]
        parallel: bool,

        #[arg(long, default_value = "")]
        time: String,

        #[arg(long)]
        title: String,

        #[arg(long = "no-checkin", help = "The item never accepts check-ins")]
        no_checkin: bool,

        #[arg(long, help = "Create the item deactivated")]
        inactive: bool,
    },

    /// Edit an existing agenda item
    Edit {
        #[arg(long)]
        id: i64,

        #[arg(long)]
        day: Option<String>,

        #[arg(long = "index", allow_negative_numbers = true)]
        index: Option<i64>,

        #[arg(long)]
        parallel: Option<bool>,

        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long = "requires-checkin")]
        requires_checkin: Option<bool>,
    },

    /// List agenda items
    List {
        #[arg(long, help = "Only this day (default: every day)")]
        day: Option<String>,

        #[arg(long, help = "Only items currently open")]
        active: bool,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Re-open an item for check-in
    Activate {
        #[arg(long)]
        id: i64,
    },

    /// Close an item for check-in
    Deactivate {
        #[arg(long)]
        id: i64,
    },
}
