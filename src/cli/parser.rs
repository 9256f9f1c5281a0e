use clap::{Parser, Subcommand};

/// Command-line interface definition for DailyTap
/// Tap through your day, one event at a time, and push it to a spreadsheet
#[derive(Parser)]
#[command(
    name = "dailytap",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tap through a fixed list of daily events and sync them to a spreadsheet webhook",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// First-run setup: destination and the ordered list of daily events
    Setup {
        #[arg(long = "sheet", help = "Spreadsheet link (destination identifier)")]
        sheet: String,

        #[arg(long = "url", help = "Webhook (Apps Script) URL")]
        url: String,

        #[arg(
            long = "event",
            short = 'e',
            required = true,
            help = "Event name, in tap order (repeat the flag for each event)"
        )]
        events: Vec<String>,

        #[arg(long = "icon", help = "Icon for all events (default from config)")]
        icon: Option<String>,
    },

    /// Show or change the sync destination
    Settings {
        #[arg(long = "sheet", help = "New spreadsheet link")]
        sheet: Option<String>,

        #[arg(long = "url", help = "New webhook URL")]
        url: Option<String>,
    },

    /// Manage the list of daily events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Log the current event at the current time
    Tap,

    /// Skip the current event
    Skip,

    /// Set (or correct) today's time for an event
    Edit {
        /// Event name as shown by `event list`
        event: String,

        /// Time (HH:MM)
        time: String,
    },

    /// Show today's progress, history and pending sync
    Status {
        #[arg(long = "json", help = "Print the status as JSON")]
        json: bool,
    },

    /// Delete everything logged today and restart from the first event
    Reset {
        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Push unsynced logs to the webhook now
    Sync,

    /// Send a test payload to the webhook
    TestConnection {
        #[arg(long = "sheet", help = "Spreadsheet link (default: stored one)")]
        sheet: Option<String>,

        #[arg(long = "url", help = "Webhook URL (default: stored one)")]
        url: Option<String>,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
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

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
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

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup file")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// List events in tap order
    List,

    /// Append an event at the end of the list
    Add {
        name: String,

        #[arg(long = "icon")]
        icon: Option<String>,
    },

    /// Rename an event (already logged entries keep the old name)
    Rename { old: String, new: String },

    /// Change the icon of an event
    Icon { name: String, icon: String },

    /// Remove an event from the list
    Remove { name: String },

    /// Move an event to a new position (1 = first)
    Move { name: String, position: usize },
}
