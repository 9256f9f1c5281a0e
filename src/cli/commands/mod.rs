pub mod backup;
pub mod config;
pub mod db;
pub mod edit;
pub mod event;
pub mod init;
pub mod log;
pub mod reset;
pub mod settings;
pub mod setup;
pub mod status;
pub mod sync;
pub mod tap;
pub mod test_connection;

use std::io::{self, Write};

/// Ask a yes/no question on stdin. Anything but `y`/`yes` means no.
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
