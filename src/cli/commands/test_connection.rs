use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::meta::get_non_blank;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::meta;
use crate::sync::manager::test_connection;
use crate::sync::transport::{Delivery, HttpTransport};
use crate::ui::messages::{info, success};
use crate::utils::date;

/// Check the webhook with a `test: true` payload.
/// Flags override the stored destination, so values can be checked before setup.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::TestConnection { sheet, url } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        let sheet = match sheet {
            Some(s) => s.clone(),
            None => get_non_blank(&pool.conn, meta::SHEET_LINK)?.unwrap_or_default(),
        };
        let url = match url {
            Some(u) => u.clone(),
            None => get_non_blank(&pool.conn, meta::SCRIPT_URL)?.unwrap_or_default(),
        };

        info(format!("Testing connection to {}…", url.trim()));

        let transport = HttpTransport::new(cfg.request_timeout())?;
        let delivery = test_connection(&transport, &url, &sheet, date::today())?;

        match delivery {
            Delivery::Delivered => {
                ttlog_quiet(&pool.conn, "test_connection", url.trim(), "Delivered");
                success("Connection successful! Check the sheet for the test row.");
            }
            Delivery::TransportFailed(reason) => {
                ttlog_quiet(&pool.conn, "test_connection", url.trim(), &reason);
                return Err(AppError::Transport(format!(
                    "Connection failed: {}",
                    reason
                )));
            }
        }
    }

    Ok(())
}
