use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::setup::{Destination, SetupLogic};
use crate::db::meta::get_non_blank;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::meta;
use crate::ui::messages::{header, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings { sheet, url } = cmd {
        let pool = DbPool::new(&cfg.database)?;

        let stored_sheet = get_non_blank(&pool.conn, meta::SHEET_LINK)?;
        let stored_url = get_non_blank(&pool.conn, meta::SCRIPT_URL)?;

        // No flags: show the current destination
        if sheet.is_none() && url.is_none() {
            header("Settings");
            println!(
                "📄 Sheet link : {}",
                stored_sheet.as_deref().unwrap_or("(not set)")
            );
            println!(
                "🔗 Script URL : {}",
                stored_url.as_deref().unwrap_or("(not set)")
            );
            return Ok(());
        }

        // Missing flags keep the stored value
        let new_sheet = sheet.clone().or(stored_sheet).unwrap_or_default();
        let new_url = url.clone().or(stored_url).unwrap_or_default();

        let destination = Destination::new(&new_sheet, &new_url)?;
        SetupLogic::save_destination(&pool, &destination)?;

        success("Settings saved.");
    }

    Ok(())
}
