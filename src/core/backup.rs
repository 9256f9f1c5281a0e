use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database file to `dest_file`, optionally zipped.
    ///
    /// The copy is taken with `VACUUM INTO`, so it is consistent even while
    /// the connection is open. An existing destination is an error unless
    /// `overwrite` is set. Returns the final backup path.
    pub fn backup(
        pool: &mut DbPool,
        dest_file: &str,
        compress: bool,
        overwrite: bool,
    ) -> AppResult<PathBuf> {
        let dest = expand_tilde(dest_file);

        if compress && dest.extension().is_some_and(|e| e == "zip") {
            return Err(AppError::InvalidInput(
                "With --compress, pass the uncompressed file name (the .zip is derived)".into(),
            ));
        }

        // 1️⃣ Ensure destination folder exists
        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // 2️⃣ Existing destination
        if dest.exists() {
            if !overwrite {
                return Err(AppError::InvalidInput(format!(
                    "Backup destination already exists: {}",
                    dest.display()
                )));
            }
            fs::remove_file(&dest)?;
        }

        // 3️⃣ Snapshot database
        pool.conn
            .execute("VACUUM INTO ?1", [dest.to_string_lossy().to_string()])?;
        println!("✅ Backup created: {}", dest.display());

        // 4️⃣ Optional compression
        let final_path = if compress {
            let compressed = compress_backup(&dest)?;

            if compressed != dest {
                if let Err(e) = fs::remove_file(&dest) {
                    eprintln!("⚠️ Failed to remove uncompressed backup: {}", e);
                } else {
                    println!("🗑️ Removed uncompressed backup: {}", dest.display());
                }
            }

            compressed
        } else {
            dest
        };

        // 5️⃣ Log in DB
        ttlog_quiet(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(final_path)
    }
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "dailytap.sqlite".to_string());

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    println!("📦 Compressed: {}", zip_path.display());

    Ok(zip_path)
}
