use chrono::SecondsFormat;
use clap::{Parser, Subcommand};
use sharebox_core::{compute_stats, CatalogService, CoreConfig, ShareRecord, ShareService};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sharebox")]
#[command(about = "sharebox file and share link administration")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored files
    Files,
    /// Show totals, type distribution and upload trend
    Stats,
    /// Delete a stored file
    Delete {
        /// Stored file name
        name: String,
    },
    /// List active share links (expired ones are purged)
    Shares,
    /// Create a share link for a stored file
    Share {
        /// Stored file name
        file_id: String,
        /// Display name shown to recipients (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        /// Lifetime in seconds; omit or 0 for no expiry
        #[arg(long, allow_hyphen_values = true)]
        expires_in: Option<i64>,
    },
    /// Resolve a share link, counting one download
    Resolve {
        /// Share id
        id: String,
    },
    /// Remove a share link
    Revoke {
        /// Share id
        id: String,
    },
    /// Remove expired share links
    Purge,
}

fn print_share(record: &ShareRecord) {
    let expires = record
        .expires_at
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| "never".into());
    println!(
        "{}  {} ({})  downloads: {}  expires: {}",
        record.id, record.file_name, record.file_id, record.downloads, expires
    );
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let cfg = Arc::new(CoreConfig::from_env()?);

    match cli.command {
        Some(Commands::Files) => {
            let files = CatalogService::new(cfg).list()?;
            if files.is_empty() {
                println!("No files found.");
            }
            for file in files {
                println!(
                    "{}  {} bytes  {}  {}",
                    file.file_name,
                    file.size,
                    file.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                    file.url
                );
            }
        }
        Some(Commands::Stats) => {
            let stats = compute_stats(&CatalogService::new(cfg).list()?);
            println!("Files: {}", stats.total_files);
            println!("Total size: {} bytes", stats.total_size);
            println!("By type:");
            for (name, count) in &stats.type_distribution {
                let name = if name.is_empty() { "(none)" } else { name.as_str() };
                println!("  {name}: {count}");
            }
            println!("By day:");
            for (date, count) in &stats.upload_trend {
                println!("  {date}: {count}");
            }
        }
        Some(Commands::Delete { name }) => {
            CatalogService::new(cfg).delete(&name)?;
            println!("Deleted {name}");
        }
        Some(Commands::Shares) => {
            let shares = ShareService::new(cfg).list()?;
            if shares.is_empty() {
                println!("No active shares.");
            }
            for record in &shares {
                print_share(record);
            }
        }
        Some(Commands::Share {
            file_id,
            name,
            expires_in,
        }) => {
            let file_name = name.unwrap_or_else(|| file_id.clone());
            let id = ShareService::new(cfg).create(&file_id, &file_name, expires_in)?;
            println!("{id}");
        }
        Some(Commands::Resolve { id }) => {
            let resolved = ShareService::new(cfg).resolve(&id)?;
            println!(
                "{} -> {} (downloads: {})",
                resolved.file_name, resolved.file_url, resolved.downloads
            );
        }
        Some(Commands::Revoke { id }) => {
            let removed = ShareService::new(cfg).revoke(&id)?;
            println!("Revoked share {} for {}", removed.id, removed.file_id);
        }
        Some(Commands::Purge) => {
            let removed = ShareService::new(cfg).purge_expired()?;
            println!("Purged {removed} expired share(s)");
        }
        None => {
            println!("Use 'sharebox --help' for commands");
        }
    }

    Ok(())
}
