//! Create or promote the site administrator
//!
//! Usage:
//!   ADMIN_PASSWORD=... cargo run --bin create_admin -- --email admin@example.com

use clap::Parser;
use flexi_logger::Logger;
use std::path::Path;

use portfolio::auth::{seed_admin, AuthDatabase, SeedOutcome};

#[derive(Parser, Debug)]
#[command(name = "create_admin", about = "Create or promote an ADMIN account")]
struct Args {
    /// Path to the SQLite database
    #[arg(long, default_value = "data/portfolio.db")]
    db_path: String,

    /// Administrator email
    #[arg(long)]
    email: String,

    /// Display name for a newly created account
    #[arg(long, default_value = "Admin")]
    name: String,

    /// Password for a newly created account
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    if let Some(parent) = Path::new(&args.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let db = AuthDatabase::new(&args.db_path)?;

    match seed_admin(&db, &args.email, &args.name, &args.password)? {
        SeedOutcome::Created(id) => {
            println!("✅ Admin account created for {} (id {})", args.email, id)
        }
        SeedOutcome::Promoted(id) => println!(
            "✅ Existing account {} (id {}) promoted to ADMIN, password unchanged",
            args.email, id
        ),
        SeedOutcome::AlreadyAdmin(id) => {
            println!("ℹ️ {} (id {}) is already an ADMIN, nothing to do", args.email, id)
        }
    }

    Ok(())
}
