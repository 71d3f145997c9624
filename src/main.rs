use anyhow::{Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::Path;
use std::process;

// Use library instead of local modules
use bank_teller::config::DB_PATH_VAR;
use bank_teller::{
    count_accounts, export_accounts, import_accounts, load_accounts_csv, run_menu,
    setup_database, Config, VERSION,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = Config::from_env();

    match args.get(1).map(String::as_str) {
        None => run_menu_mode(&config)?,
        Some("import") => run_import(&config, mode_path(&args))?,
        Some("export") => run_export(&config, mode_path(&args))?,
        Some(other) => {
            eprintln!("❌ Unknown mode: {}", other);
            eprintln!("   Usage: bank-teller [import <file.csv> | export <file.csv>]");
            process::exit(2);
        }
    }

    Ok(())
}

fn mode_path(args: &[String]) -> &Path {
    match args.get(2) {
        Some(path) => Path::new(path),
        None => {
            eprintln!("❌ Missing CSV file path");
            eprintln!("   Usage: bank-teller [import <file.csv> | export <file.csv>]");
            process::exit(2);
        }
    }
}

/// Open the configured database once for the whole session. A
/// connection failure is fatal here, before any operation runs.
fn open_connection(config: &Config) -> Result<Connection> {
    let conn = Connection::open(&config.db_path).with_context(|| {
        format!(
            "Database connection failed: {}",
            config.db_path.display()
        )
    })?;
    setup_database(&conn)?;

    Ok(conn)
}

fn run_menu_mode(config: &Config) -> Result<()> {
    println!("🏦 Bank Teller v{}", VERSION);

    let mut conn = match open_connection(config) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            eprintln!("   Set {} to choose the database file.", DB_PATH_VAR);
            process::exit(1);
        }
    };

    run_menu(&mut conn)
}

fn run_import(config: &Config, csv_path: &Path) -> Result<()> {
    println!("📂 Loading accounts from {}...", csv_path.display());
    let accounts = load_accounts_csv(csv_path)?;
    println!("✓ Loaded {} account rows", accounts.len());

    let conn = open_connection(config)?;
    import_accounts(&conn, &accounts)?;

    let count = count_accounts(&conn)?;
    println!("✓ Database contains {} accounts", count);

    Ok(())
}

fn run_export(config: &Config, csv_path: &Path) -> Result<()> {
    let conn = open_connection(config)?;
    let exported = export_accounts(&conn, csv_path)?;

    println!("✓ Exported {} accounts to {}", exported, csv_path.display());

    Ok(())
}
