// Bank Teller - Core Library
// Exposes all modules for use in the CLI binary and tests

pub mod account;
pub mod config;
pub mod db;
pub mod ui;

// Re-export commonly used types
pub use account::{Account, BalanceError};
pub use config::Config;
pub use db::{
    count_accounts, export_accounts, get_account, import_accounts, list_accounts,
    load_accounts_csv, open_account, setup_database, transfer, update_balance,
    StoreError, TransferError,
};
pub use ui::{parse_amount, run_menu, MenuChoice};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
