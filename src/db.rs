use crate::account::{Account, BalanceError};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

// ============================================================================
// STORE ERRORS
// ============================================================================

/// Failure of a single store operation.
///
/// Callers branch on the variant instead of matching message strings:
/// `Duplicate` and `NotFound` are expected outcomes the menu reports
/// and recovers from, `Sqlite` is the store misbehaving.
#[derive(Debug)]
pub enum StoreError {
    /// Insert hit the primary key: the account number already exists.
    Duplicate(String),

    /// No row for the requested account number.
    NotFound(String),

    /// Underlying SQLite failure.
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Duplicate(number) => {
                write!(f, "Account {} already exists", number)
            }
            StoreError::NotFound(number) => {
                write!(f, "Account {} not found", number)
            }
            StoreError::Sqlite(e) => write!(f, "Store operation failed: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

/// Failure of the two-legged transfer. Any variant means both
/// balances are exactly as they were before the call.
#[derive(Debug)]
pub enum TransferError {
    /// Sender account number has no row.
    SenderMissing(String),

    /// Receiver account number has no row.
    ReceiverMissing(String),

    /// Amount validation failed (non-positive or over balance).
    Rejected(BalanceError),

    /// Underlying SQLite failure; the transaction was rolled back.
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferError::SenderMissing(number) => {
                write!(f, "Sender account {} not found", number)
            }
            TransferError::ReceiverMissing(number) => {
                write!(f, "Receiver account {} not found", number)
            }
            TransferError::Rejected(e) => write!(f, "{}", e),
            TransferError::Sqlite(e) => write!(f, "Transfer failed: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<rusqlite::Error> for TransferError {
    fn from(e: rusqlite::Error) -> Self {
        TransferError::Sqlite(e)
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Accounts (
            accountNumber TEXT PRIMARY KEY,
            holderName TEXT NOT NULL,
            balance REAL NOT NULL,
            createdAt TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

// ============================================================================
// ACCOUNT OPERATIONS
// ============================================================================

/// Insert a new account row. The primary key enforces uniqueness;
/// a duplicate number surfaces as `StoreError::Duplicate`.
pub fn open_account(conn: &Connection, account: &Account) -> Result<(), StoreError> {
    let created_at = account
        .created_at
        .unwrap_or_else(Utc::now)
        .to_rfc3339();

    let result = conn.execute(
        "INSERT INTO Accounts (accountNumber, holderName, balance, createdAt)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            account.account_number,
            account.holder_name,
            account.balance,
            created_at,
        ],
    );

    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StoreError::Duplicate(account.account_number.clone()))
        }
        Err(e) => Err(StoreError::Sqlite(e)),
    }
}

/// Fetch at most one account by exact number match.
///
/// The returned record is a snapshot, not a live handle: updates made
/// elsewhere are invisible until re-fetched.
pub fn get_account(conn: &Connection, number: &str) -> Result<Option<Account>, StoreError> {
    fetch_account(conn, number).map_err(StoreError::Sqlite)
}

/// Overwrite the balance column for the given account number.
/// Last write wins; a write to an absent account is refused.
pub fn update_balance(conn: &Connection, account: &Account) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE Accounts SET balance = ?1 WHERE accountNumber = ?2",
        params![account.balance, account.account_number],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(account.account_number.clone()));
    }

    Ok(())
}

/// All account rows in store order.
pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT accountNumber, holderName, balance, createdAt FROM Accounts",
    )?;

    let accounts = stmt
        .query_map([], row_to_account)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(accounts)
}

pub fn count_accounts(conn: &Connection) -> Result<i64, StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM Accounts", [], |row| row.get(0))?;

    Ok(count)
}

// ============================================================================
// TRANSFER
// ============================================================================

/// Move `amount` from `sender_no` to `receiver_no` as a single SQLite
/// transaction: both balance writes commit together or not at all, so
/// the sum of the two balances is conserved even across a crash
/// between the legs.
pub fn transfer(
    conn: &mut Connection,
    sender_no: &str,
    receiver_no: &str,
    amount: f64,
) -> Result<(), TransferError> {
    let tx = conn.transaction()?;

    // Fresh snapshots inside the transaction, not whatever the caller
    // fetched earlier
    let mut sender = fetch_account(&tx, sender_no)?
        .ok_or_else(|| TransferError::SenderMissing(sender_no.to_string()))?;
    let mut receiver = fetch_account(&tx, receiver_no)?
        .ok_or_else(|| TransferError::ReceiverMissing(receiver_no.to_string()))?;

    sender
        .transfer_to(&mut receiver, amount)
        .map_err(TransferError::Rejected)?;

    for account in [&sender, &receiver] {
        tx.execute(
            "UPDATE Accounts SET balance = ?1 WHERE accountNumber = ?2",
            params![account.balance, account.account_number],
        )?;
    }

    tx.commit()?;
    Ok(())
}

fn fetch_account(conn: &Connection, number: &str) -> rusqlite::Result<Option<Account>> {
    let mut stmt = conn.prepare(
        "SELECT accountNumber, holderName, balance, createdAt
         FROM Accounts
         WHERE accountNumber = ?1",
    )?;

    let mut rows = stmt.query_map(params![number], row_to_account)?;
    rows.next().transpose()
}

fn row_to_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let created_at_str: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc));

    Ok(Account {
        account_number: row.get(0)?,
        holder_name: row.get(1)?,
        balance: row.get(2)?,
        created_at,
    })
}

// ============================================================================
// CSV IMPORT / EXPORT
// ============================================================================

pub fn load_accounts_csv(csv_path: &Path) -> Result<Vec<Account>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut accounts = Vec::new();

    for result in rdr.deserialize() {
        let account: Account = result.context("Failed to deserialize account row")?;
        accounts.push(account);
    }

    Ok(accounts)
}

/// Insert account rows, skipping numbers already present. Rows with a
/// negative balance are rejected outright. Reports all three counts.
pub fn import_accounts(conn: &Connection, accounts: &[Account]) -> Result<usize> {
    let mut inserted = 0;
    let mut duplicates = 0;
    let mut rejected = 0;

    for account in accounts {
        if account.balance < 0.0 {
            rejected += 1;
            continue;
        }

        match open_account(conn, account) {
            Ok(()) => inserted += 1,
            Err(StoreError::Duplicate(_)) => duplicates += 1,
            Err(e) => return Err(e.into()),
        }
    }

    println!("✓ Imported: {} accounts", inserted);
    println!("✓ Skipped duplicates: {}", duplicates);
    if rejected > 0 {
        println!("❌ Rejected (negative balance): {}", rejected);
    }

    Ok(inserted)
}

/// Write every account row to a CSV file. Returns the row count.
pub fn export_accounts(conn: &Connection, csv_path: &Path) -> Result<usize> {
    let accounts = list_accounts(conn)?;

    let mut wtr = csv::Writer::from_path(csv_path).context("Failed to create CSV file")?;
    for account in &accounts {
        wtr.serialize(account)
            .context("Failed to serialize account row")?;
    }
    wtr.flush().context("Failed to flush CSV file")?;

    Ok(accounts.len())
}
