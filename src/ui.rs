// 🏦 Interactive menu - drives the store from standard input
//
// The loop owns no business logic: it collects input, calls the
// account/store layers and renders their Results. Malformed numbers
// re-prompt instead of crashing; store failures print a message and
// the loop continues. Only the terminal itself failing ends the
// session early.

use crate::account::Account;
use crate::db::{self, StoreError};
use anyhow::Result;
use rusqlite::Connection;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    OpenAccount,
    Deposit,
    Withdraw,
    Transfer,
    ViewBalance,
    ListAccounts,
    Exit,
}

impl MenuChoice {
    /// Map a menu line to a choice. Anything but "1".."7" is
    /// unrecognized.
    pub fn parse(input: &str) -> Option<MenuChoice> {
        match input.trim() {
            "1" => Some(MenuChoice::OpenAccount),
            "2" => Some(MenuChoice::Deposit),
            "3" => Some(MenuChoice::Withdraw),
            "4" => Some(MenuChoice::Transfer),
            "5" => Some(MenuChoice::ViewBalance),
            "6" => Some(MenuChoice::ListAccounts),
            "7" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// Parse a currency amount typed by the user. Rejects anything that
/// is not a finite number; sign and range checks belong to the
/// balance arithmetic.
pub fn parse_amount(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|a| a.is_finite())
}

/// Run the menu against standard input until Exit or end of input.
pub fn run_menu(conn: &mut Connection) -> Result<()> {
    let stdin = io::stdin();
    run_loop(conn, &mut stdin.lock())
}

pub fn run_loop(conn: &mut Connection, input: &mut impl BufRead) -> Result<()> {
    loop {
        print_menu();

        // End of input ends the session like Exit does
        let Some(line) = read_line(input, "Choose an option: ")? else {
            break;
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::OpenAccount) => handle_open(conn, input)?,
            Some(MenuChoice::Deposit) => handle_deposit(conn, input)?,
            Some(MenuChoice::Withdraw) => handle_withdraw(conn, input)?,
            Some(MenuChoice::Transfer) => handle_transfer(conn, input)?,
            Some(MenuChoice::ViewBalance) => handle_view_balance(conn, input)?,
            Some(MenuChoice::ListAccounts) => handle_list(conn),
            Some(MenuChoice::Exit) => {
                println!("Exiting...");
                break;
            }
            None => println!("❌ Invalid option"),
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("🏦 Bank Management System");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("1. Open Account");
    println!("2. Deposit");
    println!("3. Withdraw");
    println!("4. Transfer");
    println!("5. View Balance");
    println!("6. List Accounts");
    println!("7. Exit");
}

// ============================================================================
// PER-CHOICE FLOWS
// ============================================================================

fn handle_open(conn: &Connection, input: &mut impl BufRead) -> Result<()> {
    let Some(number) = read_line(input, "Enter account number: ")? else {
        return Ok(());
    };
    if number.is_empty() {
        println!("❌ Account number must not be empty");
        return Ok(());
    }

    let Some(holder) = read_line(input, "Enter holder name: ")? else {
        return Ok(());
    };

    let Some(balance) = read_amount(input, "Enter initial deposit: ")? else {
        return Ok(());
    };
    if balance < 0.0 {
        println!("❌ Initial deposit must not be negative");
        return Ok(());
    }

    let account = Account::new(number, holder, balance);
    match db::open_account(conn, &account) {
        Ok(()) => println!("✓ Account {} opened for {}", account.account_number, account.holder_name),
        Err(e) => println!("❌ {}", e),
    }

    Ok(())
}

fn handle_deposit(conn: &Connection, input: &mut impl BufRead) -> Result<()> {
    let Some(mut account) = fetch_prompted(conn, input, "Enter account number: ")? else {
        return Ok(());
    };
    let Some(amount) = read_amount(input, "Enter deposit amount: ")? else {
        return Ok(());
    };

    match account.deposit(amount) {
        Ok(()) => write_back(conn, &account, "Deposited", amount),
        Err(e) => println!("❌ {}", e),
    }

    Ok(())
}

fn handle_withdraw(conn: &Connection, input: &mut impl BufRead) -> Result<()> {
    let Some(mut account) = fetch_prompted(conn, input, "Enter account number: ")? else {
        return Ok(());
    };
    let Some(amount) = read_amount(input, "Enter withdrawal amount: ")? else {
        return Ok(());
    };

    match account.withdraw(amount) {
        Ok(()) => write_back(conn, &account, "Withdrew", amount),
        Err(e) => println!("❌ {}", e),
    }

    Ok(())
}

fn handle_transfer(conn: &mut Connection, input: &mut impl BufRead) -> Result<()> {
    let Some(sender) = fetch_prompted(conn, input, "Enter sender account number: ")? else {
        return Ok(());
    };

    let Some(receiver_no) = read_line(input, "Enter receiver account number: ")? else {
        return Ok(());
    };
    let Some(amount) = read_amount(input, "Enter transfer amount: ")? else {
        return Ok(());
    };

    // Both balance writes happen inside one store transaction; an
    // absent receiver is refused there, never written to
    match db::transfer(conn, &sender.account_number, &receiver_no, amount) {
        Ok(()) => println!("✓ Transferred {:.2} to {}", amount, receiver_no),
        Err(e) => println!("❌ {}", e),
    }

    Ok(())
}

fn handle_view_balance(conn: &Connection, input: &mut impl BufRead) -> Result<()> {
    let Some(account) = fetch_prompted(conn, input, "Enter account number: ")? else {
        return Ok(());
    };

    println!("Balance: {:.2}", account.balance);
    Ok(())
}

fn handle_list(conn: &Connection) {
    match db::list_accounts(conn) {
        Ok(accounts) if accounts.is_empty() => println!("No accounts on file"),
        Ok(accounts) => {
            println!("Bank Accounts:");
            for account in &accounts {
                println!(
                    "  {} | {} | {:.2}",
                    account.account_number, account.holder_name, account.balance
                );
            }
        }
        Err(e) => println!("❌ {}", e),
    }
}

// ============================================================================
// INPUT HELPERS
// ============================================================================

/// Prompt for an account number and fetch its snapshot. Prints the
/// failure and returns `None` when the account is absent or the store
/// errors; the caller abandons the flow and the menu comes back.
fn fetch_prompted(
    conn: &Connection,
    input: &mut impl BufRead,
    prompt: &str,
) -> Result<Option<Account>> {
    let Some(number) = read_line(input, prompt)? else {
        return Ok(None);
    };

    match db::get_account(conn, &number) {
        Ok(Some(account)) => Ok(Some(account)),
        Ok(None) => {
            println!("❌ {}", StoreError::NotFound(number));
            Ok(None)
        }
        Err(e) => {
            println!("❌ {}", e);
            Ok(None)
        }
    }
}

fn write_back(conn: &Connection, account: &Account, verb: &str, amount: f64) {
    match db::update_balance(conn, account) {
        Ok(()) => println!(
            "✓ {} {:.2} (new balance: {:.2})",
            verb, amount, account.balance
        ),
        Err(e) => println!("❌ {}", e),
    }
}

/// Read one trimmed line, `None` at end of input.
fn read_line(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

/// Read an amount, re-prompting until it parses as a finite number.
/// Sign checks are left to the callers so that a negative amount is a
/// reported validation failure, not a silent re-prompt.
fn read_amount(input: &mut impl BufRead, prompt: &str) -> Result<Option<f64>> {
    loop {
        let Some(line) = read_line(input, prompt)? else {
            return Ok(None);
        };

        match parse_amount(&line) {
            Some(amount) => return Ok(Some(amount)),
            None => println!("❌ Not a number, try again"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_parse_covers_all_options() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::OpenAccount));
        assert_eq!(MenuChoice::parse("2"), Some(MenuChoice::Deposit));
        assert_eq!(MenuChoice::parse("3"), Some(MenuChoice::Withdraw));
        assert_eq!(MenuChoice::parse("4"), Some(MenuChoice::Transfer));
        assert_eq!(MenuChoice::parse(" 5 "), Some(MenuChoice::ViewBalance));
        assert_eq!(MenuChoice::parse("6"), Some(MenuChoice::ListAccounts));
        assert_eq!(MenuChoice::parse("7"), Some(MenuChoice::Exit));
    }

    #[test]
    fn test_menu_choice_parse_rejects_garbage() {
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("8"), None);
        assert_eq!(MenuChoice::parse("deposit"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_parse_amount_accepts_decimals_and_trims() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 42.50 "), Some(42.5));
        assert_eq!(parse_amount("-3"), Some(-3.0));
    }

    #[test]
    fn test_parse_amount_rejects_non_numbers() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12,50"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_scripted_session_open_deposit_exit() {
        let mut conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();

        // Open A1 with 100, deposit 50 (first attempt malformed and
        // re-prompted), one invalid menu choice, then exit
        let script = "1\nA1\nAlice\n100\n2\nA1\nabc\n50\n9\n7\n";
        run_loop(&mut conn, &mut script.as_bytes()).unwrap();

        let account = db::get_account(&conn, "A1").unwrap().unwrap();
        assert_eq!(account.balance, 150.0);
    }

    #[test]
    fn test_scripted_session_ends_cleanly_at_eof() {
        let mut conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();

        // Input runs out mid-flow: no panic, no partial account
        let script = "1\nA1\n";
        run_loop(&mut conn, &mut script.as_bytes()).unwrap();

        assert!(db::get_account(&conn, "A1").unwrap().is_none());
    }

    #[test]
    fn test_scripted_transfer_between_accounts() {
        let mut conn = Connection::open_in_memory().unwrap();
        db::setup_database(&conn).unwrap();

        let script = "1\nA1\nAlice\n100\n1\nA2\nBob\n50\n4\nA1\nA2\n30\n7\n";
        run_loop(&mut conn, &mut script.as_bytes()).unwrap();

        assert_eq!(db::get_account(&conn, "A1").unwrap().unwrap().balance, 70.0);
        assert_eq!(db::get_account(&conn, "A2").unwrap().unwrap().balance, 80.0);
    }
}
