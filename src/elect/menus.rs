//! The interactive text-menu layer: prompts, input validation,
//! registration/login and the three role menus. Everything here is I/O glue
//! over the store; the consistency rules live in `admin` and `sync`.

use log::{info, warn};
use snafu::prelude::*;

use std::io::{self, Write as _};

use crate::elect::models::*;
use crate::elect::store::{Backend, Store};
use crate::elect::sync::{self, ResultStatus};
use crate::elect::{admin, ElectResult, ExportingSummarySnafu, SerializingSummarySnafu};

fn read_line() -> ElectResult<String> {
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) => whatever!("Input stream closed"),
        Ok(_) => Ok(buf.trim_end_matches(['\r', '\n']).to_string()),
        Err(e) => whatever!("Failed to read input: {}", e),
    }
}

fn get_string(prompt: &str) -> ElectResult<String> {
    print!("{}: ", prompt);
    let _ = io::stdout().flush();
    read_line()
}

fn get_int(min: i32, max: i32) -> ElectResult<i32> {
    loop {
        match read_line()?.trim().parse::<i32>() {
            Ok(x) if (min..=max).contains(&x) => return Ok(x),
            _ => {
                print!("Please enter a valid number ({}-{}): ", min, max);
                let _ = io::stdout().flush();
            }
        }
    }
}

pub fn welcome() {
    println!("=================================================");
    println!("• Welcome to the student election system");
    println!("• This system allows you to:");
    println!("    • Login as the admin.");
    println!("    • Register/login as a student.");
    println!("    • Register/login as a representative.");
    println!("=================================================");
}

pub fn main_prompt() -> ElectResult<i32> {
    println!("\n1) Register\n2) Login\n0) Exit");
    print!("Select: ");
    let _ = io::stdout().flush();
    get_int(0, 2)
}

fn admin_prompt() -> ElectResult<i32> {
    println!("\nAdmin Menu:\n1) List Representatives\n2) View Votes\n3) Publish Results\n0) Logout");
    print!("Select: ");
    let _ = io::stdout().flush();
    get_int(0, 3)
}

fn rep_prompt() -> ElectResult<i32> {
    println!("\nRep Menu:\n1) Submit/Update Manifesto\n0) Logout");
    print!("Select: ");
    let _ = io::stdout().flush();
    get_int(0, 1)
}

fn student_prompt() -> ElectResult<i32> {
    println!("\nStudent Menu:\n1) View Manifestos\n2) Cast Vote\n3) View Results\n0) Logout");
    print!("Select: ");
    let _ = io::stdout().flush();
    get_int(0, 3)
}

// ********* Input validation ***********

pub fn valid_username(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= USERNAME_MAX
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn username_guideline() {
    println!("Usernames are 1-{} characters: letters, digits, '_' or '-'.", USERNAME_MAX);
}

pub fn is_strong_password(s: &str) -> bool {
    s.len() >= 6
        && s.len() <= USERNAME_MAX
        && !s.contains(char::is_whitespace)
        && s.chars().any(|c| c.is_ascii_alphabetic())
        && s.chars().any(|c| c.is_ascii_digit())
}

fn password_guideline() {
    println!(
        "Passwords are 6-{} characters, no spaces, with at least one letter and one digit.",
        USERNAME_MAX
    );
}

fn authenticate(accounts: &[Account], username: &str, password: &str) -> Option<Account> {
    accounts
        .iter()
        .find(|a| a.username == username && a.password == password)
        .cloned()
}

// ********* Registration and login ***********

pub fn register<B: Backend>(store: &mut Store<B>) -> ElectResult<()> {
    println!("\nChoose to register as:\n 1. Student Representative\n 2. Student");
    print!("Select (1-2): ");
    let _ = io::stdout().flush();
    let role = match get_int(1, 2)? {
        1 => Role::Representative,
        _ => Role::Student,
    };

    let mut accounts = store.load_accounts()?;

    let username = loop {
        let candidate = get_string("Username")?;
        if accounts.iter().any(|a| a.username == candidate) {
            println!("[ERROR] Username already exists!");
            continue;
        }
        if !valid_username(&candidate) {
            println!("[ERROR] Invalid username!");
            username_guideline();
            continue;
        }
        break candidate;
    };
    println!("[SUCCESS] Username accepted");

    let password = loop {
        let candidate = get_string("Password")?;
        if !is_strong_password(&candidate) {
            println!("[ERROR] Weak password.");
            password_guideline();
            continue;
        }
        break candidate;
    };
    println!("[SUCCESS] Password accepted");

    accounts.push(Account {
        username: username.clone(),
        password,
        role,
    });
    store.save_accounts(&accounts)?;
    info!("Registered {} as {:?}", username, role);
    println!(
        "\n[SUCCESS] Registration complete! You are now a {}.",
        match role {
            Role::Representative => "STUDENT REPRESENTATIVE",
            _ => "STUDENT",
        }
    );

    // A new representative needs a manifesto row.
    if role == Role::Representative {
        sync::sync_manifestos_with_reps(store)?;
        println!("[SUCCESS] Manifestos synced with representatives.");
    }
    Ok(())
}

pub fn login<B: Backend>(store: &mut Store<B>, export_path: Option<&str>) -> ElectResult<()> {
    let username = loop {
        let candidate = get_string("Username")?;
        if !valid_username(&candidate) {
            println!("[ERROR] Invalid username!");
            username_guideline();
            continue;
        }
        break candidate;
    };
    let password = get_string("Password")?;

    let accounts = store.load_accounts()?;
    match authenticate(&accounts, &username, &password) {
        Some(current) => match current.role {
            Role::Admin => admin_menu(store, &current, export_path),
            Role::Representative => rep_menu(store, &current),
            Role::Student => student_menu(store, &current),
        },
        None => {
            warn!("Failed login attempt for {}", username);
            println!("\n[ERROR] Wrong credentials. Retry.");
            Ok(())
        }
    }
}

// ********* Role menus ***********

fn admin_menu<B: Backend>(
    store: &mut Store<B>,
    current: &Account,
    export_path: Option<&str>,
) -> ElectResult<()> {
    println!("\n=================================");
    println!("      [Welcome] Admin: {}", current.username);
    println!("=================================");
    println!("\nAs an admin you can:");
    println!("  • View a list of registered student representatives.");
    println!("  • View the total number of votes each representative has received.");
    println!("  • Publish and display the final election results.");

    loop {
        match admin_prompt()? {
            0 => {
                println!("\nLogging out...");
                return Ok(());
            }
            1 => list_representatives(store)?,
            2 => display_votes(store)?,
            3 => {
                // The publish path refuses to run on a users file whose
                // bootstrap admin row has been tampered with.
                if !admin::check_default_admin_at_top(store)? {
                    println!("[ERROR] Users file is inconsistent; restart to repair it.");
                    continue;
                }
                let manifestos = store.load_manifestos()?;
                let votes = store.load_votes()?;
                let entries = sync::publish_results(store, &manifestos, &votes)?;
                sync::mark_results_published(store)?;
                println!("\n[SUCCESS] Results published.");
                display_result_status(store)?;
                if let Some(path) = export_path {
                    export_summary(path, &entries)?;
                }
            }
            _ => unreachable!(),
        }
    }
}

fn list_representatives<B: Backend>(store: &Store<B>) -> ElectResult<()> {
    let reps = store.load_representatives()?;
    if reps.is_empty() {
        println!("\n[WARNING] No registered student representatives found.");
        return Ok(());
    }
    println!("\nRegistered Student Representatives:");
    for rep in &reps {
        println!("  • {}", rep.username);
    }
    Ok(())
}

fn display_votes<B: Backend>(store: &Store<B>) -> ElectResult<()> {
    let reps = store.load_representatives()?;
    let votes = store.load_votes()?;

    println!("\nCurrent vote counts:");
    if reps.is_empty() {
        println!("[WARNING] No representatives found.");
        return Ok(());
    }
    let counts = sync::vote_counts(&reps, &votes);
    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, count) in &counts {
        println!(" • {:<width$} : {:>4} votes", name, count, width = width);
    }
    Ok(())
}

fn display_result_status<B: Backend>(store: &Store<B>) -> ElectResult<()> {
    match sync::result_status(store)? {
        ResultStatus::Missing => println!("[WARNING] No results file found."),
        ResultStatus::Published => println!("[STATUS] Results are published and current."),
        ResultStatus::VotesPending => {
            println!("[STATUS] New votes are pending, awaiting publish.")
        }
        ResultStatus::Empty => println!("[WARNING] Results status file is empty or corrupted."),
    }
    Ok(())
}

fn export_summary(path: &str, entries: &[ResultEntry]) -> ElectResult<()> {
    let js = serde_json::json!({ "results": entries });
    let pretty = serde_json::to_string_pretty(&js).context(SerializingSummarySnafu)?;
    std::fs::write(path, pretty).context(ExportingSummarySnafu { path })?;
    info!("Wrote results summary to {}", path);
    println!("[SUCCESS] Results summary written to {}.", path);
    Ok(())
}

fn rep_menu<B: Backend>(store: &mut Store<B>, current: &Account) -> ElectResult<()> {
    println!("\nRepresentative: {}", current.username);
    println!("As a students' representative you can:");
    println!("  • Submit/update your election manifesto.");

    loop {
        if rep_prompt()? == 0 {
            println!("\nLogging out...");
            return Ok(());
        }

        let mut manifestos = store.load_manifestos()?;
        let idx = manifestos
            .iter()
            .position(|m| m.rep_username == current.username);

        match idx {
            Some(i) if !manifestos[i].text.is_pending() => {
                println!("\nYour current manifesto:\n{}", manifestos[i].text.as_raw());
            }
            _ => println!("\nYou haven't submitted a manifesto yet."),
        }

        let choice = get_string("Update/submit manifesto? (y/n)")?;
        if !choice.starts_with('y') && !choice.starts_with('Y') {
            println!("Manifesto not updated.");
            continue;
        }

        let text = loop {
            let candidate = get_string("Enter your manifesto")?;
            if candidate.is_empty() || candidate.len() > MANIFESTO_MAX || candidate.contains('|') {
                println!(
                    "[ERROR] Manifestos are 1-{} characters and may not contain '|'.",
                    MANIFESTO_MAX
                );
                continue;
            }
            break candidate;
        };

        match idx {
            Some(i) => {
                manifestos[i].text = ManifestoText::Submitted(text);
                println!("[SUCCESS] Manifesto updated.");
            }
            None => {
                manifestos.push(Manifesto {
                    rep_username: current.username.clone(),
                    text: ManifestoText::Submitted(text),
                });
                println!("[SUCCESS] Manifesto submitted.");
            }
        }
        store.save_manifestos(&manifestos)?;
    }
}

fn student_menu<B: Backend>(store: &mut Store<B>, current: &Account) -> ElectResult<()> {
    println!("\nStudent: {}", current.username);
    println!("As a student you can:");
    println!("  • View the list of student representatives with their manifestos.");
    println!("  • Cast one vote for a representative.");
    println!("  • View election results (when published by the admin).");

    loop {
        match student_prompt()? {
            0 => {
                println!("\nLogging out...");
                return Ok(());
            }
            1 => {
                let manifestos = store.load_manifestos()?;
                if manifestos.is_empty() {
                    println!("No manifestos available. Please check back later.");
                    continue;
                }
                println!("\nCandidate Manifestos:");
                for m in &manifestos {
                    println!("• {}:\n{}\n", m.rep_username, m.text.as_raw());
                }
            }
            2 => cast_vote(store, current)?,
            3 => {
                let results = store.load_results()?;
                if results.is_empty() {
                    println!("Results not published yet.");
                } else {
                    println!("\nFinal Election Results:");
                    for r in &results {
                        println!(" - {} : {} votes", r.rep_username, r.vote_count);
                    }
                }
            }
            _ => unreachable!(),
        }
    }
}

fn cast_vote<B: Backend>(store: &mut Store<B>, current: &Account) -> ElectResult<()> {
    let mut votes = store.load_votes()?;
    if votes.iter().any(|v| v.student_username == current.username) {
        println!("You've already voted!");
        return Ok(());
    }

    let manifestos = store.load_manifestos()?;
    if manifestos.is_empty() {
        println!("No candidates available to vote for.");
        return Ok(());
    }

    let choice = loop {
        let candidate = get_string("Enter rep username to vote for")?;
        if manifestos.iter().any(|m| m.rep_username == candidate) {
            break candidate;
        }
        println!("'{}' is not a valid candidate. Please try again.", candidate);
    };

    votes.push(Vote {
        student_username: current.username.clone(),
        rep_username: choice.clone(),
    });
    store.save_votes(&votes)?;
    sync::append_vote_update(store, &current.username)?;
    info!("{} voted for {}", current.username, choice);
    println!("[SUCCESS] Vote cast for {}!", choice);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(valid_username("alice"));
        assert!(valid_username("rep_2-b"));
        assert!(!valid_username(""));
        assert!(!valid_username("has space"));
        assert!(!valid_username("pipe|char"));
        assert!(!valid_username(&"x".repeat(USERNAME_MAX + 1)));
    }

    #[test]
    fn password_rules() {
        assert!(is_strong_password("abc123"));
        assert!(!is_strong_password("short"));
        assert!(!is_strong_password("letters"));
        assert!(!is_strong_password("123456"));
        assert!(!is_strong_password("has space1"));
    }

    #[test]
    fn authenticate_matches_username_and_password() {
        let accounts = vec![default_admin()];
        assert!(authenticate(&accounts, DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD).is_some());
        assert!(authenticate(&accounts, DEFAULT_ADMIN_USERNAME, "wrong").is_none());
        assert!(authenticate(&accounts, "nobody", DEFAULT_ADMIN_PASSWORD).is_none());
    }
}
