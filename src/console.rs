use rustyline::{error::ReadlineError, DefaultEditor, Result as RustyResult};
use tracing::error;

use crate::{environment::Environment, login_token::TokenStore};

/// Interactive console over a live token store.
///
/// Stands in for the delivery side of a login flow: issued tokens are printed
/// as login links instead of being mailed.
pub struct LoginConsole {
    store: TokenStore,
    environment: Environment,
}

impl LoginConsole {
    #[must_use]
    pub fn new(store: TokenStore, environment: Environment) -> Self {
        Self { store, environment }
    }

    pub fn start_interactive(&mut self) -> RustyResult<()> {
        println!("🔑 Login Token Console");
        println!("Environment: {:?}", self.environment);
        println!(
            "Tokens: {} characters, valid for {}s",
            self.store.token_length(),
            self.store.expiry().as_secs()
        );
        println!("Type 'help' for available commands, 'exit' to quit");
        println!();

        let mut rl = DefaultEditor::new()?;

        loop {
            let readline = rl.readline("login> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    rl.add_history_entry(line)?;
                    match line {
                        "exit" | "quit" => {
                            println!("Goodbye! 👋");
                            break;
                        }
                        "help" => {
                            Self::show_help();
                        }
                        "clear" => {
                            print!("\x1B[2J\x1B[1;1H"); // Clear screen
                        }
                        _ => {
                            println!("{}", self.execute(line));
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C pressed, exiting...");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D pressed, exiting...");
                    break;
                }
                Err(err) => {
                    error!("Error reading line: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run a single console command and return the text to show.
    pub fn execute(&self, line: &str) -> String {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let argument = parts.next();

        match (command, argument) {
            ("issue", Some(account_id)) => match account_id.parse::<i64>() {
                Ok(account_id) => {
                    let token = self.store.issue(account_id);
                    format!(
                        "=> {}\n   expires at {}",
                        login_link(self.store.login_url(), &token.value),
                        token.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
                    )
                }
                Err(_) => format!("Invalid account id: {account_id}"),
            },
            ("redeem", Some(value)) => match self.store.redeem(value) {
                Ok(account_id) => format!("=> account {account_id}"),
                Err(_) => "Invalid or expired link".to_string(),
            },
            ("sweep", None) => format!("=> reclaimed {}", self.store.reclaim_expired()),
            ("count", None) => format!("=> {} tokens", self.store.len()),
            _ => format!("Unknown command: {line} (type 'help')"),
        }
    }

    fn show_help() {
        println!("🔑 Login Token Console");
        println!();
        println!("Built-in Commands:");
        println!("  help              - Show this help message");
        println!("  clear             - Clear the screen");
        println!("  exit/quit         - Exit the console");
        println!();
        println!("Token Commands:");
        println!("  issue <account>   - Issue a token and print its login link");
        println!("  redeem <token>    - Redeem a token and print its account");
        println!("  sweep             - Reclaim expired tokens");
        println!("  count             - Number of tokens held");
        println!();
    }
}

/// Login link for `token`, as a delivery channel would send it.
#[must_use]
pub fn login_link(login_url: &str, token: &str) -> String {
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!("{login_url}{separator}token={token}")
}
