//! Hash an admin password for `WEDDING_ADMIN_PASSWORD_HASH`.
//!
//! The password is read from standard input so it never appears in the
//! process list or shell history:
//!
//! ```text
//! read -rs PW && printf '%s' "$PW" | hash-admin-password
//! ```

use std::io::{self, BufRead};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use wedding_backend::domain::hash_admin_password;
use zeroize::Zeroizing;

/// Print an Argon2id PHC string for the password given on stdin.
#[derive(Debug, Parser)]
#[command(name = "hash-admin-password", version)]
struct Cli {
    /// Keep trailing whitespace instead of trimming the line ending.
    #[arg(long)]
    raw: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut line = Zeroizing::new(String::new());
    io::stdin()
        .lock()
        .read_line(&mut line)
        .wrap_err("failed to read password from stdin")?;
    let password = if cli.raw {
        line.as_str()
    } else {
        line.trim_end_matches(['\r', '\n'])
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }

    let hash = hash_admin_password(password).wrap_err("failed to hash password")?;
    println!("{hash}");
    Ok(())
}
