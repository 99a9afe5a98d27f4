pub mod analyze;
pub mod init;
pub mod resolve;

use std::io::{self, Write};

use crate::error::{Error, Result};

/// Take `value` if given, otherwise ask for it on stdin.
fn prompt_if_missing(value: Option<String>, label: &str) -> Result<String> {
    let value = match value {
        Some(v) => v,
        None => {
            print!("{}: ", label);
            io::stdout().flush()?;
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            input
        }
    };

    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(Error::Config(format!("{} is required", label)));
    }
    Ok(value)
}
