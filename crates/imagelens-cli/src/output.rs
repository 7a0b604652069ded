// Output formatting

use serde::Serialize;

use crate::error::CliResult;

/// Render a value as pretty JSON
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

/// Print error message
pub fn print_error(msg: &str) {
    eprintln!("error: {}", msg);
}
