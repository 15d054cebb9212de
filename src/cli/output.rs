//! Terminal output formatting
//!
//! JSON responses go to stdout, diagnostics to stderr.
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::{self, Write};

use colored::Colorize;
use serde_json::Value;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Render a JSON value, keeping the server's key order.
pub fn render_json(value: &Value, pretty: bool) -> String {
    if pretty {
        // Serializing a `Value` cannot fail.
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

/// Write a JSON value to `out`, newline-terminated.
pub fn write_json(out: &mut impl Write, value: &Value, pretty: bool) -> io::Result<()> {
    writeln!(out, "{}", render_json(value, pretty))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_server_key_order_when_rendered_then_order_preserved() {
        let value: Value = serde_json::from_str(r#"{"name":"x","key":"PZ-P1","id":3}"#).unwrap();
        assert_eq!(render_json(&value, false), r#"{"name":"x","key":"PZ-P1","id":3}"#);
    }

    #[test]
    fn given_value_when_written_then_newline_terminated() {
        let mut buf = Vec::new();
        write_json(&mut buf, &json!({"id": 1}), false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"id\":1}\n");
    }

    #[test]
    fn given_pretty_flag_when_rendered_then_indented() {
        let rendered = render_json(&json!({"id": 1}), true);
        assert_eq!(rendered, "{\n  \"id\": 1\n}");
    }
}
