use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use xsig_frame::{SignalValue, Token};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct TokenOutput {
    kind: &'static str,
    join: u16,
    value: serde_json::Value,
}

impl From<&Token> for TokenOutput {
    fn from(token: &Token) -> Self {
        let value = match token.value() {
            SignalValue::Digital(v) => serde_json::Value::from(*v),
            SignalValue::Analog(v) => serde_json::Value::from(*v),
            SignalValue::Serial(v) => serde_json::Value::from(v.as_str()),
        };
        Self {
            kind: token.kind().as_str(),
            join: token.index(),
            value,
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput {
    offset: i32,
    length: usize,
    hex: String,
    tokens: Vec<TokenOutput>,
}

/// Collects decoded tokens so table output can be printed in one piece.
pub struct TokenPrinter {
    format: OutputFormat,
    table: Option<Table>,
}

impl TokenPrinter {
    pub fn new(format: OutputFormat) -> Self {
        let table = match format {
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["KIND", "JOIN", "VALUE"]);
                Some(table)
            }
            _ => None,
        };
        Self { format, table }
    }

    /// Print one decoded token, or queue it for the table.
    pub fn push(&mut self, token: &Token) {
        match self.format {
            OutputFormat::Json => println!("{}", to_json(&TokenOutput::from(token))),
            OutputFormat::Pretty => println!("{token}"),
            OutputFormat::Table => {
                if let Some(table) = self.table.as_mut() {
                    table.add_row(vec![
                        token.kind().to_string(),
                        token.index().to_string(),
                        value_text(token),
                    ]);
                }
            }
            OutputFormat::Raw => println!("{}", value_text(token)),
        }
    }

    /// Print anything still queued.
    pub fn finish(self) {
        if let Some(table) = self.table {
            println!("{table}");
        }
    }
}

pub fn print_encoded(tokens: &[Token], bytes: &[u8], offset: i32, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                offset,
                length: bytes.len(),
                hex: hex(bytes),
                tokens: tokens.iter().map(TokenOutput::from).collect(),
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["KIND", "JOIN", "WIRE JOIN", "VALUE"]);
            for token in tokens {
                table.add_row(vec![
                    token.kind().to_string(),
                    token.index().to_string(),
                    (i64::from(token.index()) + i64::from(offset)).to_string(),
                    value_text(token),
                ]);
            }
            println!("{table}");
            println!("{} bytes: {}", bytes.len(), hex(bytes));
        }
        OutputFormat::Pretty => println!("{}", hex(bytes)),
        OutputFormat::Raw => print_raw(bytes),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Space-separated uppercase hex, e.g. `C8 01 4F 4B FF`.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn value_text(token: &Token) -> String {
    match token.value() {
        SignalValue::Digital(v) => v.to_string(),
        SignalValue::Analog(v) => v.to_string(),
        SignalValue::Serial(v) => v.clone(),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(hex(&[0xC8, 0x01, 0x4F, 0x4B, 0xFF]), "C8 01 4F 4B FF");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn token_json_shape() {
        let json = to_json(&TokenOutput::from(&Token::serial(2, "OK")));
        assert_eq!(json, r#"{"kind":"serial","join":2,"value":"OK"}"#);

        let json = to_json(&TokenOutput::from(&Token::digital(1, true)));
        assert_eq!(json, r#"{"kind":"digital","join":1,"value":true}"#);
    }
}
