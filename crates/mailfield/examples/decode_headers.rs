//! Example: decode the header block of a message
//!
//! Reads a message (or just its headers) from a file or stdin, unfolds the
//! header fields and prints each value with its encoded words decoded
//! according to the field's policy. `Content-Type` values are also parsed
//! as media types.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=mailfield=debug cargo run --package mailfield --example decode_headers -- message.eml
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use mailfield::{HeaderFieldPolicy, MediaType, decode_header_value, get_header_policy};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailfield=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    let text = String::from_utf8_lossy(&input);

    let fields = unfold_header_block(&text);
    info!(count = fields.len(), "read header fields");

    for (name, value) in &fields {
        let policy = get_header_policy(name);
        let kind = match policy {
            HeaderFieldPolicy::Unstructured => "unstructured".to_string(),
            HeaderFieldPolicy::StructuredCommentsAnywhere => "comments".to_string(),
            HeaderFieldPolicy::StructuredNoComments => "opaque".to_string(),
            HeaderFieldPolicy::StructuredWithGrammar(grammar) => {
                let valid = if policy.validate(value) { "" } else { ", invalid" };
                format!("{}{valid}", grammar.name())
            }
        };
        println!("{name} [{kind}]: {}", decode_header_value(name, value));

        if name.eq_ignore_ascii_case("content-type") {
            let media_type = MediaType::parse(value, Some(MediaType::text_plain_ascii()))
                .unwrap_or_else(MediaType::text_plain_ascii);
            println!(
                "    media type {} (charset {:?})",
                media_type.type_and_subtype(),
                media_type.get_charset()
            );
        }
    }

    Ok(())
}

/// Splits the header block (up to the first empty line) into unfolded
/// `(name, value)` pairs.
fn unfold_header_block(text: &str) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::new();
    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = fields.last_mut() {
                value.push_str(line);
            }
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            fields.push((name.trim().to_string(), value.trim_start().to_string()));
        }
    }
    fields
}
