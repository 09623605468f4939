//! Line-oriented terminal screen over the presentation binding.
//!
//! SYSTEM CONTEXT
//! ==============
//! Stands in for the mobile screen: each stdin line is one user intent,
//! and the view is re-rendered after every intent.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::binding::{Phase, PresentationBinding, ScreenView};

/// One parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replace the draft. Text after `type ` is kept verbatim.
    Type(String),
    Save,
    Delete,
    Show,
    Quit,
    Unknown(String),
}

#[must_use]
pub fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    if let Some(text) = line.strip_prefix("type ") {
        return Command::Type(text.to_owned());
    }
    match line.trim() {
        "type" => Command::Type(String::new()),
        "save" => Command::Save,
        "delete" => Command::Delete,
        "show" | "" => Command::Show,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_owned()),
    }
}

#[must_use]
pub fn render(view: &ScreenView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.title);
    let _ = writeln!(out, "{} {}", view.label, view.display);
    let _ = writeln!(out, "> {}", view.draft);
    if view.phase != Phase::Idle {
        let _ = writeln!(out, "({:?}...)", view.phase);
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "! {notice}");
    }
    out
}

/// Load once, then apply commands from `input` until EOF or `quit`.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<R, W>(binding: &PresentationBinding, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    binding.load().await;
    output.write_all(render(&binding.view().await).as_bytes()).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Type(text) => binding.set_draft(text).await,
            Command::Save => {
                binding.save().await;
            }
            Command::Delete => {
                binding.remove().await;
            }
            Command::Show => {}
            Command::Quit => break,
            Command::Unknown(other) => {
                output
                    .write_all(format!("unknown command: {other} (type <text> | save | delete | show | quit)\n").as_bytes())
                    .await?;
                continue;
            }
        }
        output.write_all(render(&binding.view().await).as_bytes()).await?;
    }
    output.flush().await
}

#[cfg(test)]
#[path = "screen_test.rs"]
mod tests;
