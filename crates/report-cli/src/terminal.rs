//! Terminal rendering and REPL command parsing

use report_core::{Presenter, Ticker};
use std::io::Write;

/// Renders pipeline output to a pair of writers (stdout/stderr in the binary)
pub struct TerminalPresenter<O: Write, E: Write> {
    out: O,
    err: E,
}

impl TerminalPresenter<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, E: Write> TerminalPresenter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    #[cfg(test)]
    fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

// Terminal write failures are not recoverable here and are dropped.
impl<O: Write, E: Write> Presenter for TerminalPresenter<O, E> {
    fn render_tickers(&mut self, tickers: &[Ticker]) {
        let list = tickers
            .iter()
            .map(Ticker::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(self.out, "Tickers: {list}");
    }

    fn render_progress(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
    }

    fn render_report(&mut self, report: &str) {
        let _ = writeln!(self.out, "\n── Your Report ──\n{report}\n");
    }

    fn render_error(&mut self, message: &str) {
        let _ = writeln!(self.err, "{message}");
    }
}

/// One line of REPL input
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Generate,
    List,
    Help,
    Exit,
    Unknown(&'a str),
    Ticker(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.trim() {
            "/generate" => Command::Generate,
            "/list" => Command::List,
            "/help" => Command::Help,
            "/exit" | "/quit" => Command::Exit,
            other if other.starts_with('/') => Command::Unknown(other),
            other => Command::Ticker(other),
        }
    }
}
