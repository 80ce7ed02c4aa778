//! Operator interaction.
//!
//! Prompts and messages go to stderr so stdout only carries the final spec.

use crate::config::SEPARATOR_LINES;
use crate::output::{styled, Style};
use colored::Colorize;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::Path;

pub trait Prompter {
    /// Ask for one line of input, without the line ending.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Ask for input that must not be echoed.
    fn read_secret(&mut self, prompt: &str) -> io::Result<String>;

    fn show(&mut self, style: Style, msg: &str);

    fn separator(&mut self) {
        for _ in 0..SEPARATOR_LINES {
            self.show(Style::Plain, "");
        }
    }
}

/// Interactive prompter on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter
    }

    fn read_stdin_line() -> io::Result<String> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Collect key presses in raw mode until Enter.
    fn read_masked() -> io::Result<String> {
        let mut secret = String::new();
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => return Ok(secret),
                    KeyCode::Backspace => {
                        secret.pop();
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
                    }
                    KeyCode::Char(c) => secret.push(c),
                    _ => {}
                }
            }
        }
    }
}

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, " {} ", prompt.bold())?;
        stderr.flush()?;
        Self::read_stdin_line()
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, " {} ", prompt.bold())?;
        stderr.flush()?;

        if enable_raw_mode().is_err() {
            // not a terminal, read the piped line as is
            log::debug!("raw mode unavailable, reading secret from stdin");
            return Self::read_stdin_line();
        }
        let secret = Self::read_masked();
        disable_raw_mode()?;
        writeln!(stderr)?;
        secret
    }

    fn show(&mut self, style: Style, msg: &str) {
        eprintln!("{}", styled(style, msg));
    }
}

/// Answers prompts from a prepared list, one answer per prompt.
///
/// Secrets are taken from the same list. Once the answers run out every
/// prompt fails with [`io::ErrorKind::UnexpectedEof`], which ends the run.
#[derive(Debug, Default)]
pub struct ReplayPrompter {
    answers: VecDeque<String>,
    transcript: Vec<(Style, String)>,
    echo: bool,
}

impl ReplayPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReplayPrompter {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: vec![],
            echo: false,
        }
    }

    /// Answers from a file, echoing the dialogue to stderr.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        log::info!("Replaying answers from {}", path.display());
        let mut replay = ReplayPrompter::new(content.lines());
        replay.echo = true;
        Ok(replay)
    }

    /// Messages shown so far.
    pub fn transcript(&self) -> &[(Style, String)] {
        &self.transcript
    }

    /// True if some message of `style` contains `needle`.
    pub fn saw(&self, style: Style, needle: &str) -> bool {
        self.transcript
            .iter()
            .any(|(s, msg)| *s == style && msg.contains(needle))
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next_answer(&mut self, prompt: &str) -> io::Result<String> {
        self.answers.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no answer left for prompt '{}'", prompt.trim()),
            )
        })
    }
}

impl Prompter for ReplayPrompter {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let answer = self.next_answer(prompt)?;
        if self.echo {
            eprintln!(" {} {}", prompt.bold(), answer);
        }
        Ok(answer)
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        let answer = self.next_answer(prompt)?;
        if self.echo {
            eprintln!(" {} ********", prompt.bold());
        }
        Ok(answer)
    }

    fn show(&mut self, style: Style, msg: &str) {
        if self.echo {
            eprintln!("{}", styled(style, msg));
        }
        self.transcript.push((style, msg.to_string()));
    }
}
