use std::fmt::Display;
use std::io::{self, BufRead, Write};

use adventure_core::input::parse_confirmation;
use anyhow::{anyhow, Result};

const RULE_WIDTH: usize = 60;

/// Line-oriented prompt/response over any reader and writer.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    pub fn rule(&mut self, ch: char) -> io::Result<()> {
        let line: String = std::iter::repeat(ch).take(RULE_WIDTH).collect();
        writeln!(self.output, "{line}")
    }

    pub fn banner(&mut self, title: &str) -> io::Result<()> {
        self.blank()?;
        self.rule('=')?;
        self.say(title)?;
        self.rule('=')
    }

    /// Returns `None` once input is closed.
    pub fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    /// Like [`Console::prompt`], but closed input is an error.
    pub fn ask(&mut self, question: &str) -> Result<String> {
        self.prompt(question)?
            .ok_or_else(|| anyhow!("input closed while waiting for: {}", question.trim()))
    }

    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(question)?;
        Ok(parse_confirmation(&answer))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
pub(crate) fn scripted(input: &str) -> Console<io::Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(io::Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

#[cfg(test)]
pub(crate) fn transcript(console: Console<io::Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(console.into_output()).unwrap()
}
