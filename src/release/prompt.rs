//! Operator confirmation

use std::io::{self, BufRead, Write};

/// Asks the operator a yes/no question
pub trait Prompter {
  /// Show context the operator needs before answering
  fn show(&mut self, text: &str) -> io::Result<()>;

  /// `Err` (end of input included) is treated as a decline by callers
  fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Line-based prompt over any reader/writer pair
pub struct LinePrompter<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }
}

/// Prompt on the terminal; questions go to stderr so stdout carries only the report
pub type TerminalPrompter = LinePrompter<io::StdinLock<'static>, io::Stderr>;

impl TerminalPrompter {
  pub fn terminal() -> Self {
    LinePrompter::new(io::stdin().lock(), io::stderr())
  }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
  fn show(&mut self, text: &str) -> io::Result<()> {
    writeln!(self.output, "\n{}", text.trim_end())
  }

  fn confirm(&mut self, question: &str) -> io::Result<bool> {
    loop {
      write!(self.output, "{} [y/n]: ", question)?;
      self.output.flush()?;

      let mut line = String::new();
      if self.input.read_line(&mut line)? == 0 {
        writeln!(self.output)?;
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no answer on stdin"));
      }

      match parse_answer(&line) {
        Some(answer) => return Ok(answer),
        None => writeln!(self.output, "Please enter y or n")?,
      }
    }
  }
}

fn parse_answer(line: &str) -> Option<bool> {
  match line.trim().to_ascii_lowercase().as_str() {
    "y" | "yes" => Some(true),
    "n" | "no" => Some(false),
    _ => None,
  }
}
