//! Terminal prompting.

use std::io::{self, BufRead, Write};

use fb_api::Prompter;

/// Reads answers line by line from `input`, writing prompts to `output`.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr so stdout stays machine-readable.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks `question` and returns the trimmed answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose(&mut self, listing: &str) -> io::Result<usize> {
        writeln!(self.output, "{listing}")?;
        loop {
            let answer = self.ask("Choice")?;
            match answer.parse::<usize>() {
                Ok(choice) => return Ok(choice),
                Err(_) => writeln!(self.output, "Error: '{answer}' is not a valid integer.")?,
            }
        }
    }
}
