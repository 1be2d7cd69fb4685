use crate::core::Confirmer;
use crate::utils::error::{CleanupError, Result};
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::Mutex;

/// Line-based yes/no prompt. An empty answer means no; anything unrecognised re-asks.
pub struct PromptConfirmer<R: BufRead, W: Write> {
    io: Mutex<(R, W)>,
}

pub type StdinConfirmer = PromptConfirmer<BufReader<Stdin>, Stdout>;

impl StdinConfirmer {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptConfirmer<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    pub fn into_inner(self) -> Result<(R, W)> {
        self.io.into_inner().map_err(|_| CleanupError::PromptError {
            message: "prompt state poisoned".to_string(),
        })
    }
}

impl<R: BufRead, W: Write> Confirmer for PromptConfirmer<R, W> {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let mut guard = self.io.lock().map_err(|_| CleanupError::PromptError {
            message: "prompt state poisoned".to_string(),
        })?;
        let (reader, writer) = &mut *guard;

        loop {
            write!(writer, "{} [y/N]: ", prompt)?;
            writer.flush()?;

            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                return Err(CleanupError::PromptError {
                    message: "input closed before an answer was given".to_string(),
                });
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                other => writeln!(writer, "Error: invalid input '{}'", other)?,
            }
        }
    }
}
