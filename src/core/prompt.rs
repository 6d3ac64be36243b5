use crate::utils::error::{HydroError, Result};
use crate::utils::validation::{parse_positive_integer, parse_positive_real, NOT_A_NUMBER, NOT_POSITIVE};
use std::io::{BufRead, Write};

/// Line-oriented console reader. Every `ask_*` returns `Ok(None)` once input is exhausted.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Asks until a non-blank line arrives.
    pub fn ask_text(&mut self, prompt: &str, rejection: &str) -> Result<Option<String>> {
        loop {
            self.prompt(prompt)?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
            self.say(rejection)?;
        }
    }

    /// Asks until `parse` accepts the line. Non-numeric input and non-positive input
    /// get different messages; any other rejection prints its own reason.
    pub fn ask_parsed<T>(
        &mut self,
        prompt: &str,
        rejection: &str,
        parse: impl Fn(&str) -> Result<T>,
    ) -> Result<Option<T>> {
        loop {
            self.prompt(prompt)?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(HydroError::InvalidArgument { reason, .. }) => {
                    let message = if reason == NOT_A_NUMBER {
                        NOT_A_NUMBER
                    } else if reason == NOT_POSITIVE {
                        rejection
                    } else {
                        reason.as_str()
                    };
                    self.say(message)?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub fn ask_positive_integer(
        &mut self,
        prompt: &str,
        field: &str,
        rejection: &str,
    ) -> Result<Option<i64>> {
        self.ask_parsed(prompt, rejection, |line| parse_positive_integer(field, line))
    }

    pub fn ask_positive_real(
        &mut self,
        prompt: &str,
        field: &str,
        rejection: &str,
    ) -> Result<Option<f64>> {
        self.ask_parsed(prompt, rejection, |line| parse_positive_real(field, line))
    }

    /// `y`/`Y` (or `s`/`S`) means yes, anything else no. Blank lines are skipped.
    pub fn ask_yes_no(&mut self, prompt: &str) -> Result<Option<bool>> {
        self.prompt(prompt)?;
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if let Some(answer) = line.trim().chars().next() {
                return Ok(Some(matches!(answer, 'y' | 'Y' | 's' | 'S')));
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_inner().1).unwrap()
    }

    #[test]
    fn test_ask_positive_integer_reprompts() {
        let mut p = prompter("abc\n-4\n0\n12\n");
        let value = p
            .ask_positive_integer("Days? ", "days", "The number of days must be positive.")
            .unwrap();
        assert_eq!(value, Some(12));

        let text = output(p);
        assert_eq!(text.matches("Days? ").count(), 4);
        assert_eq!(text.matches(NOT_A_NUMBER).count(), 1);
        assert_eq!(
            text.matches("The number of days must be positive.").count(),
            2
        );
    }

    #[test]
    fn test_ask_positive_real_until_eof() {
        let mut p = prompter("-1\n");
        let value = p
            .ask_positive_real("Liters? ", "reading", "Must be positive.")
            .unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_custom_rejection_reason_is_printed() {
        let mut p = prompter("5\n2\n");
        let value = p
            .ask_parsed("Units? ", "unused", |line| {
                let v = parse_positive_integer("units", line)?;
                if v > 3 {
                    return Err(HydroError::invalid_argument("units", v, "Too many units"));
                }
                Ok(v)
            })
            .unwrap();
        assert_eq!(value, Some(2));
        assert!(output(p).contains("Too many units"));
    }

    #[test]
    fn test_ask_text_skips_blank_lines() {
        let mut p = prompter("   \n\n  Vila Nova \n");
        let name = p.ask_text("Name: ", "Name cannot be empty.").unwrap();
        assert_eq!(name.as_deref(), Some("Vila Nova"));
        assert_eq!(output(p).matches("Name cannot be empty.").count(), 2);
    }

    #[test]
    fn test_ask_yes_no() {
        let mut p = prompter("y\nS\nn\nx\n\n");
        assert_eq!(p.ask_yes_no("?").unwrap(), Some(true));
        assert_eq!(p.ask_yes_no("?").unwrap(), Some(true));
        assert_eq!(p.ask_yes_no("?").unwrap(), Some(false));
        assert_eq!(p.ask_yes_no("?").unwrap(), Some(false));
        assert_eq!(p.ask_yes_no("?").unwrap(), None);
    }

    #[test]
    fn test_ask_yes_no_waits_past_blank_lines() {
        let mut p = prompter("\n   \n\nY\n");
        assert_eq!(p.ask_yes_no("Again? ").unwrap(), Some(true));
        assert_eq!(output(p).matches("Again? ").count(), 1);
    }
}
