use crate::domain::draft::{CardBrand, Field, Installments};
use crate::error::CommandError;
use std::io::BufRead;

/// One user action on the card form.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum FormCommand {
    Input(Field, String),
    Brand(CardBrand),
    Deferred(bool),
    Installments(Option<Installments>),
    Submit,
}

/// Reads form commands, one per line, from any buffered source.
///
/// Lines are `key=value` pairs or the bare word `submit`. Blank lines and
/// lines starting with `#` are skipped.
pub struct CommandReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Lazily parses commands; a bad line yields an error and reading goes on.
    pub fn commands(self) -> impl Iterator<Item = Result<FormCommand, CommandError>> {
        self.source
            .lines()
            .enumerate()
            .filter_map(|(index, line)| match line {
                Ok(line) => parse_line(index + 1, &line).transpose(),
                Err(e) => Some(Err(CommandError::from(e))),
            })
    }
}

fn invalid(line: usize, reason: impl Into<String>) -> CommandError {
    CommandError::Invalid {
        line,
        reason: reason.into(),
    }
}

fn parse_line(line: usize, raw: &str) -> Result<Option<FormCommand>, CommandError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    if trimmed.eq_ignore_ascii_case("submit") {
        return Ok(Some(FormCommand::Submit));
    }

    let (key, value) = trimmed
        .split_once('=')
        .ok_or_else(|| invalid(line, format!("expected key=value, got '{trimmed}'")))?;
    let value = value.trim();

    let command = match key.trim().to_ascii_lowercase().as_str() {
        "card" => FormCommand::Input(Field::CardNumber, value.to_string()),
        "expiry" => FormCommand::Input(Field::Expiry, value.to_string()),
        "cvv" => FormCommand::Input(Field::Cvv, value.to_string()),
        "amount" => FormCommand::Input(Field::Amount, value.to_string()),
        "brand" => FormCommand::Brand(value.parse().map_err(|e: String| invalid(line, e))?),
        "deferred" => FormCommand::Deferred(parse_flag(value).ok_or_else(|| {
            invalid(line, format!("deferred must be yes or no, got '{value}'"))
        })?),
        "installments" if value.is_empty() => FormCommand::Installments(None),
        "installments" => {
            FormCommand::Installments(Some(value.parse().map_err(|e: String| invalid(line, e))?))
        }
        other => return Err(invalid(line, format!("unknown field '{other}'"))),
    };
    Ok(Some(command))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "si" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(input: &str) -> Vec<Result<FormCommand, CommandError>> {
        CommandReader::new(input.as_bytes()).commands().collect()
    }

    #[test]
    fn test_reader_valid_stream() {
        let input = "# a visa payment\ncard=4111 1111 1111 1111\nexpiry=12/99\n\nbrand=visa\ndeferred=yes\ninstallments=6\nsubmit\n";
        let commands: Vec<FormCommand> = read(input).into_iter().map(|c| c.unwrap()).collect();

        assert_eq!(
            commands,
            vec![
                FormCommand::Input(Field::CardNumber, "4111 1111 1111 1111".to_string()),
                FormCommand::Input(Field::Expiry, "12/99".to_string()),
                FormCommand::Brand(CardBrand::Visa),
                FormCommand::Deferred(true),
                FormCommand::Installments(Some(Installments::Six)),
                FormCommand::Submit,
            ]
        );
    }

    #[test]
    fn test_empty_installments_clears_selection() {
        let commands = read("installments=\n");
        assert_eq!(
            commands[0].as_ref().unwrap(),
            &FormCommand::Installments(None)
        );
    }

    #[test]
    fn test_reader_malformed_lines_do_not_stop_reading() {
        let results = read("colour=blue\nbrand=discover\ncvv\namount=5\n");

        assert_eq!(results.len(), 4);
        assert!(matches!(
            results[0],
            Err(CommandError::Invalid { line: 1, .. })
        ));
        assert!(results[1].is_err());
        assert!(results[2].is_err());
        assert_eq!(
            results[3].as_ref().unwrap(),
            &FormCommand::Input(Field::Amount, "5".to_string())
        );
    }
}
