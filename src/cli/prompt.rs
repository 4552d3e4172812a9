use super::table::render_services;
use crate::domain::Service;
use std::io::{self, BufRead, Write};

/// Result of the interactive "add service" dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Submit(Service),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
    Cancel,
}

/// Collects a candidate service from the console. Validation happens later,
/// when the candidate is handed to the config store.
pub struct ServicePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ServicePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks for the fields until the user confirms or cancels. End of input
    /// counts as cancel.
    pub fn run(&mut self) -> io::Result<PromptOutcome> {
        loop {
            let Some(short_name) = self.ask("Enter short name for service:")? else {
                return Ok(PromptOutcome::Cancel);
            };
            let Some(compose_name) = self.ask("Enter compose name for service:")? else {
                return Ok(PromptOutcome::Cancel);
            };
            let Some(dependencies) = self.ask(
                "Enter list of services your new service depends on \
                 (in following format: 'serv1,serv2,serv3') [Optional]:",
            )?
            else {
                return Ok(PromptOutcome::Cancel);
            };

            let candidate = Service::new(
                short_name,
                compose_name,
                parse_dependency_list(&dependencies),
            );

            writeln!(self.output, "Your service here:")?;
            writeln!(
                self.output,
                "{}",
                render_services(std::slice::from_ref(&candidate))
            )?;

            match self.confirm()? {
                Some(Answer::Yes) => return Ok(PromptOutcome::Submit(candidate)),
                Some(Answer::No) => continue,
                Some(Answer::Cancel) | None => return Ok(PromptOutcome::Cancel),
            }
        }
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;
        self.read_line()
    }

    fn confirm(&mut self) -> io::Result<Option<Answer>> {
        loop {
            write!(
                self.output,
                "Are you sure you want to add this service? [y(Yes)/n(No)/c(Cancel)] "
            )?;
            self.output.flush()?;

            let Some(answer) = self.read_line()? else {
                return Ok(None);
            };
            match answer.as_str() {
                "y" => return Ok(Some(Answer::Yes)),
                "n" => return Ok(Some(Answer::No)),
                "c" => return Ok(Some(Answer::Cancel)),
                _ => {}
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Splits `a, b,,c` into `["a", "b", "c"]`.
pub fn parse_dependency_list(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|dep| !dep.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_prompt(input: &str) -> (PromptOutcome, String) {
        let mut output = Vec::new();
        let outcome = ServicePrompt::new(Cursor::new(input.as_bytes()), &mut output)
            .run()
            .unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn parses_dependency_list() {
        assert_eq!(parse_dependency_list(" db , cache,,"), vec!["db", "cache"]);
        assert!(parse_dependency_list("").is_empty());
        assert!(parse_dependency_list(" , ").is_empty());
    }

    #[test]
    fn submits_confirmed_service() {
        let (outcome, output) = run_prompt("web\nweb\ndb, cache\ny\n");

        assert_eq!(
            outcome,
            PromptOutcome::Submit(Service::new(
                "web",
                "web",
                vec!["db".into(), "cache".into()]
            ))
        );
        assert!(output.contains("Your service here:"));
        assert!(output.contains("| web"));
    }

    #[test]
    fn no_restarts_questions() {
        let (outcome, _) = run_prompt("wrong\nwrong\n\nn\napi\nbackend\n\ny\n");
        assert_eq!(
            outcome,
            PromptOutcome::Submit(Service::new("api", "backend", vec![]))
        );
    }

    #[test]
    fn repeats_confirmation_until_valid_answer() {
        let (outcome, output) = run_prompt("web\nweb\n\nmaybe\nyes\ny\n");
        assert!(matches!(outcome, PromptOutcome::Submit(_)));
        assert_eq!(output.matches("Are you sure").count(), 3);
    }

    #[test]
    fn cancel_aborts() {
        let (outcome, _) = run_prompt("web\nweb\n\nc\n");
        assert_eq!(outcome, PromptOutcome::Cancel);
    }

    #[test]
    fn end_of_input_cancels() {
        assert_eq!(run_prompt("web\n").0, PromptOutcome::Cancel);
        assert_eq!(run_prompt("web\nweb\n\n").0, PromptOutcome::Cancel);
    }
}
