// Keyboard commands typed at the monitor prompt

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserIntent {
    /// Start when idle, stop when monitoring
    Toggle,
    Start,
    Stop,
    /// Lengthen the dwell by one step
    DwellUp,
    /// Shorten the dwell by one step
    DwellDown,
    SetDwell(f64),
    SetThreshold(f32),
    /// Print the current state
    Status,
    Help,
    Quit,
}

/// Errors from parsing a command line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("Unknown command '{0}' (type 'h' for help)")]
    UnknownCommand(String),
    #[error("'{command}' needs a number, got '{value}'")]
    InvalidNumber { command: String, value: String },
    #[error("'{0}' needs a value")]
    MissingValue(String),
}

pub const HELP: &str = "\
Commands:
  <enter>, t      toggle monitoring
  s / x           start / stop
  + / -           dwell +0.1s / -0.1s
  d <seconds>     set dwell
  th <0-1>        set threshold
  ?               show status
  h               this help
  q               quit";

/// Parse one line of user input
///
/// An empty line toggles monitoring, like pressing the start/stop button.
pub fn parse_command(line: &str) -> Result<UserIntent, InputError> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(UserIntent::Toggle);
    };
    let argument = parts.next();

    match command.to_lowercase().as_str() {
        "t" | "toggle" => Ok(UserIntent::Toggle),
        "s" | "start" => Ok(UserIntent::Start),
        "x" | "stop" => Ok(UserIntent::Stop),
        "+" | "up" => Ok(UserIntent::DwellUp),
        "-" | "down" => Ok(UserIntent::DwellDown),
        "d" | "dwell" => parse_number(command, argument).map(UserIntent::SetDwell),
        "th" | "threshold" => {
            parse_number(command, argument).map(|value| UserIntent::SetThreshold(value as f32))
        }
        "?" | "status" => Ok(UserIntent::Status),
        "h" | "help" => Ok(UserIntent::Help),
        "q" | "quit" | "exit" => Ok(UserIntent::Quit),
        other => Err(InputError::UnknownCommand(other.to_string())),
    }
}

fn parse_number(command: &str, argument: Option<&str>) -> Result<f64, InputError> {
    let value = argument.ok_or_else(|| InputError::MissingValue(command.to_string()))?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::InvalidNumber {
            command: command.to_string(),
            value: value.to_string(),
        })
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
