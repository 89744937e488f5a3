// Terminal front end: status rendering and typed commands

mod input;
mod terminal;

pub use input::{parse_command, InputError, UserIntent, HELP};
pub use terminal::{format_countdown, render_line, volume_bar, TerminalPresenter};
