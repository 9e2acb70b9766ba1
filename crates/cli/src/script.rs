//! Line-oriented input script: each line is a user action or a pause.
//!
//! ```text
//! click open            # open trigger, also: close, backdrop, modal, page
//! key s                 # key released with focus on the page
//! key s input           # ... with focus in a text input (also: textarea)
//! key esc
//! search rust async     # submit the query form
//! wait 1000             # pause, in milliseconds
//! quit
//! ```

use std::time::Duration;

use searchlight_core::event::EventSender;
use searchlight_core::types::{Focus, Key, Target, UserInput};
use searchlight_core::OverlayEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(UserInput),
    Wait(Duration),
    Quit,
}

fn parse_target(word: &str) -> Result<Target, String> {
    match word {
        "open" => Ok(Target::OpenTrigger),
        "close" => Ok(Target::CloseTrigger),
        "backdrop" => Ok(Target::Backdrop),
        "modal" => Ok(Target::ModalContent),
        "page" => Ok(Target::Page),
        other => Err(format!("unknown click target '{other}' (open, close, backdrop, modal, page)")),
    }
}

fn parse_key(word: &str) -> Key {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Key::Char(c),
        _ if word.eq_ignore_ascii_case("esc") || word.eq_ignore_ascii_case("escape") => Key::Escape,
        _ => Key::Other,
    }
}

fn parse_focus(word: Option<&str>) -> Result<Focus, String> {
    match word {
        None | Some("page") => Ok(Focus::Other),
        Some("input") => Ok(Focus::TextInput),
        Some("textarea") => Ok(Focus::TextArea),
        Some(other) => Err(format!("unknown focus '{other}' (input, textarea, page)")),
    }
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim_start();
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    let command = match verb {
        "click" => {
            let target = args.next().ok_or("click needs a target")?;
            Command::Input(UserInput::Click(parse_target(target)?))
        }
        "key" => {
            let key = parse_key(args.next().ok_or("key needs a key name")?);
            let focus = parse_focus(args.next())?;
            Command::Input(UserInput::KeyUp { key, focus })
        }
        // The query is sent verbatim, including surrounding whitespace.
        "search" => Command::Input(UserInput::Submit(rest.trim_end_matches(['\r', '\n']).to_string())),
        "wait" => {
            let ms = args.next().ok_or("wait needs a duration in ms")?;
            let ms: u64 = ms.parse().map_err(|_| format!("invalid duration '{ms}'"))?;
            Command::Wait(Duration::from_millis(ms))
        }
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok(Some(command))
}

/// Feed commands from `reader` into the overlay until `quit` or end of input,
/// then let the overlay finish outstanding work and stop.
pub async fn feed<R: AsyncBufRead + Unpin>(reader: R, events: EventSender) {
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Could not read input");
                break;
            }
        };
        line_no += 1;
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Command::Input(input))) => {
                debug!(line = line_no, ?input, "Input");
                if events.send(OverlayEvent::Input(input)).is_err() {
                    return;
                }
            }
            Ok(Some(Command::Wait(duration))) => tokio::time::sleep(duration).await,
            Ok(Some(Command::Quit)) => break,
            Err(e) => warn!(line = line_no, "{e}"),
        }
    }
    let _ = events.send(OverlayEvent::Drain);
}
