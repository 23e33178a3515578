use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::debug;
use crate::api::PresentationHandle;
use crate::host::Page;
use crate::input::{Control, InputEvent, Key, Visibility};

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    Arity { command: String, expected: &'static str },
    #[error("invalid number `{0}`")]
    Number(String),
    #[error("unknown control `{0}`, expected prev or next")]
    Control(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Previous,
    GoTo(usize),
    Reset,
    Info,
    Event(InputEvent),
    Swipe { from: (f32, f32), to: (f32, f32) },
    Quit,
}

fn number<T: std::str::FromStr>(word: &str) -> Result<T, ParseError> {
    word.parse().map_err(|_| ParseError::Number(word.to_string()))
}

fn args<'a>(command: &str, rest: &'a [&'a str], count: usize, expected: &'static str) -> Result<&'a [&'a str], ParseError> {
    if rest.len() == count {
        Ok(rest)
    } else {
        Err(ParseError::Arity { command: command.to_string(), expected })
    }
}

// Out-of-range targets are valid input (navigation ignores them), so any
// integer saturates into usize instead of failing to parse
fn goto_target(word: &str) -> Result<usize, ParseError> {
    let digits = word.strip_prefix(['-', '+']).unwrap_or(word);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::Number(word.to_string()));
    }
    if word.starts_with('-') {
        return Ok(0);
    }
    Ok(digits.parse().unwrap_or(usize::MAX))
}

/// Parses one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    let (head, rest) = (words[0], &words[1..]);

    let command = match head {
        "next" => Command::Next,
        "prev" | "previous" => Command::Previous,
        "reset" => Command::Reset,
        "info" => Command::Info,
        "quit" | "exit" => Command::Quit,
        "refresh" | "resize" => Command::Event(InputEvent::Resize),
        "show" => Command::Event(InputEvent::VisibilityChange(Visibility::Visible)),
        "hide" => Command::Event(InputEvent::VisibilityChange(Visibility::Hidden)),
        "goto" => {
            let a = args(head, rest, 1, "a slide number")?;
            Command::GoTo(goto_target(a[0])?)
        }
        "click" => {
            let a = args(head, rest, 1, "prev or next")?;
            let control = match a[0] {
                "prev" | "previous" => Control::Previous,
                "next" => Control::Next,
                other => return Err(ParseError::Control(other.to_string())),
            };
            Command::Event(InputEvent::Click(control))
        }
        "key" => {
            // `key " "` is awkward to type; a bare `key` means the space bar
            let name = if rest.is_empty() { " " } else { args(head, rest, 1, "a key name")?[0] };
            Command::Event(InputEvent::Key(Key::from_name(name)))
        }
        "touchstart" | "touchend" => {
            let a = args(head, rest, 2, "X Y")?;
            let (x, y) = (number(a[0])?, number(a[1])?);
            if head == "touchstart" {
                Command::Event(InputEvent::TouchStart { x, y })
            } else {
                Command::Event(InputEvent::TouchEnd { x, y })
            }
        }
        "swipe" => {
            let a = args(head, rest, 4, "X1 Y1 X2 Y2")?;
            Command::Swipe {
                from: (number(a[0])?, number(a[1])?),
                to: (number(a[2])?, number(a[3])?),
            }
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

/// One-line rendering of the page, e.g. `[3/10] ← Previous | Next → | 30% | ...`.
pub fn status_line(page: &Page) -> String {
    let control = |c: &Option<crate::host::NavControl>| match c {
        Some(c) if c.disabled => format!("({})", c.label),
        Some(c) => c.label.clone(),
        None => "-".to_string(),
    };
    let progress = page
        .progress
        .map(|p| format!("{:.0}%", p.width_percent))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{}/{}] {} | {} | {} | {}",
        page.current_slide.as_deref().unwrap_or("-"),
        page.total_slides.as_deref().unwrap_or("-"),
        control(&page.prev_button),
        control(&page.next_button),
        progress,
        page.announcement_text().unwrap_or(""),
    )
}

pub fn run<R: BufRead, W: Write>(handle: &PresentationHandle<Page>, input: R, mut out: W) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };
        debug!(?command, "headless command");

        match command {
            Command::Quit => break,
            Command::Info => {
                if let Some(info) = handle.current_info() {
                    writeln!(
                        out,
                        "{{\"current\": {}, \"total\": {}, \"isFirst\": {}, \"isLast\": {}}}",
                        info.position, info.total, info.is_first, info.is_last
                    )?;
                }
                continue;
            }
            Command::Next => {
                handle.next_slide();
            }
            Command::Previous => {
                handle.previous_slide();
            }
            Command::GoTo(n) => {
                handle.go_to_slide(n);
            }
            Command::Reset => {
                handle.reset();
            }
            Command::Event(event) => {
                let dispatch = handle.handle(event);
                debug!(?event, prevents_default = dispatch.prevents_default(), "event dispatched");
            }
            Command::Swipe { from, to } => {
                handle.handle(InputEvent::TouchStart { x: from.0, y: from.1 });
                handle.handle(InputEvent::TouchEnd { x: to.0, y: to.1 });
            }
        }

        if let Some(status) = handle.inspect(|c| status_line(c.host())) {
            writeln!(out, "{}", status)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{HostPolicy, SlideController};
    use crate::deck::Deck;

    fn session(script: &str) -> String {
        let deck = Deck::synthetic(10).unwrap();
        let controller = SlideController::attach(10, Page::for_deck(&deck), HostPolicy::Lenient).unwrap();
        let handle = PresentationHandle::new(controller);
        let mut out = Vec::new();
        run(&handle, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("next").unwrap(), Some(Command::Next));
        assert_eq!(parse_line("  goto 4 ").unwrap(), Some(Command::GoTo(4)));
        assert_eq!(parse_line("goto -3").unwrap(), Some(Command::GoTo(0)));
        assert_eq!(parse_line("goto +7").unwrap(), Some(Command::GoTo(7)));
        assert_eq!(
            parse_line("key PageDown").unwrap(),
            Some(Command::Event(InputEvent::Key(Key::PageDown)))
        );
        assert_eq!(parse_line("key").unwrap(), Some(Command::Event(InputEvent::Key(Key::Space))));
        assert_eq!(
            parse_line("click prev").unwrap(),
            Some(Command::Event(InputEvent::Click(Control::Previous)))
        );
        assert_eq!(
            parse_line("swipe 100 50 20 55").unwrap(),
            Some(Command::Swipe { from: (100.0, 50.0), to: (20.0, 55.0) })
        );
        assert_eq!(parse_line("# comment").unwrap(), None);
        assert_eq!(parse_line("").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_line("jump"), Err(ParseError::UnknownCommand("jump".to_string())));
        assert!(matches!(parse_line("goto"), Err(ParseError::Arity { .. })));
        assert!(matches!(parse_line("touchstart 1"), Err(ParseError::Arity { .. })));
        assert_eq!(parse_line("touchend a 1"), Err(ParseError::Number("a".to_string())));
        assert_eq!(parse_line("click up"), Err(ParseError::Control("up".to_string())));
    }

    #[test]
    fn test_goto_huge_target_saturates() {
        let huge = "99999999999999999999999999999999999999999";
        assert_eq!(parse_line(&format!("goto {}", huge)).unwrap(), Some(Command::GoTo(usize::MAX)));
        assert_eq!(parse_line(&format!("goto -{}", huge)).unwrap(), Some(Command::GoTo(0)));
        assert_eq!(parse_line("goto 4x"), Err(ParseError::Number("4x".to_string())));
        assert_eq!(parse_line("goto -"), Err(ParseError::Number("-".to_string())));

        let out = session(&format!("goto 3\ngoto {}\n", huge));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("[3/10]"));
    }

    #[test]
    fn test_status_lines() {
        let out = session("next\ngoto 10\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[2/10] ← Previous | Next → | 20% | Slide 2. Slide 2 of 10");
        assert_eq!(lines[1], "[10/10] ← Previous | (End) | 100% | Slide 10. Slide 10 of 10");
    }

    #[test]
    fn test_info_and_errors_continue() {
        let out = session("bogus\ninfo\nswipe 100 50 20 55\ninfo\nquit\nnext\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "error: unknown command `bogus`");
        assert_eq!(lines[1], "{\"current\": 1, \"total\": 10, \"isFirst\": true, \"isLast\": false}");
        assert!(lines[2].starts_with("[2/10]"));
        assert_eq!(lines[3], "{\"current\": 2, \"total\": 10, \"isFirst\": false, \"isLast\": false}");
    }
}
