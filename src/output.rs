//! User-facing terminal lines for the `drowsy` binary.
//!
//! Status lines carry a short tag (`ok:`, `warn:`, `error:`) that is
//! colored only when the stream they go to is a TTY. Primary results such as
//! listed names or found URLs go to stdout untagged so they can be piped.

use atty::Stream;
use owo_colors::OwoColorize;

#[derive(Clone, Copy)]
enum Tag {
    Ok,
    Warn,
    Error,
}

impl Tag {
    fn label(self) -> &'static str {
        match self {
            Tag::Ok => "ok:",
            Tag::Warn => "warn:",
            Tag::Error => "error:",
        }
    }

    fn stream(self) -> Stream {
        match self {
            Tag::Ok => Stream::Stdout,
            Tag::Warn | Tag::Error => Stream::Stderr,
        }
    }

    fn render(self, color: bool) -> String {
        let label = self.label();
        if !color {
            return label.to_string();
        }
        match self {
            Tag::Ok => label.green().bold().to_string(),
            Tag::Warn => label.yellow().bold().to_string(),
            Tag::Error => label.red().bold().to_string(),
        }
    }
}

fn emit(tag: Tag, msg: &str) {
    let to_stdout = matches!(tag.stream(), Stream::Stdout);
    let line = format!("{} {}", tag.render(atty::is(tag.stream())), msg);
    if to_stdout {
        println!("{line}");
    } else {
        eprintln!("{line}");
    }
}

pub fn print_warn(msg: &str) {
    emit(Tag::Warn, msg);
}

pub fn print_error(msg: &str) {
    emit(Tag::Error, msg);
}

pub fn print_success(msg: &str) {
    emit(Tag::Ok, msg);
}

/// Untagged stdout line for results callers may script against.
pub fn print_user(msg: &str) {
    println!("{msg}");
}
