use std::path::PathBuf;

/// A `:`-command typed into the input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Upload(PathBuf),
    /// `:upload` without a path
    UploadUsage,
    Document,
    NewSession,
    TogglePanel,
    Unknown(String),
}

/// Commands shown as hints while typing, with descriptions
pub const COMMAND_HINTS: &[(&str, &str)] = &[
    (":upload <path>", "Upload a txt, pdf, csv or md document"),
    (":doc", "Show the current document hash code"),
    (":new", "Discard this session and start over"),
    (":panel", "Toggle the document panel"),
    (":help", "Show command help"),
    (":quit", "Quit the application"),
];

/// Parse the text after the leading `:`
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let (name, rest) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (input, ""),
    };

    match name.to_lowercase().as_str() {
        "quit" | "q" | "exit" => Command::Quit,
        "help" | "h" => Command::Help,
        "upload" | "u" => {
            let path = strip_quotes(rest);
            if path.is_empty() {
                Command::UploadUsage
            } else {
                Command::Upload(PathBuf::from(path))
            }
        }
        "doc" | "document" => Command::Document,
        "new" => Command::NewSession,
        "panel" | "p" => Command::TogglePanel,
        _ => Command::Unknown(input.to_string()),
    }
}

/// Terminals often quote dragged-in paths
fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}

/// Help text listing every command and key
pub fn help_text() -> String {
    let mut text = String::from("Commands:\n");
    for (command, description) in COMMAND_HINTS {
        text.push_str(&format!("  {:<16} {}\n", command, description));
    }
    text.push_str(
        "\nKeys:\n  Enter - Send message / run command\n  Esc - Clear input, close help\n  \
         Up/Down, PageUp/PageDown - Scroll\n  Ctrl+C - Quit",
    );
    text
}
