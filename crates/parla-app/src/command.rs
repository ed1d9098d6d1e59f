use parla_types::{AppEvent, TextSource};

/// Map one console line to an app event.
///
/// Lines starting with `:` are commands, anything else is text to translate.
pub fn parse_line(line: &str) -> Result<AppEvent, String> {
    let line = line.trim();

    let Some(command) = line.strip_prefix(':') else {
        return Ok(AppEvent::RawTextInput {
            text: line.to_string(),
            source: TextSource::Console,
        });
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (name, arg) {
        ("swap", None) => Ok(AppEvent::SwapLanguages),
        ("from", Some(code)) => Ok(AppEvent::SetSourceLanguage(code.to_string())),
        ("to", Some(code)) => Ok(AppEvent::SetTargetLanguage(code.to_string())),
        ("online", None) => Ok(AppEvent::Reachability(true)),
        ("offline", None) => Ok(AppEvent::Reachability(false)),
        ("copy", None) => Ok(AppEvent::CopyLast),
        ("speak", None) => Ok(AppEvent::SpeakLast),
        ("listen", None) => Ok(AppEvent::StartListening),
        ("stop", None) => Ok(AppEvent::StopSpeech),
        ("clear", None) => Ok(AppEvent::ClearInput),
        ("langs", None) => Ok(AppEvent::ListLanguages),
        ("stats", None) => Ok(AppEvent::ShowStats),
        ("quit" | "q", None) => Ok(AppEvent::Quit),
        ("from" | "to", None) => Err(format!(":{name} needs a language code")),
        _ => Err(format!("Unknown command :{command}")),
    }
}

pub const HELP: &str = "\
Type a phrase to translate it. Commands:
  :from <code>  :to <code>  :swap  :langs
  :online  :offline  :copy  :speak  :listen  :stop
  :clear  :stats  :quit";
