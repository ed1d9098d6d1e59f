use std::io::Write;

use kanal::AsyncReceiver;
use parla_core::language;
use parla_types::{AppEvent, TranslationMethod};
use tokio_util::sync::CancellationToken;

/// Render app output on stdout
pub async fn console_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let interactive = atty::is(atty::Stream::Stdout);
    let mut newest_ticket = 0;

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => event?,
        };
        print_event(&event, &mut newest_ticket, interactive)?;
    }

    // Results published just before shutdown are still shown
    while let Ok(Some(event)) = app_to_ui_rx.try_recv() {
        print_event(&event, &mut newest_ticket, false)?;
    }

    Ok(())
}

fn print_event(event: &AppEvent, newest_ticket: &mut u64, prompt: bool) -> std::io::Result<()> {
    let Some(line) = render(event, newest_ticket) else {
        return Ok(());
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    if prompt {
        write!(stdout, "> ")?;
    }
    stdout.flush()
}

/// Text for one event; results older than the newest shown ticket are dropped
pub fn render(event: &AppEvent, newest_ticket: &mut u64) -> Option<String> {
    match event {
        AppEvent::ShowTranslation {
            ticket,
            result,
            from_lang,
            to_lang,
        } => {
            if *ticket < *newest_ticket {
                return None;
            }
            *newest_ticket = *ticket;

            let badge = match result.method {
                TranslationMethod::Offline => "offline",
                TranslationMethod::Online => "online",
            };
            Some(format!(
                "{} → {} [{}] {}",
                flag(from_lang),
                flag(to_lang),
                badge,
                result.translated_text
            ))
        }
        AppEvent::ShowFailure {
            ticket,
            kind,
            detail,
        } => {
            if *ticket < *newest_ticket {
                return None;
            }
            *newest_ticket = *ticket;

            tracing::debug!("Failure detail: {}", detail);
            kind.user_message().map(|message| format!("! {message}"))
        }
        AppEvent::Status(message) => Some(message.clone()),
        _ => None,
    }
}

fn flag(code: &str) -> &str {
    language::find(code).map(|entry| entry.flag).unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use parla_types::{FailureKind, TranslationResult};

    use super::*;

    fn translation(ticket: u64, text: &str) -> AppEvent {
        AppEvent::ShowTranslation {
            ticket,
            result: TranslationResult {
                translated_text: text.to_string(),
                method: TranslationMethod::Offline,
            },
            from_lang: "pt-BR".to_string(),
            to_lang: "en-US".to_string(),
        }
    }

    #[test]
    fn shows_method_badge() {
        let mut newest = 0;
        let line = render(&translation(1, "good morning"), &mut newest).unwrap();
        assert!(line.contains("[offline]"));
        assert!(line.ends_with("good morning"));
    }

    #[test]
    fn older_results_never_overwrite_newer() {
        let mut newest = 0;
        assert!(render(&translation(2, "newer"), &mut newest).is_some());
        assert!(render(&translation(1, "older"), &mut newest).is_none());
        assert_eq!(newest, 2);
    }

    #[test]
    fn empty_input_is_silent() {
        let mut newest = 0;
        let event = AppEvent::ShowFailure {
            ticket: 1,
            kind: FailureKind::EmptyInput,
            detail: String::new(),
        };
        assert!(render(&event, &mut newest).is_none());

        let event = AppEvent::ShowFailure {
            ticket: 2,
            kind: FailureKind::OfflineAndUnreachable,
            detail: String::new(),
        };
        assert!(render(&event, &mut newest).unwrap().starts_with("! You are offline"));
    }
}
