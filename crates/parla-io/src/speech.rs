use std::process::Stdio;
use std::sync::Mutex;

use async_trait::async_trait;
use kanal::AsyncSender;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::capability::{CapabilityError, SpeechCapture, SpeechEvent, SpeechPlayback};

/// External program invocation; `{lang}` in any argument becomes the language tag
#[derive(Clone)]
struct ExternalCommand {
    program: String,
    args: Vec<String>,
    current: std::sync::Arc<Mutex<CancellationToken>>,
    events: Option<AsyncSender<SpeechEvent>>,
}

impl ExternalCommand {
    fn new(command: Vec<String>) -> Result<Self, CapabilityError> {
        let mut parts = command.into_iter();
        let program = parts
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| CapabilityError::Unavailable("empty command".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
            current: std::sync::Arc::new(Mutex::new(CancellationToken::new())),
            events: None,
        })
    }

    fn fresh_token(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // A new utterance supersedes the previous one
        std::mem::replace(&mut *current, token.clone()).cancel();
        token
    }

    fn cancel(&self) {
        match self.current.lock() {
            Ok(guard) => guard.cancel(),
            Err(poisoned) => poisoned.into_inner().cancel(),
        }
    }

    async fn notify(&self, event: SpeechEvent) {
        if let Some(tx) = &self.events
            && tx.send(event).await.is_err()
        {
            tracing::debug!("Speech event receiver dropped");
        }
    }

    /// Run to completion, feeding `input` on stdin and collecting stdout
    async fn run(&self, lang: &str, input: Option<&str>) -> Result<String, CapabilityError> {
        let token = self.fresh_token();
        let args: Vec<String> = self.args.iter().map(|a| a.replace("{lang}", lang)).collect();

        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CapabilityError::Unavailable(format!("{}: {}", self.program, e)))?;

        self.notify(SpeechEvent::Started).await;

        if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
            if let Err(e) = stdin.write_all(text.as_bytes()).await {
                self.notify(SpeechEvent::Failed(e.to_string())).await;
                return Err(e.into());
            }
            // closing stdin lets the program finish
            drop(stdin);
        }

        let mut stdout = child.stdout.take();
        let work = async {
            let mut output = String::new();
            if let Some(out) = stdout.as_mut() {
                out.read_to_string(&mut output).await?;
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, output))
        };

        let result = tokio::select! {
            _ = token.cancelled() => None,
            finished = work => Some(finished),
        };

        match result {
            None => {
                self.notify(SpeechEvent::Cancelled).await;
                Err(CapabilityError::Cancelled)
            }
            Some(Err(e)) => {
                self.notify(SpeechEvent::Failed(e.to_string())).await;
                Err(e.into())
            }
            Some(Ok((status, _))) if !status.success() => {
                let message = format!("{} exited with {}", self.program, status);
                self.notify(SpeechEvent::Failed(message.clone())).await;
                Err(CapabilityError::Failed(message))
            }
            Some(Ok((_, output))) => {
                self.notify(SpeechEvent::Finished).await;
                Ok(output)
            }
        }
    }
}

/// Speech recognition delegated to an external recognizer printing the transcript
#[derive(Clone)]
pub struct CommandCapture {
    command: ExternalCommand,
}

impl CommandCapture {
    pub fn new(command: Vec<String>) -> Result<Self, CapabilityError> {
        Ok(Self {
            command: ExternalCommand::new(command)?,
        })
    }

    pub fn with_events(mut self, events: AsyncSender<SpeechEvent>) -> Self {
        self.command.events = Some(events);
        self
    }
}

#[async_trait]
impl SpeechCapture for CommandCapture {
    async fn capture(&self, lang: &str) -> Result<String, CapabilityError> {
        let output = self.command.run(lang, None).await?;
        let transcript = output.lines().map(str::trim).find(|l| !l.is_empty());

        transcript
            .map(str::to_string)
            .ok_or_else(|| CapabilityError::Failed("no speech recognized".to_string()))
    }

    fn cancel(&self) {
        self.command.cancel();
    }
}

/// Speech synthesis delegated to an external program reading stdin
#[derive(Clone)]
pub struct CommandPlayback {
    command: ExternalCommand,
}

impl CommandPlayback {
    pub fn new(command: Vec<String>) -> Result<Self, CapabilityError> {
        Ok(Self {
            command: ExternalCommand::new(command)?,
        })
    }

    pub fn with_events(mut self, events: AsyncSender<SpeechEvent>) -> Self {
        self.command.events = Some(events);
        self
    }
}

#[async_trait]
impl SpeechPlayback for CommandPlayback {
    async fn speak(&self, text: &str, lang: &str) -> Result<(), CapabilityError> {
        self.command.run(lang, Some(text)).await.map(|_| ())
    }

    fn cancel(&self) {
        self.command.cancel();
    }
}
