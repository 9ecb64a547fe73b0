//! Terminal stand-ins for the app's navigator and dialog

use owo_colors::OwoColorize;
use shelf_watcher::{ConfirmPrompt, Confirmer, Navigator};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::io::{self, BufRead, BufReader, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// Prints each navigation to stdout
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    navigations: AtomicUsize,
}

impl TerminalNavigator {
    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, target: &str) {
        self.navigations.fetch_add(1, Ordering::SeqCst);
        println!("{} Navigating to {}", "→".green(), target.cyan());
    }
}

/// Pending dialog handed to the prompt thread
struct ConfirmRequest {
    prompt: ConfirmPrompt,
    on_accept: Box<dyn FnOnce() + Send>,
}

/// Asks on the terminal, one prompt at a time
///
/// A single thread owns the input and prints each prompt only after the
/// previous one was answered, so an answer always belongs to the prompt on
/// screen. Shakes arriving while the queue is full are ignored.
pub struct TerminalConfirmer {
    requests: Sender<ConfirmRequest>,
}

impl TerminalConfirmer {
    /// Prompts on stdout and reads answers from stdin
    pub fn spawn() -> io::Result<Self> {
        Self::with_io(
            BufReader::new(io::stdin()),
            io::stdout(),
            DEFAULT_QUEUE,
        )
    }

    pub fn with_io(
        input: impl BufRead + Send + 'static,
        output: impl Write + Send + 'static,
        capacity: usize,
    ) -> io::Result<Self> {
        let (tx, rx) = bounded(capacity);
        std::thread::Builder::new()
            .name("shelf-confirm".to_string())
            .spawn(move || answer_prompts(rx, input, output))?;
        Ok(Self { requests: tx })
    }
}

const DEFAULT_QUEUE: usize = 2;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: ConfirmPrompt, on_accept: Box<dyn FnOnce() + Send>) {
        match self.requests.try_send(ConfirmRequest { prompt, on_accept }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                debug!("Confirmation prompts already queued, ignoring shake");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("Confirmation input closed, ignoring shake");
            }
        }
    }
}

fn answer_prompts(
    requests: Receiver<ConfirmRequest>,
    mut input: impl BufRead,
    mut output: impl Write,
) {
    for ConfirmRequest { prompt, on_accept } in requests {
        let shown = writeln!(output, "{}", prompt.title.bold())
            .and_then(|()| {
                write!(
                    output,
                    "{} [{}/{}] ",
                    prompt.message,
                    prompt.accept_label.to_lowercase(),
                    prompt.cancel_label.to_lowercase()
                )
            })
            .and_then(|()| output.flush());
        if let Err(e) = shown {
            warn!("Failed to show confirmation prompt: {}", e);
        }

        let mut answer = String::new();
        match input.read_line(&mut answer) {
            Ok(0) => {
                debug!("Confirmation input reached EOF");
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                return;
            }
        }

        if is_accept(&answer, &prompt) {
            on_accept();
        } else {
            let _ = writeln!(output, "{}", "Cancelled".dimmed());
        }
    }
}

fn is_accept(answer: &str, prompt: &ConfirmPrompt) -> bool {
    let answer = answer.trim().to_lowercase();
    !answer.is_empty()
        && (answer == "y" || answer == "yes" || answer == prompt.accept_label.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn test_accept_answers() {
        let prompt = ConfirmPrompt::default();
        assert!(is_accept("y\n", &prompt));
        assert!(is_accept("YES", &prompt));
        assert!(is_accept(" open ", &prompt));
        assert!(!is_accept("\n", &prompt));
        assert!(!is_accept("cancel", &prompt));
        assert!(!is_accept("n", &prompt));
    }

    fn prompt(message: &str) -> ConfirmPrompt {
        ConfirmPrompt {
            message: message.to_string(),
            ..ConfirmPrompt::default()
        }
    }

    #[test]
    fn test_answers_match_prompts_in_order() {
        let confirmer =
            TerminalConfirmer::with_io(Cursor::new("y\nn\nopen\n"), io::sink(), 4).unwrap();
        let (tx, rx) = unbounded();

        for message in ["first", "second", "third"] {
            let tx = tx.clone();
            confirmer.confirm(prompt(message), Box::new(move || tx.send(message).unwrap()));
        }

        let timeout = Duration::from_secs(5);
        assert_eq!(rx.recv_timeout(timeout), Ok("first"));
        assert_eq!(rx.recv_timeout(timeout), Ok("third"));
        drop(tx);
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn test_prompts_after_eof_are_ignored() {
        let confirmer = TerminalConfirmer::with_io(Cursor::new(""), io::sink(), 1).unwrap();
        let (tx, rx) = unbounded::<()>();

        for _ in 0..3 {
            let tx = tx.clone();
            confirmer.confirm(prompt("shake"), Box::new(move || tx.send(()).unwrap()));
        }
        drop(tx);

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_navigator_counts() {
        let navigator = TerminalNavigator::default();
        navigator.navigate("Chat");
        navigator.navigate("Chat");
        assert_eq!(navigator.navigations(), 2);
    }
}
