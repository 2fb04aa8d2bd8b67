use crate::{
    auth::MockLogin,
    bus::{Event, EventBus},
    chat::{ChatMessage, Sender},
    manager::{Manager, SendOutcome},
    preferences::{load_theme, save_theme, Theme},
    store::Store,
};
use colored::{Color, Colorize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{error, warn};

const HELP: &str = "\
Commands:
  /login   Continue with Google (mocked)
  /logout  Sign out and forget this device
  /clear   Clear the conversation
  /theme   Toggle light/dark colours
  /help    Display this text
  /quit    Exit
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Login,
    Logout,
    Clear,
    Theme,
    Help,
    Quit,
    Unknown(String),
    Message(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "/login" => Command::Login,
            "/logout" => Command::Logout,
            "/clear" => Command::Clear,
            "/theme" => Command::Theme,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other if other.starts_with('/') && !other.contains(char::is_whitespace) => {
                Command::Unknown(other.to_string())
            }
            _ => Command::Message(line.to_string()),
        }
    }
}

/// Line-oriented chat front end. Input is handled here; everything shown
/// about the conversation comes from bus events.
pub struct TerminalInterface {
    bus: Arc<EventBus>,
    manager: Arc<Manager>,
    store: Store,
    login: MockLogin,
    theme: Arc<Mutex<Theme>>,
}

impl TerminalInterface {
    pub fn new(bus: Arc<EventBus>, manager: Arc<Manager>, store: Store, login: MockLogin) -> Self {
        Self {
            bus,
            manager,
            store,
            login,
            theme: Arc::new(Mutex::new(Theme::default())),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let theme = load_theme(&self.store).await?;
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner) = theme;

        let renderer = Renderer {
            manager: self.manager.clone(),
            theme: self.theme.clone(),
        };
        let render_handle = tokio::spawn(renderer.run(self.bus.subscribe()));

        if self.manager.restore_session().await?.is_none() {
            println!("Welcome to Nova Chat. Press Enter or type /login to continue with Google.");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let signed_in = self.manager.current_identity().is_some();

            match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => println!("{}", HELP),
                Command::Unknown(cmd) => println!("Unknown command {}. Use /help.", cmd),
                Command::Login | Command::Message(_) if !signed_in => {
                    println!("Signing in...");
                    let identity = self.login.login().await;
                    if let Err(e) = self.manager.sign_in(identity).await {
                        error!("Failed to sign in: {:#}", e);
                    }
                }
                Command::Login => println!("Already signed in. Use /logout first."),
                Command::Logout => {
                    if let Err(e) = self.manager.sign_out().await {
                        error!("Failed to sign out: {:#}", e);
                    }
                }
                Command::Clear => self.manager.clear_chat(),
                Command::Theme => self.toggle_theme().await,
                Command::Message(text) => self.send(text),
            }
        }

        render_handle.abort();
        Ok(())
    }

    /// Runs in the background so input stays live; the manager refuses a
    /// second message while the first is outstanding.
    fn send(&self, text: String) {
        let manager = self.manager.clone();
        tokio::spawn(async move {
            match manager.send(&text).await {
                Ok(SendOutcome::Rejected) if !text.trim().is_empty() => {
                    println!("{}", "Still waiting for a reply, please hold on.".dimmed());
                }
                Ok(_) => {}
                Err(e) => error!("Failed to send message: {:#}", e),
            }
        });
    }

    async fn toggle_theme(&self) {
        let theme = {
            let mut current = self.theme.lock().unwrap_or_else(PoisonError::into_inner);
            *current = current.toggled();
            *current
        };
        if let Err(e) = save_theme(&self.store, theme).await {
            warn!("Failed to persist theme: {:#}", e);
        }
        println!("Theme set to {}.", theme);
    }
}

struct Renderer {
    manager: Arc<Manager>,
    theme: Arc<Mutex<Theme>>,
}

impl Renderer {
    async fn run(self, mut rx: broadcast::Receiver<Event>) {
        loop {
            match rx.recv().await {
                Ok(event) => self.render(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Renderer lagged behind by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn render(&self, event: Event) {
        match event {
            Event::SignedIn(identity) => {
                println!("Signed in as {}.", identity);
                for message in self.manager.messages() {
                    self.print_message(&message);
                }
            }
            Event::SignedOut => {
                println!("Signed out. Press Enter or type /login to sign in again.");
            }
            Event::TranscriptReset(greeting) => {
                println!("{}", "-- conversation cleared --".dimmed());
                self.print_message(&greeting);
            }
            Event::MessageAppended(message) => self.print_message(&message),
            Event::AwaitingReply(true) => println!("{}", "Nova is typing...".dimmed()),
            Event::AwaitingReply(false) | Event::MessageUpdated(_) => {}
        }
    }

    fn print_message(&self, message: &ChatMessage) {
        let (bot_color, user_color) = match *self.theme.lock().unwrap_or_else(PoisonError::into_inner) {
            Theme::Light => (Color::Blue, Color::Black),
            Theme::Dark => (Color::Cyan, Color::White),
        };
        let time = message.timestamp.format("%H:%M");

        match message.sender {
            Sender::Bot => println!(
                "{} {} {}",
                time.to_string().dimmed(),
                "Nova:".color(bot_color).bold(),
                message.content.color(bot_color)
            ),
            Sender::User => println!(
                "{} {} {}",
                time.to_string().dimmed(),
                "You:".color(user_color).bold(),
                message.content.color(user_color)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/login"), Command::Login);
        assert_eq!(Command::parse("  /clear \n"), Command::Clear);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/nope"), Command::Unknown("/nope".into()));
    }

    #[test]
    fn everything_else_is_a_message() {
        assert_eq!(Command::parse("hello"), Command::Message("hello".into()));
        assert_eq!(
            Command::parse("/path is a word"),
            Command::Message("/path is a word".into())
        );
        assert_eq!(Command::parse(""), Command::Message(String::new()));
    }
}
