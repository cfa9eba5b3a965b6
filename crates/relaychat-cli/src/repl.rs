//! Line-oriented chat loop over a [`ChatSession`].

use std::io::Write;

use relaychat_client::{ChatSession, ChatTransport, NoticeLevel, SendError, SessionEvent};
use relaychat_core::models::message::Role;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

const HELP: &str = "commands: /clear  /retry  /session  /help  /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Clear,
    Retry,
    Session,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }

    match trimmed {
        "/clear" => Input::Clear,
        "/retry" => Input::Retry,
        "/session" => Input::Session,
        "/help" | "/?" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        cmd if cmd.starts_with('/') && !cmd.contains(char::is_whitespace) => {
            Input::Unknown(cmd.to_string())
        }
        text => Input::Message(text.to_string()),
    }
}

pub async fn run<T: ChatTransport>(session: &ChatSession<T>) -> eyre::Result<()> {
    let mut events = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("relaychat. {HELP}");

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Unknown(cmd) => println!("unknown command {cmd}. {HELP}"),
            Input::Session => match session.session_id() {
                Some(id) => println!("session: {id}"),
                None => println!("no session yet"),
            },
            Input::Clear => session.clear_history().await,
            Input::Retry => {
                let failed = session.failed_message_id().and_then(|id| {
                    session
                        .messages()
                        .into_iter()
                        .find(|m| m.id == id)
                        .map(|m| m.content)
                });
                match failed {
                    Some(text) => send_interruptible(session, SendKind::Retry(text)).await,
                    None => println!("nothing to retry"),
                }
            }
            Input::Message(text) => send_interruptible(session, SendKind::Send(text)).await,
        }

        render_pending(&mut events);
    }

    Ok(())
}

enum SendKind {
    Send(String),
    Retry(String),
}

/// Send and wait, unless Ctrl-C arrives first. Dropping the send future
/// releases the session's loading state.
async fn send_interruptible<T: ChatTransport>(session: &ChatSession<T>, kind: SendKind) {
    println!("…");
    let result = tokio::select! {
        result = async {
            match &kind {
                SendKind::Send(text) => session.send(text).await,
                SendKind::Retry(text) => session.retry(text).await,
            }
        } => result,
        _ = tokio::signal::ctrl_c() => Err(SendError::Cancelled),
    };

    match result {
        Ok(_) => {}
        Err(SendError::Cancelled) => println!("(cancelled)"),
        Err(e) if e.is_retryable() => println!("(type /retry to resend)"),
        Err(e) => println!("{e}"),
    }
}

fn render_pending(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => render(&event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

fn render(event: &SessionEvent) {
    match event {
        SessionEvent::MessageAppended(message) if message.role == Role::Assistant => {
            println!("\n{}\n", message.content);
        }
        SessionEvent::Notice(notice) => match notice.level {
            NoticeLevel::Info => println!("[{}] {}", notice.title, notice.description),
            NoticeLevel::Error => eprintln!("[{}] {}", notice.title, notice.description),
        },
        _ => {}
    }
}

fn prompt() -> eyre::Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
