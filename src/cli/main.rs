/**
 * feedchat Command-Line Entry Point
 *
 * Drives the client from a terminal. The session is persisted on disk, so
 * `login` in one invocation authorizes `feed` or `whoami` in the next.
 */

use std::path::PathBuf;
use std::time::Duration;

use feedchat::client::{AppState, AuthStatus, ChatStatus, LoadOutcome, TransportEvent};
use feedchat::shared::{AppConfig, Sender};

const USAGE: &str = "usage: feedchat [--config <file>] <login <user> <pass> | logout | whoami | feed [pages] | chat <text>...>";

/// How long `chat` waits for the socket and for echoes
const CHAT_WAIT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = take_config_flag(&mut args)?;
    let config = AppConfig::load(config_path.as_deref())?;

    let mut app = AppState::with_file_storage(config)?;
    let status = app.start().await;
    tracing::debug!(?status, "Startup complete");

    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    match (command.as_str(), rest) {
        ("login", [username, password]) => {
            let user = app.login(username, password).await?;
            println!("Logged in as {} ({})", user.display_name(), user.email);
        }
        ("logout", []) => {
            app.logout().await;
            println!("Logged out");
        }
        ("whoami", []) => {
            if status != AuthStatus::Authenticated {
                println!("Not logged in");
                return Ok(());
            }
            let user = app.auth().current_user().await?;
            println!("{} <{}> (id {})", user.username, user.email, user.id);
        }
        ("feed", rest) => {
            let pages = match rest {
                [] => 1,
                [n] => n.parse::<usize>().map_err(|_| format!("invalid page count: {}", n))?,
                _ => {
                    eprintln!("{}", USAGE);
                    std::process::exit(2);
                }
            };
            run_feed(&mut app, pages).await?;
        }
        ("chat", words) if !words.is_empty() => {
            run_chat(&mut app, &words.join(" ")).await?;
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

fn take_config_flag(args: &mut Vec<String>) -> Result<Option<PathBuf>, String> {
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err("--config requires a path".to_string());
    }
    let path = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(PathBuf::from(path)))
}

async fn run_feed(app: &mut AppState, pages: usize) -> Result<(), Box<dyn std::error::Error>> {
    for _ in 0..pages {
        if app.load_more().await? == LoadOutcome::NothingToLoad {
            break;
        }
    }

    let view = app.feed().view();
    for item in view.items {
        println!(
            "#{:<4} {} [+{} / -{}]",
            item.id, item.title, item.reaction_counts.likes, item.reaction_counts.dislikes
        );
    }
    println!("-- {} of {} items", view.items.len(), view.total);
    Ok(())
}

async fn run_chat(app: &mut AppState, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let chat = app.chat_mut();
    chat.open();

    while chat.status() == ChatStatus::Connecting {
        match tokio::time::timeout(CHAT_WAIT, chat.next_event()).await {
            Ok(Some(TransportEvent::Failed(e))) => return Err(e.into()),
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => return Err("timed out connecting to chat".into()),
        }
    }

    let Some(sent) = chat.send(text)? else {
        return Ok(());
    };

    // Wait for the echo of our own text; greetings may arrive first
    loop {
        match tokio::time::timeout(CHAT_WAIT, chat.next_event()).await {
            Ok(Some(TransportEvent::Received(reply))) if reply == sent.text => break,
            Ok(Some(TransportEvent::Received(_))) => {}
            Ok(Some(_)) | Ok(None) | Err(_) => break,
        }
    }
    chat.close();

    for message in chat.log() {
        let who = match message.sender {
            Sender::Local => "you",
            Sender::Remote => "server",
        };
        println!("[{}] {}: {}", message.timestamp.format("%H:%M:%S"), who, message.text);
    }
    Ok(())
}
