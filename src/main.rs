//! Terminal client for the questionnaire assistant
//!
//! Reads user lines from stdin, streams the assistant reply token by token,
//! and prints failure notifications. Ctrl-C cancels the in-flight exchange
//! (partial text is kept); Ctrl-D exits.

use msq_assistant::{ChatConfig, ChatEvent, ChatSession, SendOutcome, SendRejection};
use std::io::Write;
use tokio::io::AsyncBufReadExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "msq_assistant=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let Some(config) = ChatConfig::from_env() else {
        eprintln!("MSQ_CHAT_URL and MSQ_API_TOKEN must be set");
        std::process::exit(2);
    };
    tracing::info!(endpoint = %config.endpoint, "starting chat session");

    let (session, mut events) = ChatSession::new(config);

    if let Some(welcome) = session.messages().first() {
        println!("assistant> {}", welcome.content);
    }
    println!("(Ctrl-C cancels a streaming reply, Ctrl-D exits)\n");

    // Render streamed snapshots incrementally: each snapshot carries the full
    // reply so far, so only the suffix past what was already printed goes out.
    tokio::spawn(async move {
        let mut current = None;
        let mut printed = 0usize;
        while let Some(event) = events.recv().await {
            match event {
                ChatEvent::Snapshot { message, text } => {
                    if current != Some(message) {
                        current = Some(message);
                        printed = 0;
                    }
                    if let Some(suffix) = text.get(printed..) {
                        print!("{suffix}");
                        let _ = std::io::stdout().flush();
                    }
                    printed = text.len();
                }
                ChatEvent::Failed { reason } => {
                    print!("[error] {reason}");
                    let _ = std::io::stdout().flush();
                }
            }
        }
    });

    let canceller = session.clone();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        print!("assistant> ");
        std::io::stdout().flush()?;
        match session.send(&line).await {
            SendOutcome::Rejected(SendRejection::EmptyMessage) => println!(),
            SendOutcome::Rejected(SendRejection::ExchangeInFlight) => {
                println!("(still replying, please wait)");
            }
            SendOutcome::Finished(_) => {
                // Give the printer task a chance to drain the final snapshot
                // before the next prompt.
                tokio::task::yield_now().await;
                println!();
            }
        }
    }

    Ok(())
}
