use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use roulette_protocol::{ClientToServer, DrawResult, ServerToClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::Message};

#[derive(Parser)]
#[command(name = "roulette-cli")]
#[command(about = "Terminal client for the shared roulette")]
struct Cli {
    /// Server WebSocket URL
    #[arg(short, long, default_value = "ws://127.0.0.1:3000/ws")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("🎡 Roulette CLI Client");
    println!("======================");
    println!("🔗 Connecting to {}...", cli.url);

    let (ws_stream, _) = connect_async(cli.url.as_str()).await?;
    println!("✅ Connected to server!");

    let (mut write, mut read) = ws_stream.split();

    // Handle incoming messages
    tokio::spawn(async move {
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerToClient>(&text) {
                    Ok(server_msg) => handle_server_message(server_msg),
                    Err(e) => println!("❓ Unreadable event ({e}): {text}"),
                },
                Ok(Message::Close(_)) => {
                    println!("🔌 Connection closed by server");
                    break;
                }
                Err(e) => {
                    println!("❌ WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    println!("\n📋 Commands available (picker only, others are ignored by the server):");
    println!("  options <a, b, c>        - Replace the main wheel's options");
    println!("  spin                     - Spin the main wheel");
    println!("  first-options <a, b, c>  - Replace the first-picker wheel's options");
    println!("  first-spin               - Spin the first-picker wheel");
    println!("  open | close             - Show or hide the first-picker wheel for everyone");
    println!("  quit                     - Exit");
    println!("\nType commands and press Enter:");

    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();

        if line == "quit" {
            break;
        }

        if let Some(msg) = parse_command(line) {
            let json = serde_json::to_string(&msg)?;
            write.send(Message::Text(json)).await?;
        } else if !line.is_empty() {
            println!("❓ Unknown command: {}", line);
        }
    }

    let _ = write.send(Message::Close(None)).await;
    println!("👋 Goodbye!");
    Ok(())
}

fn handle_server_message(msg: ServerToClient) {
    match msg {
        ServerToClient::AdminAssigned(true) => println!("👑 You are the picker."),
        ServerToClient::AdminAssigned(false) => println!("👀 You are a spectator."),
        ServerToClient::InitialState(init) => {
            println!("\n🎲 === ROULETTE ===");
            print_options("Main wheel", &init.options);
            if !init.first_picker_options.is_empty() {
                print_options("First-picker wheel", &init.first_picker_options);
            }
            println!("👥 Connected: {}", init.connected_users);
            print_history(&init.history);
            println!("==================\n");
        }
        ServerToClient::UsersUpdate(n) => println!("👥 Connected: {}", n),
        ServerToClient::OptionsUpdated(options) => print_options("Main wheel", &options),
        ServerToClient::FirstPickerOptionsUpdated(options) => {
            print_options("First-picker wheel", &options)
        }
        ServerToClient::RouletteSpinning(spin) | ServerToClient::FirstPickerSpinning(spin) => {
            println!(
                "🌀 Spinning to {:.1}° ({} ms)...",
                spin.rotation, spin.duration
            );
        }
        ServerToClient::RouletteResult(result) | ServerToClient::FirstPickerResult(result) => {
            println!("🏆 {} at {}", result.winner, result.timestamp);
        }
        ServerToClient::FirstPickerModalOpened => println!("🪟 First-picker wheel opened"),
        ServerToClient::FirstPickerModalClosed => println!("🪟 First-picker wheel closed"),
    }
}

fn print_options(title: &str, options: &[String]) {
    println!("🎯 {} ({}): {}", title, options.len(), options.join(", "));
}

fn print_history(history: &[DrawResult]) {
    if history.is_empty() {
        println!("📜 No results yet");
        return;
    }
    println!("📜 Recent results:");
    for r in history {
        println!("  {} - {}", r.timestamp, r.winner);
    }
}

fn split_labels(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

fn parse_command(input: &str) -> Option<ClientToServer> {
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest),
        None => (input, ""),
    };

    match head.to_lowercase().as_str() {
        "options" => Some(ClientToServer::UpdateOptions(split_labels(rest))),
        "spin" => Some(ClientToServer::SpinRoulette),
        "first-options" => Some(ClientToServer::UpdateFirstPickerOptions(split_labels(rest))),
        "first-spin" => Some(ClientToServer::SpinFirstPicker),
        "open" => Some(ClientToServer::OpenFirstPickerModal),
        "close" => Some(ClientToServer::CloseFirstPickerModal),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_comma_separated_and_trimmed() {
        assert_eq!(
            parse_command("options Ana,  Juan , ,Sofía"),
            Some(ClientToServer::UpdateOptions(vec![
                "Ana".into(),
                "Juan".into(),
                "Sofía".into()
            ]))
        );
    }

    #[test]
    fn bare_words_map_to_commands() {
        assert_eq!(parse_command("spin"), Some(ClientToServer::SpinRoulette));
        assert_eq!(parse_command("SPIN"), Some(ClientToServer::SpinRoulette));
        assert_eq!(parse_command("first-spin"), Some(ClientToServer::SpinFirstPicker));
        assert_eq!(parse_command("open"), Some(ClientToServer::OpenFirstPickerModal));
        assert_eq!(parse_command("close"), Some(ClientToServer::CloseFirstPickerModal));
    }

    #[test]
    fn empty_options_clear_the_wheel() {
        assert_eq!(
            parse_command("first-options"),
            Some(ClientToServer::UpdateFirstPickerOptions(vec![]))
        );
    }

    #[test]
    fn unknown_input_is_none() {
        assert_eq!(parse_command("bet 100"), None);
        assert_eq!(parse_command(""), None);
    }
}
