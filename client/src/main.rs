use clap::Parser;
use client::cli::{Action, Args};
use client::display::describe;
use client::network::CommandClient;
use log::{info, warn};
use shared::{MatchState, Packet};

fn print_state(tick: u64, state: &MatchState, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(state)?);
    } else {
        println!("{}", describe(tick, state));
    }
    Ok(())
}

async fn watch(
    client: &CommandClient,
    frames: u32,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    client.send(&Packet::Subscribe).await?;

    // Frames may overtake the acknowledgement, so both are handled in one loop.
    let mut printed = 0;
    while printed < frames {
        match client.receive().await? {
            Packet::State { tick, state } => {
                print_state(tick, &state, json)?;
                printed += 1;
            }
            Packet::Ack => info!("Subscribed to {}", client.server_addr()),
            Packet::Rejected { reason } => {
                return Err(format!("subscription refused: {}", reason).into())
            }
            other => warn!("Ignoring {} while watching", other.kind()),
        }
    }

    client.send(&Packet::Unsubscribe).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let client = CommandClient::new(&args.server).await?;

    if let Action::Watch { frames } = args.action {
        return watch(&client, frames, args.json).await;
    }

    let Some(request) = args.action.request() else {
        return Ok(());
    };

    match client.request(&request).await? {
        Packet::State { tick, state } => print_state(tick, &state, args.json)?,
        Packet::Ack => println!("ok"),
        Packet::Rejected { reason } => return Err(format!("rejected: {}", reason).into()),
        other => return Err(format!("unexpected reply: {}", other.kind()).into()),
    }

    Ok(())
}
