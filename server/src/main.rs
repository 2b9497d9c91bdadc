use clap::Parser;
use log::{error, info};
use server::config::ServerConfig;
use server::driver::SimulationDriver;
use server::network::Server;
use server::simulation::Simulation;
use server::supervisor::supervise;
use tokio::sync::watch;

/// Parses the command line, then runs the simulation driver and the network
/// server side by side until one of them ends or Ctrl+C is pressed.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let config = ServerConfig::parse();

    let simulation = Simulation::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let (driver, frames) = SimulationDriver::new(simulation.clone()).await;
    let server = Server::bind(&config.bind_address(), simulation, config.max_subscribers).await?;

    let driver_handle = tokio::spawn(driver.run(shutdown_rx.clone()));
    let server_handle = tokio::spawn(async move {
        server.run(frames, shutdown_rx).await;
    });

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let cause = supervise(driver_handle, server_handle, shutdown_tx, interrupt).await;
    info!("Server stopped ({:?})", cause);

    Ok(())
}
