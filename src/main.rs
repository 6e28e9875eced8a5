use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use bustrack::arrivals;
use bustrack::catalog::Catalog;
use bustrack::records::Dataset;
use bustrack::scheduler::Simulator;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory containing the catalog tables (stops.txt, routes.txt, ...).
    #[arg(env, long, default_value = "data")]
    catalog_dir: PathBuf,

    /// Simulation tick period in milliseconds.
    #[arg(env, long, default_value_t = 5000)]
    tick_ms: u64,

    /// Stop id to report arrival estimates for on every tick.
    #[arg(env, long)]
    watch_stop: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        ))
        .init();

    let dataset = Dataset::from_dir(&cli.catalog_dir)?;
    let catalog = Arc::new(Catalog::try_from(dataset)?);
    info!(
        stops = catalog.stops.len(),
        routes = catalog.routes.len(),
        buses = catalog.buses.len(),
        "catalog loaded"
    );

    let (simulator, mut rx) = Simulator::new(
        Arc::clone(&catalog),
        Duration::from_millis(cli.tick_ms),
    );
    let simulator_task = tokio::spawn(simulator.run());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received; shutting down...");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                for bus in snapshot.iter() {
                    info!(
                        bus = %bus.label,
                        route = %bus.route_id,
                        lat = bus.position.y,
                        lon = bus.position.x,
                        speed = bus.speed,
                        eta_min = bus.eta_to_next_stop,
                        "position"
                    );
                }
                if let Some(stop_id) = &cli.watch_stop {
                    for arrival in arrivals::estimate(stop_id, &catalog.routes, &snapshot) {
                        info!(
                            stop = %stop_id,
                            bus = %arrival.bus.label,
                            eta_min = arrival.eta_minutes,
                            "arrival estimate"
                        );
                    }
                }
            }
        }
    }

    // Unsubscribing is the shutdown signal for the simulator.
    drop(rx);
    let _ = simulator_task.await;
    Ok(())
}
