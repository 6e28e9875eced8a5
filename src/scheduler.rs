//! The ticking source driving the simulator.
//!
//! One writer advances the snapshot on a fixed cadence and publishes it
//! through a watch channel; any number of readers observe either the
//! pre-tick or post-tick snapshot, never an intermediate state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::catalog::{Bus, Catalog};
use crate::sim;

/// An immutable point-in-time copy of the bus collection.
pub type Snapshot = Arc<Vec<Bus>>;

pub struct Simulator {
    catalog: Arc<Catalog>,
    period: Duration,
    tx: watch::Sender<Snapshot>,
}

impl Simulator {
    /// Creates the simulator seeded with the catalog's initial buses, plus
    /// the receiver handing out snapshots. Further receivers come from
    /// cloning it.
    pub fn new(catalog: Arc<Catalog>, period: Duration) -> (Self, watch::Receiver<Snapshot>) {
        let (tx, rx) = watch::channel(Arc::new(catalog.buses.clone()));
        (
            Self {
                catalog,
                period,
                tx,
            },
            rx,
        )
    }

    /// Ticks until the last receiver is dropped.
    ///
    /// Each tick advances the previous snapshot and publishes the result;
    /// missed ticks are skipped rather than bunched. Cancellation is simply
    /// unsubscribing: there is no in-flight work to abort.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            period_ms = self.period.as_millis() as u64,
            buses = self.tx.borrow().len(),
            "position simulator started"
        );

        loop {
            interval.tick().await;
            let previous = self.tx.borrow().clone();
            let snapshot: Snapshot = Arc::new(sim::advance(&previous, &self.catalog.routes));
            if self.tx.send(snapshot).is_err() {
                info!("last subscriber gone; position simulator stopped");
                return;
            }
            debug!(buses = previous.len(), "tick published");
        }
    }
}
