//! Fixed-cadence loop that advances the match.

use crate::simulation::{Simulation, StateFrame};
use log::{debug, info};
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Time between two simulation steps (about 60Hz). Ball and paddle speeds are
/// expressed per tick, so this is the simulation's unit of time.
pub const TICK_DURATION: Duration = Duration::from_millis(16);

/// Ticks the simulation until told to stop, publishing every resulting frame.
pub struct SimulationDriver {
    simulation: Simulation,
    frames: watch::Sender<StateFrame>,
}

impl SimulationDriver {
    /// Creates a driver together with a receiver of the frames it publishes.
    pub async fn new(simulation: Simulation) -> (Self, watch::Receiver<StateFrame>) {
        let (frames, receiver) = watch::channel(simulation.frame().await);
        (Self { simulation, frames }, receiver)
    }

    /// Runs until `shutdown` carries `true` or its sender is dropped.
    ///
    /// A tick in progress always completes; the shutdown signal is only
    /// observed between ticks.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(TICK_DURATION);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Simulation driver started ({}ms per tick)",
            TICK_DURATION.as_millis()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.simulation.tick().await;
                    let tick = report.frame.tick;

                    if tick % 60 == 0 {
                        let state = &report.frame.state;
                        debug!(
                            "Tick {}: {:?}, score {}-{}",
                            tick,
                            state.phase(),
                            state.left_score,
                            state.right_score
                        );
                    }

                    // No receivers left is fine; the driver keeps simulating.
                    let _ = self.frames.send(report.frame);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Simulation driver stopped");
    }
}
