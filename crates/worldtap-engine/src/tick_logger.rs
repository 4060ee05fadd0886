//! Tick callback that reports engine progress through `tracing`.

use tracing::{debug, info};
use worldtap_core::accessor::EngineAccessor;
use worldtap_core::runner::TickCallback;

/// Logs every tick at debug level and a summary every `interval` ticks.
pub struct TickLogger {
    interval: u64,
}

impl TickLogger {
    /// Create a logger emitting a summary every `interval` ticks. Zero
    /// disables the summary.
    pub const fn new(interval: u64) -> Self {
        Self { interval }
    }

    /// Whether `tick` gets an info-level summary.
    pub const fn is_summary_tick(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.interval), Some(0))
    }
}

impl TickCallback for TickLogger {
    fn on_tick(&mut self, tick: u64, world: &dyn EngineAccessor) {
        let npcs = world.npcs().len();
        let projectiles = world.projectiles().len();
        debug!(tick, npcs, projectiles, "Tick");

        if self.is_summary_tick(tick) {
            let player = world.local_player().map(|p| p.location);
            info!(
                tick,
                npcs,
                projectiles,
                run_energy = world.run_energy(),
                player = ?player,
                "Engine progress"
            );
        }
    }
}
