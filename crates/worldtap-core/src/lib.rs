//! Engine thread, query bridge, and snapshot projectors for Worldtap.
//!
//! The world lives on a single engine thread. Everything else reaches it
//! through the bridge: a caller hands over a read-only operation, the
//! engine runs it between ticks, and the caller gets the result back.
//!
//! # Modules
//!
//! - [`accessor`] -- [`EngineAccessor`], the read surface, and [`Simulation`].
//! - [`bridge`] -- FIFO deferred-work queue and the synchronous [`EngineBridge`].
//! - [`config`] -- Configuration loading from `worldtap-config.yaml` into
//!   strongly-typed structs.
//! - [`projection`] -- One projector per endpoint, world state to documents.
//! - [`runner`] -- The engine thread: tick cadence plus deferred jobs.
//! - [`scene`] -- Engine-side world model (entities, tiles, containers).
//! - [`tick`] -- The process-wide [`TickCounter`].
//! - [`world`] -- [`SceneWorld`], a seeded reference simulation.
//!
//! [`EngineAccessor`]: accessor::EngineAccessor
//! [`Simulation`]: accessor::Simulation
//! [`EngineBridge`]: bridge::EngineBridge
//! [`TickCounter`]: tick::TickCounter
//! [`SceneWorld`]: world::SceneWorld

pub mod accessor;
pub mod bridge;
pub mod config;
pub mod projection;
pub mod runner;
pub mod scene;
pub mod tick;
pub mod world;
