//! Playlens - Play-behavior profiling engine for Steam library statistics
//!
//! Playlens pulls one player's ownership, playtime, and achievement data
//! from the Steam Web API and reduces it through a deterministic
//! pipeline: gateway fetch → library aggregation → four-axis behavioral
//! classification.
//!
//! ## Modules
//!
//! - **Gateway**: typed, credentialed calls to the remote statistics
//!   service, with absent achievement data surfaced as `None`
//! - **Aggregator**: bounded worker-pool scan of the owned library into
//!   summary statistics and a per-title achievement breakdown
//! - **Classifier**: pure rule tables deriving the four-letter profile
//!   code with per-axis justification and confidence

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gateway;
pub mod types;

pub use aggregator::Aggregator;
pub use classifier::classify;
pub use config::{AggregatorConfig, GatewayConfig};
pub use error::RemoteServiceError;
pub use gateway::{StatsProvider, SteamGateway};
pub use types::{
    AchievementBreakdown, AchievementSchema, AchievementUnlockState, AxisResult, LibrarySummary,
    ProfileAxes, ProfileReport, ProfileResult, TitleRecord,
};

/// Playlens version embedded in profile reports
pub const PLAYLENS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for profile reports
pub const PRODUCER_NAME: &str = "playlens";
