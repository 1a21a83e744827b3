// Library interface for CutTracker modules
// This allows integration tests and benches to access the core functionality

pub mod alerts;
pub mod catalog;
pub mod config;
pub mod dates;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod profile;
pub mod recovery;
pub mod session;
pub mod store;

// Re-export commonly used types for convenience
pub use models::*;
pub use alerts::{Alert, AlertEngine, AlertKind, AlertLevel};
pub use config::AppConfig;
pub use dates::{Clock, FixedClock, SystemClock};
pub use error::{Result, StoreError, TrackerError};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use metrics::{exercise_volume, GoalProjection, MetricsEngine};
pub use profile::Profile;
pub use recovery::{RecoveryBand, RecoveryScore, RecoveryScorer};
pub use session::{Insights, LogOutcome, SessionController};
pub use store::{DataStore, JsonFileStore, MemoryStore};
