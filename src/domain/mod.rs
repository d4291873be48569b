//! Domain layer containing core business logic.
//!
//! This module contains:
//! - Settings lookup and property naming
//! - Project configuration store and resolver
//! - Analysis event types
//! - Push message formatting
//! - Logger with rotation

mod error;
pub mod logger;
mod message;
mod project;
mod resolver;
mod settings;
mod store;
mod types;

pub use error::NotifyError;
pub use message::PushMessage;
pub use resolver::{skip_reason, ConfigResolver, SkipReason};
pub use settings::{MapSettings, Prop, Settings, DEFAULT_BASE_PATH};
pub use store::ConfigStore;
pub use types::AnalysisEvent;

// Library-style API surface, partly used by tests only
#[allow(unused_imports)]
pub use project::{KeyPattern, ProjectConfig};
#[allow(unused_imports)]
pub use resolver::should_skip;
#[allow(unused_imports)]
pub use store::RefreshOutcome;
#[allow(unused_imports)]
pub use types::{GateStatus, QualityGate};
