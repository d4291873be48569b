//! Service layer containing business logic orchestration.

mod notify_service;
mod sink;

pub use notify_service::{NotifyService, Outcome};
pub use sink::DaDaPushClient;
#[allow(unused_imports)]
pub use sink::NotificationSink;
