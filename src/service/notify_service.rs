//! Analysis event processing service.

use std::io::{self, Read};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::domain::{
    skip_reason, AnalysisEvent, ConfigResolver, ConfigStore, NotifyError, Prop, PushMessage,
    Settings, SkipReason, DEFAULT_BASE_PATH,
};
use crate::service::sink::NotificationSink;

/// What happened to one analysis event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `dadapush.enabled` is off
    Disabled,
    /// No project configuration matches the project key
    NotConfigured,
    /// A suppression rule applied
    Skipped(SkipReason),
    /// Message accepted by the API
    Sent { message_id: Option<i64> },
    /// API answered with a non-zero code
    Rejected { code: i64, errmsg: String },
    /// Request could not be completed
    Failed(String),
}

impl Outcome {
    /// Exit code for the CLI: deliberate skips are not failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Rejected { .. } | Outcome::Failed(_) => 1,
            _ => 0,
        }
    }
}

/// Service for processing analysis events.
///
/// Keeps the project configuration table between events; every event
/// refreshes it from the settings passed in.
pub struct NotifyService<S: NotificationSink> {
    store: ConfigStore,
    sink: S,
}

impl<S: NotificationSink> NotifyService<S> {
    pub fn new(sink: S) -> Self {
        Self {
            store: ConfigStore::new(),
            sink,
        }
    }

    /// Read one event from stdin and process it.
    pub fn run(&mut self, settings: &dyn Settings) -> Result<Outcome> {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read event from stdin")?;

        if input.trim().is_empty() {
            return Err(NotifyError::Input("No input received from stdin".to_string()).into());
        }
        debug!("Received input: {}", input);

        let event: AnalysisEvent = serde_json::from_str(&input)
            .map_err(|e| NotifyError::Input(format!("Failed to parse analysis event: {}", e)))?;

        let outcome = self.process(settings, &event)?;
        info!(project = %event.project.key, outcome = ?outcome, "Event processed");
        Ok(outcome)
    }

    /// Process one analysis event against the current settings.
    ///
    /// A corrupted project configuration aborts the event; the previous
    /// configuration table stays in place for the next one.
    pub fn process(
        &mut self,
        settings: &dyn Settings,
        event: &AnalysisEvent,
    ) -> Result<Outcome, NotifyError> {
        info!("Refreshing settings");
        self.store.refresh(settings)?;

        if !settings.get_bool(Prop::Enabled.property()) {
            info!(
                "DaDaPush notification disabled, skipping. Settings are [{}]",
                self.relevant_settings(settings)
            );
            return Ok(Outcome::Disabled);
        }

        if !event.properties.is_empty() {
            info!("Analysis scanner context: [{:?}]", event.properties);
        }

        let project_key = &event.project.key;
        let Some(config) = ConfigResolver::new(&self.store).resolve(project_key) else {
            return Ok(Outcome::NotConfigured);
        };

        let gate = event.quality_gate.as_ref();
        if let Some(reason) = skip_reason(config, gate) {
            return Ok(Outcome::Skipped(reason));
        }
        // Non-blank after skip_reason
        let token = config.channel_token().unwrap_or_default();

        let base_path = settings
            .get_string(Prop::BasePath.property())
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());

        let message = PushMessage::for_analysis(event, config);
        info!(project = %project_key, title = %message.title, "DaDaPush notification will be sent");

        let outcome = match self.sink.push(&base_path, token, &message) {
            Ok(receipt) if receipt.is_success() => {
                info!("Send notification success, messageId={:?}", receipt.message_id());
                Outcome::Sent {
                    message_id: receipt.message_id(),
                }
            }
            Ok(receipt) => {
                let errmsg = receipt.errmsg.clone().unwrap_or_default();
                warn!(
                    "Send DaDaPush notification failed, detail: {} {}",
                    receipt.code, errmsg
                );
                Outcome::Rejected {
                    code: receipt.code,
                    errmsg,
                }
            }
            Err(e) => {
                error!("Send DaDaPush notification failed: {}", e);
                Outcome::Failed(e.to_string())
            }
        };
        Ok(outcome)
    }

    fn relevant_settings(&self, settings: &dyn Settings) -> String {
        let globals: Vec<String> = Prop::GLOBAL
            .iter()
            .map(|p| {
                let value = settings.get_string(p.property()).unwrap_or_default();
                format!("{}={}", p.property(), value)
            })
            .collect();
        let entries: Vec<String> = self
            .store
            .entries()
            .map(|(pattern, config)| format!("{} -> {}", pattern, config.masked_token()))
            .collect();
        format!(
            "{}; project specific channel config: [{}]",
            globals.join(", "),
            entries.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GateStatus, MapSettings, QualityGate};
    use crate::service::sink::{PushData, PushReceipt};
    use std::cell::RefCell;

    /// Records pushes and answers with a fixed code.
    struct RecordingSink {
        code: i64,
        pushes: RefCell<Vec<(String, String, PushMessage)>>,
    }

    impl RecordingSink {
        fn answering(code: i64) -> Self {
            Self {
                code,
                pushes: RefCell::new(Vec::new()),
            }
        }
    }

    impl NotificationSink for RecordingSink {
        fn push(
            &self,
            base_path: &str,
            channel_token: &str,
            message: &PushMessage,
        ) -> Result<PushReceipt, NotifyError> {
            self.pushes.borrow_mut().push((
                base_path.to_string(),
                channel_token.to_string(),
                message.clone(),
            ));
            Ok(PushReceipt {
                code: self.code,
                errmsg: (self.code != 0).then(|| "rejected".to_string()),
                data: (self.code == 0).then_some(PushData { message_id: 7 }),
            })
        }
    }

    fn settings() -> MapSettings {
        MapSettings::new()
            .with("dadapush.enabled", "true")
            .with("dadapush.projectconfig", "1,2,3")
            .with("dadapush.projectconfig.1.project", "com.acme:*")
            .with("dadapush.projectconfig.1.channelToken", "tok-acme")
            .with("dadapush.projectconfig.2.project", "com.quiet:app")
            .with("dadapush.projectconfig.2.channelToken", " ")
            .with("dadapush.projectconfig.3.project", "com.strict:*")
            .with("dadapush.projectconfig.3.channelToken", "tok-strict")
            .with("dadapush.projectconfig.3.qg", "true")
    }

    fn event(key: &str, status: Option<GateStatus>) -> AnalysisEvent {
        let gate = status
            .map(|s| format!(r#","qualityGate":{{"status":"{}"}}"#, s))
            .unwrap_or_default();
        let json = format!(r#"{{"project":{{"key":"{}","name":"N"}}{}}}"#, key, gate);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_sends_for_matching_project() {
        let mut service = NotifyService::new(RecordingSink::answering(0));
        let outcome = service
            .process(&settings(), &event("com.acme:widgets", Some(GateStatus::Error)))
            .unwrap();
        assert_eq!(outcome, Outcome::Sent { message_id: Some(7) });

        let pushes = service.sink.pushes.borrow();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].0, DEFAULT_BASE_PATH);
        assert_eq!(pushes[0].1, "tok-acme");
        assert_eq!(pushes[0].2.title, "ERROR");
    }

    #[test]
    fn test_custom_base_path() {
        let mut service = NotifyService::new(RecordingSink::answering(0));
        let settings = settings().with("dadapush.basePath", "http://localhost:9000");
        service
            .process(&settings, &event("com.acme:widgets", None))
            .unwrap();
        assert_eq!(service.sink.pushes.borrow()[0].0, "http://localhost:9000");
    }

    #[test]
    fn test_disabled_sends_nothing() {
        let mut service = NotifyService::new(RecordingSink::answering(0));
        let settings = settings().with("dadapush.enabled", "false");
        let outcome = service
            .process(&settings, &event("com.acme:widgets", Some(GateStatus::Error)))
            .unwrap();
        assert_eq!(outcome, Outcome::Disabled);
        assert!(service.sink.pushes.borrow().is_empty());
        // Configuration is still refreshed
        assert_eq!(service.store.len(), 3);
    }

    #[test]
    fn test_unconfigured_project() {
        let mut service = NotifyService::new(RecordingSink::answering(0));
        let outcome = service
            .process(&settings(), &event("org.unknown", Some(GateStatus::Error)))
            .unwrap();
        assert_eq!(outcome, Outcome::NotConfigured);
    }

    #[test]
    fn test_suppression_outcomes() {
        let mut service = NotifyService::new(RecordingSink::answering(0));
        assert_eq!(
            service
                .process(&settings(), &event("com.quiet:app", Some(GateStatus::Error)))
                .unwrap(),
            Outcome::Skipped(SkipReason::BlankChannelToken)
        );
        assert_eq!(
            service
                .process(&settings(), &event("com.strict:lib", Some(GateStatus::Ok)))
                .unwrap(),
            Outcome::Skipped(SkipReason::QualityGatePassed)
        );
        assert!(service.sink.pushes.borrow().is_empty());
    }

    #[test]
    fn test_rejected_push() {
        let mut service = NotifyService::new(RecordingSink::answering(401));
        let outcome = service
            .process(&settings(), &event("com.strict:lib", Some(GateStatus::Error)))
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Rejected {
                code: 401,
                errmsg: "rejected".to_string()
            }
        );
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_corrupted_config_keeps_previous_table() {
        let mut service = NotifyService::new(RecordingSink::answering(0));
        service
            .process(&settings(), &event("com.acme:widgets", None))
            .unwrap();

        let broken = settings().with("dadapush.projectconfig", "1,2,3,4");
        let err = service
            .process(&broken, &event("com.acme:widgets", None))
            .unwrap_err();
        assert!(matches!(err, NotifyError::Configuration(_)));
        assert_eq!(service.store.len(), 3);
        assert_eq!(service.sink.pushes.borrow().len(), 1);
    }

    #[test]
    fn test_relevant_settings_masks_tokens() {
        let mut service = NotifyService::new(RecordingSink::answering(0));
        let settings = settings().with("dadapush.enabled", "false");
        service
            .process(&settings, &event("com.acme:widgets", None))
            .unwrap();
        let report = service.relevant_settings(&settings);
        assert!(report.contains("dadapush.enabled=false"));
        assert!(report.contains("com.acme:* -> ****acme"));
        assert!(!report.contains("tok-acme"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Outcome::Disabled.exit_code(), 0);
        assert_eq!(Outcome::Skipped(SkipReason::QualityGatePassed).exit_code(), 0);
        assert_eq!(Outcome::Sent { message_id: None }.exit_code(), 0);
        assert_eq!(Outcome::Failed("x".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_gate_struct_usable_directly() {
        let event = AnalysisEvent {
            quality_gate: Some(QualityGate {
                status: GateStatus::Warn,
                conditions: Vec::new(),
            }),
            ..event("com.acme:x", None)
        };
        let mut service = NotifyService::new(RecordingSink::answering(0));
        service.process(&settings(), &event).unwrap();
        assert_eq!(service.sink.pushes.borrow()[0].2.title, "WARN");
    }
}
