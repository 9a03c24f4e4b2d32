// ── Broadcast flow state machine ──
//
// One flow per broadcast attempt on a favorite. State lives in a `watch`
// channel; every transition is a single `send_if_modified`, so the
// in-flight guard and the phase change cannot interleave.

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::coordinator::Coordinator;
use crate::error::{CoreError, ErrorInfo};
use crate::model::broadcast::normalize_message;
use crate::model::{BroadcastOutcome, BroadcastRequest, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastPhase {
    /// No platform chosen yet.
    Idle,
    PlatformSelected,
    Submitting,
    /// Terminal until `reset`.
    Succeeded,
    /// Retains the failure until the next submit.
    Failed,
}

/// Observable state of a [`BroadcastFlow`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BroadcastSnapshot {
    pub favorite_id: i64,
    pub phase: BroadcastPhase,
    pub platform: Option<Platform>,
    pub message: Option<String>,
    pub outcome: Option<BroadcastOutcome>,
    pub error: Option<ErrorInfo>,
    /// Submissions that reached the gateway.
    pub attempts: u32,
}

impl BroadcastSnapshot {
    fn fresh(favorite_id: i64) -> Self {
        Self {
            favorite_id,
            phase: BroadcastPhase::Idle,
            platform: None,
            message: None,
            outcome: None,
            error: None,
            attempts: 0,
        }
    }

    /// Guard shared by every edit: nothing changes mid-flight or after
    /// success.
    fn check_editable(&self) -> Result<(), CoreError> {
        match self.phase {
            BroadcastPhase::Submitting => Err(CoreError::SubmissionInFlight),
            BroadcastPhase::Succeeded => Err(CoreError::validation(
                "phase",
                "broadcast already succeeded; reset to start another",
            )),
            _ => Ok(()),
        }
    }
}

/// Drives one broadcast from platform selection to a terminal outcome.
///
/// At most one submission is in flight per flow: a `submit` while
/// `Submitting` fails with [`CoreError::SubmissionInFlight`] without
/// touching the network.
pub struct BroadcastFlow {
    coordinator: Coordinator,
    state: watch::Sender<BroadcastSnapshot>,
}

impl BroadcastFlow {
    pub fn new(coordinator: Coordinator, favorite_id: i64) -> Self {
        let (state, _) = watch::channel(BroadcastSnapshot::fresh(favorite_id));
        Self { coordinator, state }
    }

    pub fn snapshot(&self) -> BroadcastSnapshot {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> BroadcastPhase {
        self.state.borrow().phase
    }

    pub fn subscribe(&self) -> watch::Receiver<BroadcastSnapshot> {
        self.state.subscribe()
    }

    // ── Edits ────────────────────────────────────────────────────────

    pub fn select_platform(&self, platform: Platform) -> Result<(), CoreError> {
        self.edit(|snap| {
            snap.platform = Some(platform);
            // A failure stays in `error` until the next submit clears it.
            if matches!(snap.phase, BroadcastPhase::Idle | BroadcastPhase::Failed) {
                snap.phase = BroadcastPhase::PlatformSelected;
            }
        })
    }

    /// Set or clear the message override. Blank text clears it.
    pub fn set_message(&self, message: Option<String>) -> Result<(), CoreError> {
        let message = normalize_message(message);
        self.edit(|snap| snap.message = message)
    }

    /// Start a fresh attempt. Not allowed while a submission is in flight.
    pub fn reset(&self) -> Result<(), CoreError> {
        let mut result = Ok(());
        self.state.send_if_modified(|snap| {
            if snap.phase == BroadcastPhase::Submitting {
                result = Err(CoreError::SubmissionInFlight);
                return false;
            }
            *snap = BroadcastSnapshot::fresh(snap.favorite_id);
            true
        });
        result
    }

    fn edit(&self, apply: impl FnOnce(&mut BroadcastSnapshot)) -> Result<(), CoreError> {
        let mut result = Ok(());
        self.state.send_if_modified(|snap| {
            if let Err(e) = snap.check_editable() {
                result = Err(e);
                return false;
            }
            apply(snap);
            true
        });
        result
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Send the broadcast.
    ///
    /// Allowed from `PlatformSelected` or `Failed`. A remote reply with
    /// `delivered == false` ends in `Failed` with
    /// [`CoreError::NotDelivered`].
    pub async fn submit(&self) -> Result<BroadcastOutcome, CoreError> {
        let request = self.begin_submit()?;
        let mut guard = SubmitGuard {
            state: &self.state,
            armed: true,
        };

        let result = self.coordinator.send_broadcast(&request).await;
        guard.armed = false;

        match result {
            Ok(outcome) if outcome.delivered => {
                debug!(favorite_id = request.favorite_id, "broadcast succeeded");
                self.state.send_modify(|snap| {
                    snap.phase = BroadcastPhase::Succeeded;
                    snap.outcome = Some(outcome.clone());
                });
                Ok(outcome)
            }
            Ok(outcome) => {
                let err = CoreError::NotDelivered {
                    detail: outcome
                        .detail
                        .clone()
                        .unwrap_or_else(|| "no detail reported".into()),
                };
                warn!(favorite_id = request.favorite_id, error = %err, "broadcast not delivered");
                self.fail(&err, Some(outcome));
                Err(err)
            }
            Err(err) => {
                warn!(favorite_id = request.favorite_id, error = %err, "broadcast failed");
                self.fail(&err, None);
                Err(err)
            }
        }
    }

    /// Validate and move to `Submitting` in one step.
    fn begin_submit(&self) -> Result<BroadcastRequest, CoreError> {
        let mut result = Err(CoreError::Internal("submit was not evaluated".into()));
        self.state.send_if_modified(|snap| {
            if let Err(e) = snap.check_editable() {
                result = Err(e);
                return false;
            }
            let Some(platform) = snap.platform else {
                result = Err(CoreError::validation(
                    "platform",
                    "select a platform before submitting",
                ));
                return false;
            };

            result = Ok(BroadcastRequest {
                favorite_id: snap.favorite_id,
                platform,
                message_override: snap.message.clone(),
            });
            snap.phase = BroadcastPhase::Submitting;
            snap.error = None;
            snap.outcome = None;
            snap.attempts += 1;
            true
        });
        result
    }

    fn fail(&self, err: &CoreError, outcome: Option<BroadcastOutcome>) {
        let info = ErrorInfo::from(err);
        self.state.send_modify(|snap| {
            snap.phase = BroadcastPhase::Failed;
            snap.error = Some(info);
            snap.outcome = outcome;
        });
    }
}

/// Moves an abandoned submission to `Failed` so the flow never sticks in
/// `Submitting`.
struct SubmitGuard<'a> {
    state: &'a watch::Sender<BroadcastSnapshot>,
    armed: bool,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|snap| {
                snap.phase = BroadcastPhase::Failed;
                snap.error = Some(ErrorInfo::abandoned("broadcast"));
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use std::time::Duration;

    use newscast_api::{NewsClient, TransportConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ErrorKind;
    use crate::store::CacheStore;

    fn flow_for(base_url: &str) -> BroadcastFlow {
        let client = NewsClient::new(base_url, &TransportConfig::default()).unwrap();
        BroadcastFlow::new(Coordinator::new(client, Arc::new(CacheStore::new())), 7)
    }

    // Nothing listens on the discard port; failures are immediate.
    fn offline_flow() -> BroadcastFlow {
        flow_for("http://127.0.0.1:9/api/v1")
    }

    #[tokio::test]
    async fn submit_without_platform_is_rejected() {
        let flow = offline_flow();
        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "platform"));
        assert_eq!(flow.phase(), BroadcastPhase::Idle);
        assert_eq!(flow.snapshot().attempts, 0);
    }

    #[test]
    fn select_platform_moves_to_selected() {
        let flow = offline_flow();
        flow.select_platform(Platform::Blog).unwrap();
        let snap = flow.snapshot();
        assert_eq!(snap.phase, BroadcastPhase::PlatformSelected);
        assert_eq!(snap.platform, Some(Platform::Blog));
    }

    #[test]
    fn blank_message_is_cleared() {
        let flow = offline_flow();
        flow.set_message(Some("draft".into())).unwrap();
        flow.set_message(Some("  \n".into())).unwrap();
        assert_eq!(flow.snapshot().message, None);
    }

    #[test]
    fn edits_rejected_while_submitting() {
        let flow = offline_flow();
        flow.state.send_modify(|s| s.phase = BroadcastPhase::Submitting);

        assert!(matches!(
            flow.select_platform(Platform::Email),
            Err(CoreError::SubmissionInFlight)
        ));
        assert!(matches!(flow.reset(), Err(CoreError::SubmissionInFlight)));
    }

    #[tokio::test]
    async fn submit_while_submitting_never_reaches_gateway() {
        let flow = offline_flow();
        flow.select_platform(Platform::Email).unwrap();
        flow.state.send_modify(|s| s.phase = BroadcastPhase::Submitting);

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, CoreError::SubmissionInFlight));
        assert_eq!(flow.snapshot().attempts, 0);
    }

    #[tokio::test]
    async fn network_failure_is_retained_until_next_submit() {
        let flow = offline_flow();
        flow.select_platform(Platform::Email).unwrap();

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, CoreError::ConnectionFailed { .. }));

        let snap = flow.snapshot();
        assert_eq!(snap.phase, BroadcastPhase::Failed);
        assert_eq!(snap.error.unwrap().kind, ErrorKind::Connection);

        // Re-selecting returns to PlatformSelected but keeps the failure visible.
        flow.select_platform(Platform::Newsletter).unwrap();
        let snap = flow.snapshot();
        assert_eq!(snap.phase, BroadcastPhase::PlatformSelected);
        assert_eq!(snap.platform, Some(Platform::Newsletter));
        assert_eq!(snap.error.unwrap().kind, ErrorKind::Connection);

        let _ = flow.submit().await;
        let snap = flow.snapshot();
        assert_eq!(snap.attempts, 2);
        assert_eq!(snap.phase, BroadcastPhase::Failed);
    }

    #[test]
    fn succeeded_is_terminal_until_reset() {
        let flow = offline_flow();
        flow.select_platform(Platform::Email).unwrap();
        flow.state.send_modify(|s| s.phase = BroadcastPhase::Succeeded);

        assert!(flow.set_message(Some("again".into())).is_err());
        flow.reset().unwrap();

        let snap = flow.snapshot();
        assert_eq!(snap.phase, BroadcastPhase::Idle);
        assert_eq!(snap.platform, None);
        assert_eq!(snap.favorite_id, 7);
    }

    #[tokio::test]
    async fn dropped_submit_fails_as_abandoned() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/broadcast"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"delivered": true}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let flow = flow_for(&format!("{}/api/v1", server.uri()));
        flow.select_platform(Platform::Email).unwrap();

        let abandoned = tokio::time::timeout(Duration::from_millis(50), flow.submit()).await;
        assert!(abandoned.is_err());

        let snap = flow.snapshot();
        assert_eq!(snap.phase, BroadcastPhase::Failed);
        assert_eq!(snap.error.unwrap().kind, ErrorKind::Abandoned);
        assert_eq!(snap.attempts, 1);
    }
}
