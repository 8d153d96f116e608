//! Pipeline trigger and notifier
//!
//! Each [`PrefillRequest`] runs on its own task and ends in exactly one
//! [`Notification`] on the outbound channel.

use crate::adapters::connector::RuntimeConfig;
use crate::core::pipeline::PrefillPipeline;
use crate::domain::fhir::Bundle;
use crate::domain::{CorrelationId, ErrorKind, PrefillError, ReplyTo};
use crate::{log_error_with_context, log_prefill_complete, log_prefill_start};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

/// A request to prefill a prescription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefillRequest {
    pub correlation_id: CorrelationId,
    pub reply_to: ReplyTo,
    pub runtime_config: Option<RuntimeConfig>,
}

impl PrefillRequest {
    pub fn new(correlation_id: CorrelationId, reply_to: ReplyTo) -> Self {
        Self {
            correlation_id,
            reply_to,
            runtime_config: None,
        }
    }

    pub fn with_runtime_config(mut self, runtime_config: RuntimeConfig) -> Self {
        self.runtime_config = Some(runtime_config);
        self
    }
}

/// A failed run, addressed back to its requester
#[derive(Debug)]
pub struct FailureNotification {
    pub error: PrefillError,
    pub reply_to: ReplyTo,
    pub correlation_id: CorrelationId,
}

impl FailureNotification {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Terminal outcome of a run
#[derive(Debug)]
pub enum Notification {
    BundlesReady { bundles: Vec<Bundle> },
    Failed(FailureNotification),
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Bookkeeping for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefillRun {
    pub correlation_id: CorrelationId,
    pub state: RunState,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl PrefillRun {
    pub fn new(correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            state: RunState::Idle,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn mark_started(&mut self) {
        self.started_at = Some(Utc::now());
        self.finished_at = None;
        self.state = RunState::Running;
    }

    pub fn mark_succeeded(&mut self) {
        self.finished_at = Some(Utc::now());
        self.state = RunState::Succeeded;
    }

    pub fn mark_failed(&mut self) {
        self.finished_at = Some(Utc::now());
        self.state = RunState::Failed;
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, RunState::Succeeded | RunState::Failed)
    }

    /// Time from start to finish, once finished
    pub fn duration(&self) -> Option<std::time::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => (end - start).to_std().ok(),
            _ => None,
        }
    }
}

/// Accepts prefill requests and publishes their outcomes
#[derive(Debug, Clone)]
pub struct PrefillService {
    pipeline: PrefillPipeline,
    notifications: mpsc::Sender<Notification>,
}

impl PrefillService {
    pub fn new(pipeline: PrefillPipeline, notifications: mpsc::Sender<Notification>) -> Self {
        Self {
            pipeline,
            notifications,
        }
    }

    /// Starts a run on its own task
    ///
    /// A run that panics still publishes a Failed notification and resolves
    /// to a failed [`PrefillRun`].
    pub fn submit(&self, request: PrefillRequest) -> JoinHandle<PrefillRun> {
        tokio::spawn(supervise(
            self.pipeline.clone(),
            self.notifications.clone(),
            request,
        ))
    }

    /// Handles requests until the inbound channel closes
    ///
    /// Returns once every started run has published its notification.
    pub async fn serve(self, mut requests: mpsc::Receiver<PrefillRequest>) {
        let mut runs = JoinSet::new();

        while let Some(request) = requests.recv().await {
            runs.spawn(supervise(
                self.pipeline.clone(),
                self.notifications.clone(),
                request,
            ));
        }

        tracing::info!(in_flight = runs.len(), "Request channel closed, draining runs");
        while let Some(joined) = runs.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Prefill task panicked");
            }
        }
    }
}

async fn execute(
    pipeline: PrefillPipeline,
    notifications: mpsc::Sender<Notification>,
    request: PrefillRequest,
) -> PrefillRun {
    let PrefillRequest {
        correlation_id,
        reply_to,
        runtime_config,
    } = request;

    let mut run = PrefillRun::new(correlation_id.clone());
    run.mark_started();
    log_prefill_start!(&correlation_id, &reply_to);

    let notification = match pipeline.assemble(runtime_config.as_ref()).await {
        Ok(bundle) => {
            run.mark_succeeded();
            log_prefill_complete!(
                &correlation_id,
                bundle.entries().len(),
                run.duration().unwrap_or_default()
            );
            Notification::BundlesReady {
                bundles: vec![bundle],
            }
        }
        Err(error) => {
            run.mark_failed();
            if error.is_missing_card() {
                tracing::warn!(
                    correlation_id = %correlation_id,
                    error = %error,
                    "Prefill run stopped: card missing"
                );
            } else {
                log_error_with_context!(&error, "Prefill run failed");
            }
            Notification::Failed(FailureNotification {
                error,
                reply_to,
                correlation_id: correlation_id.clone(),
            })
        }
    };

    publish(&notifications, notification, &run).await;
    run
}

/// Runs [`execute`] on an inner task and turns a panic into a Failed notification
async fn supervise(
    pipeline: PrefillPipeline,
    notifications: mpsc::Sender<Notification>,
    request: PrefillRequest,
) -> PrefillRun {
    let correlation_id = request.correlation_id.clone();
    let reply_to = request.reply_to.clone();

    match tokio::spawn(execute(pipeline, notifications.clone(), request)).await {
        Ok(run) => run,
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                error = %e,
                "Prefill task panicked"
            );
            let mut run = PrefillRun::new(correlation_id.clone());
            run.mark_started();
            run.mark_failed();

            let notification = Notification::Failed(FailureNotification {
                error: PrefillError::Other(format!("Prefill run aborted: {e}")),
                reply_to,
                correlation_id,
            });
            publish(&notifications, notification, &run).await;
            run
        }
    }
}

async fn publish(
    notifications: &mpsc::Sender<Notification>,
    notification: Notification,
    run: &PrefillRun,
) {
    if let Err(mpsc::error::SendError(dropped)) = notifications.send(notification).await {
        tracing::warn!(
            correlation_id = %run.correlation_id,
            outcome = ?run.state,
            notification = ?dropped,
            "Notification receiver closed, discarding outcome"
        );
    }
}
