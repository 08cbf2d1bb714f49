// src/executor.rs
//! Runs every configured database's digest concurrently, once.
//!
//! Each job is independent: its own fetch, its own digest, its own
//! delivery. A failing job is logged and reported but never stops the
//! others. Scheduling (cron, systemd timers) is left to whatever invokes
//! the binary.

use crate::api::DatabaseQuery;
use crate::config::{AppConfig, DatabaseJob};
use crate::error::AppError;
use crate::normalize::{ItemNormalizer, PropertyNormalizer};
use crate::output::{deliver, plan_delivery, OutputReport};
use crate::pipeline::{DigestDelivery, DigestPipeline};
use crate::query_template::QueryTemplates;
use crate::types::Digest;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// What happened to one database's digest.
#[derive(Debug)]
pub struct JobOutcome {
    pub name: String,
    pub result: Result<OutputReport, AppError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs all jobs in `config` concurrently and waits for every one.
///
/// Outcomes come back in configuration order.
pub async fn run_jobs<Q>(config: Arc<AppConfig>, query: Q, cancel: CancellationToken) -> Vec<JobOutcome>
where
    Q: DatabaseQuery + Clone + 'static,
{
    let mut tasks = JoinSet::new();

    for (index, job) in config.jobs.iter().cloned().enumerate() {
        let config = Arc::clone(&config);
        let query = query.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            let result = run_job(&config, &job, query, &cancel).await;
            (index, JobOutcome {
                name: job.name,
                result,
            })
        });
    }

    let mut outcomes = Vec::with_capacity(config.jobs.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => log::error!("Digest task panicked: {}", e),
        }
    }
    outcomes.sort_by_key(|(index, _)| *index);

    let outcomes: Vec<JobOutcome> = outcomes.into_iter().map(|(_, outcome)| outcome).collect();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => log::info!(
                "Digest '{}' delivered to {} target(s)",
                outcome.name,
                report.stats.operations_completed
            ),
            Err(e) => log::error!("Digest '{}' failed: {}", outcome.name, e),
        }
    }
    outcomes
}

/// Generates and delivers one database's digest.
pub async fn run_job<Q: DatabaseQuery>(
    config: &AppConfig,
    job: &DatabaseJob,
    query: Q,
    cancel: &CancellationToken,
) -> Result<OutputReport, AppError> {
    let now = Utc::now();
    let today = config.clock.today(now);

    let templates = QueryTemplates::new();
    let filter = templates.expand_filter(&job.filter_template, today)?;
    let sorts = templates.expand_sorts(&job.sort_template, today)?;

    let normalizer = ItemNormalizer::new(job.style, PropertyNormalizer::new(config.clock))
        .with_title_property(job.title_property.as_str())
        .with_tags_property(job.tags_property.as_str());
    let pipeline = DigestPipeline::from_query(query, normalizer);

    log::debug!("Running digest '{}' for database {}", job.name, job.database_id);
    let digest = pipeline
        .generate_digest(&job.database_id, filter, sorts, &job.ignore, cancel)
        .await?;

    JobDelivery { config, job, now }.deliver(digest).await
}

/// Delivers one job's digest according to the resolved configuration.
struct JobDelivery<'a> {
    config: &'a AppConfig,
    job: &'a DatabaseJob,
    now: DateTime<Utc>,
}

#[async_trait::async_trait]
impl DigestDelivery for JobDelivery<'_> {
    async fn deliver(&self, digest: Digest) -> Result<OutputReport, AppError> {
        let plan = plan_delivery(self.config, self.job, &digest, self.now)?;
        let report = deliver(plan).await;

        if !report.is_success() {
            return Err(AppError::DeliveryFailed {
                failures: report.failure_messages(),
            });
        }
        Ok(report)
    }
}

/// Cancels `token` when the process receives Ctrl-C.
pub fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::warn!("Interrupted; cancelling running digests");
                token.cancel();
            }
            Err(e) => log::warn!("Could not listen for Ctrl-C: {}", e),
        }
    });
}
