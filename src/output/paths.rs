// src/output/paths.rs
//! Pure planning: which targets a digest goes to, and where files land.
//!
//! Nothing here performs I/O.

use super::mailer::{compose_mail, ComposedMail};
use super::types::{DeliveryTarget, OutputPlan};
use crate::config::{AppConfig, DatabaseJob};
use crate::error::AppError;
use crate::types::Digest;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Plans every delivery of one database's digest.
///
/// The mail is always composed (so template errors surface even in a dry
/// run); it is sent when SMTP settings are present and printed otherwise.
pub fn plan_delivery(
    config: &AppConfig,
    job: &DatabaseJob,
    digest: &Digest,
    now: DateTime<Utc>,
) -> Result<OutputPlan, AppError> {
    let mail = compose_mail(&job.name, digest, &job.mail, now, &config.clock)?;
    let mut plan = OutputPlan::new().with_operation(mail_target(job, mail, config.dry_run));

    if let Some(dir) = &config.output_dir {
        plan = plan.with_operation(DeliveryTarget::WriteFile {
            path: digest_file_path(dir, &job.name),
            content: digest.as_str().to_string(),
        });
    }

    Ok(plan)
}

fn mail_target(job: &DatabaseJob, mail: ComposedMail, dry_run: bool) -> DeliveryTarget {
    match (&job.mail.smtp, dry_run) {
        (Some(smtp), false) => DeliveryTarget::SendMail {
            smtp: smtp.clone(),
            mail,
        },
        _ => DeliveryTarget::PrintToStdout {
            content: mail.preview(),
        },
    }
}

/// `<dir>/<sanitized name>.html`
pub fn digest_file_path(dir: &Path, db_name: &str) -> PathBuf {
    dir.join(format!("{}.html", sanitize_filename(db_name)))
}

/// Sanitizes a string to be safe for use as a filename.
pub fn sanitize_filename(name: &str) -> String {
    let mut safe_name = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>();

    // Trim whitespace and dots
    safe_name = safe_name.trim().trim_matches('.').to_string();

    if safe_name.chars().count() > 100 {
        safe_name = safe_name.chars().take(100).collect();
    }

    if safe_name.is_empty() {
        safe_name = "unnamed".to_string();
    }

    safe_name
}
