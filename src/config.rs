// src/config.rs
//! Command line, config file and environment, resolved once into
//! [`AppConfig`] before any digest runs.
//!
//! Every per-database mail setting falls back to the global one. The
//! `NOTION_API_KEY` and `NOTION_DIGEST_SMTP_*` environment variables take
//! precedence over the global values in the file, but not over per-database
//! ones.

use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_IGNORE_TAG, DEFAULT_SMTP_PORT, DEFAULT_TIMEZONE,
    NOTION_API_BASE_URL,
};
use crate::error::AppError;
use crate::model::{DigestStyle, IgnoreRule};
use crate::normalize::{ViewerClock, DEFAULT_TAGS_PROPERTY, DEFAULT_TITLE_PROPERTY};
use crate::types::{ApiKey, DatabaseId, ValidatedUrl};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SUBJECT_TEMPLATE: &str = "{{dbname}} digest for {{date}}";
pub const DEFAULT_BODY_TEMPLATE: &str = "{{mail.content}}";

/// Parsed command-line input.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Path to the YAML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Print each mail to stdout instead of sending it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Also write each digest to <DIR>/<database name>.html
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Only run the database with this name
    #[arg(long)]
    pub only: Option<String>,
}

// --- Config file shape ---

/// The YAML config file, exactly as written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub timezone: Option<String>,
    #[serde(default)]
    pub mail: MailSection,
    #[serde(default)]
    pub db: Vec<DatabaseSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailSection {
    #[serde(default)]
    pub smtp: SmtpSection,
    pub from: Option<String>,
    pub to: Option<Vec<String>>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSection {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub style: DigestStyle,
    pub title_property: Option<String>,
    pub tags_property: Option<String>,
    #[serde(default)]
    pub notion: QuerySection,
    pub ignore: Option<IgnoreSection>,
    #[serde(default)]
    pub mail: MailSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuerySection {
    #[serde(rename = "filterJSON", default)]
    pub filter_json: String,
    #[serde(rename = "sortJSON", default)]
    pub sort_json: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreSection {
    pub tags: Option<Vec<String>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl ConfigFile {
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self, AppError> {
        serde_yaml::from_str(content).map_err(|source| AppError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }
}

// --- Resolved configuration ---

#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything needed to deliver one database's digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    /// `None` only in a dry run, where nothing is sent.
    pub smtp: Option<SmtpSettings>,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// One database to digest, with every setting already resolved.
#[derive(Debug, Clone)]
pub struct DatabaseJob {
    pub database_id: DatabaseId,
    pub name: String,
    pub style: DigestStyle,
    pub title_property: String,
    pub tags_property: String,
    pub filter_template: String,
    pub sort_template: String,
    pub ignore: IgnoreRule,
    pub mail: MailSettings,
}

/// Resolved application configuration, validated and ready to run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: ApiKey,
    pub api_base_url: ValidatedUrl,
    pub clock: ViewerClock,
    pub jobs: Vec<DatabaseJob>,
    pub dry_run: bool,
    pub verbose: bool,
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads the config file named on the command line and resolves it
    /// against the process environment.
    pub fn load(cli: CommandLineInput) -> Result<Self, AppError> {
        let file = ConfigFile::read(&cli.config)?;
        Self::resolve(cli, file, |key| std::env::var(key).ok())
    }

    /// Resolves every setting once. `env` looks up environment variables.
    pub fn resolve<E>(cli: CommandLineInput, file: ConfigFile, env: E) -> Result<Self, AppError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let api_key = env("NOTION_API_KEY")
            .or(file.api_key)
            .ok_or_else(|| {
                AppError::MissingConfiguration(
                    "apiKey (or NOTION_API_KEY environment variable)".to_string(),
                )
            })?;
        let api_key = ApiKey::new(api_key)?;

        let api_base_url = ValidatedUrl::parse(
            file.api_base_url
                .as_deref()
                .unwrap_or(NOTION_API_BASE_URL),
        )?;

        let clock = ViewerClock::from_name(file.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE))?;

        let global_mail = apply_env_overrides(file.mail, &env)?;

        if file.db.is_empty() {
            return Err(AppError::MissingConfiguration(
                "db (no databases configured)".to_string(),
            ));
        }

        let mut jobs = file
            .db
            .into_iter()
            .map(|section| resolve_job(section, &global_mail, cli.dry_run))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(only) = &cli.only {
            jobs.retain(|job| &job.name == only);
            if jobs.is_empty() {
                return Err(AppError::InvalidConfiguration(format!(
                    "no database named '{}' in {}",
                    only,
                    cli.config.display()
                )));
            }
        }

        Ok(AppConfig {
            api_key,
            api_base_url,
            clock,
            jobs,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
            output_dir: cli.output_dir,
        })
    }
}

fn apply_env_overrides<E>(mut mail: MailSection, env: &E) -> Result<MailSection, AppError>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(host) = env("NOTION_DIGEST_SMTP_HOST") {
        mail.smtp.host = Some(host);
    }
    if let Some(port) = env("NOTION_DIGEST_SMTP_PORT") {
        let port = port.parse::<u16>().map_err(|e| {
            AppError::InvalidConfiguration(format!("NOTION_DIGEST_SMTP_PORT '{}': {}", port, e))
        })?;
        mail.smtp.port = Some(port);
    }
    if let Some(username) = env("NOTION_DIGEST_SMTP_USERNAME") {
        mail.smtp.username = Some(username);
    }
    if let Some(password) = env("NOTION_DIGEST_SMTP_PASSWORD") {
        mail.smtp.password = Some(password);
    }
    Ok(mail)
}

fn resolve_job(
    section: DatabaseSection,
    global: &MailSection,
    dry_run: bool,
) -> Result<DatabaseJob, AppError> {
    let database_id = DatabaseId::parse(&section.id)?;
    let name = section.name.unwrap_or_else(|| database_id.to_string());

    let ignore = section.ignore.unwrap_or_default();
    let ignore_tags = ignore
        .tags
        .unwrap_or_else(|| vec![DEFAULT_IGNORE_TAG.to_string()]);
    let ignore = IgnoreRule {
        tags: ignore_tags.into_iter().collect(),
        created_before: ignore.created_before,
    };

    let mail = resolve_mail(&name, section.mail, global, dry_run)?;

    Ok(DatabaseJob {
        database_id,
        name,
        style: section.style,
        title_property: section
            .title_property
            .unwrap_or_else(|| DEFAULT_TITLE_PROPERTY.to_string()),
        tags_property: section
            .tags_property
            .unwrap_or_else(|| DEFAULT_TAGS_PROPERTY.to_string()),
        filter_template: section.notion.filter_json,
        sort_template: section.notion.sort_json,
        ignore,
        mail,
    })
}

/// Per-database value first, then the global one, else an error naming both.
fn required<T: Clone>(db: &str, key: &str, local: Option<T>, global: &Option<T>) -> Result<T, AppError> {
    local.or_else(|| global.clone()).ok_or_else(|| {
        AppError::MissingConfiguration(format!(
            "database '{}': {} is set neither on the database nor globally",
            db, key
        ))
    })
}

fn resolve_mail(
    db: &str,
    local: MailSection,
    global: &MailSection,
    dry_run: bool,
) -> Result<MailSettings, AppError> {
    let smtp = if dry_run {
        None
    } else {
        Some(SmtpSettings {
            host: required(db, "mail.smtp.host", local.smtp.host, &global.smtp.host)?,
            port: local
                .smtp
                .port
                .or(global.smtp.port)
                .unwrap_or(DEFAULT_SMTP_PORT),
            username: required(db, "mail.smtp.username", local.smtp.username, &global.smtp.username)?,
            password: required(db, "mail.smtp.password", local.smtp.password, &global.smtp.password)?,
        })
    };

    let to = required(db, "mail.to", local.to, &global.to)?;
    if to.is_empty() {
        return Err(AppError::InvalidConfiguration(format!(
            "database '{}': mail.to has no recipients",
            db
        )));
    }

    Ok(MailSettings {
        smtp,
        from: required(db, "mail.from", local.from, &global.from)?,
        to,
        subject: local
            .subject
            .or_else(|| global.subject.clone())
            .unwrap_or_else(|| DEFAULT_SUBJECT_TEMPLATE.to_string()),
        body: local
            .body
            .or_else(|| global.body.clone())
            .unwrap_or_else(|| DEFAULT_BODY_TEMPLATE.to_string()),
    })
}
