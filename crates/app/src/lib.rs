//! Resumatch - wiring and commands for the command-line client
//!
//! Connects the infrastructure adapters to the application layer and
//! exposes the handful of commands the binary understands.

use std::fmt::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;

use resumatch_application::ports::TransportError;
use resumatch_application::{
    AnalysisApi, ApiClient, MonitorHandle, ProgressCallback, ResumeUpload, SessionError,
    SessionManager, SessionTokens, UploadProgress, retry_if,
};
use resumatch_domain::{ApiError, HistoryQuery, LoginCredentials};
use resumatch_infrastructure::{
    AppConfig, BroadcastSignals, FileKeyValueStore, ReqwestTransport, SystemClock, UploadError,
    file_part_from_path,
};

/// Environment variable holding the password for `login`.
pub const ENV_PASSWORD: &str = "RESUMATCH_PASSWORD";

/// Errors surfaced to the user.
#[derive(Debug, Error)]
pub enum CliError {
    /// `login` was run without a password in the environment.
    #[error("set {var} to log in", var = ENV_PASSWORD)]
    MissingPassword,

    /// The HTTP client could not be created.
    #[error("HTTP client: {0}")]
    Transport(#[from] TransportError),

    /// A backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The resume file could not be read.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Rejected(String),
}

/// Resumatch: resume analysis from the command line.
#[derive(Debug, Parser)]
#[command(name = "resumatch", version)]
pub struct Cli {
    /// Command to run; shows the session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the requested command, defaulting to [`Command::Status`].
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Status)
    }
}

/// Commands understood by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check the backend is reachable
    Health,
    /// Show the stored session
    Status,
    /// Log in; the password is read from RESUMATCH_PASSWORD
    Login {
        /// Account email
        email: String,
    },
    /// End the session
    Logout,
    /// List past analyses
    History {
        /// 1-based page
        #[arg(default_value_t = 1)]
        page: u32,
    },
    /// Upload a resume against a job description
    Analyze {
        /// Resume file
        resume: PathBuf,
        /// Job description text
        #[arg(required = true)]
        description: Vec<String>,
    },
}

/// Wired-up client, session and environment signals.
pub struct App {
    /// Shared API client
    pub client: ApiClient,
    /// Session manager over the file store
    pub session: SessionManager,
    /// Signals fed to the session monitor
    pub signals: Arc<BroadcastSignals>,
    config: AppConfig,
    monitor: OnceLock<MonitorHandle>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("client", &self.client)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Wires every adapter according to `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AppConfig) -> Result<Self, CliError> {
        let tokens = SessionTokens::new();
        let transport = ReqwestTransport::new(&config.client)?;
        let client = ApiClient::new(
            config.client.clone(),
            Arc::new(transport),
            Arc::new(tokens.clone()),
        );
        let signals = Arc::new(BroadcastSignals::default());
        let session = SessionManager::new(
            client.clone(),
            tokens,
            Arc::new(FileKeyValueStore::new(&config.session_file)),
            Arc::new(SystemClock::new()),
            signals.clone(),
            config.session,
        );

        Ok(Self {
            client,
            session,
            signals,
            config,
            monitor: OnceLock::new(),
        })
    }

    /// Restores the stored session and runs `command`, returning the text
    /// to print.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] when the command fails.
    pub async fn run(&self, command: Command) -> Result<String, CliError> {
        let restored = self.session.initialize().await?;
        info!(
            authenticated = restored.is_authenticated,
            file = %self.config.session_file.display(),
            "session restored"
        );
        if self.monitor.get().is_none() {
            let _ = self.monitor.set(self.session.start_monitor()?);
        }

        match command {
            Command::Health => self.health().await,
            Command::Status => Ok(self.status()),
            Command::Login { email } => self.login(email).await,
            Command::Logout => {
                self.session.logout().await;
                Ok("Logged out".to_string())
            }
            Command::History { page } => self.history(page).await,
            Command::Analyze {
                resume,
                description,
            } => self.analyze(resume, description.join(" ")).await,
        }
    }

    async fn health(&self) -> Result<String, CliError> {
        let envelope = retry_if(
            self.config.retry,
            || self.client.health_check(),
            ApiError::is_retryable,
        )
        .await?;
        Ok(format!(
            "{} is up: {}",
            self.config.client.base_url,
            envelope.data.unwrap_or_default()
        ))
    }

    fn status(&self) -> String {
        let state = self.session.snapshot();
        match state.current_user {
            Some(user) if state.is_authenticated => {
                format!("Logged in as {} <{}> (theme: {})", user.name, user.email, state.theme)
            }
            _ => "Not logged in".to_string(),
        }
    }

    async fn login(&self, email: String) -> Result<String, CliError> {
        let password = std::env::var(ENV_PASSWORD)
            .map_err(|_| CliError::MissingPassword)?;
        self.login_with(LoginCredentials::new(email, password)).await
    }

    /// Logs in with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Rejected`] with the backend message and any
    /// field errors when the login fails.
    pub async fn login_with(&self, credentials: LoginCredentials) -> Result<String, CliError> {
        let envelope = self.session.login(&credentials).await;
        match envelope.data {
            Some(user) if envelope.success => Ok(format!("Welcome, {}", user.name)),
            _ => {
                let mut message = envelope
                    .message
                    .unwrap_or_else(|| "Login failed".to_string());
                for (field, errors) in envelope.errors.unwrap_or_default() {
                    let _ = write!(message, "\n  {field}: {}", errors.join(", "));
                }
                Err(CliError::Rejected(message))
            }
        }
    }

    async fn history(&self, page: u32) -> Result<String, CliError> {
        let analyses = AnalysisApi::new(self.client.clone());
        let query = HistoryQuery::page(page, 10);
        let envelope = self
            .session
            .with_auth_retry(|| analyses.history(&query))
            .await?;

        let mut lines: Vec<String> = envelope
            .data
            .unwrap_or_default()
            .iter()
            .map(|a| {
                format!(
                    "{}  {}  {}",
                    a.id,
                    a.job_title.as_deref().unwrap_or(&a.file_name),
                    a.match_score.map_or_else(|| "-".to_string(), |s| format!("{s:.0}%"))
                )
            })
            .collect();
        if let Some(meta) = envelope.meta {
            lines.push(format!("page {}/{} ({} total)", meta.page, meta.total_pages, meta.total));
        }
        Ok(lines.join("\n"))
    }

    async fn analyze(&self, resume: PathBuf, description: String) -> Result<String, CliError> {
        let file = file_part_from_path(&resume).await?;
        let analyses = AnalysisApi::new(self.client.clone());
        let report: &ProgressCallback = &|p: UploadProgress| {
            info!(sent = p.sent, total = p.total, percent = p.percent(), "upload progress");
        };
        let envelope = self
            .session
            .with_auth_retry(|| {
                let upload = ResumeUpload::new(file.clone(), description.clone());
                analyses.upload_resume(upload, Some(report))
            })
            .await?;

        let analysis = envelope
            .data
            .ok_or_else(|| CliError::Rejected("Analysis was not returned".to_string()))?;
        Ok(format!(
            "Analysis {} created; match score {}",
            analysis.id,
            analysis
                .match_score
                .map_or_else(|| "pending".to_string(), |s| format!("{s:.0}%"))
        ))
    }
}
