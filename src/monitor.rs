// src/monitor.rs
//! Sequential lookup of one address across both services
//!
//! A run has three stages, each reported as soon as it finishes:
//! HIBP breaches, a rate-limit pause, HIBP pastes, then hacked-emails.com.
//! Lookup failures are logged and the run moves on; only a
//! hacked-emails.com rejection of the address ends the run with an error.
//! A shutdown request abandons the lookup or pause in flight.

use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::cli::Cli;
use crate::config::Config;
use crate::delay::{pause, until_shutdown, PauseOutcome};
use crate::filter::DateThreshold;
use crate::output::HumanOutput;
use crate::progress::ProgressIndicator;
use crate::providers::{HackedEmailsClient, HibpClient};
use crate::report::{build_report, Report, ReportContext};

/// Read-only settings for a run
#[derive(Debug, Clone)]
pub struct Settings {
    pub email: String,
    pub threshold: DateThreshold,
    /// Append raw record dumps
    pub verbose: bool,
    /// Hide summary lines that have nothing to say
    pub silent: bool,
    /// Pause between the HIBP breach and paste lookups
    pub rate_limit_delay: Duration,
}

impl Settings {
    /// Build settings from parsed arguments and the loaded config
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        Self {
            email: cli.email.trim().to_string(),
            threshold: DateThreshold::from_arg(cli.filter_date.as_deref()),
            verbose: cli.debug,
            silent: cli.silent,
            rate_limit_delay: Duration::from_secs(config.rate_limit.delay_secs),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every stage ran
    Completed,
    /// Shutdown was requested before the last stage finished
    Interrupted,
}

/// How a single stage ended
enum Stage {
    Done,
    Interrupted,
}

/// Runs the lookup stages and writes their reports
pub struct BreachMonitor<W: Write> {
    hibp: HibpClient,
    hacked_emails: HackedEmailsClient,
    settings: Settings,
    output: HumanOutput<W>,
    progress: ProgressIndicator,
}

impl<W: Write> BreachMonitor<W> {
    pub fn new(
        hibp: HibpClient,
        hacked_emails: HackedEmailsClient,
        settings: Settings,
        output: HumanOutput<W>,
    ) -> Self {
        Self {
            hibp,
            hacked_emails,
            settings,
            output,
            progress: ProgressIndicator::new(false),
        }
    }

    /// Build a monitor from arguments and config
    ///
    /// Fails without touching the network when no API key can be resolved.
    pub fn from_cli(cli: &Cli, config: &Config, output: HumanOutput<W>) -> Result<Self> {
        let api_key = cli.resolve_api_key()?;

        let hibp = HibpClient::new(&api_key, &config.hibp)?;
        let hacked_emails = HackedEmailsClient::new(&config.hacked_emails)?;

        Ok(Self::new(hibp, hacked_emails, Settings::from_cli(cli, config), output))
    }

    /// Show a spinner while lookups run
    pub fn with_progress(mut self, progress: ProgressIndicator) -> Self {
        self.progress = progress;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run all stages in order
    ///
    /// A shutdown request stops the run at whichever stage is in flight.
    pub async fn run(&mut self, shutdown: &mut watch::Receiver<bool>) -> Result<RunOutcome> {
        info!("Looking up {}", self.settings.email);

        match self.report_hibp_breaches(shutdown).await {
            Ok(Stage::Done) => {}
            Ok(Stage::Interrupted) => return Ok(self.interrupted("breach lookup")),
            Err(e) => error!("error looking up breach data for {}: {:#}", self.settings.email, e),
        }

        // HIBP rate-limits consecutive requests from the same key
        if pause(self.settings.rate_limit_delay, shutdown).await == PauseOutcome::Cancelled {
            return Ok(self.interrupted("rate-limit pause"));
        }

        match self.report_hibp_pastes(shutdown).await {
            Ok(Stage::Done) => {}
            Ok(Stage::Interrupted) => return Ok(self.interrupted("paste lookup")),
            Err(e) => error!("error looking up paste data for {}: {:#}", self.settings.email, e),
        }

        match self.report_hacked_emails(shutdown).await? {
            Stage::Done => Ok(RunOutcome::Completed),
            Stage::Interrupted => Ok(self.interrupted(HackedEmailsClient::NAME)),
        }
    }

    fn interrupted(&mut self, during: &str) -> RunOutcome {
        self.progress.stop();
        warn!("Interrupted during {}, skipping remaining lookups", during);
        RunOutcome::Interrupted
    }

    /// Stage A: breaches from haveibeenpwned.com
    async fn report_hibp_breaches(&mut self, shutdown: &mut watch::Receiver<bool>) -> Result<Stage> {
        self.progress
            .start(format!("Checking {} for breaches...", HibpClient::NAME));
        let breaches = until_shutdown(self.hibp.lookup_breaches(&self.settings.email), shutdown).await;
        self.progress.stop();

        let Some(breaches) = breaches else {
            return Ok(Stage::Interrupted);
        };
        let report = build_report(&breaches?, &self.context(HibpClient::NAME, &self.settings.email));
        self.emit(&report)?;
        Ok(Stage::Done)
    }

    /// Stage B: pastes from haveibeenpwned.com
    async fn report_hibp_pastes(&mut self, shutdown: &mut watch::Receiver<bool>) -> Result<Stage> {
        self.progress
            .start(format!("Checking {} for pastes...", HibpClient::NAME));
        let pastes = until_shutdown(self.hibp.lookup_pastes(&self.settings.email), shutdown).await;
        self.progress.stop();

        let Some(pastes) = pastes else {
            return Ok(Stage::Interrupted);
        };
        let report = build_report(&pastes?, &self.context(HibpClient::NAME, &self.settings.email));
        self.emit(&report)?;
        Ok(Stage::Done)
    }

    /// Stage C: breaches from hacked-emails.com
    ///
    /// Only a rejected address is returned as an error.
    async fn report_hacked_emails(&mut self, shutdown: &mut watch::Receiver<bool>) -> Result<Stage> {
        self.progress
            .start(format!("Checking {}...", HackedEmailsClient::NAME));
        let response = until_shutdown(self.hacked_emails.lookup(&self.settings.email), shutdown).await;
        self.progress.stop();

        let response = match response {
            None => return Ok(Stage::Interrupted),
            Some(Ok(response)) => response,
            Some(Err(e)) => {
                error!("{:#}", e);
                return Ok(Stage::Done);
            }
        };

        if response.is_bad_syntax() {
            anyhow::bail!(
                "query for {} was rejected. perhaps you did not provide a valid email address?",
                self.settings.email
            );
        }

        // The service echoes the address it actually searched for
        let email = if response.query.trim().is_empty() {
            self.settings.email.clone()
        } else {
            response.query.clone()
        };
        let breaches = response.into_breaches();

        let report = build_report(&breaches, &self.context(HackedEmailsClient::NAME, &email));
        if let Err(e) = self.emit(&report) {
            error!("{:#}", e);
        }
        Ok(Stage::Done)
    }

    fn context<'a>(&'a self, source: &'a str, email: &'a str) -> ReportContext<'a> {
        ReportContext {
            email,
            source,
            threshold: &self.settings.threshold,
            verbose: self.settings.verbose,
            silent: self.settings.silent,
        }
    }

    fn emit(&mut self, report: &Report) -> Result<()> {
        self.output.emit(report)?;
        Ok(())
    }

    /// Tear down the monitor, returning its output
    pub fn into_output(self) -> HumanOutput<W> {
        self.output
    }
}
