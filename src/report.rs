// src/report.rs
//! Filtering and text rendering of lookup results
//!
//! Every lookup stage goes through [`build_report`]: records are checked
//! against the date threshold, the survivors become [`ReportEntry`] line
//! items, and a summary line is attached. Rendering to text happens
//! separately so reports can be inspected in tests.

use crate::filter::DateThreshold;
use crate::types::{BreachRecord, HackedEmailsBreach, PasteRecord};
use colored::Colorize;
use std::fmt;
use tracing::debug;

/// A record that can appear in a report
pub trait Reportable: fmt::Debug {
    /// Plural noun used in the summary line ("breaches", "pastes")
    const KIND: &'static str;

    /// First line of the record's block
    fn heading(&self) -> String;

    /// Release timestamp checked against the filter threshold
    fn released(&self) -> Option<&str>;

    /// Labeled fields in display order
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// Settings shared by every report in a run
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// Address shown in the summary line
    pub email: &'a str,
    /// Service name shown in the summary line
    pub source: &'a str,
    pub threshold: &'a DateThreshold,
    /// Append a raw field dump after each record
    pub verbose: bool,
    /// Drop the summary line when there is nothing to report
    pub silent: bool,
}

/// One record's formatted block
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub heading: String,
    pub fields: Vec<(&'static str, String)>,
    pub dump: Option<String>,
}

/// Filtered records of one stage plus the summary line
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub summary: Option<String>,
    pub entries: Vec<ReportEntry>,
    /// Records returned by the service
    pub total: usize,
    /// Records that passed the filter
    pub included: usize,
}

impl Report {
    /// Records removed by the date filter
    pub fn filtered_out(&self) -> usize {
        self.total.saturating_sub(self.included)
    }

    /// Display adapter that optionally adds terminal colors
    pub fn display_with(&self, use_colors: bool) -> Rendered<'_> {
        Rendered {
            report: self,
            use_colors,
        }
    }

    /// Render the report as text, optionally with terminal colors
    pub fn render(&self, use_colors: bool) -> String {
        self.display_with(use_colors).to_string()
    }
}

/// A [`Report`] formatted for output
pub struct Rendered<'a> {
    report: &'a Report,
    use_colors: bool,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref summary) = self.report.summary {
            if self.use_colors {
                writeln!(f, "{}", summary.yellow())?;
            } else {
                writeln!(f, "{}", summary)?;
            }
        }

        for entry in &self.report.entries {
            writeln!(f)?;
            if self.use_colors {
                writeln!(f, "{}", entry.heading.cyan().bold())?;
            } else {
                writeln!(f, "{}", entry.heading)?;
            }

            for (label, value) in &entry.fields {
                let label = format!("{:<16}", format!("{}:", label));
                if self.use_colors {
                    writeln!(f, "\t{}{}", label.dimmed(), value)?;
                } else {
                    writeln!(f, "\t{}{}", label, value)?;
                }
            }

            if let Some(ref dump) = entry.dump {
                writeln!(f, "{}", dump)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with(false), f)
    }
}

/// Filter `records` by the context's threshold and assemble a report
pub fn build_report<R: Reportable>(records: &[R], context: &ReportContext<'_>) -> Report {
    let mut entries = Vec::new();

    for record in records {
        if let Some(released) = record.released() {
            if !context.threshold.includes(released) {
                debug!("excluding {} ({})", record.heading(), released);
                continue;
            }
        }

        entries.push(ReportEntry {
            heading: record.heading(),
            fields: record.fields(),
            dump: context.verbose.then(|| format!("{:#?}", record)),
        });
    }

    let total = records.len();
    let included = entries.len();

    Report {
        summary: summary_line(R::KIND, total, included, context),
        entries,
        total,
        included,
    }
}

/// Summary line for a stage, or `None` when silent mode has nothing to say
pub fn summary_line(
    kind: &str,
    total: usize,
    included: usize,
    context: &ReportContext<'_>,
) -> Option<String> {
    let filtered = total.saturating_sub(included);

    if context.silent && included == 0 && filtered == 0 {
        return None;
    }

    let line = format!(
        "{} {} returned for {} from {}",
        included, kind, context.email, context.source
    );
    if context.threshold.is_supplied() {
        return Some(format!("{} ({} filtered out)", line, filtered));
    }

    Some(line)
}

/// Format a count with comma thousands separators
pub fn commify(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if n < 0 {
        out.push('-');
    }

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }

    out
}

impl Reportable for BreachRecord {
    const KIND: &'static str = "breaches";

    fn heading(&self) -> String {
        self.title.clone()
    }

    fn released(&self) -> Option<&str> {
        Some(&self.added_date)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("domain", self.domain.clone()),
            ("added_date", self.added_date.clone()),
            ("breach_date", self.breach_date.clone()),
            ("email_count", commify(self.pwn_count)),
            ("verified", self.is_verified.to_string()),
        ]
    }
}

impl Reportable for PasteRecord {
    const KIND: &'static str = "pastes";

    fn heading(&self) -> String {
        self.source.clone()
    }

    // Pastes without a date can't be placed relative to the threshold
    fn released(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone().unwrap_or_default()),
            ("ID", self.id.clone()),
            ("breach_date", self.date.clone().unwrap_or_default()),
            ("email_count", commify(self.email_count)),
        ]
    }
}

impl Reportable for HackedEmailsBreach {
    const KIND: &'static str = "breaches";

    fn heading(&self) -> String {
        self.title.clone()
    }

    fn released(&self) -> Option<&str> {
        Some(&self.date_created)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("source_url", self.source_url.clone()),
            ("date_released", self.date_created.clone()),
            ("date_leaked", self.date_leaked.clone()),
            ("source_network", self.source_network.clone()),
            ("email_count", commify(self.emails_count)),
            ("verified", self.verified.to_string()),
        ]
    }
}
