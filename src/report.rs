//! Run report: one row per processed branch, rendered once at the end
//!
//! Rendering is a pure projection of the rows; every decision was already
//! made when the outcome was recorded.

use crate::core::error::FleetResult;
use crate::release::ReleaseOutcome;
use serde::Serialize;
use std::fmt::Write;

pub const TABLE_TITLE: &str = "Cluster Configuration Report";
pub const NO_CONTENT_NOTICE: &str = "No new content found for any repositories";

const HEADERS: [&str; 6] = ["Repository", "Branch", "Status", "Version", "Changelog", "Released"];

/// One processed (repository, branch) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
  pub repository: String,
  pub branch: String,
  #[serde(flatten)]
  pub outcome: ReleaseOutcome,
}

impl ReportRow {
  /// Cell values in column order
  fn cells(&self) -> [String; 6] {
    let (status, released) = match &self.outcome {
      ReleaseOutcome::NoChanges => ("No", "-"),
      ReleaseOutcome::DryRun { .. } => ("Yes", "Dry Run"),
      ReleaseOutcome::Declined { .. } => ("Yes", "No"),
      ReleaseOutcome::Released { .. } => ("Yes", "Yes"),
      ReleaseOutcome::Failed { .. } => ("Yes", "Failed"),
      ReleaseOutcome::Skipped { .. } => ("Skipped", "No"),
    };
    let changelog = match &self.outcome {
      ReleaseOutcome::NoChanges => "No pending release".to_string(),
      ReleaseOutcome::Skipped { reason } => reason.clone(),
      ReleaseOutcome::Failed { changelog, error, .. } => format!("{}\n\n{}", changelog.trim_end(), error),
      other => other.changelog().unwrap_or_default().trim_end().to_string(),
    };

    [
      self.repository.clone(),
      self.branch.clone(),
      status.to_string(),
      self.outcome.version().unwrap_or("-").to_string(),
      changelog,
      released.to_string(),
    ]
  }
}

/// Outcome counts for the summary line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
  pub released: usize,
  pub failed: usize,
  pub declined: usize,
  pub dry_run: usize,
  pub unchanged: usize,
  pub skipped: usize,
}

impl std::fmt::Display for Summary {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{} released, {} failed, {} declined, {} dry run, {} unchanged, {} skipped",
      self.released, self.failed, self.declined, self.dry_run, self.unchanged, self.skipped
    )
  }
}

/// Rows accumulated in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
  rows: Vec<ReportRow>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
  rows: &'a [ReportRow],
  summary: Summary,
}

impl Report {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, repository: &str, branch: &str, outcome: ReleaseOutcome) {
    self.rows.push(ReportRow {
      repository: repository.to_string(),
      branch: branch.to_string(),
      outcome,
    });
  }

  pub fn rows(&self) -> &[ReportRow] {
    &self.rows
  }

  pub fn summary(&self) -> Summary {
    let mut summary = Summary::default();
    for row in &self.rows {
      match row.outcome {
        ReleaseOutcome::NoChanges => summary.unchanged += 1,
        ReleaseOutcome::DryRun { .. } => summary.dry_run += 1,
        ReleaseOutcome::Declined { .. } => summary.declined += 1,
        ReleaseOutcome::Released { .. } => summary.released += 1,
        ReleaseOutcome::Failed { .. } => summary.failed += 1,
        ReleaseOutcome::Skipped { .. } => summary.skipped += 1,
      }
    }
    summary
  }

  /// Rows shown in the table; `NoChanges` only on request
  pub fn visible_rows(&self, show_unchanged: bool) -> Vec<&ReportRow> {
    self
      .rows
      .iter()
      .filter(|row| show_unchanged || row.outcome != ReleaseOutcome::NoChanges)
      .collect()
  }

  /// Table (or the no-content notice) followed by the summary line
  pub fn render(&self, show_unchanged: bool, color: bool) -> String {
    let rows = self.visible_rows(show_unchanged);
    let mut out = String::new();
    if rows.is_empty() {
      let style = if color { notice_style() } else { anstyle::Style::new() };
      let _ = writeln!(out, "\n{}{}{}", style.render(), NO_CONTENT_NOTICE, style.render_reset());
    } else {
      out.push_str(&render_table(&rows, color));
    }
    let _ = writeln!(out, "\n{}", self.summary());
    out
  }

  pub fn to_json(&self) -> FleetResult<String> {
    let report = JsonReport {
      rows: &self.rows,
      summary: self.summary(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
  }
}

fn notice_style() -> anstyle::Style {
  anstyle::Style::new()
    .bold()
    .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow)))
}

fn column_style(index: usize) -> anstyle::Style {
  let color = match index {
    0 => anstyle::AnsiColor::Cyan,
    1 => anstyle::AnsiColor::Magenta,
    _ => anstyle::AnsiColor::Green,
  };
  anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(color)))
}

/// Rounded box table with a line between rows; cells may span several lines
fn render_table(rows: &[&ReportRow], color: bool) -> String {
  let cells: Vec<[String; 6]> = rows.iter().map(|row| row.cells()).collect();

  let mut widths = HEADERS.map(|h| h.chars().count());
  for row in &cells {
    for (width, cell) in widths.iter_mut().zip(row) {
      let longest = cell.lines().map(|l| l.chars().count()).max().unwrap_or(0);
      *width = (*width).max(longest);
    }
  }

  let rule = |left: &str, mid: &str, right: &str| {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(mid), right)
  };

  let mut out = String::new();
  let inner: usize = widths.iter().map(|w| w + 3).sum::<usize>() - 1;
  let title_pad = inner.saturating_sub(TABLE_TITLE.chars().count()) / 2;
  let title_style = if color { anstyle::Style::new().italic() } else { anstyle::Style::new() };
  let _ = writeln!(
    out,
    "{}{}{}{}",
    " ".repeat(title_pad + 1),
    title_style.render(),
    TABLE_TITLE,
    title_style.render_reset()
  );

  out.push_str(&rule("╭", "┬", "╮"));
  let headers = HEADERS.map(str::to_string);
  write_row(&mut out, &headers, &widths, color, true);
  out.push_str(&rule("├", "┼", "┤"));
  for (i, row) in cells.iter().enumerate() {
    if i > 0 {
      out.push_str(&rule("├", "┼", "┤"));
    }
    write_row(&mut out, row, &widths, color, false);
  }
  out.push_str(&rule("╰", "┴", "╯"));
  out
}

fn write_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6], color: bool, header: bool) {
  let columns: Vec<Vec<&str>> = cells.iter().map(|c| c.lines().collect()).collect();
  let height = columns.iter().map(Vec::len).max().unwrap_or(0).max(1);

  for line in 0..height {
    out.push('│');
    for (index, column) in columns.iter().enumerate() {
      let text = column.get(line).copied().unwrap_or("");
      let pad = widths[index] - text.chars().count();
      let style = match (color, header) {
        (false, _) => anstyle::Style::new(),
        (true, true) => anstyle::Style::new().bold(),
        (true, false) => column_style(index),
      };
      let _ = write!(
        out,
        " {}{}{}{} │",
        style.render(),
        text,
        style.render_reset(),
        " ".repeat(pad)
      );
    }
    out.push('\n');
  }
}
