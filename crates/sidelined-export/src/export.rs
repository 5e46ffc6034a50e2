// Batch export: write every available view to the output directory and
// record what was saved or skipped in manifest.json.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use sidelined_core::report::{Leaderboard, Report, Unavailable, ViewKind};

use crate::html;
use crate::svg::ChartError;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const LEADERBOARD_CSV: &str = "5_leaderboard_top_improvements.csv";
pub const LEADERBOARD_HTML: &str = "5_leaderboard_top_improvements.html";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to serialize manifest: {source}")]
    Manifest { source: serde_json::Error },

    #[error("failed to clear previous export in {path}: {source}")]
    Clear {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Chart(#[from] ChartError),
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// What happened to one view during the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewOutcome {
    Saved {
        view: usize,
        title: String,
        files: Vec<String>,
    },
    Skipped {
        view: usize,
        title: String,
        reason: String,
    },
}

impl ViewOutcome {
    fn skipped(notice: &Unavailable) -> ViewOutcome {
        let view = notice.view();
        ViewOutcome::Skipped {
            view: view.index(),
            title: view.title().to_string(),
            reason: notice.to_string(),
        }
    }

    /// Operator-facing line, e.g. `[SKIP] 2) ...`.
    pub fn line(&self, out_dir: &Path) -> String {
        match self {
            ViewOutcome::Saved { files, .. } => files
                .iter()
                .map(|f| format!("Saved: {}", out_dir.join(f).display()))
                .collect::<Vec<_>>()
                .join("\n"),
            ViewOutcome::Skipped { view, reason, .. } => format!("[SKIP] {view}) {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    pub source: String,
    pub rows: usize,
    pub views: Vec<ViewOutcome>,
}

impl Manifest {
    pub fn saved_files(&self) -> Vec<&str> {
        self.views
            .iter()
            .filter_map(|v| match v {
                ViewOutcome::Saved { files, .. } => Some(files),
                ViewOutcome::Skipped { .. } => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.views
            .iter()
            .filter(|v| matches!(v, ViewOutcome::Skipped { .. }))
            .count()
    }
}

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

/// Keep letters, digits, `-` and `_`; everything else becomes `_`.
pub fn file_slug(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Whether `name` is a file an export writes: the manifest or `<view>_*`.
fn is_export_file(name: &str) -> bool {
    if name == MANIFEST_FILE {
        return true;
    }
    name.split_once('_')
        .and_then(|(prefix, _)| prefix.parse::<usize>().ok())
        .is_some_and(|view| (1..=ViewKind::ALL.len()).contains(&view))
        && (name.ends_with(".html") || name.ends_with(".csv"))
}

/// Remove files left by an earlier export so the directory matches the new
/// manifest. Anything else in the directory is left alone.
fn clear_previous(out_dir: &Path) -> Result<usize, ExportError> {
    let clear_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ExportError::Clear { path, source }
    };
    let mut removed = 0;
    for entry in fs::read_dir(out_dir).map_err(clear_err(out_dir))? {
        let path = entry.map_err(clear_err(out_dir))?.path();
        let is_stale = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_export_file);
        if is_stale {
            fs::remove_file(&path).map_err(clear_err(&path))?;
            debug!("removed {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_file(out_dir: &Path, name: &str, contents: &str) -> Result<String, ExportError> {
    let path = out_dir.join(name);
    fs::write(&path, contents).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    info!("wrote {}", path.display());
    Ok(name.to_string())
}

/// Leaderboard rows as CSV with a header line; unknown values are empty.
pub fn write_leaderboard_csv<W: Write>(board: &Leaderboard, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &board.rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn save_leaderboard(board: &Leaderboard, out_dir: &Path) -> Result<Vec<String>, ExportError> {
    let path = out_dir.join(LEADERBOARD_CSV);
    let file = fs::File::create(&path).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    write_leaderboard_csv(board, file).map_err(|source| ExportError::Csv {
        path: path.clone(),
        source,
    })?;
    info!("wrote {}", path.display());

    let html_file = write_file(out_dir, LEADERBOARD_HTML, &html::leaderboard_page(board))?;
    Ok(vec![LEADERBOARD_CSV.to_string(), html_file])
}

/// Files written for one view, or the notice explaining why there are none.
fn save_view(
    report: &Report,
    view: ViewKind,
    out_dir: &Path,
) -> Result<Result<Vec<String>, Unavailable>, ExportError> {
    let files = match view {
        ViewKind::TopDrops => match &report.top_drops {
            Ok(chart) => vec![write_file(
                out_dir,
                "1_top_perf_drop.html",
                &html::bar_page(chart)?,
            )?],
            Err(e) => return Ok(Err(e.clone())),
        },
        ViewKind::TeamCounts => match &report.team_counts {
            Ok(chart) => vec![write_file(
                out_dir,
                "2_injury_counts_by_team.html",
                &html::bar_page(chart)?,
            )?],
            Err(e) => return Ok(Err(e.clone())),
        },
        ViewKind::MonthTeamGrid => match &report.month_team {
            Ok(grid) => vec![write_file(
                out_dir,
                "3_heatmap_month_team.html",
                &html::heatmap_page(grid)?,
            )?],
            Err(e) => return Ok(Err(e.clone())),
        },
        ViewKind::AgeCorrelation => match &report.age {
            Ok(plot) => {
                let name = format!("4_scatter_age_{}.html", plot.metric.slug());
                vec![write_file(out_dir, &name, &html::scatter_page(plot)?)?]
            }
            Err(e) => return Ok(Err(e.clone())),
        },
        ViewKind::Leaderboard => match &report.leaderboard {
            Ok(board) => save_leaderboard(board, out_dir)?,
            Err(e) => return Ok(Err(e.clone())),
        },
        ViewKind::BeforeAfter => match &report.before_after {
            Ok(ba) => {
                let name = format!("6_before_after_{}.html", file_slug(&ba.player));
                vec![write_file(out_dir, &name, &html::before_after_page(ba)?)?]
            }
            Err(e) => return Ok(Err(e.clone())),
        },
    };
    Ok(Ok(files))
}

/// Write every available view plus `manifest.json` into `out_dir`, replacing
/// the files of any earlier export.
///
/// Unavailable views are recorded as skipped and never abort the run; only
/// I/O and drawing failures are errors.
pub fn export_report(report: &Report, source: &Path, out_dir: &Path) -> Result<Manifest, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::CreateDir {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let removed = clear_previous(out_dir)?;
    if removed > 0 {
        info!("removed {} file(s) from a previous export", removed);
    }

    let mut views = Vec::with_capacity(ViewKind::ALL.len());
    for view in ViewKind::ALL {
        let outcome = match save_view(report, view, out_dir)? {
            Ok(files) => ViewOutcome::Saved {
                view: view.index(),
                title: view.title().to_string(),
                files,
            },
            Err(notice) => {
                warn!("skipping view {}: {}", view.index(), notice);
                ViewOutcome::skipped(&notice)
            }
        };
        views.push(outcome);
    }

    let manifest = Manifest {
        source: source.display().to_string(),
        rows: report.summary.records,
        views,
    };
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|source| ExportError::Manifest { source })?;
    write_file(out_dir, MANIFEST_FILE, &json)?;

    info!(
        "export finished: {} file(s) saved, {} view(s) skipped",
        manifest.saved_files().len(),
        manifest.skipped()
    );
    Ok(manifest)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
