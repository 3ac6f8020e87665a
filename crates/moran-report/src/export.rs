//! Writing run artefacts to an output directory.

use crate::plots::{history_charts, snapshot_map};
use moran_core::{History, Result, RunSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What to write besides the history tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub plots: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { plots: true }
    }
}

/// Writes tables, summary and plots of a finished run
pub struct ReportWriter {
    dir: PathBuf,
    options: ReportOptions,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>, options: ReportOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write every artefact and return the paths written, in order
    pub fn write(
        &self,
        history: &History,
        summary: &RunSummary,
        snapshot: Option<&[Vec<usize>]>,
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;
        let mut written = Vec::new();

        written.push(self.write_file("history.csv", &history.to_csv())?);
        written.push(self.write_file("history.json", &history.to_json()?)?);
        written.push(self.write_file("summary.json", &serde_json::to_string_pretty(summary)?)?);

        if self.options.plots {
            for (name, chart) in history_charts(history) {
                written.push(self.write_file(name, &chart.render())?);
            }
            if let Some(cells) = snapshot {
                let map = snapshot_map(cells, history.labels());
                written.push(self.write_file("snapshot.svg", &map.render())?);
            }
        }

        info!(
            dir = %self.dir.display(),
            files = written.len(),
            "Report written"
        );

        Ok(written)
    }

    fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.join(name);
        fs::write(&path, contents)?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
        Ok(path)
    }
}
