//! Where a merged unit goes: a timestamped file, the clipboard, a DOT file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};

/// Format `now` with a chrono format string, rejecting invalid formats
/// instead of panicking.
pub fn timestamp<Tz>(now: &DateTime<Tz>, format: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", now.format(format))
        .map_err(|_| anyhow::anyhow!("invalid timestamp format: {format:?}"))?;

    // The stamp is part of a file name
    if out.contains(['/', '\\']) {
        anyhow::bail!("timestamp format {format:?} renders a path separator: {out:?}");
    }
    Ok(out)
}

/// Namespaced output location `<dir>/<name>-<stamp>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: PathBuf,
    pub name: String,
    pub stamp: String,
    pub extension: String,
}

impl OutputTarget {
    pub fn new(
        dir: impl Into<PathBuf>,
        name: impl Into<String>,
        stamp: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            stamp: stamp.into(),
            extension: extension.into(),
        }
    }

    pub fn stem(&self) -> String {
        format!("{}-{}", self.name, self.stamp)
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem(), self.extension))
    }

    pub fn dot_path(&self) -> PathBuf {
        self.dir.join(format!("{}.dot", self.stem()))
    }

    /// Header comment naming the merge, followed by the merged text.
    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + self.stem().len() + 4);
        out.push_str("// ");
        out.push_str(&self.stem());
        out.push('\n');
        out.push_str(text);
        out
    }

    /// Write the rendered file, creating the output directory if needed.
    pub fn write(&self, text: &str) -> Result<PathBuf> {
        let path = self.path();
        write_creating_dir(&path, &self.render(text))?;
        Ok(path)
    }

    pub fn write_dot(&self, dot: &str) -> Result<PathBuf> {
        let path = self.dot_path();
        write_creating_dir(&path, dot)?;
        Ok(path)
    }
}

fn write_creating_dir(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write to {}", path.display()))
}

pub fn copy_to_clipboard(content: &str) -> Result<()> {
    use arboard::Clipboard;

    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;

    clipboard
        .set_text(content)
        .context("Failed to copy to clipboard")?;

    Ok(())
}
