//! Generated-block management for the shared SSH config file.
//!
//! The config file is human-edited text interleaved with machine-generated
//! blocks. Each generated block is introduced by a marker comment
//! (`# <alias> - Auto-generated by sshm`) and extends to the next top-level
//! `#` comment line or end of file. Instead of regex substitution over the
//! raw text, the file is parsed into a sequence of plain-text spans and
//! generated blocks; mutations operate on that sequence and re-serialize it,
//! leaving manual content byte-for-byte untouched.
//!
//! Every mutation reads the whole file and rewrites the whole file, so an
//! interrupt never leaves a partially-edited config behind.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SshConfigError};

const MARKER_PREFIX: &str = "# ";
const MARKER_SUFFIX: &str = " - Auto-generated by sshm";

/// One parsed span of the config file.
enum Segment {
    /// Untouched text, line terminators preserved.
    Text(String),
    /// A generated block, identified by its marker alias.
    Block { alias: String, text: String },
}

/// Manager for generated `Host` blocks inside an SSH config file.
pub struct SshConfig {
    path: PathBuf,
}

impl SshConfig {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace the block for `alias`.
    ///
    /// Creates the file with exactly one block when it doesn't exist;
    /// replaces an existing block in place; appends otherwise. Idempotent:
    /// repeating the call with identical arguments leaves the file unchanged.
    pub fn upsert(&self, alias: &str, hostname: &str, identity_file: &Path) -> Result<()> {
        let block = render_block(alias, hostname, identity_file);

        if !self.path.exists() {
            debug!(path = %self.path.display(), alias, "creating ssh config");
            return self.write(&block);
        }

        let mut segments = parse(&self.read()?);
        let mut replaced = false;
        for segment in &mut segments {
            if let Segment::Block { alias: existing, text } = segment {
                if existing.as_str() == alias {
                    *text = block.clone();
                    replaced = true;
                }
            }
        }

        let mut content = render(&segments);
        if !replaced {
            content.push('\n');
            content.push_str(&block);
        }
        debug!(alias, replaced, "upserting ssh config block");
        self.write(&content)
    }

    /// Delete the block for `alias`, if present. No-op otherwise.
    pub fn remove(&self, alias: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }

        let mut segments = parse(&self.read()?);
        let before = segments.len();
        segments.retain(|segment| !matches!(segment, Segment::Block { alias: a, .. } if a == alias));

        if segments.len() != before {
            debug!(alias, "removing ssh config block");
            self.write(&render(&segments))?;
        }
        Ok(())
    }

    /// Replace the block for `old_alias` with one for `new_alias`.
    ///
    /// Performed as remove-then-upsert with two whole-file writes: a crash
    /// between them leaves at most the old block missing, never a duplicate.
    pub fn rename(
        &self,
        old_alias: &str,
        new_alias: &str,
        hostname: &str,
        identity_file: &Path,
    ) -> Result<()> {
        self.remove(old_alias)?;
        self.upsert(new_alias, hostname, identity_file)
    }

    /// The raw text of the block for `alias`, if one exists.
    pub fn block_text(&self, alias: &str) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        parse(&content).into_iter().find_map(|segment| match segment {
            Segment::Block { alias: a, text } if a == alias => Some(text),
            _ => None,
        })
    }

    fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| {
            SshConfigError::Read {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }

    fn write(&self, content: &str) -> Result<()> {
        fs::write(&self.path, content).map_err(|source| {
            SshConfigError::Write {
                path: self.path.clone(),
                source,
            }
            .into()
        })
    }
}

/// Extract the alias from a marker comment line, if it is one.
fn marker_alias(line: &str) -> Option<&str> {
    let alias = line
        .strip_prefix(MARKER_PREFIX)?
        .strip_suffix(MARKER_SUFFIX)?;
    if alias.is_empty() {
        None
    } else {
        Some(alias)
    }
}

/// Split the file into plain-text spans and generated blocks.
///
/// A block starts at its marker line and ends right before the next
/// top-level `#` comment line or at end of file.
fn parse(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut block: Option<(String, String)> = None;

    for raw in content.split_inclusive('\n') {
        let line = raw.trim_end_matches(['\n', '\r']);

        if let Some(alias) = marker_alias(line) {
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            if let Some((alias, text)) = block.take() {
                segments.push(Segment::Block { alias, text });
            }
            block = Some((alias.to_string(), raw.to_string()));
        } else if block.is_some() && line.starts_with('#') {
            // Top-level comment closes the running block.
            if let Some((alias, block_text)) = block.take() {
                segments.push(Segment::Block {
                    alias,
                    text: block_text,
                });
            }
            text.push_str(raw);
        } else if let Some((_, block_text)) = block.as_mut() {
            block_text.push_str(raw);
        } else {
            text.push_str(raw);
        }
    }

    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    if let Some((alias, block_text)) = block {
        segments.push(Segment::Block {
            alias,
            text: block_text,
        });
    }
    segments
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Block { text, .. } => out.push_str(text),
        }
    }
    out
}

/// Render one generated block, marker line included.
///
/// Identity paths are written with forward slashes regardless of host OS;
/// the shared config format requires it.
fn render_block(alias: &str, hostname: &str, identity_file: &Path) -> String {
    let identity = identity_file.display().to_string().replace('\\', "/");
    format!(
        "{MARKER_PREFIX}{alias}{MARKER_SUFFIX}\n\
         Host {alias}\n\
         \x20 HostName {hostname}\n\
         \x20 User git\n\
         \x20 IdentityFile {identity}\n\
         \x20 IdentitiesOnly yes\n\
         \n"
    )
}
