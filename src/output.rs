//! Where rendered listings go: stdout, a `$PAGER` child, or a file.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, warn};

pub enum Sink {
    Stdout(BufWriter<io::Stdout>),
    Pager { child: Child, stdin: BufWriter<ChildStdin> },
    File(BufWriter<File>),
}

impl Sink {
    pub fn stdout() -> Self {
        Sink::Stdout(BufWriter::new(io::stdout()))
    }

    /// Create (or truncate) `path`.
    pub fn file(path: &Path) -> Result<Self> {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        Ok(Sink::File(BufWriter::new(file)))
    }

    /// Pipe through `$PAGER` when stdout is a terminal, else plain stdout.
    ///
    /// A pager that fails to start is logged and skipped.
    pub fn paged() -> Self {
        if !io::stdout().is_terminal() {
            return Self::stdout();
        }
        let Some(pager) = std::env::var("PAGER").ok().and_then(|p| pager_command(&p)) else {
            return Self::stdout();
        };
        match spawn_pager(pager) {
            Ok(sink) => sink,
            Err(e) => {
                warn!("pager unavailable: {e:#}");
                Self::stdout()
            }
        }
    }

    /// Whether the sink ends up on a terminal.
    pub fn is_terminal(&self) -> bool {
        match self {
            Sink::Stdout(_) => io::stdout().is_terminal(),
            Sink::Pager { .. } => true,
            Sink::File(_) => false,
        }
    }

    /// Flush everything and wait for the pager to exit.
    pub fn finish(self) -> Result<()> {
        match self {
            Sink::Stdout(mut w) => closed_is_done(w.flush())?,
            Sink::File(mut w) => w.flush()?,
            Sink::Pager { mut child, stdin } => {
                // The pager may already have quit.
                match stdin.into_inner() {
                    Ok(stdin) => drop(stdin),
                    Err(e) => debug!("pager input: {}", e.error()),
                }
                let status = child.wait().context("failed to wait for pager")?;
                if !status.success() {
                    warn!(%status, "pager exited with an error");
                }
            }
        }
        Ok(())
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout(w) => w.write(buf),
            Sink::Pager { stdin, .. } => stdin.write(buf),
            Sink::File(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout(w) => w.flush(),
            Sink::Pager { stdin, .. } => stdin.flush(),
            Sink::File(w) => w.flush(),
        }
    }
}

/// Treat a reader that went away (the user quit the pager) as the end of
/// output.
pub fn closed_is_done(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("output closed by reader");
            Ok(())
        }
        other => other,
    }
}

/// Split a `$PAGER` value into program and arguments (`less -R`).
fn pager_command(value: &str) -> Option<(String, Vec<String>)> {
    let mut parts = value.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

fn spawn_pager((program, args): (String, Vec<String>)) -> Result<Sink> {
    let mut child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    let stdin = child.stdin.take().context("pager has no stdin")?;
    debug!(%program, "paging output");
    Ok(Sink::Pager {
        child,
        stdin: BufWriter::new(stdin),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pager_value_is_split_on_whitespace() {
        assert_eq!(
            pager_command("less -R  -F"),
            Some(("less".to_string(), vec!["-R".to_string(), "-F".to_string()]))
        );
        assert_eq!(pager_command("more"), Some(("more".to_string(), vec![])));
    }

    #[test]
    fn blank_pager_is_ignored() {
        assert_eq!(pager_command(""), None);
        assert_eq!(pager_command("   "), None);
    }

    #[test]
    fn missing_pager_program_is_an_error() {
        let err = spawn_pager(("/nonexistent/pager-binary".to_string(), vec![])).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/pager-binary"));
    }

    #[test]
    fn file_sink_writes_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.html");

        let mut sink = Sink::file(&path).unwrap();
        assert!(!sink.is_terminal());
        sink.write_all(b"<html>\n").unwrap();
        sink.finish().unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html>\n");
    }

    #[test]
    fn file_sink_reports_bad_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Sink::file(&tmp.path().join("missing/out.html")).err().unwrap();
        assert!(err.to_string().contains("failed to create"));
    }

    #[cfg(unix)]
    #[test]
    fn pager_receives_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("paged");
        let script = format!("cat > {}", out.display());

        let mut sink = spawn_pager(("sh".to_string(), vec!["-c".to_string(), script])).unwrap();
        sink.write_all(b"FAV\n").unwrap();
        sink.finish().unwrap();

        assert_eq!(std::fs::read_to_string(out).unwrap(), "FAV\n");
    }

    #[test]
    fn broken_pipe_ends_output_quietly() {
        let closed = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        assert!(closed_is_done(Err(closed)).is_ok());

        let full = io::Error::new(io::ErrorKind::StorageFull, "disk full");
        assert!(closed_is_done(Err(full)).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn pager_quitting_early_is_not_an_error() {
        use crate::channel::Channel;
        use crate::collect::Section;
        use crate::render::Format;

        let channels: Vec<Channel> = (0..5_000)
            .map(|n| Channel {
                streamer: format!("runner{n}"),
                description: "x".repeat(40),
                game: "Game".to_string(),
                viewers: n,
            })
            .collect();
        let sections = vec![Section { title: "FAV", channels: channels.into() }];

        // Reads one byte, then exits like a user pressing `q`.
        let mut sink =
            spawn_pager(("sh".to_string(), vec!["-c".to_string(), "head -c 1 > /dev/null".to_string()])).unwrap();
        let written = Format::Text { emphasis: false }.write_document(&mut sink, &sections);

        assert!(closed_is_done(written).is_ok());
        sink.finish().unwrap();
    }
}
