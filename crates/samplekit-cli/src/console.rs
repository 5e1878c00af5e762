//! Where examples print their own output.
//!
//! Examples never write to stdout directly. With `--json` stdout carries only
//! the run report, so example banners, results and the interrupt notice go
//! to stderr instead.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum Target {
    Stdout,
    Stderr,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Cloneable line writer handed to every example.
#[derive(Clone)]
pub struct Console {
    target: Target,
}

impl Console {
    pub fn stdout() -> Self {
        Self {
            target: Target::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: Target::Stderr,
        }
    }

    /// In-memory console; read it back with [`Console::contents`].
    pub fn buffer() -> Self {
        Self {
            target: Target::Buffer(Arc::default()),
        }
    }

    /// Stderr when stdout is reserved for the JSON report, stdout otherwise.
    pub fn for_output(json_report: bool) -> Self {
        if json_report {
            Self::stderr()
        } else {
            Self::stdout()
        }
    }

    /// Write one line. Write errors are dropped.
    pub fn line(&self, text: impl fmt::Display) {
        match &self.target {
            Target::Stdout => {
                writeln!(io::stdout().lock(), "{text}").ok();
            }
            Target::Stderr => {
                writeln!(io::stderr().lock(), "{text}").ok();
            }
            Target::Buffer(buf) => {
                if let Ok(mut buf) = buf.lock() {
                    writeln!(buf, "{text}").ok();
                }
            }
        }
    }

    /// Everything written so far; empty for stdout and stderr consoles.
    pub fn contents(&self) -> String {
        match &self.target {
            Target::Buffer(buf) => buf
                .lock()
                .map(|buf| String::from_utf8_lossy(&buf).into_owned())
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = match self.target {
            Target::Stdout => "stdout",
            Target::Stderr => "stderr",
            Target::Buffer(_) => "buffer",
        };
        f.debug_struct("Console").field("target", &target).finish()
    }
}
