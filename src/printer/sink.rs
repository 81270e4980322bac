//! Platform print sinks.
//!
//! One sink is chosen at startup from the target OS:
//! - Windows: PowerShell `Start-Process -Verb PrintTo`
//! - Linux, macOS and the BSDs: `lpr -P <printer> <file>`
//! - anything else: a sink that logs and skips

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::printer::PrintError;

/// Something that can print a file.
#[async_trait]
pub trait PrintSink: Send + Sync {
    /// Short description for logs.
    fn describe(&self) -> String;

    /// Submit one file as one print job.
    async fn submit(&self, file: &Path) -> Result<(), PrintError>;
}

/// Pick the sink for the running platform.
pub fn platform_sink(printer_name: &str) -> Arc<dyn PrintSink> {
    sink_for_os(std::env::consts::OS, printer_name)
}

/// Pick the sink for a named OS.
pub fn sink_for_os(os: &str, printer_name: &str) -> Arc<dyn PrintSink> {
    match os {
        "windows" => Arc::new(PrintToSink::new(printer_name)),
        "linux" | "macos" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
            Arc::new(LprSink::new(printer_name))
        }
        other => Arc::new(UnsupportedSink::new(other)),
    }
}

async fn run(program: &str, command: &mut Command) -> Result<(), PrintError> {
    let output = command
        .output()
        .await
        .map_err(|source| PrintError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(PrintError::CommandFailed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// `lpr -P <printer> <file>`.
#[derive(Debug, Clone)]
pub struct LprSink {
    printer: String,
}

impl LprSink {
    pub fn new(printer: &str) -> Self {
        Self {
            printer: printer.to_string(),
        }
    }
}

#[async_trait]
impl PrintSink for LprSink {
    fn describe(&self) -> String {
        format!("lpr -P {}", self.printer)
    }

    async fn submit(&self, file: &Path) -> Result<(), PrintError> {
        let mut command = Command::new("lpr");
        command.arg("-P").arg(&self.printer).arg(file);
        run("lpr", &mut command).await
    }
}

/// Shell `printto` verb through PowerShell.
#[derive(Debug, Clone)]
pub struct PrintToSink {
    printer: String,
}

impl PrintToSink {
    pub fn new(printer: &str) -> Self {
        Self {
            printer: printer.to_string(),
        }
    }

    fn script(&self, file: &Path) -> String {
        format!(
            "Start-Process -FilePath '{}' -Verb PrintTo -ArgumentList '\"{}\"' -WindowStyle Hidden -Wait",
            ps_quote(&file.display().to_string()),
            ps_quote(&self.printer)
        )
    }
}

/// Escape for a single-quoted PowerShell string.
fn ps_quote(value: &str) -> String {
    value.replace('\'', "''")
}

#[async_trait]
impl PrintSink for PrintToSink {
    fn describe(&self) -> String {
        format!("printto \"{}\"", self.printer)
    }

    async fn submit(&self, file: &Path) -> Result<(), PrintError> {
        let mut command = Command::new("powershell");
        command
            .arg("-NoProfile")
            .arg("-NonInteractive")
            .arg("-Command")
            .arg(self.script(file));
        run("powershell", &mut command).await
    }
}

/// Sink for platforms without a known print command.
#[derive(Debug, Clone)]
pub struct UnsupportedSink {
    os: String,
}

impl UnsupportedSink {
    pub fn new(os: &str) -> Self {
        Self { os: os.to_string() }
    }
}

#[async_trait]
impl PrintSink for UnsupportedSink {
    fn describe(&self) -> String {
        format!("unsupported ({})", self.os)
    }

    async fn submit(&self, _file: &Path) -> Result<(), PrintError> {
        Err(PrintError::UnsupportedPlatform(self.os.clone()))
    }
}
