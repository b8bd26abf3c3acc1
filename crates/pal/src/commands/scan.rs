//! `pal scan` command implementation.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use pal_config::{CliSettings, Config};
use pal_directive::{Directive, Scan, Scanner};
use serde::Serialize;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scan command.
#[derive(Args)]
pub(crate) struct ScanArgs {
    /// Document to scan.
    input: PathBuf,

    /// Path to configuration file (default: auto-discover pal.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directive function name (overrides config).
    #[arg(long)]
    func_name: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

/// JSON shape of a scan.
#[derive(Serialize)]
struct ScanReport<'a> {
    directives: &'a [Directive],
    escapes: &'a [usize],
}

impl ScanArgs {
    /// Execute the scan command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the input cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            func_name: self.func_name,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let text = std::fs::read_to_string(&self.input)?;
        let scan = Scanner::new(config.loader_resolved.func_name.as_str()).scan(&text);

        if self.json {
            let report = ScanReport {
                directives: &scan.directives,
                escapes: &scan.escapes,
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            output.document(&json)?;
        } else {
            output.document(&format_scan(&scan))?;
            output.info(&format!(
                "{} directive(s), {} escaped",
                scan.directives.len(),
                scan.escapes.len()
            ));
        }

        Ok(())
    }
}

/// One line per directive (`offset`, statement, locator), then escapes.
fn format_scan(scan: &Scan) -> String {
    let mut out = String::new();
    for directive in &scan.directives {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            directive.offset(),
            directive.raw_statement,
            directive.locator
        );
    }
    for offset in &scan.escapes {
        let _ = writeln!(out, "{offset}\tescaped");
    }
    out
}
