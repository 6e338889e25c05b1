//! Kinds command - list the kinds the dispatcher knows by name.

use anyhow::Result;
use connprobe_probers::ProbeDispatcher;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the kinds command.
pub fn run(cli: &Cli) -> Result<()> {
    info!("Listing kinds");

    let kinds = ProbeDispatcher::descriptors();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_kinds_header());
            println!("{}", "─".repeat(70));

            for desc in kinds {
                println!("{}", formatter.format_kind_line(desc));
            }

            println!();
            println!("Any other kind is passed to the SQL prober as a driver name.");
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_kinds(kinds)?);
        }
    }

    Ok(())
}
