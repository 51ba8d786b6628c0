use crate::context::AppContext;
use crate::format::{OutputFormatter, error_chain};
use libtagstamp::{ScanSummary, Tagstamp};
use std::error::Error;
use std::io::{self, Write};
use std::ops::ControlFlow;

/// Runs the report for the configured repository.
///
/// One line per tag is written to `out` as soon as the tag is done. A failed
/// write ends the scan. Skipped tags are reported through `formatter` as
/// warnings.
pub async fn run<W: Write>(
    ctx: &AppContext,
    formatter: &dyn OutputFormatter,
    out: &mut W,
) -> Result<ScanSummary, Box<dyn Error + Send + Sync>> {
    let mut tagstamp = Tagstamp::from_config(&ctx.config)?;
    tracing::info!(
        registry = %ctx.config.registry.url,
        repository = tagstamp.repository(),
        "scanning"
    );

    let mut write_error: Option<io::Error> = None;
    let summary = tagstamp
        .scan(|report| match writeln!(out, "{}", report).and_then(|_| out.flush()) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                // Nobody reads the remaining lines, so stop fetching manifests
                write_error = Some(e);
                ControlFlow::Break(())
            }
        })
        .await?;

    match write_error {
        // Output piped into something like `head` that stopped reading
        Some(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Some(e) => return Err(e.into()),
        None => {}
    }

    for skipped in &summary.skipped {
        formatter.warning(&format!(
            "Skipped tag {}: {}",
            skipped.tag,
            error_chain(&skipped.error)
        ));
    }

    Ok(summary)
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
