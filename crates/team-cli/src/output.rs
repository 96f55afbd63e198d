use std::io::Write;

use team_core::Verdict;

/// Write the verdict as the single line of stdout.
pub fn print_verdict(verdict: &Verdict) -> anyhow::Result<()> {
    let line = verdict.to_line()?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")?;
    stdout.flush()?;
    Ok(())
}
