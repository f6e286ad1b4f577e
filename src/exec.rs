//! Host execution of virtual file content.
//!
//! Materializes `(name, content)` as an executable `/bin/sh` script in a
//! temporary file and runs it as a host process, inheriting the environment
//! and standard streams, blocking until it exits. Knows nothing about the
//! tree or the event log.

use anyhow::Result;
use std::process::ExitStatus;

/// Run `content` as a shell script named after `name`.
#[cfg(unix)]
pub fn run_script(name: &str, content: &str) -> Result<ExitStatus> {
    use anyhow::Context;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;
    use std::process::Command;

    let script = format!("#!/bin/sh\n{content}\n");

    let mut file = tempfile::Builder::new()
        .prefix(name)
        .suffix(".sh")
        .tempfile()
        .context("failed to create script file")?;
    file.write_all(script.as_bytes())
        .context("failed to write script")?;
    file.flush().context("failed to flush script")?;

    std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o755))
        .context("failed to mark script executable")?;

    // Close our handle before exec to avoid ETXTBSY; the guard still removes
    // the file afterwards.
    let path = file.into_temp_path();
    let status = Command::new(&path)
        .status()
        .with_context(|| format!("failed to execute {name}"))?;
    Ok(status)
}

#[cfg(not(unix))]
pub fn run_script(name: &str, _content: &str) -> Result<ExitStatus> {
    anyhow::bail!("cannot execute {name}: host execution is only supported on unix");
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn runs_script_and_reports_exit_status() {
        let status = run_script("ok", "exit 0").unwrap();
        assert!(status.success());
    }

    #[test]
    fn nonzero_exit_is_not_an_error() {
        let status = run_script("fails", "exit 3").unwrap();
        assert_eq!(status.code(), Some(3));
    }
}
