//! Name resolution through the `nslookup` command.

use super::{LookupError, Resolver};
use colored::Colorize;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::process::Command;

/// Pick the address reported for `fqdn` out of `nslookup` output.
///
/// Looks for a `Name:` line equal to `fqdn` and returns the first IPv4
/// `Address:` line after it. Server lines printed before the answer are
/// ignored because no name has matched yet.
pub fn parse_nslookup_output(output: &str, fqdn: &str) -> Option<Ipv4Addr> {
    let mut name_matched = false;
    for line in output.lines() {
        let lower = line.trim_start().to_lowercase();
        if name_matched && lower.starts_with("address:") {
            let value = line.split_once(':').map(|(_, v)| v.trim()).unwrap_or("");
            match value.parse::<Ipv4Addr>() {
                Ok(addr) => return Some(addr),
                // AAAA answer, keep looking for an A record
                Err(_) => continue,
            }
        }
        if lower.starts_with("name:") {
            let tail = line.rsplit(':').next().unwrap_or("").trim();
            name_matched = tail == fqdn;
        }
    }
    None
}

/// [`Resolver`] that shells out to `nslookup` (or a compatible program).
#[derive(Debug, Clone)]
pub struct NslookupResolver {
    program: String,
    timeout: Duration,
}

impl NslookupResolver {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        NslookupResolver {
            program: program.into(),
            timeout,
        }
    }

    /// Run `<program> <fqdn>` and return its stdout.
    async fn run(&self, fqdn: &str) -> Result<String, LookupError> {
        log::debug!("run({program} {fqdn})", program = self.program.on_blue());

        let mut command = Command::new(&self.program);
        command.arg(fqdn).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| {
                log::error!("Command execution failed: {}", e);
                LookupError::Failed {
                    fqdn: fqdn.to_string(),
                    reason: format!("failed to execute {}: {e}", self.program),
                }
            })?,
            Err(_) => {
                log::warn!(
                    "{timeout} {program} {fqdn} after {secs:?}",
                    timeout = "timeout".on_red(),
                    program = self.program,
                    secs = self.timeout
                );
                return Err(LookupError::TimedOut {
                    fqdn: fqdn.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            log::debug!("Success output.stdout.len(): {}", output.stdout.len());
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstdout=\n{stdout}\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        // nslookup exits non-zero for NXDOMAIN, which is an answer, not a failure
        if stdout.contains("NXDOMAIN") || stdout.contains("can't find") {
            return Err(LookupError::NotFound(fqdn.to_string()));
        }
        log::warn!(
            "{failed} to run {program} {fqdn}",
            failed = "failed".on_red(),
            program = self.program
        );
        let reason = match stderr.trim() {
            "" => format!("{} exited with {}", self.program, output.status),
            err => err.to_string(),
        };
        Err(LookupError::Failed {
            fqdn: fqdn.to_string(),
            reason,
        })
    }
}

impl Resolver for NslookupResolver {
    async fn resolve(&self, fqdn: &str) -> Result<Ipv4Addr, LookupError> {
        let output = self.run(fqdn).await?;
        let addr = parse_nslookup_output(&output, fqdn)
            .ok_or_else(|| LookupError::NotFound(fqdn.to_string()))?;
        log::info!("Resolved {fqdn} to {addr}");
        Ok(addr)
    }
}
