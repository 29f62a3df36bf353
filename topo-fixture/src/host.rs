//! Local hostname lookup for the ensemble spec.

use crate::error::FixtureError;

const HOSTNAME_BINARY: &str = "hostname";

/// Hostname of this machine, as printed by the `hostname` utility.
pub async fn local_hostname() -> Result<String, FixtureError> {
    let output = tokio::process::Command::new(HOSTNAME_BINARY)
        .output()
        .await
        .map_err(|e| FixtureError::Hostname(e.to_string()))?;
    if !output.status.success() {
        return Err(FixtureError::Hostname(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    clean(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| FixtureError::Hostname("empty hostname".into()))
}

/// `configured` if set, otherwise [`local_hostname`].
pub async fn resolve_hostname(configured: Option<&str>) -> Result<String, FixtureError> {
    match configured.and_then(clean) {
        Some(name) => Ok(name),
        None => local_hostname().await,
    }
}

fn clean(raw: &str) -> Option<String> {
    let name = raw.trim();
    (!name.is_empty()).then(|| name.to_string())
}
