//! Environment variable bootstrap.
//!
//! Scripts started by bot actions read their settings from the process
//! environment. The env file is exported once while the bot starts up.

use crate::display;
use aia_error::{AccessError, AccessErrorKind, AccessResult};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Counts from one env file export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_getters::Getters)]
pub struct EnvExport {
    /// Variables written to the environment
    exported: usize,
    /// Variables that already held the same value
    unchanged: usize,
    /// Lines that could not be used
    skipped: usize,
}

/// Export `KEY=VALUE` lines from `path` into the process environment.
///
/// Malformed lines and lines with an empty key or value are skipped with a
/// warning. Variables that already hold the value from the file are left alone,
/// so exporting the same file twice changes nothing the second time.
///
/// This mutates process-wide state. Call it during startup, before any other
/// thread reads or writes the environment.
#[allow(unsafe_code)]
#[instrument(skip_all, fields(path = %path.display()))]
pub fn export_env_vars(path: &Path) -> AccessResult<EnvExport> {
    if !path.is_file() {
        warn!("Env file not set or missing, no variables exported");
        return Err(AccessError::new(AccessErrorKind::MissingInput {
            path: display(path),
            reason: "env file does not exist".to_string(),
        }));
    }

    info!("Exporting environment variables");
    let lines = dotenvy::from_path_iter(path).map_err(|e| {
        AccessError::new(AccessErrorKind::MalformedRecord {
            path: display(path),
            reason: e.to_string(),
        })
    })?;

    let mut export = EnvExport::default();
    for line in lines {
        let (key, value) = match line {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "Skipping malformed env line");
                export.skipped += 1;
                continue;
            }
        };
        if key.is_empty() || value.is_empty() {
            warn!(key = %key, "Skipping env line with empty key or value");
            export.skipped += 1;
            continue;
        }
        if std::env::var(&key).is_ok_and(|current| current == value) {
            debug!(key = %key, "Variable already set");
            export.unchanged += 1;
            continue;
        }
        // SAFETY: only called from single-threaded startup, see function docs.
        unsafe { std::env::set_var(&key, &value) };
        debug!(key = %key, "Variable exported");
        export.exported += 1;
    }

    info!(
        exported = export.exported,
        unchanged = export.unchanged,
        skipped = export.skipped,
        "Environment export finished"
    );
    Ok(export)
}
