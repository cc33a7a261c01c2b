//! HTTP transport client for the IR blaster device.
//!
//! Every operation maps to one idempotent request: reads are plain GETs,
//! writes either overwrite (`rename`, `delete`, `update_delay`) or replace
//! wholesale (`assign/bulk`), so a retry after a timeout never double-applies.
//! A transport failure or timeout yields [`DeviceError::Unknown`] — the
//! outcome is indeterminate and the caller must refresh rather than assume
//! success or failure.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::alias::{AliasPair, Rejection};
use crate::command::{clamp_delay, Command};
use crate::learn::LearnMode;

/// Error taxonomy for device operations. Nothing here is fatal — every
/// failure is recoverable by retrying or refreshing the snapshot.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("device busy: a learn session is already active")]
    Busy,
    #[error("index {index} out of range (delay count is {count})")]
    OutOfRange { index: usize, count: usize },
    #[error("{0} alias pair(s) rejected")]
    PartialFailure(usize),
    #[error("outcome unknown: {0}")]
    Unknown(String),
}

impl From<reqwest::Error> for DeviceError {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts and connection failures are indeterminate: the request
        // may or may not have been applied on the device.
        DeviceError::Unknown(err.to_string())
    }
}

/// Map a non-success HTTP status to the error taxonomy.
pub fn error_for_status(status: StatusCode, what: &str) -> DeviceError {
    match status {
        StatusCode::NOT_FOUND => DeviceError::NotFound(what.to_string()),
        StatusCode::CONFLICT => DeviceError::Conflict(what.to_string()),
        StatusCode::LOCKED => DeviceError::Busy,
        StatusCode::RANGE_NOT_SATISFIABLE => DeviceError::OutOfRange { index: 0, count: 0 },
        other => DeviceError::Unknown(format!("{}: HTTP {}", what, other)),
    }
}

/// Outcome of a learn request as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnAck {
    Stored,
    Failed,
}

/// Result of a bulk alias replace: how many pairs were applied, which were
/// rejected client-side, and the device's advisory message.
#[derive(Debug, Clone)]
pub struct BulkAliasReport {
    pub applied: usize,
    pub rejected: Vec<Rejection>,
    pub device_message: String,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// `/ir/list` entry. Delays arrive as JSON numbers; the firmware does not
/// guarantee integers, so accept floats and clamp.
#[derive(Debug, Deserialize)]
struct WireCommand {
    name: String,
    #[serde(default)]
    delays: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct WireLearnStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
struct WireFirmwareCheck {
    update: bool,
}

// ─── Response parsing (pure, unit-tested) ────────────────────────────────────

/// Parse the `/ir/list` payload, preserving device-reported order.
pub fn parse_command_list(body: &str) -> Result<Vec<Command>, DeviceError> {
    let wire: Vec<WireCommand> = serde_json::from_str(body)
        .map_err(|e| DeviceError::Unknown(format!("bad /ir/list payload: {}", e)))?;
    Ok(wire
        .into_iter()
        .map(|w| Command {
            name: w.name,
            delays: w.delays.into_iter().map(clamp_delay).collect(),
        })
        .collect())
}

/// Parse the `/ir/aliases` payload (JSON object of from→to).
pub fn parse_alias_map(body: &str) -> Result<BTreeMap<String, String>, DeviceError> {
    serde_json::from_str(body)
        .map_err(|e| DeviceError::Unknown(format!("bad /ir/aliases payload: {}", e)))
}

/// Parse the `/ir/simple_list` payload (JSON array of file names).
pub fn parse_simple_list(body: &str) -> Result<Vec<String>, DeviceError> {
    serde_json::from_str(body)
        .map_err(|e| DeviceError::Unknown(format!("bad /ir/simple_list payload: {}", e)))
}

/// Parse a learn response body. The firmware answers either with JSON
/// `{"status":"ok"|"fail"}` or with a raw text acknowledgement; a 2xx with
/// unparseable text counts as stored.
pub fn parse_learn_ack(body: &str) -> LearnAck {
    match serde_json::from_str::<WireLearnStatus>(body) {
        Ok(s) if s.status == "ok" => LearnAck::Stored,
        Ok(_) => LearnAck::Failed,
        Err(_) => LearnAck::Stored,
    }
}

/// Parse the `/fw/check` payload.
pub fn parse_firmware_check(body: &str) -> Result<bool, DeviceError> {
    let wire: WireFirmwareCheck = serde_json::from_str(body)
        .map_err(|e| DeviceError::Unknown(format!("bad /fw/check payload: {}", e)))?;
    Ok(wire.update)
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Blocking HTTP client bound to one device.
pub struct DeviceClient {
    http: Client,
    /// Separate client with a long timeout: a learn request blocks until the
    /// user presses a button on the physical remote.
    http_learn: Client,
    base: String,
}

impl DeviceClient {
    pub fn new(base_url: &str, request_timeout: Duration, learn_timeout: Duration) -> Self {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_default();
        let http_learn = Client::builder()
            .timeout(learn_timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            http_learn,
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn get_text(&self, path: &str, query: &[(&str, &str)], what: &str) -> Result<String, DeviceError> {
        let resp = self.http.get(self.url(path)).query(query).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(error_for_status(status, what));
        }
        Ok(resp.text()?)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// List all commands with their delay sequences, in device order.
    pub fn list_commands(&self) -> Result<Vec<Command>, DeviceError> {
        let body = self.get_text("/ir/list", &[], "command list")?;
        parse_command_list(&body)
    }

    /// List raw signal file names (the alias editor's option set).
    pub fn simple_list(&self) -> Result<Vec<String>, DeviceError> {
        let body = self.get_text("/ir/simple_list", &[], "signal file list")?;
        parse_simple_list(&body)
    }

    /// Fetch the alias table.
    pub fn list_aliases(&self) -> Result<BTreeMap<String, String>, DeviceError> {
        let body = self.get_text("/ir/aliases", &[], "alias table")?;
        parse_alias_map(&body)
    }

    // ── Playback ─────────────────────────────────────────────────────────

    /// Transmit a command. `name` must already be alias-resolved by the
    /// caller; the device looks it up verbatim.
    pub fn send(&self, name: &str) -> Result<(), DeviceError> {
        tracing::info!("Sending command '{}'", name);
        self.get_text("/ir/send", &[("name", name)], name)?;
        Ok(())
    }

    // ── Learn ────────────────────────────────────────────────────────────

    /// Start a capture on the device and block until it reports an outcome.
    /// With `name` set this is the name-first protocol: the device stores the
    /// command itself on success. Without it, follow up with [`save_learned`].
    ///
    /// [`save_learned`]: DeviceClient::save_learned
    pub fn learn(&self, mode: LearnMode, name: Option<&str>) -> Result<LearnAck, DeviceError> {
        let mut query: Vec<(&str, &str)> = vec![("mode", mode.as_query())];
        if let Some(name) = name {
            query.push(("name", name));
        }
        tracing::info!("Learn request: mode={} name={:?}", mode.as_query(), name);
        let resp = self
            .http_learn
            .get(self.url("/ir/learn"))
            .query(&query)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(error_for_status(status, "learn"));
        }
        Ok(parse_learn_ack(&resp.text()?))
    }

    /// Name-after protocol: persist the most recently captured signal under
    /// `name`.
    pub fn save_learned(&self, name: &str) -> Result<(), DeviceError> {
        tracing::info!("Saving learned command as '{}'", name);
        self.get_text("/ir/save", &[("name", name)], name)?;
        Ok(())
    }

    // ── Repository mutations ─────────────────────────────────────────────

    /// Rename a command. 404 if `old` is absent, 409 if `new` exists.
    pub fn rename(&self, old: &str, new: &str) -> Result<(), DeviceError> {
        tracing::info!("Renaming '{}' -> '{}'", old, new);
        self.get_text("/ir/rename", &[("old", old), ("new", new)], old)?;
        Ok(())
    }

    /// Delete a command. Aliases pointing at it are left dangling.
    pub fn delete(&self, name: &str) -> Result<(), DeviceError> {
        tracing::info!("Deleting '{}'", name);
        self.get_text("/ir/delete", &[("name", name)], name)?;
        Ok(())
    }

    /// Overwrite a command's whole delay list. Body is the comma-joined
    /// values; success is signalled by HTTP status only.
    pub fn update_delays(&self, key: &str, delays: &[u32]) -> Result<(), DeviceError> {
        let body = delays
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",");
        tracing::info!("Updating delays for '{}': [{}]", key, body);
        let resp = self
            .http
            .post(self.url("/ir/update_delay"))
            .query(&[("key", key)])
            .header("Content-Type", "text/plain")
            .body(body)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(error_for_status(status, key));
        }
        Ok(())
    }

    /// Remove one delay slot. Later slots shift down by one; the command's
    /// step count changes as a side effect.
    pub fn delete_delay(&self, key: &str, index: usize) -> Result<(), DeviceError> {
        tracing::info!("Deleting delay {} of '{}'", index, key);
        let index_str = index.to_string();
        let resp = self
            .http
            .post(self.url("/ir/delete_delay"))
            .query(&[("key", key), ("index", index_str.as_str())])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(error_for_status(status, key));
        }
        Ok(())
    }

    /// Replace the whole alias table. Best-effort: invalid pairs are dropped
    /// client-side with reasons and the valid remainder is still posted.
    pub fn replace_aliases(&self, candidates: &[AliasPair]) -> Result<BulkAliasReport, DeviceError> {
        let (valid, rejected) = crate::alias::partition_pairs(candidates);
        tracing::info!(
            "Replacing aliases: {} valid, {} rejected",
            valid.len(),
            rejected.len()
        );
        let resp = self
            .http
            .post(self.url("/ir/assign/bulk"))
            .json(&valid)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(error_for_status(status, "alias table"));
        }
        Ok(BulkAliasReport {
            applied: valid.len(),
            rejected,
            device_message: resp.text().unwrap_or_default(),
        })
    }

    // ── Firmware ─────────────────────────────────────────────────────────

    /// Ask the device whether a firmware update is available.
    pub fn check_firmware(&self) -> Result<bool, DeviceError> {
        let body = self.get_text("/fw/check", &[], "firmware check")?;
        parse_firmware_check(&body)
    }

    /// Kick off a firmware update. The device only acks the start.
    pub fn start_firmware_update(&self) -> Result<(), DeviceError> {
        tracing::info!("Starting firmware update");
        self.get_text("/fw/update", &[], "firmware update")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_list() {
        let body = r#"[{"name":"tv_on","delays":[100,200]},{"name":"mute","delays":[]}]"#;
        let cmds = parse_command_list(body).unwrap();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].name, "tv_on");
        assert_eq!(cmds[0].delays, vec![100, 200]);
        assert_eq!(cmds[1].step_count(), 1);
    }

    #[test]
    fn test_parse_command_list_preserves_order() {
        let body = r#"[{"name":"z"},{"name":"a"},{"name":"m"}]"#;
        let cmds = parse_command_list(body).unwrap();
        let names: Vec<&str> = cmds.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_command_list_clamps_bad_delays() {
        let body = r#"[{"name":"x","delays":[-10,49.6]}]"#;
        let cmds = parse_command_list(body).unwrap();
        assert_eq!(cmds[0].delays, vec![0, 50]);
    }

    #[test]
    fn test_parse_alias_map() {
        let body = r#"{"white.ir":"reset.ir","fan":"fan_low"}"#;
        let map = parse_alias_map(body).unwrap();
        assert_eq!(map.get("white.ir").map(String::as_str), Some("reset.ir"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_parse_learn_ack() {
        assert_eq!(parse_learn_ack(r#"{"status":"ok"}"#), LearnAck::Stored);
        assert_eq!(parse_learn_ack(r#"{"status":"fail"}"#), LearnAck::Failed);
        // Raw text ack from the older firmware counts as stored
        assert_eq!(parse_learn_ack("learn request accepted"), LearnAck::Stored);
    }

    #[test]
    fn test_parse_firmware_check() {
        assert!(parse_firmware_check(r#"{"update":true}"#).unwrap());
        assert!(!parse_firmware_check(r#"{"update":false}"#).unwrap());
    }

    #[test]
    fn test_error_for_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "tv_on"),
            DeviceError::NotFound(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::CONFLICT, "tv_on"),
            DeviceError::Conflict(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::LOCKED, "learn"),
            DeviceError::Busy
        ));
        assert!(matches!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "x"),
            DeviceError::Unknown(_)
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = DeviceClient::new(
            "http://192.168.4.1/",
            Duration::from_secs(5),
            Duration::from_secs(30),
        );
        assert_eq!(client.url("/ir/list"), "http://192.168.4.1/ir/list");
    }
}
