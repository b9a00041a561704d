//! Heartbeat monitor script generation.
//!
//! The bot posts a heartbeat message into a Discord channel; these scripts
//! run on an external host and alert when the heartbeat goes stale. Three
//! flavours are offered for download: Python (REST polling), Bash and
//! Windows Batch (both webhook-based).

use serde_json::json;

use crate::error::AppError;

/// Supported script flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    Python,
    Bash,
    Batch,
}

impl ScriptType {
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value {
            "python" => Some(Self::Python),
            "bash" => Some(Self::Bash),
            "batch" => Some(Self::Batch),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Python => "py",
            Self::Bash => "sh",
            Self::Batch => "bat",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Python => "text/x-python",
            Self::Bash => "text/x-shellscript",
            Self::Batch => "application/x-msdos-program",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Bash => "Bash",
            Self::Batch => "Windows Batch",
        }
    }
}

/// Parameters collected from the download form.
#[derive(Debug, Clone)]
pub struct MonitorScriptRequest {
    pub script_type: ScriptType,
    pub monitor_bot_token: String,
    pub alert_webhook_url: String,
    pub ddc_bot_user_id: String,
    pub heartbeat_channel_id: String,
    pub monitor_timeout_seconds: String,
    pub alert_channel_ids: String,
}

/// A generated script ready for download.
#[derive(Debug, Clone)]
pub struct GeneratedScript {
    pub content: String,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Renders monitor scripts from embedded templates.
pub struct MonitorScriptService;

impl MonitorScriptService {
    pub fn new() -> Self {
        Self
    }

    /// Validates the request and renders the script.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when:
    /// - `heartbeat_channel_id` is missing or not numeric
    /// - the Python flavour lacks a bot token
    /// - a shell flavour lacks the webhook URL or bot token
    pub fn generate(&self, request: &MonitorScriptRequest) -> Result<GeneratedScript, AppError> {
        if request.heartbeat_channel_id.trim().is_empty() {
            return Err(AppError::bad_request(
                "Heartbeat Channel ID is required",
                json!({"field": "heartbeat_channel_id"}),
            ));
        }
        if !request
            .heartbeat_channel_id
            .trim()
            .chars()
            .all(|c| c.is_ascii_digit())
        {
            return Err(AppError::bad_request(
                "Heartbeat Channel ID must be numeric",
                json!({"field": "heartbeat_channel_id"}),
            ));
        }

        match request.script_type {
            ScriptType::Python => {
                if request.monitor_bot_token.trim().is_empty() {
                    return Err(AppError::bad_request(
                        "Bot Token is required for the Python REST monitor script",
                        json!({"field": "monitor_bot_token"}),
                    ));
                }
            }
            ScriptType::Bash | ScriptType::Batch => {
                if request.alert_webhook_url.trim().is_empty() {
                    return Err(AppError::bad_request(
                        "Webhook URL is required for Shell scripts",
                        json!({"field": "alert_webhook_url"}),
                    ));
                }
                if request.monitor_bot_token.trim().is_empty() {
                    return Err(AppError::bad_request(
                        "Bot Token is required for Shell scripts to resolve the bot user ID",
                        json!({"field": "monitor_bot_token"}),
                    ));
                }
            }
        }

        let timeout = if request.monitor_timeout_seconds.trim().is_empty() {
            "271"
        } else {
            request.monitor_timeout_seconds.trim()
        };

        let template = match request.script_type {
            ScriptType::Python => PYTHON_TEMPLATE,
            ScriptType::Bash => BASH_TEMPLATE,
            ScriptType::Batch => BATCH_TEMPLATE,
        };

        let content = template
            .replace("__BOT_TOKEN__", request.monitor_bot_token.trim())
            .replace("__WEBHOOK_URL__", request.alert_webhook_url.trim())
            .replace("__BOT_USER_ID__", request.ddc_bot_user_id.trim())
            .replace("__HEARTBEAT_CHANNEL_ID__", request.heartbeat_channel_id.trim())
            .replace("__TIMEOUT_SECONDS__", timeout)
            .replace("__ALERT_CHANNEL_IDS__", request.alert_channel_ids.trim());

        Ok(GeneratedScript {
            content,
            filename: format!(
                "ddc_heartbeat_monitor.{}",
                request.script_type.extension()
            ),
            mime_type: request.script_type.mime_type(),
        })
    }
}

impl Default for MonitorScriptService {
    fn default() -> Self {
        Self::new()
    }
}

const PYTHON_TEMPLATE: &str = r#"#!/usr/bin/env python3
"""DDC heartbeat monitor (REST polling)."""

import time
import urllib.request
import json

BOT_TOKEN = "__BOT_TOKEN__"
BOT_USER_ID = "__BOT_USER_ID__"
HEARTBEAT_CHANNEL_ID = "__HEARTBEAT_CHANNEL_ID__"
TIMEOUT_SECONDS = int("__TIMEOUT_SECONDS__")
ALERT_CHANNEL_IDS = "__ALERT_CHANNEL_IDS__"

API = "https://discord.com/api/v10"


def latest_heartbeat_age():
    req = urllib.request.Request(
        f"{API}/channels/{HEARTBEAT_CHANNEL_ID}/messages?limit=20",
        headers={"Authorization": f"Bot {BOT_TOKEN}"},
    )
    with urllib.request.urlopen(req, timeout=30) as resp:
        messages = json.load(resp)
    for message in messages:
        if not BOT_USER_ID or message.get("author", {}).get("id") == BOT_USER_ID:
            import datetime
            stamp = datetime.datetime.fromisoformat(message["timestamp"])
            return (datetime.datetime.now(datetime.timezone.utc) - stamp).total_seconds()
    return None


def alert(text):
    for channel_id in filter(None, ALERT_CHANNEL_IDS.split(",")):
        body = json.dumps({"content": text}).encode()
        req = urllib.request.Request(
            f"{API}/channels/{channel_id.strip()}/messages",
            data=body,
            headers={
                "Authorization": f"Bot {BOT_TOKEN}",
                "Content-Type": "application/json",
            },
        )
        urllib.request.urlopen(req, timeout=30)


if __name__ == "__main__":
    while True:
        try:
            age = latest_heartbeat_age()
            if age is None or age > TIMEOUT_SECONDS:
                alert(f"DDC heartbeat stale (age: {age})")
        except Exception as exc:  # noqa: BLE001
            print(f"monitor error: {exc}")
        time.sleep(60)
"#;

const BASH_TEMPLATE: &str = r#"#!/usr/bin/env bash
# DDC heartbeat monitor (webhook alerting)
set -euo pipefail

BOT_TOKEN="__BOT_TOKEN__"
BOT_USER_ID="__BOT_USER_ID__"
HEARTBEAT_CHANNEL_ID="__HEARTBEAT_CHANNEL_ID__"
TIMEOUT_SECONDS="__TIMEOUT_SECONDS__"
WEBHOOK_URL="__WEBHOOK_URL__"

API="https://discord.com/api/v10"

while true; do
    last=$(curl -sf -H "Authorization: Bot ${BOT_TOKEN}" \
        "${API}/channels/${HEARTBEAT_CHANNEL_ID}/messages?limit=1" |
        python3 -c 'import sys,json,datetime;m=json.load(sys.stdin);print(int((datetime.datetime.now(datetime.timezone.utc)-datetime.datetime.fromisoformat(m[0]["timestamp"])).total_seconds()) if m else 999999)') || last=999999

    if [ "${last}" -gt "${TIMEOUT_SECONDS}" ]; then
        curl -sf -H "Content-Type: application/json" \
            -d "{\"content\": \"DDC heartbeat stale (age: ${last}s)\"}" \
            "${WEBHOOK_URL}" || true
    fi
    sleep 60
done
"#;

const BATCH_TEMPLATE: &str = r#"@echo off
rem DDC heartbeat monitor (webhook alerting)

set BOT_TOKEN=__BOT_TOKEN__
set HEARTBEAT_CHANNEL_ID=__HEARTBEAT_CHANNEL_ID__
set TIMEOUT_SECONDS=__TIMEOUT_SECONDS__
set WEBHOOK_URL=__WEBHOOK_URL__

:loop
curl -sf -H "Authorization: Bot %BOT_TOKEN%" "https://discord.com/api/v10/channels/%HEARTBEAT_CHANNEL_ID%/messages?limit=1" > "%TEMP%\ddc_heartbeat.json"
if errorlevel 1 (
    curl -sf -H "Content-Type: application/json" -d "{\"content\": \"DDC heartbeat check failed\"}" "%WEBHOOK_URL%"
)
timeout /t 60 /nobreak > nul
goto loop
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn request(script_type: ScriptType) -> MonitorScriptRequest {
        MonitorScriptRequest {
            script_type,
            monitor_bot_token: "token-abc".to_string(),
            alert_webhook_url: "https://discord.com/api/webhooks/1/x".to_string(),
            ddc_bot_user_id: "42".to_string(),
            heartbeat_channel_id: "123456789".to_string(),
            monitor_timeout_seconds: "271".to_string(),
            alert_channel_ids: "111,222".to_string(),
        }
    }

    #[test]
    fn test_python_script_substitutes_values() {
        let service = MonitorScriptService::new();
        let script = service.generate(&request(ScriptType::Python)).unwrap();

        assert_eq!(script.filename, "ddc_heartbeat_monitor.py");
        assert_eq!(script.mime_type, "text/x-python");
        assert!(script.content.contains("token-abc"));
        assert!(script.content.contains("123456789"));
        assert!(!script.content.contains("__BOT_TOKEN__"));
    }

    #[test]
    fn test_missing_channel_id_rejected() {
        let service = MonitorScriptService::new();
        let mut req = request(ScriptType::Python);
        req.heartbeat_channel_id = "".to_string();

        let result = service.generate(&req);
        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[test]
    fn test_non_numeric_channel_id_rejected() {
        let service = MonitorScriptService::new();
        let mut req = request(ScriptType::Bash);
        req.heartbeat_channel_id = "general".to_string();

        assert!(service.generate(&req).is_err());
    }

    #[test]
    fn test_python_requires_token() {
        let service = MonitorScriptService::new();
        let mut req = request(ScriptType::Python);
        req.monitor_bot_token = "".to_string();

        assert!(service.generate(&req).is_err());
    }

    #[test]
    fn test_shell_requires_webhook_and_token() {
        let service = MonitorScriptService::new();

        for script_type in [ScriptType::Bash, ScriptType::Batch] {
            let mut req = request(script_type);
            req.alert_webhook_url = "".to_string();
            assert!(service.generate(&req).is_err());

            let mut req = request(script_type);
            req.monitor_bot_token = "".to_string();
            assert!(service.generate(&req).is_err());
        }
    }

    #[test]
    fn test_blank_timeout_defaults() {
        let service = MonitorScriptService::new();
        let mut req = request(ScriptType::Bash);
        req.monitor_timeout_seconds = " ".to_string();

        let script = service.generate(&req).unwrap();
        assert!(script.content.contains("TIMEOUT_SECONDS=\"271\""));
    }

    #[test]
    fn test_form_value_mapping() {
        assert_eq!(ScriptType::from_form_value("python"), Some(ScriptType::Python));
        assert_eq!(ScriptType::from_form_value("bash"), Some(ScriptType::Bash));
        assert_eq!(ScriptType::from_form_value("batch"), Some(ScriptType::Batch));
        assert_eq!(ScriptType::from_form_value("powershell"), None);
    }
}
