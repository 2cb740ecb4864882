//! HTTP sheet publisher -- concrete [`SheetPublisher`] for the external
//! record-keeping endpoint.
//!
//! Sends the complete roster as a JSON array to a configured endpoint.
//! There is no incremental-update contract: every push replaces the whole
//! sheet, so the external side converges no matter how many commits were
//! coalesced. HTTP 429 maps to `PushError::Throttled` so the scheduler can
//! back off; the request itself is bounded by a client timeout.

use std::time::Duration;

use serde::Serialize;

use guildkeeper_core::sync::SheetPublisher;
use guildkeeper_types::character::RosterRow;
use guildkeeper_types::error::PushError;

/// One flattened sheet row in the wire format the endpoint expects.
#[derive(Debug, Serialize)]
struct SheetRow<'a> {
    target_id: String,
    name: &'a str,
    kind: String,
    class: &'a str,
    subclass: &'a str,
    role: String,
    ability_score: i64,
    guild: Option<&'a str>,
    timezone: Option<&'a str>,
}

impl<'a> From<&'a RosterRow> for SheetRow<'a> {
    fn from(row: &'a RosterRow) -> Self {
        let c = &row.character;
        Self {
            target_id: c.target_id.to_string(),
            name: &c.name,
            kind: c.kind.to_string(),
            class: &c.class,
            subclass: &c.subclass,
            role: c.role.to_string(),
            ability_score: c.ability_score,
            guild: c.guild.as_deref(),
            timezone: row.zone_id.as_deref(),
        }
    }
}

/// Publishes the roster to an HTTP endpoint with a bearer token.
pub struct HttpSheetPublisher {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSheetPublisher {
    /// Default bound on one push request.
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(endpoint: String, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");
        Self {
            client,
            endpoint,
            token,
        }
    }
}

impl SheetPublisher for HttpSheetPublisher {
    async fn replace_all(&self, rows: &[RosterRow]) -> Result<(), PushError> {
        let body: Vec<SheetRow<'_>> = rows.iter().map(SheetRow::from).collect();

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PushError::Timeout
            } else {
                PushError::Failed(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            429 => PushError::Throttled,
            _ => PushError::Failed(format!("HTTP {status}: {error_body}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use guildkeeper_types::character::{Character, CharacterKind, Role};
    use guildkeeper_types::id::{CharacterId, UserId};

    fn make_row() -> RosterRow {
        let now = Utc::now();
        RosterRow {
            character: Character {
                id: CharacterId::new(1),
                target_id: UserId::new(42),
                name: "Yuki".to_string(),
                kind: CharacterKind::Main,
                class: "Frost Mage".to_string(),
                subclass: "Icicle".to_string(),
                role: Role::Dps,
                ability_score: 21_000,
                guild: None,
                parent_id: None,
                created_at: now,
                updated_at: now,
            },
            zone_id: Some("Asia/Tokyo".to_string()),
        }
    }

    #[test]
    fn test_sheet_row_wire_format() {
        let row = make_row();
        let sheet_row = SheetRow::from(&row);
        let json = serde_json::to_value(&sheet_row).unwrap();

        assert_eq!(json["target_id"], "42");
        assert_eq!(json["name"], "Yuki");
        assert_eq!(json["kind"], "main");
        assert_eq!(json["role"], "dps");
        assert_eq!(json["ability_score"], 21_000);
        assert_eq!(json["guild"], serde_json::Value::Null);
        assert_eq!(json["timezone"], "Asia/Tokyo");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_failed_not_panic() {
        // Port 9 (discard) on localhost is not listening
        let publisher =
            HttpSheetPublisher::new("http://127.0.0.1:9/roster".to_string(), None);
        let err = publisher.replace_all(&[make_row()]).await.unwrap_err();
        assert!(matches!(err, PushError::Failed(_) | PushError::Timeout));
    }
}
