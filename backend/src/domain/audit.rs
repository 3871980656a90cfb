//! Append-only audit ledger entries.
//!
//! Every moderation mutation produces exactly one [`AuditEntry`] holding the
//! record's state before and after the change. Entries are built by the
//! [`AuditRecorder`] and persisted in the same unit of work as the mutation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{Error, Record};

/// Maximum stored length of `ip_address` (fits an IPv6 literal).
const IP_ADDRESS_MAX: usize = 45;

/// Kind of change recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Restore,
}

impl AuditAction {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Restore => "RESTORE",
        }
    }

    /// Parse the stored representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "RESTORE" => Some(Self::Restore),
            _ => None,
        }
    }
}

/// Who performed a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    Admin,
    Guest,
}

impl ActorType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Guest => "guest",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }
}

/// Request metadata describing the actor behind a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestActor {
    pub user_id: Option<String>,
    pub user_type: ActorType,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestActor {
    /// Anonymous guest seen from `ip_address`.
    #[must_use]
    pub fn guest(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            user_id: None,
            user_type: ActorType::Guest,
            ip_address,
            user_agent,
        }
    }
}

/// What changed, before the actor and timestamp are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDraft {
    pub table_name: String,
    pub record_id: String,
    pub action: AuditAction,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub metadata: Option<Value>,
}

impl AuditDraft {
    /// Draft an entry comparing `before` and `after` snapshots of one record.
    ///
    /// At least one side must be present; the table and id come from it.
    ///
    /// # Errors
    /// Returns an internal error when neither side is given or snapshotting
    /// fails.
    pub fn between(
        action: AuditAction,
        before: Option<&Record>,
        after: Option<&Record>,
        metadata: Value,
    ) -> Result<Self, Error> {
        let subject = before
            .or(after)
            .ok_or_else(|| Error::internal("audit draft requires a record"))?;
        Ok(Self {
            table_name: subject.kind().table_name().to_owned(),
            record_id: subject.id().to_string(),
            action,
            old_values: before.map(Record::snapshot).transpose()?,
            new_values: after.map(Record::snapshot).transpose()?,
            metadata: Some(metadata),
        })
    }
}

/// A persisted ledger entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub table_name: String,
    pub record_id: String,
    pub action: AuditAction,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub user_id: Option<String>,
    pub user_type: Option<ActorType>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// One page of the ledger plus the total number of entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditPage {
    pub entries: Vec<AuditEntry>,
    pub total: i64,
}

/// Builds ledger entries, stamping ids and creation times.
#[derive(Clone)]
pub struct AuditRecorder {
    clock: Arc<dyn Clock>,
}

impl AuditRecorder {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Attach the actor and a timestamp to `draft`.
    #[must_use]
    pub fn entry(&self, draft: AuditDraft, actor: &RequestActor) -> AuditEntry {
        let AuditDraft {
            table_name,
            record_id,
            action,
            old_values,
            new_values,
            metadata,
        } = draft;
        AuditEntry {
            id: Uuid::new_v4(),
            table_name,
            record_id,
            action,
            old_values,
            new_values,
            user_id: actor.user_id.clone(),
            user_type: Some(actor.user_type),
            ip_address: actor
                .ip_address
                .as_deref()
                .map(|ip| ip.chars().take(IP_ADDRESS_MAX).collect()),
            user_agent: actor.user_agent.clone(),
            metadata,
            created_at: self.clock.utc(),
        }
    }
}
