//! Support chat session handles
//!
//! A handle is a plain value handed to the client and sent back on each
//! request. Creating, loading and clearing all return new handles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionHandle {
    /// Absent once the session has been cleared
    pub id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SessionHandle {
    pub fn create(now: DateTime<Utc>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            created_at: Some(now),
        }
    }

    /// Rebuild a handle from an id supplied by the client
    pub fn load(raw_id: &str, created_at: Option<DateTime<Utc>>) -> Option<Self> {
        let id = Uuid::parse_str(raw_id.trim()).ok()?;
        Some(Self {
            id: Some(id),
            created_at,
        })
    }

    pub fn clear(&self) -> Self {
        Self {
            id: None,
            created_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}
