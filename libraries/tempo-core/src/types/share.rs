/// Share domain types
use super::collection::CollectionKind;
use super::ids::{CollectionId, ShareId, UserId};
use serde::{Deserialize, Serialize};

/// How a share propagates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    /// Duplicate the collection into the target's space
    #[default]
    Copy,
    /// Record the share only
    Reference,
}

impl ShareType {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ShareType::Copy => "copy",
            ShareType::Reference => "reference",
        }
    }

    /// Parse from the stored string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "copy" => Some(ShareType::Copy),
            "reference" => Some(ShareType::Reference),
            _ => None,
        }
    }
}

/// Immutable audit entry for one share action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub id: ShareId,
    pub kind: CollectionKind,
    pub source_id: CollectionId,
    pub sharer_id: UserId,
    /// `None` for public shares
    pub target_user_id: Option<UserId>,
    pub share_type: ShareType,
    pub message: Option<String>,
    pub created_at: String,
}

/// Input to the share orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub kind: CollectionKind,
    pub source_id: CollectionId,
    pub sharer_id: UserId,
    pub target_user_id: Option<UserId>,
    pub share_type: ShareType,
    pub message: Option<String>,
}

/// Successful share result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum ShareOutcome {
    /// A private copy now exists in the target's space
    #[serde(rename_all = "camelCase")]
    Copied {
        share_id: ShareId,
        collection_id: CollectionId,
    },
    /// Only the audit record and counter were written
    #[serde(rename_all = "camelCase")]
    Referenced { share_id: ShareId },
}

impl ShareOutcome {
    /// Audit record id, present in every outcome
    pub fn share_id(&self) -> ShareId {
        match self {
            ShareOutcome::Copied { share_id, .. } | ShareOutcome::Referenced { share_id } => {
                *share_id
            }
        }
    }
}
