use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::{ItemId, RecipientId};

/// Review status of an item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Submitted, awaiting a review decision.
    Pending,
    /// Approved by a reviewer; the message has been handed to dispatch.
    Approved,
    /// Rejected by a reviewer. May still be approved later.
    Rejected,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Approved => "approved",
            ItemStatus::Rejected => "rejected",
        }
    }

    /// Whether a reviewer decision may move an item from `self` to `next`.
    ///
    /// `Pending` is only ever entered on creation, and `Approved` is never
    /// left. Repeating a decision is allowed (idempotent).
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        match (self, next) {
            (_, ItemStatus::Pending) => false,
            (_, ItemStatus::Approved) => true,
            (ItemStatus::Approved, ItemStatus::Rejected) => false,
            (ItemStatus::Pending | ItemStatus::Rejected, ItemStatus::Rejected) => true,
        }
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ItemStatus::Pending),
            "approved" => Ok(ItemStatus::Approved),
            "rejected" => Ok(ItemStatus::Rejected),
            other => Err(DomainError::validation(format!("unknown status: {other}"))),
        }
    }
}

/// Creation input: everything a client chooses about an item.
///
/// There is no `status` field here: a status sent by a client
/// is dropped during decoding and the stored item always starts `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub id: ItemId,
    pub message: String,
    pub recipient_id: RecipientId,
}

impl NewItem {
    pub fn new(
        id: impl Into<ItemId>,
        message: impl Into<String>,
        recipient_id: impl Into<RecipientId>,
    ) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            recipient_id: recipient_id.into(),
        }
    }
}

/// A message submission awaiting or having received a review decision.
///
/// `message` and `recipient_id` are fixed at creation; `status` is the only
/// field that changes, and only through [`Item::approve`] / [`Item::reject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    id: ItemId,
    message: String,
    recipient_id: RecipientId,
    status: ItemStatus,
}

impl Item {
    /// Build a freshly created item.
    pub fn pending(new: NewItem) -> Self {
        Self {
            id: new.id,
            message: new.message,
            recipient_id: new.recipient_id,
            status: ItemStatus::Pending,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn recipient_id(&self) -> &RecipientId {
        &self.recipient_id
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Mark the item approved, whatever its current status.
    ///
    /// Returns the status the item had before.
    pub fn approve(&mut self) -> ItemStatus {
        core::mem::replace(&mut self.status, ItemStatus::Approved)
    }

    /// Mark the item rejected.
    ///
    /// Fails with `InvalidTransition` once the item is approved; the item is
    /// left untouched in that case. Returns the status the item had before.
    pub fn reject(&mut self) -> DomainResult<ItemStatus> {
        self.transition(ItemStatus::Rejected)
    }

    fn transition(&mut self, next: ItemStatus) -> DomainResult<ItemStatus> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        Ok(core::mem::replace(&mut self.status, next))
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
