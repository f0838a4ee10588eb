use serde::Deserialize;

use courier_core::{Entity, Item, NewItem};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /items`.
///
/// Unknown fields (including `status`) are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub id: String,
    pub message: String,
    pub recipient_id: String,
}

impl From<CreateItemRequest> for NewItem {
    fn from(req: CreateItemRequest) -> Self {
        NewItem::new(req.id, req.message, req.recipient_id)
    }
}

// -------------------------
// Response helpers
// -------------------------

/// Listings are sorted by id at the boundary so output is stable.
pub fn sorted_by_id(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(|a, b| a.id().cmp(b.id()));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_ignores_status() {
        let req: CreateItemRequest = serde_json::from_value(serde_json::json!({
            "id": "1",
            "message": "hi",
            "recipient_id": "r1",
            "status": "approved",
        }))
        .unwrap();

        let item = Item::pending(req.into());
        assert_eq!(item.status(), courier_core::ItemStatus::Pending);
    }

    #[test]
    fn create_request_requires_all_fields() {
        let res: Result<CreateItemRequest, _> =
            serde_json::from_value(serde_json::json!({ "id": "1", "message": "hi" }));
        assert!(res.is_err());
    }

    #[test]
    fn listing_is_sorted() {
        let items = ["b", "c", "a"]
            .into_iter()
            .map(|id| Item::pending(NewItem::new(id, "m", "r")))
            .collect();

        let ids: Vec<_> = sorted_by_id(items)
            .iter()
            .map(|i| i.id().as_str().to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
