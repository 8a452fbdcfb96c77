use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::models::item::{Category, Item, ItemDraft};
use crate::query::{ItemPage, ListingQuery};
use crate::services::blob::{self, BlobError, BlobStore, ImageUpload, StoredBlob};

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("item not found")]
    NotFound,

    /// Owner-scoped lookups fold "missing" and "not yours" together so a
    /// non-owner cannot probe for item existence
    #[error("item not found or caller is not the owner")]
    NotFoundOrNotOwner,

    #[error("only found items can be claimed")]
    ClaimWrongCategory,

    #[error("caller is not allowed to claim this item")]
    ClaimNotOwner,

    #[error("item has already been claimed")]
    AlreadyClaimed,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

const INSERT_ITEM_SQL: &str = "INSERT INTO \"items\" \
    (id, name, description, category, last_seen_location, found_location, image, image_public_id, created_by) \
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
    RETURNING *";

const UPDATE_ITEM_SQL: &str = "UPDATE \"items\" \
    SET name = $3, description = $4, category = $5, last_seen_location = $6, \
        found_location = $7, image = $8, image_public_id = $9, updated_at = now() \
    WHERE id = $1 AND created_by = $2 \
    RETURNING *";

/// Item listing, mutation, and claim workflows
pub struct ItemService {
    pool: PgPool,
    blob: Arc<dyn BlobStore>,
}

impl ItemService {
    pub fn new(pool: PgPool, blob: Arc<dyn BlobStore>) -> Self {
        Self { pool, blob }
    }

    /// Filtered, sorted, paginated listing plus the post-filter total
    pub async fn list(&self, query: &ListingQuery) -> Result<ItemPage, ItemError> {
        let (sql, params) = query.to_select_sql();
        let mut select = sqlx::query_as::<_, Item>(&sql);
        for param in &params {
            select = select.bind(param);
        }
        let items = select.fetch_all(&self.pool).await?;

        let (count_sql, count_params) = query.to_count_sql();
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in &count_params {
            count = count.bind(param);
        }
        let total_items = count.fetch_one(&self.pool).await?;

        Ok(ItemPage::new(items, total_items, query))
    }

    /// Everything the caller has posted, newest first, unpaginated
    pub async fn list_mine(&self, owner: Uuid) -> Result<Vec<Item>, ItemError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM \"items\" WHERE created_by = $1 ORDER BY \"created_at\" DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get(&self, id: Uuid) -> Result<Item, ItemError> {
        sqlx::query_as::<_, Item>("SELECT * FROM \"items\" WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ItemError::NotFound)
    }

    /// Create an item owned by the caller. An accompanying image goes to the
    /// blob store first; if the insert then fails the fresh blob is deleted
    /// best-effort so it does not leak.
    pub async fn create(
        &self,
        owner: Uuid,
        draft: ItemDraft,
        image: Option<ImageUpload>,
    ) -> Result<Item, ItemError> {
        let uploaded = self.upload_item_image(image).await?;

        let (last_seen_location, found_location) = draft.location.columns();
        let result = sqlx::query_as::<_, Item>(INSERT_ITEM_SQL)
            .bind(Uuid::new_v4())
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.location.category().as_str())
            .bind(last_seen_location)
            .bind(found_location)
            .bind(uploaded.as_ref().map(|b| b.url.as_str()))
            .bind(uploaded.as_ref().map(|b| b.reference.as_str()))
            .bind(owner)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(item) => Ok(item),
            Err(e) => {
                self.compensate(uploaded).await;
                Err(e.into())
            }
        }
    }

    /// Full-field replace, scoped to the owner. A new image replaces the old
    /// one: upload first, persist, then delete the stale blob best-effort.
    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        draft: ItemDraft,
        image: Option<ImageUpload>,
    ) -> Result<Item, ItemError> {
        let existing = sqlx::query_as::<_, Item>(
            "SELECT * FROM \"items\" WHERE id = $1 AND created_by = $2",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ItemError::NotFoundOrNotOwner)?;

        let uploaded = self.upload_item_image(image).await?;

        let (image_url, image_reference) = match &uploaded {
            Some(blob) => (Some(blob.url.clone()), Some(blob.reference.clone())),
            None => (existing.image.clone(), existing.image_public_id.clone()),
        };

        let (last_seen_location, found_location) = draft.location.columns();
        let result = sqlx::query_as::<_, Item>(UPDATE_ITEM_SQL)
            .bind(id)
            .bind(owner)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(draft.location.category().as_str())
            .bind(last_seen_location)
            .bind(found_location)
            .bind(image_url)
            .bind(image_reference)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(Some(item)) => {
                if uploaded.is_some() {
                    if let Some(old_reference) = &existing.image_public_id {
                        blob::delete_quietly(self.blob.as_ref(), old_reference).await;
                    }
                }
                Ok(item)
            }
            Ok(None) => {
                self.compensate(uploaded).await;
                Err(ItemError::NotFoundOrNotOwner)
            }
            Err(e) => {
                self.compensate(uploaded).await;
                Err(e.into())
            }
        }
    }

    /// Delete is owner-scoped exactly like update and shares its combined
    /// not-found response.
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<Item, ItemError> {
        sqlx::query_as::<_, Item>(
            "DELETE FROM \"items\" WHERE id = $1 AND created_by = $2 RETURNING *",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ItemError::NotFoundOrNotOwner)
    }

    /// Mark a found item as claimed. Guards run in strict order; the first
    /// failure wins. The transition is one-way: a later call always stops at
    /// the already-claimed guard.
    pub async fn claim(&self, id: Uuid, caller: Uuid) -> Result<Item, ItemError> {
        let item = self.get(id).await?;

        ensure_claimable(&item, caller)?;

        let claimed = sqlx::query_as::<_, Item>(
            "UPDATE \"items\" SET claimed = true, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(claimed)
    }

    async fn upload_item_image(
        &self,
        image: Option<ImageUpload>,
    ) -> Result<Option<StoredBlob>, ItemError> {
        match image {
            Some(image) => {
                let folder = &config::config().blob.item_folder;
                Ok(Some(self.blob.upload(image, folder).await?))
            }
            None => Ok(None),
        }
    }

    async fn compensate(&self, uploaded: Option<StoredBlob>) {
        if let Some(blob) = uploaded {
            blob::delete_quietly(self.blob.as_ref(), &blob.reference).await;
        }
    }
}

/// The claim guard chain, after existence has been established:
/// found-category, then ownership, then not-yet-claimed.
pub fn ensure_claimable(item: &Item, caller: Uuid) -> Result<(), ItemError> {
    if item.location.category() != Category::Found {
        return Err(ItemError::ClaimWrongCategory);
    }
    if item.created_by != caller {
        return Err(ItemError::ClaimNotOwner);
    }
    if item.claimed {
        return Err(ItemError::AlreadyClaimed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::item::ItemLocation;
    use chrono::Utc;

    fn found_item(owner: Uuid, claimed: bool) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: "Umbrella".to_string(),
            description: "Blue, slightly bent".to_string(),
            location: ItemLocation::Found {
                found_location: "Lecture hall 2".to_string(),
            },
            claimed,
            image: None,
            image_public_id: None,
            created_by: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_can_claim_an_unclaimed_found_item() {
        let owner = Uuid::new_v4();
        let item = found_item(owner, false);
        assert!(ensure_claimable(&item, owner).is_ok());
    }

    #[test]
    fn lost_items_are_never_claimable() {
        let owner = Uuid::new_v4();
        let mut item = found_item(owner, false);
        item.location = ItemLocation::Lost {
            last_seen_location: "Cafeteria".to_string(),
        };

        // Category is checked before ownership: even the owner gets the
        // category error, and so does everyone else
        assert!(matches!(
            ensure_claimable(&item, owner),
            Err(ItemError::ClaimWrongCategory)
        ));
        assert!(matches!(
            ensure_claimable(&item, Uuid::new_v4()),
            Err(ItemError::ClaimWrongCategory)
        ));
    }

    #[test]
    fn non_owner_is_rejected_before_the_claimed_check() {
        let owner = Uuid::new_v4();
        let item = found_item(owner, true);

        assert!(matches!(
            ensure_claimable(&item, Uuid::new_v4()),
            Err(ItemError::ClaimNotOwner)
        ));
    }

    #[test]
    fn double_claim_fails_and_stays_claimed() {
        let owner = Uuid::new_v4();
        let mut item = found_item(owner, false);

        assert!(ensure_claimable(&item, owner).is_ok());
        item.claimed = true;

        assert!(matches!(
            ensure_claimable(&item, owner),
            Err(ItemError::AlreadyClaimed)
        ));
        assert!(item.claimed);
    }
}
