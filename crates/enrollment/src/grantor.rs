//! Achievement granting.

use std::sync::Arc;

use eduquest_core::{Achievement, AchievementType, UserId};
use eduquest_progress::AchievementGrant;
use eduquest_storage::Storage;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::SharedStorage;

/// Grants achievements at most once per user and kind.
///
/// The uniqueness check and the insert are a single storage operation, so
/// concurrent grants of the same kind leave exactly one record and every
/// caller gets that record back.
pub struct AchievementGrantor<S: Storage> {
    storage: SharedStorage<S>,
    clock: Arc<dyn Clock>,
}

impl<S: Storage> Clone for AchievementGrantor<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: Storage> AchievementGrantor<S> {
    /// Grantor writing to `storage`, stamping grants with `clock`.
    pub fn new(storage: SharedStorage<S>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Grant `kind` to `user_id` unless already held.
    ///
    /// Returns the stored record, which is the earlier one when the user
    /// already held the award.
    pub async fn grant(
        &self,
        user_id: UserId,
        kind: AchievementType,
        title: impl Into<String> + Send,
        description: impl Into<String> + Send,
    ) -> eduquest_storage::Result<Achievement> {
        let candidate = Achievement::new(user_id, kind, title, description, self.clock.now());
        let stored = self.storage.lock().await.insert_achievement(&candidate).await?;

        if stored.id == candidate.id {
            info!(user_id = %user_id, kind = %kind, "Achievement granted");
        } else {
            debug!(user_id = %user_id, kind = %kind, "Achievement already held");
        }
        Ok(stored)
    }

    /// Grant every request in order, returning the stored records.
    pub async fn grant_all(
        &self,
        user_id: UserId,
        grants: Vec<AchievementGrant>,
    ) -> eduquest_storage::Result<Vec<Achievement>> {
        let mut stored = Vec::with_capacity(grants.len());
        for grant in grants {
            stored.push(
                self.grant(user_id, grant.kind, grant.title, grant.description)
                    .await?,
            );
        }
        Ok(stored)
    }
}
