// src/services/profile.rs

use serde_json::{Map, Value};

use super::ProgressService;
use crate::{
    error::AppError,
    models::user::{UpdateUserRequest, UserInfo},
    store,
    utils::{html, ids::ensure_segment},
};

pub fn user_info_key(user_id: &str) -> String {
    format!("user_info_{}", user_id)
}

impl ProgressService {
    /// Profile lookup, served from the cache while the entry is fresh.
    pub async fn user_info(&self, user_id: &str) -> Result<UserInfo, AppError> {
        ensure_segment("user", user_id)?;

        let key = user_info_key(user_id);
        if let Some(info) = self.cache.get::<UserInfo>(&key) {
            return Ok(info);
        }

        let info: UserInfo = store::read(self.store(), &self.paths.user(user_id))
            .await?
            .ok_or(AppError::NotFound("User not found".to_string()))?;

        self.cache.set(&key, &info);
        Ok(info)
    }

    /// Updates the given profile fields and drops the cached copy.
    pub async fn update_user_info(
        &self,
        user_id: &str,
        update: UpdateUserRequest,
    ) -> Result<UserInfo, AppError> {
        ensure_segment("user", user_id)?;

        let mut fields = Map::new();
        if let Some(name) = update.name {
            fields.insert("name".into(), Value::String(html::clean_text(&name)));
        }
        if let Some(email) = update.email {
            fields.insert("email".into(), Value::String(email));
        }
        if let Some(avatar_url) = update.avatar_url {
            fields.insert("avatarUrl".into(), Value::String(avatar_url));
        }

        if !fields.is_empty() {
            self.store().update(&self.paths.user(user_id), fields).await?;
        }
        self.cache.clear_item(&user_info_key(user_id));

        self.user_info(user_id).await
    }
}
