//! User profile use cases.

use domains::{NewProfile, ProfileUpdate, Result, User};
use tracing::{debug, info};

use crate::ForumService;

impl ForumService {
    pub async fn create_user(&self, nickname: &str, profile: &NewProfile) -> Result<User> {
        let user = self.users.create_user(nickname, profile).await?;
        info!(nickname = %user.nickname, "user registered");
        Ok(user)
    }

    pub async fn get_user(&self, nickname: &str) -> Result<User> {
        self.users.get_user(nickname).await
    }

    /// An update with no fields set is answered with the current profile.
    pub async fn update_user(&self, nickname: &str, update: &ProfileUpdate) -> Result<User> {
        if update.is_empty() {
            debug!(nickname, "empty profile update");
            return self.users.get_user(nickname).await;
        }
        self.users.update_user(nickname, update).await
    }
}
