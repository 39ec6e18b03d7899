use crate::errors::Result;
use crate::groups::groups_model::{Group, GroupMember, GroupUpdate, NewGroup};
use async_trait::async_trait;

/// Trait for the groups resource.
#[async_trait]
pub trait GroupServiceTrait: Send + Sync {
    async fn create_group(&self, new_group: NewGroup) -> Result<Group>;
    async fn get_user_groups(&self) -> Result<Vec<Group>>;
    async fn get_group_details(&self, group_id: i64) -> Result<Group>;
    async fn update_group(&self, group_id: i64, update: GroupUpdate) -> Result<Group>;
    async fn join_group(&self, group_id: i64) -> Result<()>;
    async fn leave_group(&self, group_id: i64) -> Result<()>;
    async fn get_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>>;
    async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<()>;
    async fn remove_group_member(&self, group_id: i64, user_id: i64) -> Result<()>;
    async fn make_group_admin(&self, group_id: i64, user_id: i64) -> Result<()>;
    async fn get_public_groups(&self) -> Result<Vec<Group>>;
}
