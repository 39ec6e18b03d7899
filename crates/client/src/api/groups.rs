use async_trait::async_trait;
use chama_core::groups::{Group, GroupMember, GroupServiceTrait, GroupUpdate, NewGroup};
use chama_core::Result;

use crate::client::ApiClient;
use crate::types::{
    AddMemberRequest, GroupEnvelope, GroupsEnvelope, JoinGroupRequest, MembersEnvelope,
};

#[async_trait]
impl GroupServiceTrait for ApiClient {
    /// POST /api/groups/
    async fn create_group(&self, new_group: NewGroup) -> Result<Group> {
        let envelope: GroupEnvelope = self
            .post("/api/groups/", &new_group, "Failed to create group")
            .await?;
        Ok(envelope.into_inner())
    }

    /// GET /api/groups/
    async fn get_user_groups(&self) -> Result<Vec<Group>> {
        let envelope: GroupsEnvelope = self
            .get("/api/groups/", "Failed to fetch user groups")
            .await?;
        Ok(envelope.groups)
    }

    /// GET /api/groups/{id}
    async fn get_group_details(&self, group_id: i64) -> Result<Group> {
        let envelope: GroupEnvelope = self
            .get(
                &format!("/api/groups/{}", group_id),
                "Failed to fetch group details",
            )
            .await?;
        Ok(envelope.into_inner())
    }

    /// PUT /api/groups/{id}
    async fn update_group(&self, group_id: i64, update: GroupUpdate) -> Result<Group> {
        let envelope: GroupEnvelope = self
            .put(
                &format!("/api/groups/{}", group_id),
                &update,
                "Failed to update group",
            )
            .await?;
        Ok(envelope.into_inner())
    }

    /// POST /api/groups/join
    async fn join_group(&self, group_id: i64) -> Result<()> {
        Ok(self
            .post_unit(
                "/api/groups/join",
                &JoinGroupRequest { group_id },
                "Failed to join group",
            )
            .await?)
    }

    /// POST /api/groups/{id}/leave
    async fn leave_group(&self, group_id: i64) -> Result<()> {
        Ok(self
            .post_empty(
                &format!("/api/groups/{}/leave", group_id),
                "Failed to leave group",
            )
            .await?)
    }

    /// GET /api/groups/{id}/members
    async fn get_group_members(&self, group_id: i64) -> Result<Vec<GroupMember>> {
        let envelope: MembersEnvelope = self
            .get(
                &format!("/api/groups/{}/members", group_id),
                "Failed to fetch group members",
            )
            .await?;
        Ok(envelope.into_members())
    }

    /// POST /api/groups/{id}/members
    async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        Ok(self
            .post_unit(
                &format!("/api/groups/{}/members", group_id),
                &AddMemberRequest { user_id },
                "Failed to add member",
            )
            .await?)
    }

    /// DELETE /api/groups/{id}/members/{user_id}
    async fn remove_group_member(&self, group_id: i64, user_id: i64) -> Result<()> {
        Ok(self
            .delete_unit(
                &format!("/api/groups/{}/members/{}", group_id, user_id),
                "Failed to remove member",
            )
            .await?)
    }

    /// POST /api/groups/{id}/admin/{user_id}
    async fn make_group_admin(&self, group_id: i64, user_id: i64) -> Result<()> {
        Ok(self
            .post_empty(
                &format!("/api/groups/{}/admin/{}", group_id, user_id),
                "Failed to make user admin",
            )
            .await?)
    }

    /// GET /api/groups/discover
    async fn get_public_groups(&self) -> Result<Vec<Group>> {
        let envelope: GroupsEnvelope = self
            .get("/api/groups/discover", "Failed to fetch public groups")
            .await?;
        Ok(envelope.groups)
    }
}
