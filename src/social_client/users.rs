use crate::social_client::api;
use crate::social_client::error::ClientError;
use crate::social_client::query::{FilterOp, UserField, UserListParams, UserRelation, Users};
use crate::social_client::{Auth, SocialClient};
use hyper::Method;

impl SocialClient {
    pub async fn create_user(
        &self,
        user: &api::CreateUpdateUserDto,
    ) -> Result<api::User, ClientError> {
        self.send_json(Method::POST, &["collections", "users"], user, Auth::Required)
            .await
    }

    pub async fn users(
        &self,
        params: &UserListParams,
    ) -> Result<api::PaginatedResponse<api::User>, ClientError> {
        self.list(params).await
    }

    pub async fn user(&self, id: &str, relations: &[UserRelation]) -> Result<api::User, ClientError> {
        self.fetch::<Users>(id, relations).await
    }

    pub async fn update_user(
        &self,
        id: &str,
        user: &api::CreateUpdateUserDto,
    ) -> Result<api::User, ClientError> {
        self.send_json(Method::PUT, &["collections", "users", id], user, Auth::Required)
            .await
    }

    pub async fn patch_user(
        &self,
        id: &str,
        patch: &api::PatchUserDto,
    ) -> Result<api::User, ClientError> {
        self.send_json(Method::PATCH, &["collections", "users", id], patch, Auth::Required)
            .await
    }

    pub async fn delete_user(&self, id: &str) -> Result<api::User, ClientError> {
        self.delete(&["collections", "users", id], Auth::Required)
            .await
    }

    pub async fn user_select_options(&self) -> Result<Vec<api::SelectOption>, ClientError> {
        self.select_options::<Users>().await
    }

    pub async fn search_users(
        &self,
        term: &str,
        params: UserListParams,
    ) -> Result<api::PaginatedResponse<api::User>, ClientError> {
        let params = params.filter(UserField::Username, FilterOp::Like, format!("%{term}%"));
        self.list(&params).await
    }

    /// Exact username lookup; the page holds at most one user.
    pub async fn user_by_username(
        &self,
        username: &str,
    ) -> Result<api::PaginatedResponse<api::User>, ClientError> {
        let params = UserListParams::new()
            .filter(UserField::Username, FilterOp::Eq, username)
            .per_page(1);
        self.list(&params).await
    }
}
