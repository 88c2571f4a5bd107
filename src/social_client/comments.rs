use crate::social_client::api;
use crate::social_client::error::ClientError;
use crate::social_client::query::{
    CommentField, CommentListParams, CommentRelation, Comments, FilterOp,
};
use crate::social_client::{Auth, SocialClient};
use hyper::Method;

impl SocialClient {
    pub async fn create_comment(
        &self,
        comment: &api::CreateCommentDto,
    ) -> Result<api::Comment, ClientError> {
        self.send_json(Method::POST, &["collections", "comments"], comment, Auth::Required)
            .await
    }

    pub async fn comments(
        &self,
        params: &CommentListParams,
    ) -> Result<api::PaginatedResponse<api::Comment>, ClientError> {
        self.list(params).await
    }

    pub async fn comment(
        &self,
        id: &str,
        relations: &[CommentRelation],
    ) -> Result<api::Comment, ClientError> {
        self.fetch::<Comments>(id, relations).await
    }

    pub async fn delete_comment(&self, id: &str) -> Result<api::Comment, ClientError> {
        self.delete(&["collections", "comments", id], Auth::Required)
            .await
    }

    pub async fn comments_by_tweet(
        &self,
        tweet_id: &str,
        params: CommentListParams,
    ) -> Result<api::PaginatedResponse<api::Comment>, ClientError> {
        let params = params
            .filter(CommentField::TweetId, FilterOp::Eq, tweet_id)
            .with_relation(CommentRelation::Author);
        self.list(&params).await
    }

    pub async fn comments_by_author(
        &self,
        author_id: &str,
        params: CommentListParams,
    ) -> Result<api::PaginatedResponse<api::Comment>, ClientError> {
        let params = params
            .filter(CommentField::AuthorId, FilterOp::Eq, author_id)
            .with_relation(CommentRelation::Tweet)
            .with_relation(CommentRelation::Author);
        self.list(&params).await
    }
}
