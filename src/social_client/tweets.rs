use crate::social_client::api;
use crate::social_client::error::ClientError;
use crate::social_client::query::{
    FilterOp, Order, TweetField, TweetListParams, TweetRelation, TweetSort, Tweets,
};
use crate::social_client::{Auth, SocialClient};
use hyper::Method;

impl SocialClient {
    pub async fn create_tweet(
        &self,
        tweet: &api::CreateUpdateTweetDto,
    ) -> Result<api::Tweet, ClientError> {
        self.send_json(Method::POST, &["collections", "tweets"], tweet, Auth::IfPresent)
            .await
    }

    pub async fn tweets(
        &self,
        params: &TweetListParams,
    ) -> Result<api::PaginatedResponse<api::Tweet>, ClientError> {
        self.list(params).await
    }

    pub async fn tweet(
        &self,
        id: &str,
        relations: &[TweetRelation],
    ) -> Result<api::Tweet, ClientError> {
        self.fetch::<Tweets>(id, relations).await
    }

    pub async fn update_tweet(
        &self,
        id: &str,
        tweet: &api::CreateUpdateTweetDto,
    ) -> Result<api::Tweet, ClientError> {
        self.send_json(Method::PUT, &["collections", "tweets", id], tweet, Auth::IfPresent)
            .await
    }

    pub async fn patch_tweet(
        &self,
        id: &str,
        patch: &api::PatchTweetDto,
    ) -> Result<api::Tweet, ClientError> {
        self.send_json(Method::PATCH, &["collections", "tweets", id], patch, Auth::IfPresent)
            .await
    }

    pub async fn delete_tweet(&self, id: &str) -> Result<api::Tweet, ClientError> {
        self.delete(&["collections", "tweets", id], Auth::IfPresent)
            .await
    }

    pub async fn tweet_select_options(&self) -> Result<Vec<api::SelectOption>, ClientError> {
        self.select_options::<Tweets>().await
    }

    /// Substring match on content; `params` supplies paging and sort.
    pub async fn search_tweets(
        &self,
        term: &str,
        params: TweetListParams,
    ) -> Result<api::PaginatedResponse<api::Tweet>, ClientError> {
        let params = params.filter(TweetField::Content, FilterOp::Like, format!("%{term}%"));
        self.list(&params).await
    }

    pub async fn tweets_by_author(
        &self,
        author_id: &str,
        params: TweetListParams,
    ) -> Result<api::PaginatedResponse<api::Tweet>, ClientError> {
        let params = params
            .filter(TweetField::AuthorId, FilterOp::Eq, author_id)
            .with_relation(TweetRelation::Author);
        self.list(&params).await
    }

    pub async fn recent_tweets(
        &self,
        limit: u64,
    ) -> Result<api::PaginatedResponse<api::Tweet>, ClientError> {
        let params = TweetListParams::new()
            .order_by(TweetSort::CreatedAt, Order::Desc)
            .per_page(limit)
            .page(1)
            .relations(&[TweetRelation::Author]);
        self.list(&params).await
    }
}
