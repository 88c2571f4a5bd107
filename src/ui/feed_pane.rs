use crate::social_client::api;
use crate::social_client::query::{FilterOp, TweetField, TweetListParams, TweetRelation};
use crate::social_client::SocialClient;
use crate::store::Session;
use crate::ui::forms::ComposeForm;
use crate::ui::{collapse_newlines, first_line, ViewError};
use crate::ui_framework::line_buffer::{LineBuffer, LineSegment};
use crate::ui_framework::Render;
use chrono::Utc;
use crossterm::style::Color;
use unicode_truncate::UnicodeTruncateStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u64,
    pub last_page: u64,
    pub total: u64,
}

impl PageInfo {
    fn of<T>(page: &api::PaginatedResponse<T>) -> Self {
        Self {
            current_page: page.current_page,
            last_page: page.last_page,
            total: page.total,
        }
    }
}

/// The home timeline: tweets with their authors, newest inserts first.
#[derive(Debug)]
pub struct FeedPane {
    client: SocialClient,
    tweets: Vec<api::Tweet>,
    page_info: Option<PageInfo>,
    per_page: Option<u64>,
    search: Option<String>,
    viewer_id: Option<String>,
    show_ids: bool,
}

impl FeedPane {
    pub fn new(client: &SocialClient) -> Self {
        Self {
            client: client.clone(),
            tweets: Vec::new(),
            page_info: None,
            per_page: None,
            search: None,
            viewer_id: None,
            show_ids: false,
        }
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }

    pub fn with_ids(mut self, show_ids: bool) -> Self {
        self.show_ids = show_ids;
        self
    }

    /// Tweets by this user get highlighted.
    pub fn set_viewer(&mut self, viewer: Option<&api::User>) {
        self.viewer_id = viewer.map(|user| user.id.clone());
    }

    pub fn tweets(&self) -> &[api::Tweet] {
        &self.tweets
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        self.page_info
    }

    fn params(&self, page: u64) -> TweetListParams {
        let mut params = TweetListParams::new()
            .relations(&[TweetRelation::Author])
            .page(page);
        if let Some(per_page) = self.per_page {
            params = params.per_page(per_page);
        }
        if let Some(term) = &self.search {
            params = params.filter(TweetField::Content, FilterOp::Like, format!("%{term}%"));
        }
        params
    }

    /// Replaces the list with `page`.
    pub async fn load_page(&mut self, page: u64) -> Result<(), ViewError> {
        let resp = self.client.tweets(&self.params(page)).await?;
        self.page_info = Some(PageInfo::of(&resp));
        self.tweets = resp.data;
        Ok(())
    }

    /// `restart` reloads from the first page; otherwise the next page is appended.
    pub async fn load_page_of_tweets(&mut self, restart: bool) -> Result<(), ViewError> {
        if restart {
            return self.load_page(1).await;
        }

        // NB: require a loaded page if continuing to the next one
        let page_info = self.page_info.ok_or(ViewError::NoMorePages)?;
        if page_info.current_page >= page_info.last_page {
            return Err(ViewError::NoMorePages);
        }

        let resp = self
            .client
            .tweets(&self.params(page_info.current_page + 1))
            .await?;
        self.page_info = Some(PageInfo::of(&resp));
        self.tweets.extend(resp.data);
        Ok(())
    }

    pub fn insert(&mut self, tweet: api::Tweet) {
        self.tweets.insert(0, tweet);
    }

    /// Posts a tweet as the signed-in user and puts it at the top of the feed. The tweet is
    /// re-fetched to pick up its author; if that fails the tweet as created is used instead.
    pub async fn publish(
        &mut self,
        session: &Session,
        form: &ComposeForm,
    ) -> Result<&api::Tweet, ViewError> {
        let content = form.validate()?;
        let user = session.current_user().ok_or(ViewError::NotSignedIn)?;

        let created = self
            .client
            .create_tweet(&api::CreateUpdateTweetDto {
                content,
                created_at: Utc::now(),
                author_id: Some(user.id.clone()),
            })
            .await?;

        let tweet = match self.client.tweet(&created.id, &[TweetRelation::Author]).await {
            Ok(tweet) => tweet,
            Err(err) => {
                tracing::warn!(tweet_id = %created.id, "could not reload new tweet: {err}");
                created
            }
        };

        self.insert(tweet);
        Ok(&self.tweets[0])
    }
}

/// `MM-DD HH:MM:SS  >  @author text…`, cut to `width` columns.
pub fn feed_line(tweet: &api::Tweet, width: usize, highlight: bool) -> Vec<LineSegment> {
    let mut segments: Vec<LineSegment> = Vec::new();

    let tweet_time = tweet.created_at_local().format("%m-%d %H:%M:%S");
    let tweet_time = format!("{tweet_time}  >  ");
    let (tweet_time, time_width) = tweet_time.unicode_truncate(width);
    segments.push(LineSegment::color(tweet_time, Color::DarkGrey));

    let tweet_author = tweet.author_username().unwrap_or("[unknown]");
    let tweet_author = format!("@{tweet_author} ");
    let (tweet_author, author_width) = tweet_author.unicode_truncate(width - time_width);
    segments.push(LineSegment::color(
        tweet_author,
        if highlight {
            Color::Yellow
        } else {
            Color::DarkCyan
        },
    ));

    // NB: wide characters can overhang a narrow wrap
    let remaining_width = width - time_width - author_width;
    let formatted = collapse_newlines(&tweet.content);
    let content = first_line(&formatted, remaining_width);
    let (content, _) = content.unicode_truncate(remaining_width);
    segments.push(LineSegment::plain(content));

    segments
}

impl Render for FeedPane {
    fn render(&self, width: usize) -> LineBuffer {
        let mut buffer = LineBuffer::new();

        if self.tweets.is_empty() {
            buffer.push(vec![LineSegment::color("No tweets yet.", Color::DarkGrey)]);
            return buffer;
        }

        for tweet in &self.tweets {
            let highlight = tweet
                .author
                .as_ref()
                .zip(self.viewer_id.as_ref())
                .map_or(false, |(author, viewer_id)| &author.id == viewer_id);
            buffer.push(feed_line(tweet, width, highlight));
            if self.show_ids {
                buffer.push(vec![LineSegment::color(
                    &format!("    {}", tweet.id),
                    Color::DarkGrey,
                )]);
            }
        }

        if let Some(PageInfo {
            current_page,
            last_page,
            total,
        }) = self.page_info
        {
            buffer.push(vec![LineSegment::color(
                &format!("page {current_page}/{last_page}, {total} tweets"),
                Color::DarkGrey,
            )]);
        }

        buffer
    }
}
