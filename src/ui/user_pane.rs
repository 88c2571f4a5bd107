use crate::social_client::api;
use crate::social_client::query::UserListParams;
use crate::social_client::SocialClient;
use crate::ui::feed_pane::feed_line;
use crate::ui::ViewError;
use crate::ui_framework::line_buffer::{LineBuffer, LineSegment};
use crate::ui_framework::Render;
use crossterm::style::Color;
use unicode_truncate::UnicodeTruncateStr;

const USERNAME_COLUMN: usize = 22;

/// A profile: the user followed by their tweets.
#[derive(Debug, Clone)]
pub struct UserPane {
    user: api::User,
    tweets: Vec<api::Tweet>,
}

impl UserPane {
    /// Loads the user first; their tweets only once the user is known to exist. If the tweets
    /// can't be fetched the profile is still shown, without them.
    pub async fn load(client: &SocialClient, user_id: &str) -> Result<Self, ViewError> {
        let user = client.user(user_id, &[]).await?;
        let tweets = match client.tweets_by_author(&user.id, Default::default()).await {
            Ok(page) => page.data,
            Err(err) => {
                tracing::warn!(user_id = %user.id, "could not load tweets: {err}");
                Vec::new()
            }
        };
        Ok(Self { user, tweets })
    }

    pub fn user(&self) -> &api::User {
        &self.user
    }

    pub fn tweets(&self) -> &[api::Tweet] {
        &self.tweets
    }
}

impl Render for UserPane {
    fn render(&self, width: usize) -> LineBuffer {
        let mut buffer = LineBuffer::new();

        buffer.push(vec![
            LineSegment::bold(&format!("@{}", self.user.username)),
            LineSegment::color(&format!("  {}", self.user.email), Color::DarkGrey),
        ]);
        buffer.push_newline();

        if self.tweets.is_empty() {
            buffer.push(vec![LineSegment::color("No tweets yet.", Color::DarkGrey)]);
        }
        for tweet in &self.tweets {
            buffer.push(feed_line(tweet, width, false));
        }

        buffer
    }
}

/// Search results for users, one per line.
#[derive(Debug, Clone)]
pub struct UserListPane {
    users: api::PaginatedResponse<api::User>,
}

impl UserListPane {
    pub async fn search(
        client: &SocialClient,
        term: Option<&str>,
        page: u64,
    ) -> Result<Self, ViewError> {
        let params = UserListParams::new().page(page);
        let users = match term {
            Some(term) => client.search_users(term, params).await?,
            None => client.users(&params).await?,
        };
        Ok(Self { users })
    }

    pub fn users(&self) -> &[api::User] {
        &self.users.data
    }
}

impl Render for UserListPane {
    fn render(&self, width: usize) -> LineBuffer {
        let mut buffer = LineBuffer::new();

        for user in &self.users.data {
            let handle = format!("@{}", user.username);
            let (handle, handle_width) = handle.unicode_truncate(USERNAME_COLUMN - 1);
            let username = format!("{handle}{}", " ".repeat(USERNAME_COLUMN - handle_width));
            let (username, username_width) = username.unicode_truncate(width);
            let (id, _) = user.id.unicode_truncate(width - username_width);
            buffer.push(vec![
                LineSegment::color(username, Color::DarkCyan),
                LineSegment::color(id, Color::DarkGrey),
            ]);
        }
        buffer.push(vec![LineSegment::color(
            &format!(
                "page {}/{}, {} users",
                self.users.current_page, self.users.last_page, self.users.total
            ),
            Color::DarkGrey,
        )]);

        buffer
    }
}
