use crate::social_client::api;
use crate::social_client::query::TweetRelation;
use crate::social_client::SocialClient;
use crate::store::Session;
use crate::ui::forms::ComposeForm;
use crate::ui::{wrap_paragraphs, ViewError};
use crate::ui_framework::line_buffer::{LineBuffer, LineSegment};
use crate::ui_framework::Render;
use crossterm::style::Color;

const INDENT: &str = "    ";

/// One tweet with its author and comments.
#[derive(Debug)]
pub struct TweetPane {
    client: SocialClient,
    tweet: api::Tweet,
}

impl TweetPane {
    pub async fn load(client: &SocialClient, tweet_id: &str) -> Result<Self, ViewError> {
        let tweet = client
            .tweet(tweet_id, &[TweetRelation::Author, TweetRelation::Comments])
            .await?;
        Ok(Self {
            client: client.clone(),
            tweet,
        })
    }

    pub fn tweet(&self) -> &api::Tweet {
        &self.tweet
    }

    pub fn comments(&self) -> &[api::Comment] {
        self.tweet.comments.as_deref().unwrap_or_default()
    }

    /// Comments on this tweet as the signed-in user. The new comment goes to the top of the
    /// list; if the server did not expand its author, the current user stands in.
    pub async fn comment(
        &mut self,
        session: &Session,
        form: &ComposeForm,
    ) -> Result<&api::Comment, ViewError> {
        let content = form.validate()?;
        let user = session.current_user().ok_or(ViewError::NotSignedIn)?;

        let mut comment = self
            .client
            .create_comment(&api::CreateCommentDto {
                content,
                tweet_id: self.tweet.id.clone(),
                author_id: Some(user.id.clone()),
            })
            .await?;
        if comment.author.is_none() {
            comment.author = Some(user);
        }

        let comments = self.tweet.comments.get_or_insert_with(Vec::new);
        comments.insert(0, comment);
        Ok(&comments[0])
    }
}

impl Render for TweetPane {
    fn render(&self, width: usize) -> LineBuffer {
        let mut buffer = LineBuffer::new();
        let tweet = &self.tweet;

        let tweet_time = tweet.created_at_local().format("%Y-%m-%d %H:%M:%S");
        buffer.push(vec![LineSegment::color(&tweet_time.to_string(), Color::DarkGrey)]);

        let tweet_author = match &tweet.author {
            Some(author) => format!("@{} [{}]", author.username, author.email),
            None => "@[unknown]".to_string(),
        };
        buffer.push(vec![LineSegment::color(&tweet_author, Color::DarkCyan)]);
        buffer.push_newline();

        for line in wrap_paragraphs(&tweet.content, width) {
            buffer.push(vec![LineSegment::plain(&line)]);
        }
        buffer.push_newline();

        let comments = self.comments();
        let heading = match comments.len() {
            1 => "1 comment".to_string(),
            n => format!("{n} comments"),
        };
        buffer.push(vec![LineSegment::bold(&heading)]);

        let inner_width = width.saturating_sub(INDENT.len());
        for comment in comments {
            let comment_time = comment.created_at_local().format("%m-%d %H:%M");
            let comment_author = comment.author_username().unwrap_or("[unknown]");
            buffer.push(vec![
                LineSegment::plain(INDENT),
                LineSegment::color(&format!("@{comment_author}  "), Color::DarkCyan),
                LineSegment::color(&comment_time.to_string(), Color::DarkGrey),
            ]);
            for line in wrap_paragraphs(&comment.content, inner_width) {
                buffer.push(vec![LineSegment::plain(INDENT), LineSegment::plain(&line)]);
            }
        }

        buffer
    }
}
