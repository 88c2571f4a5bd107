pub mod bottom_bar;
pub mod feed_pane;
pub mod forms;
pub mod messages;
pub mod tweet_pane;
pub mod user_pane;

use crate::social_client::error::ClientError;
use crate::ui::forms::FormErrors;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("{0}")]
    Invalid(#[from] FormErrors),
    #[error("you need to be signed in to do that")]
    NotSignedIn,
    #[error("no more pages")]
    NoMorePages,
    #[error(transparent)]
    Client(#[from] ClientError),
}

static RE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

pub fn collapse_newlines(text: &str) -> Cow<'_, str> {
    RE_NEWLINES.replace_all(text, "⏎ ")
}

/// First line of `text` wrapped at `width`, with an ellipsis if anything was cut.
pub fn first_line(text: &str, width: usize) -> String {
    let width = width.max(2);
    let lines = textwrap::wrap(text, width);
    match lines.len() {
        0 => String::new(),
        1 => lines[0].to_string(),
        _ => {
            // Rewrap to leave room for the ellipsis (…), which may knock out a word
            let lines = textwrap::wrap(text, width - 1);
            format!("{}…", lines[0])
        }
    }
}

/// Paragraphs split on newlines, each wrapped to `width`.
pub fn wrap_paragraphs(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    RE_NEWLINES
        .split(text)
        .flat_map(|paragraph| textwrap::wrap(paragraph, width))
        .map(|line| line.into_owned())
        .collect()
}
