use crate::store::SessionState;
use crate::ui_framework::line_buffer::{LineBuffer, LineSegment};
use crate::ui_framework::Render;
use crossterm::style::{Attributes, Color, Colors};
use unicode_truncate::UnicodeTruncateStr;

/// Who is signed in, as a single inverted bar.
#[derive(Debug, Clone)]
pub struct BottomBar {
    session: SessionState,
}

impl BottomBar {
    pub fn new(session: &SessionState) -> Self {
        Self {
            session: session.clone(),
        }
    }

    pub fn status(&self) -> String {
        match &self.session {
            SessionState::Anonymous => "not signed in".to_string(),
            SessionState::Authenticated { user: Some(user) } => {
                format!("signed in as @{}", user.username)
            }
            SessionState::Authenticated { user: None } => "signed in".to_string(),
        }
    }
}

impl Render for BottomBar {
    fn render(&self, width: usize) -> LineBuffer {
        let status = self.status();
        let (status, used_width) = status.unicode_truncate(width);
        let bar = format!("{status}{}", " ".repeat(width - used_width));

        let mut buffer = LineBuffer::new();
        buffer.push(vec![LineSegment::new(
            &bar,
            Colors::new(Color::Black, Color::White),
            Attributes::default(),
        )]);
        buffer
    }
}
