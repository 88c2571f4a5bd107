use anyhow::Result;
use crossterm::queue;
use crossterm::style::{self, Attribute, Attributes, Color, Colors};
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    lines: Vec<Vec<LineSegment>>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn push(&mut self, line: Vec<LineSegment>) {
        self.lines.push(line);
    }

    pub fn push_newline(&mut self) {
        self.push(vec![]);
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Text only, one `\n` per line. Handy when colors don't matter (or can't be shown).
    pub fn to_plain_string(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            for segment in line {
                out.push_str(&segment.text);
            }
            out.push('\n');
        }
        out
    }

    pub fn render(&self, out: &mut impl Write) -> Result<()> {
        for line in &self.lines {
            for LineSegment {
                colors,
                attributes,
                text,
            } in line
            {
                queue!(out, style::SetColors(*colors))?;
                queue!(out, style::SetAttributes(*attributes))?;
                queue!(out, style::Print(text))?;
                queue!(out, style::SetAttribute(Attribute::Reset))?;
            }
            queue!(out, style::ResetColor)?;
            queue!(out, style::Print("\n"))?;
        }

        out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    colors: Colors,
    attributes: Attributes,
    text: String,
}

impl LineSegment {
    pub fn new(text: &str, colors: Colors, attributes: Attributes) -> Self {
        Self {
            colors,
            attributes,
            text: text.to_string(),
        }
    }

    pub fn color(text: &str, foreground: Color) -> Self {
        Self::new(
            text,
            Colors::new(foreground, Color::Reset),
            Attributes::default(),
        )
    }

    pub fn bold(text: &str) -> Self {
        Self::new(
            text,
            Colors::new(Color::Reset, Color::Reset),
            Attribute::Bold.into(),
        )
    }

    pub fn plain(text: &str) -> Self {
        Self::new(
            text,
            Colors::new(Color::Reset, Color::Reset),
            Attributes::default(),
        )
    }
}
