use ratatui::text::Text;
use ratatui::widgets::{Paragraph, Wrap};

/// Scroll state over a block of pre-rendered text.
#[derive(Debug, Default)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    content: Text<'static>,
    /// Line count of `content` once wrapped to `width`.
    total_lines: usize,
}

impl Viewport {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn content(&self) -> &Text<'static> {
        &self.content
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height.max(1);
        self.measure();
    }

    /// New content starts scrolled to the top.
    pub fn set_content(&mut self, content: Text<'static>) {
        self.content = content;
        self.offset = 0;
        self.measure();
    }

    pub fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }

    pub fn line_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn line_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub fn half_view_up(&mut self) {
        self.line_up(self.half_height());
    }

    pub fn half_view_down(&mut self) {
        self.line_down(self.half_height());
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    fn half_height(&self) -> usize {
        (self.height as usize / 2).max(1)
    }

    fn measure(&mut self) {
        self.total_lines = if self.width == 0 {
            self.content.lines.len()
        } else {
            Paragraph::new(self.content.clone())
                .wrap(Wrap { trim: false })
                .line_count(self.width)
        };
        self.offset = self.offset.min(self.max_offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::text::Line;

    fn numbered(lines: usize) -> Text<'static> {
        Text::from(
            (0..lines)
                .map(|i| Line::from(format!("line {}", i)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut vp = Viewport::default();
        vp.set_size(40, 10);
        vp.set_content(numbered(25));
        assert_eq!(vp.max_offset(), 15);

        vp.line_up(3);
        assert_eq!(vp.offset(), 0);
        vp.line_down(100);
        assert_eq!(vp.offset(), 15);
        vp.goto_top();
        vp.half_view_down();
        assert_eq!(vp.offset(), 5);
        vp.half_view_up();
        assert_eq!(vp.offset(), 0);
        vp.goto_bottom();
        assert_eq!(vp.offset(), 15);
    }

    #[test]
    fn short_content_does_not_scroll() {
        let mut vp = Viewport::default();
        vp.set_size(40, 10);
        vp.set_content(numbered(3));
        vp.line_down(1);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn wrapping_counts_toward_length() {
        let mut vp = Viewport::default();
        vp.set_size(10, 2);
        vp.set_content(Text::from("x".repeat(35)));
        assert_eq!(vp.total_lines(), 4);
        vp.goto_bottom();
        assert_eq!(vp.offset(), 2);
    }

    #[test]
    fn growing_clamps_offset() {
        let mut vp = Viewport::default();
        vp.set_size(40, 5);
        vp.set_content(numbered(10));
        vp.goto_bottom();
        assert_eq!(vp.offset(), 5);
        vp.set_size(40, 8);
        assert_eq!(vp.offset(), 2);
    }
}
