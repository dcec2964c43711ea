//! Selectable, filterable list state owned by the navigation core.

use crate::items::ListEntry;

/// Lines taken by one rendered row: title, description, spacer.
pub const ROW_HEIGHT: u16 = 3;
/// Title, count and filter line drawn above the rows.
pub const HEADER_HEIGHT: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Off,
    Editing(String),
    Applied(String),
}

impl Filter {
    pub fn text(&self) -> Option<&str> {
        match self {
            Filter::Off => None,
            Filter::Editing(text) | Filter::Applied(text) => Some(text),
        }
    }
}

#[derive(Debug)]
pub struct FilterList<T> {
    items: Vec<T>,
    /// Indices into `items` that pass the filter, in item order.
    visible: Vec<usize>,
    cursor: usize,
    filter: Filter,
    width: u16,
    height: u16,
}

impl<T> Default for FilterList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            filter: Filter::Off,
            width: 0,
            height: 0,
        }
    }
}

impl<T: ListEntry> FilterList<T> {
    /// Replace the items wholesale; the cursor returns to the top.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.cursor = 0;
        self.refilter();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.visible.clear();
        self.cursor = 0;
        self.filter = Filter::Off;
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn visible(&self) -> impl Iterator<Item = &T> {
        self.visible.iter().map(move |&i| &self.items[i])
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible.get(self.cursor).map(|&i| &self.items[i])
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn is_filtering(&self) -> bool {
        self.filter != Filter::Off
    }

    pub fn is_editing_filter(&self) -> bool {
        matches!(self.filter, Filter::Editing(_))
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height.max(1);
    }

    pub fn page_size(&self) -> usize {
        (self.height.saturating_sub(HEADER_HEIGHT) / ROW_HEIGHT).max(1) as usize
    }

    pub fn move_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let last = self.visible.len().saturating_sub(1);
        self.cursor = (self.cursor + n).min(last);
    }

    pub fn page_up(&mut self) {
        self.move_up(self.page_size());
    }

    pub fn page_down(&mut self) {
        self.move_down(self.page_size());
    }

    pub fn go_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.cursor = self.visible.len().saturating_sub(1);
    }

    /// Start (or resume) typing a filter.
    pub fn start_filter(&mut self) {
        let text = self.filter.text().unwrap_or_default().to_string();
        self.filter = Filter::Editing(text);
    }

    pub fn push_filter_char(&mut self, c: char) {
        if let Filter::Editing(text) = &mut self.filter {
            text.push(c);
            self.cursor = 0;
            self.refilter();
        }
    }

    pub fn pop_filter_char(&mut self) {
        if let Filter::Editing(text) = &mut self.filter {
            text.pop();
            self.cursor = 0;
            self.refilter();
        }
    }

    /// Stop typing; an empty filter switches filtering off.
    pub fn apply_filter(&mut self) {
        if let Filter::Editing(text) = &self.filter {
            self.filter = if text.is_empty() {
                Filter::Off
            } else {
                Filter::Applied(text.clone())
            };
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter = Filter::Off;
        self.cursor = 0;
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self
            .filter
            .text()
            .map(str::to_lowercase)
            .filter(|n| !n.is_empty());
        self.visible = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| match &needle {
                Some(needle) => item.filter_text().to_lowercase().contains(needle),
                None => true,
            })
            .map(|(i, _)| i)
            .collect();
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }
}
