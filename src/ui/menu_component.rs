use crate::menu::MenuEntry;
use crate::model::EntryId;
use crate::ui::{ITEM_HEIGHT, theme::MenuColors};
use crate::util::menu_constraint_len_calculator;
use ratatui::{
    Frame,
    layout::{Constraint, Margin, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{
        Block, BorderType, Cell, HighlightSpacing, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, TableState,
    },
};

/// Scrollable table of the visible menu entries.
#[derive(Debug)]
pub struct MenuComponent {
    pub items: Vec<MenuEntry>,
    pub state: TableState,
    pub scroll: ScrollbarState,
    /// Number of visible rows (set during render)
    pub visible_rows: usize,
    /// Port, title, tooltip
    pub column_widths: (u16, u16, u16),
}

impl Default for MenuComponent {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: TableState::default(),
            scroll: ScrollbarState::new(1),
            visible_rows: 0,
            column_widths: menu_constraint_len_calculator(&[]),
        }
    }
}

impl MenuComponent {
    /// Replaces the rows, keeping the selection on the same entry when it is
    /// still listed.
    pub fn set_items(&mut self, items: Vec<MenuEntry>) {
        let selected = self.selected().map(MenuEntry::id);
        self.items = items;
        self.column_widths = menu_constraint_len_calculator(&self.items);
        self.scroll = self
            .scroll
            .content_length(self.items.len() * ITEM_HEIGHT as usize);

        let idx = selected
            .and_then(|id| self.position(&id))
            .or_else(|| self.state.selected().filter(|_| !self.items.is_empty()))
            .map(|i| i.min(self.items.len().saturating_sub(1)));
        self.select(idx);
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.items.iter().position(|e| e.id() == *id)
    }

    fn select(&mut self, idx: Option<usize>) {
        self.state.select(idx);
        self.scroll = self
            .scroll
            .position(idx.unwrap_or(0) * ITEM_HEIGHT as usize);
    }

    pub fn selected(&self) -> Option<&MenuEntry> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    pub fn next_row(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let idx = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.select(Some(idx));
    }

    pub fn previous_row(&mut self) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let idx = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.select(Some(idx));
    }

    pub fn first_row(&mut self) {
        if !self.items.is_empty() {
            self.select(Some(0));
        }
    }

    pub fn last_row(&mut self) {
        if let Some(last) = self.items.len().checked_sub(1) {
            self.select(Some(last));
        }
    }

    pub fn page_down(&mut self) {
        let Some(last) = self.items.len().checked_sub(1) else {
            return;
        };
        let current = self.state.selected().unwrap_or(0);
        self.select(Some((current + self.visible_rows.max(1)).min(last)));
    }

    pub fn page_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        self.select(Some(current.saturating_sub(self.visible_rows.max(1))));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, colors: &MenuColors, title: &str) {
        // borders + header
        self.visible_rows = area.height.saturating_sub(3) as usize;

        let header = Row::new(["Port", "Title", "Tooltip"].map(Cell::from))
            .style(Style::default().fg(colors.header_fg).bg(colors.header_bg))
            .height(ITEM_HEIGHT);

        let rows = self.items.iter().map(|item| {
            let mut cells = item.ref_array().into_iter().map(Cell::from).collect::<Vec<_>>();
            if let Some(tooltip) = cells.pop() {
                cells.push(tooltip.style(Style::default().fg(colors.muted_fg)));
            }
            Row::new(cells)
                .style(Style::default().fg(colors.row_fg))
                .height(ITEM_HEIGHT)
        });

        let (port, name, tooltip) = self.column_widths;
        let table = Table::new(
            rows,
            [
                Constraint::Length(port),
                Constraint::Min(name),
                Constraint::Min(tooltip),
            ],
        )
        .header(header)
        .row_highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(colors.selected_row_style_fg),
        )
        .bg(colors.buffer_bg)
        .highlight_spacing(HighlightSpacing::Always)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::new().fg(colors.border_color))
                .title(format!(" {title} ")),
        );

        frame.render_stateful_widget(table, area, &mut self.state);

        frame.render_stateful_widget(
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }),
            &mut self.scroll,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListeningSocket, ProtocolFamily};

    fn entry(port: u16) -> MenuEntry {
        MenuEntry::from_socket(&ListeningSocket {
            port,
            family: ProtocolFamily::IPv4,
            pid: Some(u32::from(port)),
            process_name: format!("p{port}"),
        })
    }

    #[test]
    fn selection_follows_entry_across_updates() {
        let mut menu = MenuComponent::default();
        menu.set_items(vec![entry(22), entry(80), entry(443)]);
        menu.next_row();
        menu.next_row();
        assert_eq!(menu.selected().unwrap().socket().port, 80);

        menu.set_items(vec![entry(80), entry(443)]);
        assert_eq!(menu.selected().unwrap().socket().port, 80);
    }

    #[test]
    fn selection_is_clamped_when_entry_disappears() {
        let mut menu = MenuComponent::default();
        menu.set_items(vec![entry(22), entry(80)]);
        menu.last_row();
        menu.set_items(vec![entry(22)]);
        assert_eq!(menu.selected().unwrap().socket().port, 22);

        menu.set_items(vec![]);
        assert!(menu.selected().is_none());
    }

    #[test]
    fn navigation_wraps() {
        let mut menu = MenuComponent::default();
        menu.set_items(vec![entry(1), entry(2), entry(3)]);
        menu.previous_row();
        assert_eq!(menu.selected().unwrap().socket().port, 3);
        menu.next_row();
        assert_eq!(menu.selected().unwrap().socket().port, 1);
    }
}
