use crate::ui::{ITEM_HEIGHT, theme::MenuColors};
use crate::util::{keybindings_constraint_len_calculator, popup_area};
use ratatui::{
    Frame,
    layout::{Constraint, Margin, Rect},
    prelude::Style,
    style::{Modifier, Stylize},
    widgets::{
        Block, BorderType, Cell, Clear, HighlightSpacing, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, TableState,
    },
};

#[derive(Debug)]
pub struct Keybinding {
    combo: String,
    description: String,
}
impl Keybinding {
    pub fn ref_array(&self) -> [String; 2] {
        [self.combo.clone(), self.description.clone()]
    }

    pub fn combo(&self) -> &str {
        &self.combo
    }
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A component that handles the help/keybindings popup
#[derive(Debug)]
pub struct KeybindingsComponent {
    /// List of keybindings (combo, description)
    items: Vec<Keybinding>,
    /// Whether the popup is displayed
    pub display: bool,
    /// Table selection state
    pub state: TableState,
    /// Scrollbar state
    pub scroll: ScrollbarState,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Column width constraints (combo, description)
    pub col_widths: (u16, u16),
}

impl Default for KeybindingsComponent {
    fn default() -> Self {
        let items = [
            ("Esc / q / Ctrl+C", "Quit"),
            ("F1 / ?", "Show or hide this help dialog"),
            ("j / ↓", "Move selection down"),
            ("k / ↑", "Move selection up"),
            ("PageDown / PageUp", "Move one page"),
            ("Home / End", "Jump to first / last entry"),
            ("Enter", "Click the selected entry"),
            ("r", "Sample listening sockets now"),
            ("s", "Start recording changes / stop and export"),
            ("x", "Export the visible entries"),
            ("f", "Cycle export format"),
            ("l / h", "Next / previous color theme"),
        ]
        .into_iter()
        .map(|(combo, description)| Keybinding {
            combo: combo.into(),
            description: description.into(),
        })
        .collect::<Vec<_>>();
        let col_widths = keybindings_constraint_len_calculator(&items);
        Self {
            scroll: ScrollbarState::new(items.len() * ITEM_HEIGHT as usize),
            items,
            display: false,
            state: TableState::default(),
            visible_rows: 0,
            col_widths,
        }
    }
}

impl KeybindingsComponent {
    pub fn toggle(&mut self) {
        self.display = !self.display;
        if self.display {
            self.select(0);
        }
    }

    fn select(&mut self, idx: usize) {
        self.state.select(Some(idx));
        self.scroll = self.scroll.position(idx * ITEM_HEIGHT as usize);
    }

    pub fn next_row(&mut self) {
        let len = self.items.len();
        let idx = self.state.selected().map_or(0, |i| (i + 1) % len.max(1));
        self.select(idx);
    }

    pub fn previous_row(&mut self) {
        let len = self.items.len().max(1);
        let idx = self.state.selected().map_or(0, |i| (i + len - 1) % len);
        self.select(idx);
    }

    /// Render the keybindings popup
    pub fn render(&mut self, frame: &mut Frame, area: Rect, colors: &MenuColors) {
        let area = popup_area(area, 5, 6);
        self.visible_rows = area.height.saturating_sub(2) as usize;

        let selected_row_style = Style::default()
            .add_modifier(Modifier::REVERSED)
            .fg(colors.selected_row_style_fg);
        let combo_style = Style::new()
            .fg(colors.selected_row_style_fg)
            .bg(colors.buffer_bg);
        let desc_style = Style::new().fg(colors.row_fg).bg(colors.buffer_bg);

        let rows = self.items.iter().map(|kb| {
            let [combo, description] = kb.ref_array();
            Row::new([
                Cell::from(combo).style(combo_style),
                Cell::from(description).style(desc_style),
            ])
            .height(ITEM_HEIGHT)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(self.col_widths.0 + 1),
                Constraint::Min(self.col_widths.1),
            ],
        )
        .row_highlight_style(selected_row_style)
        .bg(colors.buffer_bg)
        .highlight_spacing(HighlightSpacing::Always)
        .block(
            Block::bordered()
                .border_type(BorderType::Plain)
                .border_style(Style::new().fg(colors.border_color))
                .title(" Keybindings "),
        );

        frame.render_widget(Clear, area);
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

    #[test]
    fn opening_selects_first_row_and_navigation_wraps() {
        let mut help = KeybindingsComponent::default();
        help.toggle();
        assert!(help.display);
        assert_eq!(help.state.selected(), Some(0));

        help.previous_row();
        assert_eq!(help.state.selected(), Some(help.items.len() - 1));
        help.next_row();
        assert_eq!(help.state.selected(), Some(0));
    }

    #[test]
    fn click_binding_is_listed() {
        let help = KeybindingsComponent::default();
        assert!(help.items.iter().any(|kb| kb.combo() == "Enter"));
    }
}
