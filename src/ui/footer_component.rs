use crate::portwatch::ExportFormat;
use crate::ui::theme::MenuColors;

use ratatui::widgets::{Block, BorderType};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    prelude::Style,
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};

#[derive(Debug, Default)]
pub struct FooterComponent {
    pub export_format: ExportFormat,
    /// Last thing worth telling the user (clicks, exports, errors)
    pub status: Option<String>,
}

impl FooterComponent {
    pub fn new(export_format: ExportFormat) -> Self {
        Self {
            export_format,
            status: None,
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, colors: &MenuColors, is_tracking: bool) {
        let mut spans = if is_tracking {
            vec![
                Span::styled("● Recording", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" | "),
                Span::styled("[s]", Style::default()),
                Span::raw(" stop and export"),
            ]
        } else {
            vec![
                Span::styled("○ Not recording", Style::default().add_modifier(Modifier::ITALIC)),
                Span::raw(" | "),
                Span::styled("[s]", Style::default()),
                Span::raw(" record changes"),
            ]
        };
        spans.extend([
            Span::raw(" | "),
            Span::styled("[f]", Style::default()),
            Span::raw(format!(" format: {:?}", self.export_format)),
            Span::raw(" | "),
            Span::styled("[?]", Style::default()),
            Span::raw(" help"),
        ]);

        let mut lines = vec![Line::from(spans)];
        if let Some(status) = &self.status {
            lines.push(Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(colors.selected_row_style_fg),
            )));
        }

        let footer = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(colors.row_fg).bg(colors.buffer_bg))
            .block(
                Block::bordered()
                    .border_type(BorderType::Plain)
                    .border_style(Style::new().fg(colors.border_color)),
            );

        frame.render_widget(footer, area);
    }
}
