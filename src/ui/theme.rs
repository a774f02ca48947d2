use ratatui::prelude::Color;
use ratatui::style::palette::tailwind;

pub const PALETTES: [tailwind::Palette; 4] = [
    tailwind::EMERALD,
    tailwind::BLUE,
    tailwind::INDIGO,
    tailwind::GRAY,
];

#[derive(Debug)]
pub struct Theme {
    /// index into PALETTES
    pub idx: usize,
    pub colors: MenuColors,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            idx: 0,
            colors: MenuColors::new(&PALETTES[0]),
        }
    }
}

impl Theme {
    pub fn cycle_next(&mut self) {
        self.idx = (self.idx + 1) % PALETTES.len();
        self.colors = MenuColors::new(&PALETTES[self.idx]);
    }

    pub fn cycle_prev(&mut self) {
        let len = PALETTES.len();
        self.idx = (self.idx + len - 1) % len;
        self.colors = MenuColors::new(&PALETTES[self.idx]);
    }
}

#[derive(Clone, Debug)]
pub struct MenuColors {
    pub buffer_bg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub row_fg: Color,
    pub muted_fg: Color,
    pub selected_row_style_fg: Color,
    pub border_color: Color,
}

impl MenuColors {
    pub const fn new(color: &tailwind::Palette) -> Self {
        Self {
            buffer_bg: tailwind::SLATE.c950,
            header_bg: color.c900,
            header_fg: tailwind::SLATE.c200,
            row_fg: tailwind::SLATE.c200,
            muted_fg: tailwind::SLATE.c500,
            selected_row_style_fg: color.c400,
            border_color: color.c400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycling_wraps_both_ways() {
        let mut theme = Theme::default();
        theme.cycle_prev();
        assert_eq!(theme.idx, PALETTES.len() - 1);
        theme.cycle_next();
        assert_eq!(theme.idx, 0);
    }
}
