use crate::menu::MenuEntry;
use crate::ui::keybindings_component::Keybinding;
use unicode_width::UnicodeWidthStr;

fn widest<'a>(cells: impl Iterator<Item = &'a str>) -> u16 {
    #[allow(clippy::cast_possible_truncation)]
    let width = cells.map(UnicodeWidthStr::width).max().unwrap_or(0) as u16;
    width
}

pub fn keybindings_constraint_len_calculator(items: &[Keybinding]) -> (u16, u16) {
    let combo = widest(items.iter().map(Keybinding::combo));
    let description = widest(items.iter().map(Keybinding::description).flat_map(str::lines));
    (combo, description)
}

/// Column widths for (port, title, tooltip), never narrower than the headers.
pub fn menu_constraint_len_calculator(items: &[MenuEntry]) -> (u16, u16, u16) {
    let ports: Vec<String> = items.iter().map(|e| e.socket().port.to_string()).collect();
    let port = widest(ports.iter().map(String::as_str)).max(4);
    let title = widest(items.iter().map(MenuEntry::title)).max(5);
    let tooltip = widest(items.iter().map(MenuEntry::tooltip)).max(7);
    (port, title, tooltip)
}
