pub mod footer_component;
pub mod keybindings_component;
pub mod menu_component;
pub mod theme;

pub const ITEM_HEIGHT: u16 = 1;
