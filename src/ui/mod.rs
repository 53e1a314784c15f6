pub mod components;
pub mod effects;
pub mod layout;
pub mod line_input;
pub mod theme;
