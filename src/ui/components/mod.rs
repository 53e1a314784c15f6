pub mod column_board;
pub mod dashboard;
pub mod lesson_panel;
pub mod menu;
pub mod progress_bar;
pub mod table_grid;
