pub mod paginator;
pub mod sub_tabs;
pub mod text_input;
