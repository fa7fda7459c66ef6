pub mod app;
pub mod autocomplete;
pub mod repl;
pub mod ui;
