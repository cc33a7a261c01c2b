//! Terminal UI components.
//!
//! A thin render layer: everything here reads `App` state and draws; no
//! widget mutates application state.

mod alias_editor;
mod command_line;
mod command_list;
mod delay_editor;
mod layout;
mod learn_menu;
mod status_bar;

pub use layout::draw_ui;
