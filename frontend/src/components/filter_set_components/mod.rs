pub mod workbench;
pub mod title_bar;
pub mod preset_picker;
pub mod block_list;
pub mod field_blocks_view;
pub mod compound_results;
pub mod saved_selections;
