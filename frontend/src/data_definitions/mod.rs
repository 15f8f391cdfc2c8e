pub mod url_param;
pub mod app_context;
pub mod navigation_controller;
