pub mod home_page;
pub mod filter_set_page;
pub mod submission_page;
pub mod access_keys_page;
