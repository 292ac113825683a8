pub mod json_feed;
