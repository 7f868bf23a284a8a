pub mod bookmarks;
pub mod cluster;
pub mod health;
pub mod info;
