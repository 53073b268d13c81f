// Video uploads, metadata storage, and the list/detail/notes pages.

pub mod handlers;
pub mod repository;
pub mod upload;
