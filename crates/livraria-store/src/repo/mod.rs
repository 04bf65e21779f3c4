//! Repository layer for the books table

pub mod book_repo;

pub use book_repo::BookRepo;
