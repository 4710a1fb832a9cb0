pub mod articles;
pub mod auth;
pub mod catalog;
pub mod documents;
pub mod movies;
pub mod ratings;
pub mod reviews;
pub mod search;
pub mod tags;
pub mod users;
