//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod movie_repo;
pub mod rating_repo;
pub mod review_repo;
pub mod search_repo;
pub mod tag_repo;
pub mod user_repo;

pub use movie_repo::MovieRepo;
pub use rating_repo::RatingRepo;
pub use review_repo::ReviewRepo;
pub use search_repo::SearchRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
