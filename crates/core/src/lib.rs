//! Domain logic shared by the database and HTTP layers.
//!
//! Nothing here touches the network or the database.

pub mod document;
pub mod error;
pub mod naming;
pub mod review;
pub mod roles;
pub mod search;
pub mod seo;
pub mod tag;
pub mod types;
