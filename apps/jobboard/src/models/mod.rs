pub mod application;
pub mod listing;

pub use application::Application;
pub use listing::Listing;
