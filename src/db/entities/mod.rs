pub mod accounts;
pub mod sessions;
pub mod artists;
pub mod albums;
pub mod songs;
pub mod ratings;
pub mod reviews;
pub mod comments;
pub mod favorites;

pub use accounts::Entity as Account;
pub use sessions::Entity as Session;
pub use artists::Entity as Artist;
pub use albums::Entity as Album;
pub use songs::Entity as Song;
pub use ratings::Entity as Rating;
pub use reviews::Entity as Review;
pub use comments::Entity as Comment;
pub use favorites::Entity as Favorite;
