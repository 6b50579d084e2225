mod media;
mod post;

pub use media::SqliteMediaRepository;
pub use post::SqlitePostRepository;
