pub mod layout;
pub mod profile;

pub use layout::LayoutRecord;
pub use profile::{FavoriteGame, Profile, ProfileError, SocialLink, UpdateProfile};
