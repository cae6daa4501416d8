mod category;
mod prayer_entry;
mod user;

pub use category::Category;
pub use prayer_entry::{parse_resolution, NewPrayerEntry, PrayerEntry, ValidationError};
pub use user::{Credentials, User};
