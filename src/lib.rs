pub mod cli;
pub mod config;
pub mod diary;
pub mod index;
pub mod interactive;
pub mod models;
pub mod store;
pub mod utils;

pub use config::Config;
pub use diary::Diary;
pub use index::{DiaryIndex, TagIndex};
pub use models::{Entry, EntryRecord};
pub use store::{Store, StoreError};
pub use utils::Profile;
