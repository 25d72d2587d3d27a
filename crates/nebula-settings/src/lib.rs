//! Settings documents for biome configs: ordered key/value maps, fallback
//! flattening, the `Key: Value` file format, directory discovery, and typed
//! setting descriptors.

mod error;
pub mod map;
pub mod reader;
pub mod setting;
pub mod source;
pub mod writer;

pub use error::SettingsError;
pub use map::{SettingsMap, normalize_key};
pub use reader::{parse_settings, read_settings_file};
pub use setting::{InvalidSetting, Setting, SettingInfo};
pub use source::{DirectorySource, MemorySource, SettingsSource, SettingsSourceEntry};
pub use writer::{render_settings, write_settings_file};
