/// Small parsing helpers shared by the flows and adapters
pub mod data_uri;
pub mod youtube;

pub use data_uri::{DataUri, DataUriError};
pub use youtube::video_id_from_url;
