//! Classification and translation of Immich prediction requests.

mod request;
mod route;
mod translate;

pub use request::{parse_entries, replay, ImageUpload, PredictRequest};
pub use route::Route;
pub use translate::DownstreamCall;
