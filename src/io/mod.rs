mod fs_store;
mod store;

pub use fs_store::FsTileStore;
pub use store::{validate_key, TileStore};
