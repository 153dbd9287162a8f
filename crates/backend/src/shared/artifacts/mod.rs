pub mod file_name;
pub mod fs_store;
pub mod store;

pub use file_name::{build_file_name, parse_file_name, ParsedFileName};
pub use fs_store::FsArtifactStore;
pub use store::{download, ArtifactError, ArtifactStore, DownloadOutcome};
