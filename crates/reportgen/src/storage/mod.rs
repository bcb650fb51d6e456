pub mod filesystem;

pub use filesystem::{write_artifact, ArtifactWriter};
