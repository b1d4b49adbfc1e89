pub mod artifact;
pub mod output;

pub use artifact::{ArtifactMaterializer, TemporaryArtifact};
pub use output::{create_writer, OutputFormat, OutputWriter};
