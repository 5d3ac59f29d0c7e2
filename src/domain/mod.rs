pub mod decoder;
pub mod derivation;
pub mod error;
pub mod params;
pub mod version;

pub use decoder::Decoder;
pub use derivation::{ManifestContext, RbacApiVersion, derive};
pub use error::AppError;
pub use params::{Encryption, Origin, Params, Port};
pub use version::{KubeVersion, Version};
