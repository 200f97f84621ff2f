/// Service layer for asset processing
///
/// This module provides the pure image transforms behind the pipelines:
/// - Normalizer: canonicalizes uploaded images to fixed-width PNG
/// - Avatar: procedurally generates placeholder avatars
/// - Content type: maps asset names to MIME types
pub mod avatar;
pub mod content_type;
pub mod normalizer;

pub use avatar::synthesize_avatar;
pub use content_type::resolve_content_type;
pub use normalizer::ImageNormalizer;
