//! Content-type resolution for asset names
//!
//! The wire content type is derived from the requested asset name's suffix,
//! not from stored object metadata. Total function; unknown suffixes fall
//! back to a default instead of erroring.

/// Resolve the MIME type for an asset name by its extension
pub fn resolve_content_type(asset_name: &str) -> &'static str {
    let ext = asset_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}
