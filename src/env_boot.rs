use dotenv::dotenv;

/// Load environment files for local development.
///
/// Tries `.env` in the working directory first, then `.env.local` (the name
/// the storefront front-end uses for shop credentials), then `.env` at the
/// Cargo project root. Missing files are fine; a deployed service gets
/// everything from real environment variables.
pub fn ensure_dotenv() {
    if dotenv().is_ok() {
        return;
    }
    if dotenv::from_filename(".env.local").is_ok() {
        return;
    }
    // Fallback to Cargo project root
    let root = env!("CARGO_MANIFEST_DIR");
    let candidate = format!("{}/.env", root);
    let _ = dotenv::from_filename(candidate);
}
