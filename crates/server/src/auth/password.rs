use crate::core::error::Result;

/// Lowest bcrypt cost accepted for stored passwords.
pub const MIN_COST: u32 = 10;

/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

/// Salted bcrypt hash of `plain`.
///
/// Runs on the blocking pool; `cost` is raised to [`MIN_COST`] if lower.
pub async fn hash_password(plain: &str, cost: u32) -> Result<String> {
    let plain = plain.to_owned();
    let cost = cost.max(MIN_COST);
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost)).await??;
    Ok(hashed)
}

/// Check `plain` against a stored hash. Malformed hashes never match.
pub async fn verify_password(plain: &str, hashed: &str) -> Result<bool> {
    let plain = plain.to_owned();
    let hashed = hashed.to_owned();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hashed).unwrap_or(false)).await?;
    Ok(matches)
}
