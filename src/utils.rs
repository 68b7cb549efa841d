use sha2::{Digest, Sha256};

/// Short SHA-256 fingerprint of a purchase token, safe to put in logs
pub fn token_fingerprint(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}
