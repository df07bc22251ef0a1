//! Helper functions could be used in api/, front/, ...

use anyhow::anyhow;
use argon2::Argon2;
use std::{str::FromStr, sync::LazyLock};
use uuid::Uuid;

pub fn build_csrf_key(pwd: &str, salt: &str) -> anyhow::Result<[u8; 32]> {
    let mut csrf_key = [0u8; 32];
    Argon2::default()
        .hash_password_into(
            Uuid::from_str(pwd)?.as_bytes(),
            Uuid::from_str(salt)?.as_bytes(),
            &mut csrf_key,
        )
        .map_err(|err| anyhow!("csrf_key couldn't be created: {}", err))?;

    Ok(csrf_key)
}

pub fn build_random_csrf_key() -> anyhow::Result<[u8; 32]> {
    build_csrf_key(&Uuid::new_v4().to_string(), &Uuid::new_v4().to_string())
}

/// Key from the configured password and salt, a random one when either is missing
pub fn build_configured_csrf_key(
    pwd: Option<&str>,
    salt: Option<&str>,
) -> anyhow::Result<[u8; 32]> {
    match (pwd, salt) {
        (Some(pwd), Some(salt)) => build_csrf_key(pwd, salt),
        _ => build_random_csrf_key(),
    }
}

/// Client to make http requests
pub static REQUEST_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_csrf_key_is_deterministic() {
        let pwd = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let salt = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";

        assert_eq!(
            build_csrf_key(pwd, salt).unwrap(),
            build_csrf_key(pwd, salt).unwrap()
        );
        assert!(build_csrf_key("not-a-uuid", salt).is_err());
    }

    #[test]
    fn test_build_configured_csrf_key_falls_back_to_random() {
        assert!(build_configured_csrf_key(None, None).is_ok());
        assert_ne!(
            build_configured_csrf_key(Some("67e55044-10b1-426f-9247-bb680e5fe0c8"), None).unwrap(),
            build_configured_csrf_key(Some("67e55044-10b1-426f-9247-bb680e5fe0c8"), None).unwrap()
        );
    }
}
