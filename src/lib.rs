//! # Keygate (Login Decision Endpoint)
//!
//! `keygate` accepts an email/password pair on `POST /login`, validates its shape and checks it
//! against a read-only credential directory. The answer is binary: `200 OK` or
//! `401 Unauthorized`.
//!
//! ## Anti-enumeration
//!
//! An unknown email and a known email with the wrong password produce the same status, the same
//! body (`Invalid Email or Password`) and the same (empty) log output. Secrets are compared in
//! constant time, and an unknown email is compared against a dummy secret so both paths do the
//! same work.
//!
//! ## Logging hygiene
//!
//! The login handler only emits fixed marker strings (`Invalid email format`,
//! `Successful login request`). Request payloads never reach a span or an event, and
//! [`api::handlers::login::LoginRequest`] redacts both fields in its `Debug` output.
//!
//! ## Credential directory
//!
//! The directory sits behind the [`store::CredentialStore`] trait. The bundled implementation
//! is an in-memory map, loaded from a JSON file or taken from a small built-in demo set.

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
