pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

// common functions for the handlers
use regex::Regex;
use std::sync::LazyLock;
use tracing::error;

/// Fixed log marker for identifiers rejected by [`valid_email`].
pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";

// OWASP validation regex repository, email entry
const EMAIL_PATTERN: &str =
    r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$";

static EMAIL_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN));

/// Syntactic email check. Never logs the value it was given.
pub fn valid_email(email: &str) -> bool {
    matches_pattern(EMAIL_REGEX.as_ref(), email)
}

// the caller owns the INVALID_EMAIL_FORMAT marker
fn matches_pattern(pattern: Result<&Regex, &regex::Error>, email: &str) -> bool {
    match pattern {
        Ok(re) => re.is_match(email),
        Err(_) => {
            error!("Email pattern failed to compile");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| io::Error::other("log buffer poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn valid_email_accepts_common_addresses() {
        for email in [
            "user1@example.com",
            "first.last@example.co.uk",
            "a+tag@sub.domain.org",
            "x_y-z&w*q@host-name.io",
            "UPPER@EXAMPLE.COM",
            "1234@numbers.net",
        ] {
            assert!(valid_email(email), "expected {email} to be valid");
        }
    }

    #[test]
    fn valid_email_rejects_malformed_addresses() {
        for email in [
            "",
            "not-an-email",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            "user@example.c0m",
            "user..dots@example.com",
            ".leading@example.com",
            "trailing.@example.com",
            "user@@example.com",
            "user name@example.com",
            "user@exa_mple.com",
            "user@example.com ",
            "us\"er@example.com",
            "user@.example.com",
        ] {
            assert!(!valid_email(email), "expected {email:?} to be invalid");
        }
    }

    #[test]
    fn email_pattern_compiles() {
        assert!(EMAIL_REGEX.is_ok());
    }

    #[test]
    fn broken_pattern_rejects_without_format_marker() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .finish();

        let broken = Regex::new("(unclosed");
        assert!(broken.is_err());

        let matched = tracing::subscriber::with_default(subscriber, || {
            matches_pattern(broken.as_ref(), "user1@example.com")
        });

        assert!(!matched);
        let output = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
        assert!(output.contains("Email pattern failed to compile"));
        assert!(!output.contains(INVALID_EMAIL_FORMAT));
        assert!(!output.contains("user1@example.com"));
    }
}
