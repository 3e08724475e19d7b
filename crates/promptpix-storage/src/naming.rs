//! Output filename generation and validation

use std::sync::LazyLock;

use chrono::{DateTime, Local, TimeZone};
use promptpix_core::constants::{OUTPUT_FILENAME_PREFIX, OUTPUT_FILE_EXTENSION};
use regex::Regex;
use uuid::Uuid;

// No name validates if the pattern fails to compile.
static FILENAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^generated_\d{8}_\d{6}_[0-9a-f]{8}\.png$").ok());

/// Generate a new output filename for the current local time.
pub fn generate_filename() -> String {
    filename_at(&Local::now(), &random_suffix())
}

/// Build an output filename from a timestamp and an 8 hex character suffix.
pub fn filename_at<Tz: TimeZone>(timestamp: &DateTime<Tz>, suffix: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}_{}.{}",
        OUTPUT_FILENAME_PREFIX,
        timestamp.format("%Y%m%d_%H%M%S"),
        suffix,
        OUTPUT_FILE_EXTENSION
    )
}

/// Eight lowercase hex characters taken from a v4 UUID
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Whether `name` is exactly a name [`generate_filename`] could have produced.
pub fn is_valid_filename(name: &str) -> bool {
    FILENAME_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn generated_names_match_the_pattern() {
        for _ in 0..50 {
            let name = generate_filename();
            assert!(is_valid_filename(&name), "unexpected name {name}");
        }
    }

    #[test]
    fn filename_uses_timestamp_and_suffix() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            filename_at(&ts, "0a1b2c3d"),
            "generated_20240309_070501_0a1b2c3d.png"
        );
    }

    #[test]
    fn suffixes_are_eight_lowercase_hex_chars() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn rejects_anything_else() {
        for name in [
            "",
            "generated_20240309_070501_0a1b2c3d.jpg",
            "generated_20240309_070501_0A1B2C3D.png",
            "generated_20240309_070501_0a1b2c3.png",
            "../generated_20240309_070501_0a1b2c3d.png",
            "generated_20240309_070501_0a1b2c3d.png/..",
            "generated_2024030_070501_0a1b2c3d.png",
            "/etc/passwd",
            "..%2Fsecret",
            "generated_20240309_070501_0a1b2c3d.png\n",
        ] {
            assert!(!is_valid_filename(name), "accepted {name:?}");
        }
    }
}
