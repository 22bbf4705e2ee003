//! Utility functions and helpers

use std::time::Duration;
use tokio::time::sleep;

/// Fixed pause between consecutive remote calls
#[derive(Debug, Clone, Copy, Default)]
pub struct Throttle {
    delay: Duration,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Make a string safe to use as a file stem
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("WETH-USDC"), "WETH-USDC");
        assert_eq!(sanitize_file_stem("a/b c"), "a_b_c");
        assert_eq!(sanitize_file_stem("../etc"), "_etc");
        assert_eq!(sanitize_file_stem(""), "_");
    }

    #[test]
    fn test_generate_id_unique() {
        assert_ne!(generate_id(), generate_id());
    }

    #[tokio::test]
    async fn test_zero_throttle_does_not_sleep() {
        let throttle = Throttle::default();
        assert!(throttle.delay().is_zero());
        throttle.pause().await;
    }
}
