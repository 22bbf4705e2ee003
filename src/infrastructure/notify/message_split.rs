//! Splitting long alerts on alert-line boundaries

/// Every alert line starts with this marker
pub const MESSAGE_MARKER: &str = "- ";

/// Shortest limit that always fits one UTF-8 character
const MIN_LIMIT: usize = 4;

/// Split `content` into chunks of at most `limit` bytes.
///
/// Every chunk after the first begins at a [`MESSAGE_MARKER`], so an alert
/// line is never cut in the middle, and the chunks concatenate back to
/// `content`. If no marker fits inside the window the chunk is cut at the
/// limit instead.
pub fn split_message(content: &str, limit: usize) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }

    let limit = limit.max(MIN_LIMIT);
    let bytes = content.as_bytes();
    let marker = MESSAGE_MARKER.as_bytes();
    let mut chunks = Vec::new();
    let mut start = 0;

    while content.len() - start > limit {
        let window_end = start + limit;

        let cut = (start + 1..=window_end)
            .rev()
            .find(|&p| bytes[p..].starts_with(marker))
            .unwrap_or_else(|| {
                let mut p = window_end;
                while !content.is_char_boundary(p) {
                    p -= 1;
                }
                p
            });

        chunks.push(&content[start..cut]);
        start = cut;
    }

    chunks.push(&content[start..]);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert_with_lines(lines: usize, line_len: usize) -> String {
        let mut s = String::from("~~~ \n Scanned 1000 pairs.\nheadline:");
        for i in 0..lines {
            let body = format!("- PAIR{}: ", i);
            s.push_str("\n ");
            s.push_str(&body);
            s.push_str(&"x".repeat(line_len - body.len()));
        }
        s
    }

    #[test]
    fn test_short_message_is_one_chunk() {
        assert_eq!(split_message("hello", 2000), vec!["hello"]);
        assert!(split_message("", 2000).is_empty());
    }

    #[test]
    fn test_split_4500_chars_on_markers() {
        let content = alert_with_lines(60, 73);
        assert!(content.len() >= 4500);

        let chunks = split_message(&content, 2000);
        assert!(chunks.len() >= 3);
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(chunk.len() <= 2000, "chunk {} is {} bytes", i, chunk.len());
            if i > 0 {
                assert!(chunk.starts_with(MESSAGE_MARKER));
            }
        }
        assert_eq!(chunks.concat(), content);
    }

    #[test]
    fn test_split_keeps_lines_whole() {
        let content = alert_with_lines(100, 40);
        for chunk in split_message(&content, 500) {
            for line in chunk.split('\n').filter(|l| l.contains("PAIR")) {
                assert_eq!(line.trim().len(), 40);
            }
        }
    }

    #[test]
    fn test_no_marker_falls_back_to_hard_cut() {
        let content = "é".repeat(1500);
        let chunks = split_message(&content, 2000);
        assert!(chunks.iter().all(|c| c.len() <= 2000));
        assert_eq!(chunks.concat(), content);
    }
}
