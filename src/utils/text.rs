//! Text helpers shared by chunk processing and output rendering.

/// True when `content` has no non-whitespace characters.
pub fn is_blank(content: &str) -> bool {
    content.chars().all(char::is_whitespace)
}

/// First `max_chars` characters of `content`, with `...` appended when cut.
pub fn preview(content: &str, max_chars: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \n\t  "));
        assert!(!is_blank("  a  "));
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 100), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(preview("exact", 5), "exact");
    }
}
