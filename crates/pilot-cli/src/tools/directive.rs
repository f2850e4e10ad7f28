//! Directive extraction from model replies

/// Opens a directive in model text
pub const START_MARKER: &str = "[cmd]";
/// Closes a directive in model text
pub const END_MARKER: &str = "[/cmd]";

/// Extract the first `[cmd]...[/cmd]` directive from `text`, trimmed.
///
/// Both markers are located by their first occurrence in the whole text. Any
/// further marker pairs are ignored. Returns `None` when either marker is
/// missing or the first end marker comes before the start marker; an empty
/// body yields `Some("")`.
pub fn extract(text: &str) -> Option<&str> {
    let start = text.find(START_MARKER)? + START_MARKER.len();
    let end = text.find(END_MARKER)?;
    if end < start {
        return None;
    }
    Some(text[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple() {
        assert_eq!(extract("I'll list them. [cmd]ls[/cmd]"), Some("ls"));
    }

    #[test]
    fn test_extract_trims_whitespace() {
        assert_eq!(extract("[cmd]\n   ls -la  \t\n[/cmd]"), Some("ls -la"));
    }

    #[test]
    fn test_only_first_pair_is_used() {
        let text = "First [cmd] echo one [/cmd] then [cmd]echo two[/cmd] and [/cmd]";
        assert_eq!(extract(text), Some("echo one"));
    }

    #[test]
    fn test_inner_content_is_preserved() {
        let text = "[cmd]grep -r \"a b\" . | wc -l[/cmd]";
        assert_eq!(extract(text), Some("grep -r \"a b\" . | wc -l"));
    }

    #[test]
    fn test_missing_markers() {
        assert_eq!(extract("no directive here"), None);
        assert_eq!(extract(""), None);
        assert_eq!(extract("dangling [cmd]ls"), None);
        assert_eq!(extract("only an end ls[/cmd]"), None);
    }

    #[test]
    fn test_end_before_start_yields_none() {
        assert_eq!(extract("[/cmd] stray then [cmd]pwd"), None);
        assert_eq!(extract("[/cmd] stray then [cmd]pwd[/cmd]"), None);
        assert_eq!(extract("[/cmd][cmd]ls[/cmd]"), None);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(extract("[cmd]   [/cmd]"), Some(""));
        assert_eq!(extract("[cmd][/cmd]"), Some(""));
    }

    #[test]
    fn test_multibyte_text_around_markers() {
        assert_eq!(extract("Ich führe aus: [cmd]echo ä[/cmd] ✓"), Some("echo ä"));
    }
}
