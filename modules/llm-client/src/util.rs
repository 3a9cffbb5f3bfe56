/// Cut a string down to at most `max_bytes` bytes without splitting a
/// character. Used to bound prompt fragments (invitation notes, comment
/// text) before they reach the model.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Strip markdown code fences from a model reply. Verdict JSON comes back
/// fenced often enough that every parse site goes through this first.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let note = "Café société – let's connect";
        let cut = truncate_to_char_boundary(note, 9);
        assert!(cut.len() <= 9);
        assert!(note.starts_with(cut));
    }

    #[test]
    fn short_input_passes_through_untouched() {
        assert_eq!(truncate_to_char_boundary("Founder at Leeway", 1000), "Founder at Leeway");
        assert_eq!(truncate_to_char_boundary("", 10), "");
    }

    #[test]
    fn fenced_verdict_json_is_unwrapped() {
        assert_eq!(
            strip_code_blocks("```json\n{\"accept\": true}\n```"),
            "{\"accept\": true}"
        );
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
    }

    #[test]
    fn bare_json_is_left_alone() {
        assert_eq!(strip_code_blocks("{\"accept\": false}"), "{\"accept\": false}");
    }
}
