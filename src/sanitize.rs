//! Markup stripping for element values.

#[derive(Clone, Copy, PartialEq)]
enum State {
    Text,
    Tag,
    Comment,
}

/// Remove every markup tag from `raw` and return the visible text.
///
/// Text outside tags is kept verbatim (whitespace and entities included).
/// Quoted attribute values may contain `>`, a `<` followed by a space or a
/// newline is literal text, and a tag left open at the end of input is dropped.
pub fn strip_tags(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut state = State::Text;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut tag = String::new();

    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            State::Text => {
                if c == '<' {
                    match chars.peek() {
                        Some(' ' | '\n') => out.push(c),
                        _ => {
                            state = State::Tag;
                            depth = 1;
                            tag.clear();
                        }
                    }
                } else {
                    out.push(c);
                }
            }
            State::Tag => {
                if let Some(q) = quote {
                    if c == q {
                        quote = None;
                    }
                    continue;
                }
                match c {
                    '"' | '\'' => quote = Some(c),
                    '<' => depth += 1,
                    '>' => {
                        depth -= 1;
                        if depth == 0 {
                            state = State::Text;
                        }
                    }
                    '-' if tag == "!-" => {
                        tag.push(c);
                        state = State::Comment;
                        continue;
                    }
                    _ => {}
                }
                if state == State::Tag {
                    tag.push(c);
                }
            }
            State::Comment => {
                if c == '>' && tag.ends_with("--") {
                    state = State::Text;
                    tag.clear();
                } else {
                    tag.push(c);
                }
            }
        }
    }
    out
}

/// Character count used by the length filter and the `_length` columns.
///
/// Counts Unicode scalar values. Characters outside the Basic Multilingual
/// Plane (most emoji) count as one here but as two UTF-16 code units in
/// JavaScript's `.length`, so such text measures shorter than it would there.
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_simple_markup() {
        assert_eq!(strip_tags("<p>Short</p>"), "Short");
        assert_eq!(strip_tags("<b>Hi</b>"), "Hi");
        assert_eq!(strip_tags("plain text"), "plain text");
    }

    #[test]
    fn keeps_whitespace_and_entities() {
        assert_eq!(strip_tags("<p>a  b</p>\n<p>c&amp;d</p>"), "a  b\nc&amp;d");
    }

    #[test]
    fn quoted_attributes_may_contain_angle_brackets() {
        assert_eq!(strip_tags(r#"<a href="x>y" title='1>0'>link</a>"#), "link");
    }

    #[test]
    fn lone_less_than_is_text() {
        assert_eq!(strip_tags("1 < 2 and <i>3</i>"), "1 < 2 and 3");
    }

    #[test]
    fn comments_are_removed() {
        assert_eq!(strip_tags("a<!-- <p>hidden</p> -->b"), "ab");
    }

    #[test]
    fn empty_comment_closes_immediately() {
        assert_eq!(strip_tags("a<!-->b"), "ab");
        assert_eq!(strip_tags("a<!---->b<!-- c -->d"), "abd");
        let raw = format!("<p>intro</p><!-->{}", "x".repeat(300));
        assert_eq!(text_length(&strip_tags(&raw)), 305);
    }

    #[test]
    fn only_space_or_newline_makes_less_than_literal() {
        assert_eq!(strip_tags("1 < 2"), "1 < 2");
        assert_eq!(strip_tags("1 <\n2"), "1 <\n2");
        assert_eq!(strip_tags("x<\tp>y"), "xy");
    }

    #[test]
    fn unterminated_tag_is_dropped() {
        assert_eq!(strip_tags("text<p class=\"x"), "text");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert_eq!(text_length("čaj"), 3);
        assert_eq!(text_length("☕🍵"), 2);
        assert_eq!(text_length(""), 0);
    }
}
