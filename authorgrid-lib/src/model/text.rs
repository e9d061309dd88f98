//! Conversions between affiliation lists and the semicolon text box.
//!
//! The text box shows a row's affiliations as `CERN;DESY;`. These helpers
//! are pure and are the only place that format is produced or parsed.

/// Replaces `&`, `<` and `>` with HTML entities.
///
/// Applied once, when user input is accepted. Never call it on stored data.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders an affiliation list as box text.
///
/// Elements are trimmed and blanks dropped. The rest are joined with `;`
/// and a trailing `;` is added. Whitespace runs collapse to one space and
/// empty `;;` sequences collapse to one `;`.
pub fn affiliations_to_text<S: AsRef<str>>(list: &[S]) -> String {
    let kept: Vec<&str> = list
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !v.is_empty())
        .collect();

    let mut joined = kept.join(";");
    if !joined.is_empty() {
        joined.push(';');
    }

    let collapsed = collapse_whitespace(&joined).replace("; ;", ";");
    collapse_separators(&collapsed)
}

/// Parses box text into an affiliation list.
///
/// Splits on `;`, trims, drops blank pieces and escapes what is left.
/// Duplicates are kept.
pub fn text_to_affiliations(text: &str) -> Vec<String> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(escape_html)
        .collect()
}

/// Returns the segment after the last `;`, trimmed.
///
/// This is the part of the box the user is currently typing.
pub fn last_segment(text: &str) -> &str {
    match text.rfind(';') {
        Some(pos) => text[pos + 1..].trim(),
        None => text.trim(),
    }
}

/// Returns everything before the last `;`, trimmed.
pub fn leading_segments(text: &str) -> &str {
    match text.rfind(';') {
        Some(pos) => text[..pos].trim(),
        None => "",
    }
}

/// Replaces the segment being typed with an accepted suggestion.
pub fn merge_suggestion(text: &str, selection: &str) -> String {
    let head = leading_segments(text);
    if head.is_empty() {
        selection.to_string()
    } else {
        format!("{head}; {selection}")
    }
}

fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_space = false;
    for c in value.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn collapse_separators(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for c in value.chars() {
        if c == ';' {
            if !prev_sep {
                out.push(c);
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_replaces_markup() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("A & B"), "A &amp; B");
        assert_eq!(escape_html("CERN"), "CERN");
    }

    #[test]
    fn list_to_text_trims_and_terminates() {
        assert_eq!(
            affiliations_to_text(&["", " cat", "dog ", "   ", "tiger"]),
            "cat;dog;tiger;"
        );
        assert_eq!(affiliations_to_text::<&str>(&[]), "");
        assert_eq!(affiliations_to_text(&["Max  Planck\tInst"]), "Max Planck Inst;");
    }

    #[test]
    fn list_to_text_collapses_empty_separators() {
        assert_eq!(affiliations_to_text(&["a;", "b"]), "a;b;");
        assert_eq!(affiliations_to_text(&["a; ;b"]), "a;b;");
    }

    #[test]
    fn text_to_list_drops_blanks_and_keeps_duplicates() {
        assert_eq!(
            text_to_affiliations(" CERN ;; DESY; ;CERN"),
            vec!["CERN", "DESY", "CERN"]
        );
        assert!(text_to_affiliations("  ;  ").is_empty());
    }

    #[test]
    fn conversions_are_idempotent() {
        let list = ["CERN", "DESY", "Fermilab", "CERN"];
        let once = affiliations_to_text(&list);
        let twice = affiliations_to_text(&text_to_affiliations(&once));
        assert_eq!(once, twice);
        assert_eq!(text_to_affiliations(&once), list);
    }

    #[test]
    fn segments_split_on_last_separator() {
        assert_eq!(last_segment("CERN; DES"), "DES");
        assert_eq!(last_segment("  Fermi "), "Fermi");
        assert_eq!(leading_segments("CERN; DESY; Fer"), "CERN; DESY");
        assert_eq!(leading_segments("Fer"), "");
    }

    #[test]
    fn merge_keeps_completed_segments() {
        assert_eq!(merge_suggestion("Fer", "Fermilab"), "Fermilab");
        assert_eq!(merge_suggestion("CERN; Fer", "Fermilab"), "CERN; Fermilab");
        assert_eq!(merge_suggestion("CERN;", "DESY"), "CERN; DESY");
    }
}
