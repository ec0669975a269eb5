/// Split one CSV line into trimmed fields.
///
/// A `"` toggles quoted mode and is never kept; a `,` inside quotes is data.
/// There is no escape handling, so `""` inside a quoted field is simply lost.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_fields_and_trims() {
        assert_eq!(split_fields(" a , b,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn keeps_commas_inside_quotes() {
        assert_eq!(split_fields(r#""x,y",z"#), vec!["x,y", "z"]);
    }

    #[test]
    fn empty_line_is_one_empty_field() {
        assert_eq!(split_fields(""), vec![""]);
        assert_eq!(split_fields(","), vec!["", ""]);
    }

    #[test]
    fn quote_characters_are_always_dropped() {
        // doubled quotes are not an escape: both toggle and vanish
        assert_eq!(split_fields(r#""say ""hi""",x"#), vec!["say hi", "x"]);
        assert_eq!(split_fields(r#"5" pipe,x"#), vec![r#"5 pipe,x"#]);
    }

    #[test]
    fn carriage_return_is_trimmed_from_last_field() {
        assert_eq!(split_fields("a,b\r"), vec!["a", "b"]);
    }
}
