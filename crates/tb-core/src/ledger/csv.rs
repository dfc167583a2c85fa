//! Minimal CSV record splitter for loader ledgers.
//!
//! Handles quoted fields, doubled quotes and line breaks inside quotes.
//! Records end at `\n`; a trailing `\r` outside quotes is dropped.

/// Split `text` into records of fields.
pub fn records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quoted = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => quoted = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_splits_plain_records() {
        assert_eq!(
            records("a,b,c\n1,,3\n"),
            vec![row(&["a", "b", "c"]), row(&["1", "", "3"])]
        );
    }

    #[test]
    fn test_last_record_needs_no_newline() {
        assert_eq!(records("a,b"), vec![row(&["a", "b"])]);
    }

    #[test]
    fn test_quoted_fields_keep_commas_quotes_and_newlines() {
        assert_eq!(
            records("\"Bel, Jirapa\",\"say \"\"hi\"\"\",\"two\nlines\"\r\nx\r\n"),
            vec![row(&["Bel, Jirapa", "say \"hi\"", "two\nlines"]), row(&["x"])]
        );
    }

    #[test]
    fn test_blank_line_is_a_single_empty_field() {
        assert_eq!(records("a\n\nb\n"), vec![row(&["a"]), row(&[""]), row(&["b"])]);
    }
}
