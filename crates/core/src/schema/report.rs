//! Failure reports rendered against the schema source.

use std::fmt::Write;

use super::descriptor::FieldDescriptor;

const MARKER: &str = ">>>";
const BLANK: &str = "   ";

/// Render `message` followed by the full schema source, with the failing
/// line flagged:
///
/// ```text
/// Number must be at most 9 (max), got 30
///
/// 1.     cat          @Object
/// 2.     cat.fur      @String [black, white]
/// 3. >>> cat.lives    @Number { min : 1, max : 9 }
/// ```
pub fn format_report(field: &FieldDescriptor, message: &str) -> String {
    let mut out = String::with_capacity(message.len() + field.source.len() + 64);
    out.push_str(message);
    out.push_str("\n\n");

    for (idx, line) in field.source.lines().enumerate() {
        let number = idx + 1;
        let marker = if number == field.line_number { MARKER } else { BLANK };
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{number}. {marker} {line}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parser::parse;

    #[test]
    fn test_marks_only_failing_line() {
        let fields = parse("cat @Object\ncat.fur @String\ncat.lives @Number").unwrap();
        let report = format_report(&fields[1], "boom");

        assert_eq!(
            report,
            "boom\n\n1.     cat @Object\n2. >>> cat.fur @String\n3.     cat.lives @Number\n"
        );
    }

    #[test]
    fn test_includes_blank_source_lines() {
        let fields = parse("a @Object\n\na.b @String").unwrap();
        let report = format_report(&fields[1], "bad");
        assert!(report.contains("2.     \n"));
        assert!(report.contains("3. >>> a.b @String\n"));
    }
}
