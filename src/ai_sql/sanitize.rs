//! Cleanup of model output before it is treated as SQL

const SQL_FENCE_OPENER: &str = "```sql";
const FENCE_CLOSER: &str = "```";

/// Strip surrounding whitespace and an exact leading "```sql" / trailing
/// "```" fence pair from a model response.
///
/// Only exact prefix and suffix matches are removed; fences elsewhere in the
/// text are left alone, and the remainder is not checked for validity.
pub fn clean_sql_response(raw: &str) -> String {
    let mut cleaned = raw.trim();

    if let Some(rest) = cleaned.strip_prefix(SQL_FENCE_OPENER) {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix(FENCE_CLOSER) {
        cleaned = rest;
    }

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("```sql\nSELECT * FROM T;\n```", "SELECT * FROM T;")]
    #[case("SELECT * FROM T;", "SELECT * FROM T;")]
    #[case("  \n SELECT * FROM T;  \n", "SELECT * FROM T;")]
    #[case("```sql\nSELECT 1", "SELECT 1")]
    #[case("SELECT 1\n```", "SELECT 1")]
    #[case("", "")]
    fn test_clean_sql_response(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean_sql_response(input), expected);
    }

    #[rstest]
    fn test_only_exact_fences_are_removed() {
        // An untagged opener is not the SQL fence
        assert_eq!(
            clean_sql_response("```\nSELECT 1;\n```"),
            "```\nSELECT 1;"
        );
        // Fences in the middle survive
        assert_eq!(
            clean_sql_response("SELECT 1;\n```sql\nSELECT 2;"),
            "SELECT 1;\n```sql\nSELECT 2;"
        );
    }

    #[rstest]
    #[case("```sql\nSELECT * FROM T;\n```")]
    #[case("  INSERT INTO T (NAME) VALUES ('A');\n")]
    #[case("```sqlSELECT 1```")]
    #[case("```sql```")]
    #[case("```\nSELECT 1;\n```")]
    fn test_idempotent(#[case] input: &str) {
        let once = clean_sql_response(input);
        assert_eq!(clean_sql_response(&once), once);
    }
}
