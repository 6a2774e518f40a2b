use crate::database::{SchemaSnapshot, TableSchema};
use prettytable::format::consts::FORMAT_BOX_CHARS;
use prettytable::{Cell, Row, Table};

/// Header labels of the schema view, one row per column
const SCHEMA_HEADERS: [&str; 6] = ["ID", "Name", "Type", "NotNull", "Default", "PrimaryKey"];

fn new_table(headers: &[String]) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_BOX_CHARS);
    table.set_titles(Row::new(headers.iter().map(|h| Cell::new(h)).collect()));
    table
}

/// Render one table's columns as reported by the engine
pub fn format_table_schema(schema: &TableSchema) -> String {
    let headers: Vec<String> = SCHEMA_HEADERS.iter().map(|h| h.to_string()).collect();
    let mut table = new_table(&headers);

    for col in &schema.columns {
        table.add_row(Row::new(vec![
            Cell::new(&col.cid.to_string()),
            Cell::new(&col.name),
            Cell::new(&col.data_type),
            Cell::new(&col.not_null.to_string()),
            Cell::new(col.default_value.as_deref().unwrap_or("")),
            Cell::new(&col.primary_key.to_string()),
        ]));
    }

    table.to_string()
}

/// Render every table of the snapshot, one section each
pub fn format_schema(schema: &SchemaSnapshot) -> String {
    let mut result = String::new();
    for table in schema.tables() {
        result.push_str(&format!("Table: {}\n", table.name));
        result.push_str(&format_table_schema(table));
        result.push('\n');
    }
    result
}

/// Labels for a result set of `width` columns.
///
/// A single column is labelled `Result`. When the width matches the target
/// table's column count the schema's names are used, otherwise positional
/// `Column_1..Column_n`. The width test is heuristic: a projection of the
/// same width over different columns gets the schema names anyway.
pub fn result_labels(width: usize, schema: &SchemaSnapshot, target: Option<&str>) -> Vec<String> {
    if width == 1 {
        return vec!["Result".to_string()];
    }

    match schema.target_table(target) {
        Some(table) if table.columns.len() == width => table.column_names(),
        _ => (1..=width).map(|i| format!("Column_{i}")).collect(),
    }
}

/// Render result rows under the given labels
pub fn format_result_rows(rows: &[Vec<String>], labels: &[String]) -> String {
    if rows.is_empty() {
        return "No data found.".to_string();
    }

    let mut table = new_table(labels);
    for row in rows {
        table.add_row(Row::new(row.iter().map(|value| Cell::new(value)).collect()));
    }

    let count = rows.len();
    format!(
        "{}({} row{})",
        table,
        count,
        if count == 1 { "" } else { "s" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ColumnInfo;
    use rstest::rstest;

    fn students() -> SchemaSnapshot {
        let column = |cid: i64, name: &str, data_type: &str| ColumnInfo {
            cid,
            name: name.to_string(),
            data_type: data_type.to_string(),
            not_null: false,
            default_value: None,
            primary_key: cid == 0,
        };
        SchemaSnapshot::new(vec![
            TableSchema {
                name: "STUDENTS".to_string(),
                columns: vec![
                    column(0, "ID", "INTEGER"),
                    column(1, "NAME", "TEXT"),
                    column(2, "GRADE", "REAL"),
                ],
            },
            TableSchema {
                name: "CLUBS".to_string(),
                columns: vec![column(0, "ID", "INTEGER"), column(1, "TITLE", "TEXT")],
            },
        ])
    }

    #[rstest]
    #[case(1, None, &["Result"])]
    #[case(3, None, &["ID", "NAME", "GRADE"])]
    #[case(2, None, &["Column_1", "Column_2"])]
    #[case(2, Some("CLUBS"), &["ID", "TITLE"])]
    #[case(3, Some("CLUBS"), &["Column_1", "Column_2", "Column_3"])]
    #[case(1, Some("CLUBS"), &["Result"])]
    fn test_result_labels(
        #[case] width: usize,
        #[case] target: Option<&str>,
        #[case] expected: &[&str],
    ) {
        assert_eq!(result_labels(width, &students(), target), expected);
    }

    #[rstest]
    fn test_result_labels_without_schema() {
        assert_eq!(
            result_labels(2, &SchemaSnapshot::default(), None),
            vec!["Column_1", "Column_2"]
        );
    }

    #[rstest]
    fn test_format_schema_lists_headers_and_tables() {
        let output = format_schema(&students());

        for header in SCHEMA_HEADERS {
            assert!(output.contains(header), "missing header {header}");
        }
        assert!(output.contains("Table: STUDENTS"));
        assert!(output.contains("Table: CLUBS"));
        assert!(output.contains("GRADE"));
        assert!(output.find("STUDENTS") < output.find("CLUBS"));
    }

    #[rstest]
    fn test_format_result_rows() {
        let labels = vec!["NAME".to_string(), "GRADE".to_string()];
        let rows = vec![
            vec!["Amy".to_string(), "95.0".to_string()],
            vec!["Bob".to_string(), "".to_string()],
        ];

        let output = format_result_rows(&rows, &labels);

        assert!(output.contains("NAME"));
        assert!(output.contains("Amy"));
        assert!(output.contains("95.0"));
        assert!(output.ends_with("(2 rows)"));
    }

    #[rstest]
    fn test_empty_result_has_no_table() {
        assert_eq!(format_result_rows(&[], &[]), "No data found.");
    }
}
