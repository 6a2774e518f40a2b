use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};

/// Declared types that SQLite understands through type affinity
const SQL_TYPES: &[&str] = &[
    "INT", "INTEGER", "SMALLINT", "BIGINT", "NUMERIC", "DECIMAL", "REAL", "DOUBLE", "FLOAT",
    "TEXT", "VARCHAR", "CHAR", "CLOB", "BLOB", "DATE", "DATETIME", "TIMESTAMP", "BOOLEAN",
];

/// Aggregates and scalar functions generated queries commonly use
const SQL_FUNCTIONS: &[&str] = &[
    "COUNT", "SUM", "AVG", "MIN", "MAX", "COALESCE", "IFNULL", "NULLIF", "LENGTH", "LOWER",
    "UPPER", "TRIM", "ROUND", "ABS", "SUBSTR", "REPLACE", "DATE", "STRFTIME",
];

/// Token-based SQL highlighter for echoing generated statements
pub struct SqlHighlighter {
    keyword_style: Style,
    type_style: Style,
    function_style: Style,
    string_style: Style,
    number_style: Style,
    comment_style: Style,
}

impl Default for SqlHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlHighlighter {
    pub fn new() -> Self {
        SqlHighlighter {
            keyword_style: Style::new().fg(Color::Blue).bold(),
            type_style: Style::new().fg(Color::Green).bold(),
            function_style: Style::new().fg(Color::Purple).bold(),
            string_style: Style::new().fg(Color::Red),
            number_style: Style::new().fg(Color::Yellow),
            comment_style: Style::new().fg(Color::DarkGray).italic(),
        }
    }

    /// Render a statement with ANSI colors for printing
    pub fn render(&self, sql: &str) -> String {
        self.highlight(sql, 0).render_simple()
    }

    fn style_for(&self, token: &Token, next: Option<&Token>) -> Style {
        match token {
            Token::Word(word) if word.quote_style.is_none() => {
                let upper = word.value.to_uppercase();
                if matches!(next, Some(Token::LParen)) && SQL_FUNCTIONS.contains(&upper.as_str()) {
                    self.function_style
                } else if SQL_TYPES.contains(&upper.as_str()) {
                    self.type_style
                } else if word.keyword != Keyword::NoKeyword {
                    self.keyword_style
                } else {
                    Style::new()
                }
            }
            Token::SingleQuotedString(_) => self.string_style,
            Token::Number(_, _) => self.number_style,
            Token::Whitespace(Whitespace::SingleLineComment { .. })
            | Token::Whitespace(Whitespace::MultiLineComment(_)) => self.comment_style,
            _ => Style::new(),
        }
    }
}

impl Highlighter for SqlHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled_text = StyledText::new();

        let dialect = SQLiteDialect {};
        let tokens = match Tokenizer::new(&dialect, line).tokenize() {
            Ok(tokens) => tokens,
            Err(_) => {
                // Half-typed input, such as an open quote
                styled_text.push((Style::new(), line.to_string()));
                return styled_text;
            }
        };

        let significant = |t: &&Token| !matches!(t, Token::Whitespace(_));
        for (i, token) in tokens.iter().enumerate() {
            if *token == Token::EOF {
                continue;
            }
            let next = tokens[i + 1..].iter().find(significant);
            styled_text.push((self.style_for(token, next), token.to_string()));
        }

        styled_text
    }
}

/// REPL input highlighter. Questions are prose and stay plain; only the
/// statement after `\sql` is colored.
pub struct InputHighlighter {
    sql: SqlHighlighter,
}

impl InputHighlighter {
    pub fn new() -> Self {
        Self {
            sql: SqlHighlighter::new(),
        }
    }
}

impl Default for InputHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for InputHighlighter {
    fn highlight(&self, line: &str, cursor: usize) -> StyledText {
        let leading = line.len() - line.trim_start().len();
        let statement = line[leading..]
            .strip_prefix("\\sql")
            .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace));

        let mut styled_text = StyledText::new();
        match statement {
            Some(rest) => {
                let prefix_len = line.len() - rest.len();
                styled_text.push((Style::new(), line[..prefix_len].to_string()));
                styled_text
                    .buffer
                    .extend(self.sql.highlight(rest, cursor).buffer);
            }
            None => styled_text.push((Style::new(), line.to_string())),
        }
        styled_text
    }
}
