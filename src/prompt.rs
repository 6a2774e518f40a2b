use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};
use std::borrow::Cow;

/// Prompt showing the database file and the table questions target
pub struct DbPrompt {
    db_name: String,
    table: Option<String>,
}

impl DbPrompt {
    pub fn new(db_name: String, table: Option<String>) -> Self {
        Self { db_name, table }
    }

    pub fn set_table(&mut self, table: Option<String>) {
        self.table = table;
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl Prompt for DbPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        match &self.table {
            Some(table) => Cow::Owned(format!("{}:{}=> ", self.db_name, table)),
            None => Cow::Owned(format!("{}=> ", self.db_name)),
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => Cow::Borrowed(""),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Insert => Cow::Borrowed("[INS] "),
                reedline::PromptViMode::Normal => Cow::Borrowed("[NOR] "),
            },
            PromptEditMode::Custom(_) => Cow::Borrowed(""),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        match history_search.term.as_str() {
            "" => Cow::Owned(format!("({prefix}reverse-search): ")),
            term => Cow::Owned(format!("({prefix}reverse-search '{term}'): ")),
        }
    }
}
