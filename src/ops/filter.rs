use crate::model::task::Task;
use crate::parse::query::{QueryToken, split_query};

/// A compiled search query.
///
/// Syntax:
/// - `word`: some word of the task text starts with `word`
/// - `"some phrase"`: the task text contains the phrase anywhere
/// - `epic:ID` or `e:ID`: the task belongs to epic `ID`
/// - `label:NAME` or `l:NAME`: the task carries label `NAME`
///
/// All parts must hold. Matching is case-insensitive. The task text is the
/// summary and body; comments are not searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    query: String,
    always_pass: bool,
    words: Vec<String>,
    phrases: Vec<String>,
    epic: Option<String>,
    labels: Vec<String>,
}

impl TaskFilter {
    /// A filter that lets everything through.
    pub fn pass_all() -> Self {
        TaskFilter::new("")
    }

    pub fn new(query: &str) -> Self {
        let mut filter = TaskFilter {
            query: query.to_string(),
            always_pass: query.is_empty(),
            words: Vec::new(),
            phrases: Vec::new(),
            epic: None,
            labels: Vec::new(),
        };

        for token in split_query(&query.to_lowercase()) {
            match token {
                QueryToken::Quoted(phrase) => filter.phrases.push(phrase),
                QueryToken::Word(word) => {
                    if !filter.apply_keyword(&word) {
                        filter.words.push(word);
                    }
                }
            }
        }

        filter
    }

    /// Handle `key:value` tokens. Returns false for anything that should be
    /// searched as a plain word instead.
    fn apply_keyword(&mut self, word: &str) -> bool {
        let Some((key, value)) = word.split_once(':') else {
            return false;
        };
        if value.is_empty() {
            return false;
        }
        match key {
            "e" | "epic" => {
                self.epic = Some(value.to_string());
                true
            }
            "l" | "label" => {
                self.labels.push(value.to_string());
                true
            }
            _ => false,
        }
    }

    /// The query this filter was compiled from.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_pass_all(&self) -> bool {
        self.always_pass
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.always_pass {
            return true;
        }

        if let Some(epic) = &self.epic {
            match &task.epic {
                Some(id) if id.to_lowercase() == *epic => {}
                _ => return false,
            }
        }

        for label in &self.labels {
            if !task.labels.iter().any(|l| l.to_lowercase() == *label) {
                return false;
            }
        }

        self.text_matches(&task.search_text())
    }

    fn text_matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        if !self.phrases.iter().all(|p| text.contains(p.as_str())) {
            return false;
        }

        let text_words: Vec<&str> = text.split_whitespace().collect();
        self.words
            .iter()
            .all(|w| text_words.iter().any(|t| t.starts_with(w.as_str())))
    }
}

impl Default for TaskFilter {
    fn default() -> Self {
        TaskFilter::pass_all()
    }
}
