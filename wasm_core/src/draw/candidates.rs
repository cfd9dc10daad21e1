use serde::Serialize;

/// Ordered entries eligible for a draw. String equality is the only identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CandidateList {
    entries: Vec<String>,
}

impl CandidateList {
    pub fn new(entries: Vec<String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        Self { entries }
    }

    /// Appends a trimmed entry; blank input is ignored.
    pub fn add(&mut self, entry: &str) -> bool {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.entries.push(trimmed.to_string());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    /// Keeps the first occurrence of every entry.
    pub fn dedupe(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.entries.retain(|entry| seen.insert(entry.clone()));
    }
}

/// Builds a candidate list from line-delimited text.
pub fn parse_candidates(text: &str, dedupe: bool) -> CandidateList {
    let mut list = CandidateList::new(text.lines().map(str::to_string).collect());
    if dedupe {
        list.dedupe();
    }
    list
}
