use std::collections::HashMap;

use postalert_core::CellValue;
use tracing::debug;

/// Trimmed display name → Discord user ID.
///
/// Rebuilt from the members tab on every run and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct NameDirectory {
    ids: HashMap<String, String>,
}

impl NameDirectory {
    /// Build from the raw members tab. Row 1 is a header and is skipped.
    ///
    /// Column A is the name, column B the user ID. Rows where either trimmed
    /// cell is empty are ignored; a repeated name keeps its last ID.
    pub fn from_rows(rows: &[Vec<CellValue>]) -> Self {
        let mut ids = HashMap::new();
        for row in rows.iter().skip(1) {
            let cell = |i: usize| {
                row.get(i)
                    .map(|c| c.as_text().trim().to_string())
                    .unwrap_or_default()
            };
            let (name, id) = (cell(0), cell(1));
            if name.is_empty() || id.is_empty() {
                continue;
            }
            ids.insert(name, id);
        }
        debug!(entries = ids.len(), "name directory built");
        Self { ids }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<N: Into<String>, I: Into<String>> FromIterator<(N, I)> for NameDirectory {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        Self {
            ids: iter
                .into_iter()
                .map(|(n, i)| (n.into(), i.into()))
                .collect(),
        }
    }
}
