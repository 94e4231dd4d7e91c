//! Priority labels produced by the classifier.

use serde::{Deserialize, Serialize};

/// Ordinal surgical priority. Ordering follows urgency: `Baja < Urgente`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Baja,
    Media,
    Alta,
    Urgente,
}

/// Raw model output → label.
const RAW_LABELS: [(i64, Priority); 4] = [
    (3, Priority::Urgente),
    (2, Priority::Alta),
    (1, Priority::Media),
    (0, Priority::Baja),
];

impl Priority {
    /// Map a raw model output; `None` for anything outside the table.
    pub fn from_raw(raw: i64) -> Option<Self> {
        RAW_LABELS
            .iter()
            .find(|(value, _)| *value == raw)
            .map(|(_, priority)| *priority)
    }

    /// Raw ordinal for this label.
    pub fn raw(self) -> i64 {
        RAW_LABELS
            .iter()
            .find(|(_, priority)| *priority == self)
            .map(|(value, _)| *value)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgente => "Urgente",
            Priority::Alta => "Alta",
            Priority::Media => "Media",
            Priority::Baja => "Baja",
        }
    }

    /// Parse a label as written by [`Priority::label`].
    pub fn from_label(value: &str) -> Option<Self> {
        [
            Priority::Urgente,
            Priority::Alta,
            Priority::Media,
            Priority::Baja,
        ]
        .into_iter()
        .find(|p| p.label() == value)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_mapping() {
        assert_eq!(Priority::from_raw(3), Some(Priority::Urgente));
        assert_eq!(Priority::from_raw(2), Some(Priority::Alta));
        assert_eq!(Priority::from_raw(1), Some(Priority::Media));
        assert_eq!(Priority::from_raw(0), Some(Priority::Baja));
        assert_eq!(Priority::from_raw(4), None);
        assert_eq!(Priority::from_raw(-1), None);
    }

    #[test]
    fn test_raw_round_trip() {
        for raw in 0..4 {
            assert_eq!(Priority::from_raw(raw).unwrap().raw(), raw);
        }
    }

    #[test]
    fn test_ordering() {
        assert!(Priority::Urgente > Priority::Alta);
        assert!(Priority::Alta > Priority::Media);
        assert!(Priority::Media > Priority::Baja);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Priority::Urgente.to_string(), "Urgente");
        assert_eq!(Priority::from_label("Media"), Some(Priority::Media));
        assert_eq!(Priority::from_label("media"), None);
    }
}
