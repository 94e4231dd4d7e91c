//! Anticoagulant and antiplatelet medication models.

use serde::{Deserialize, Serialize};

/// Medications a case may report, in feature-code order.
///
/// The discriminant is the `medication_code` fed to the priority model, so
/// variants must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Medication {
    #[serde(alias = "None")]
    Ninguna = 0,
    Antiagregante = 1,
    Anticoagulante = 2,
    #[serde(rename = "AAS")]
    Aas = 3,
    Clopidogrel = 4,
    Prasugrel = 5,
    Ticagrelor = 6,
    Acenocumarol = 7,
    Warfarina = 8,
    #[serde(rename = "Dabigatrán")]
    Dabigatran = 9,
    #[serde(rename = "Rivaroxabán")]
    Rivaroxaban = 10,
    #[serde(rename = "Apixabán")]
    Apixaban = 11,
    #[serde(rename = "Edoxabán")]
    Edoxaban = 12,
}

/// Canonical names, indexed by medication code.
pub const MEDICATIONS: [(Medication, &str); 13] = [
    (Medication::Ninguna, "Ninguna"),
    (Medication::Antiagregante, "Antiagregante"),
    (Medication::Anticoagulante, "Anticoagulante"),
    (Medication::Aas, "AAS"),
    (Medication::Clopidogrel, "Clopidogrel"),
    (Medication::Prasugrel, "Prasugrel"),
    (Medication::Ticagrelor, "Ticagrelor"),
    (Medication::Acenocumarol, "Acenocumarol"),
    (Medication::Warfarina, "Warfarina"),
    (Medication::Dabigatran, "Dabigatrán"),
    (Medication::Rivaroxaban, "Rivaroxabán"),
    (Medication::Apixaban, "Apixabán"),
    (Medication::Edoxaban, "Edoxabán"),
];

/// Alternative spellings accepted on input.
const NAME_ALIASES: [(&str, Medication); 1] = [("None", Medication::Ninguna)];

/// Days a drug must be withheld before surgery. Drugs not listed need no wait.
pub const SUSPENSION_DAYS: [(&str, u64); 10] = [
    ("AAS", 1),
    ("Clopidogrel", 5),
    ("Prasugrel", 7),
    ("Ticagrelor", 5),
    ("Acenocumarol", 3),
    ("Warfarina", 5),
    ("Dabigatrán", 3),
    ("Rivaroxabán", 2),
    ("Apixabán", 2),
    ("Edoxabán", 2),
];

impl Medication {
    /// Look up a medication by its canonical name or an accepted alias.
    pub fn from_name(name: &str) -> Option<Self> {
        MEDICATIONS
            .iter()
            .find(|(_, canonical)| *canonical == name)
            .map(|(medication, _)| *medication)
            .or_else(|| {
                NAME_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, medication)| *medication)
            })
    }

    /// Look up a medication by its feature code.
    pub fn from_code(code: u8) -> Option<Self> {
        MEDICATIONS.get(code as usize).map(|(medication, _)| *medication)
    }

    /// Stable feature code (0 = Ninguna).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        MEDICATIONS[self.code() as usize].1
    }

    /// Suspension interval in whole days.
    pub fn suspension_days(self) -> u64 {
        suspension_days_for(self.name())
    }
}

impl std::fmt::Display for Medication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Suspension interval for a drug name; unknown names need no wait.
pub fn suspension_days_for(name: &str) -> u64 {
    SUSPENSION_DAYS
        .iter()
        .find(|(drug, _)| *drug == name)
        .map(|(_, days)| *days)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_table_positions() {
        for (index, (medication, _)) in MEDICATIONS.iter().enumerate() {
            assert_eq!(medication.code() as usize, index);
            assert_eq!(Medication::from_code(index as u8), Some(*medication));
        }
        assert_eq!(Medication::from_code(13), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Medication::from_name("Clopidogrel"), Some(Medication::Clopidogrel));
        assert_eq!(Medication::from_name("Dabigatrán"), Some(Medication::Dabigatran));
        assert_eq!(Medication::from_name("None"), Some(Medication::Ninguna));
        assert_eq!(Medication::from_name("Aspirin"), None);
        // Names are matched exactly
        assert_eq!(Medication::from_name("clopidogrel"), None);
    }

    #[test]
    fn test_suspension_days() {
        assert_eq!(Medication::Aas.suspension_days(), 1);
        assert_eq!(Medication::Prasugrel.suspension_days(), 7);
        assert_eq!(Medication::Edoxaban.suspension_days(), 2);
        assert_eq!(Medication::Ninguna.suspension_days(), 0);
        // Generic drug classes have no fixed interval
        assert_eq!(Medication::Anticoagulante.suspension_days(), 0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Medication::Rivaroxaban).unwrap();
        assert_eq!(json, "\"Rivaroxabán\"");

        let parsed: Medication = serde_json::from_str("\"AAS\"").unwrap();
        assert_eq!(parsed, Medication::Aas);

        let alias: Medication = serde_json::from_str("\"None\"").unwrap();
        assert_eq!(alias, Medication::Ninguna);
    }
}
