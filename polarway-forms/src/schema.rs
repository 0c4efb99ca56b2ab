//! Record shape for the form spreadsheet
//!
//! Column order is fixed here; the store checks existing files against it
//! before appending.

use crate::error::{FormsError, Result};

/// Header row of the first sheet, in write order
pub const RECORD_COLUMNS: [&str; 2] = ["Name", "Gender"];

/// Gender choices offered by the submission form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submitted form entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub gender: Gender,
}

impl Record {
    /// Build a record from form input; a blank name or no gender is incomplete
    ///
    /// The name is stored exactly as typed.
    pub fn from_form(name: &str, gender: Option<Gender>) -> Result<Self> {
        match (name.trim().is_empty(), gender) {
            (false, Some(gender)) => Ok(Self {
                name: name.to_string(),
                gender,
            }),
            _ => Err(FormsError::IncompleteInput(
                "name and gender are both required".into(),
            )),
        }
    }

    /// Cell values in `RECORD_COLUMNS` order
    pub fn to_row(&self) -> Vec<String> {
        vec![self.name.clone(), self.gender.as_str().to_string()]
    }
}

/// Rows of the first sheet as display strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RecordTable {
    /// Split raw sheet rows into header and data
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }
        let header = rows.remove(0);
        Self { header, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when the header is exactly `RECORD_COLUMNS`
    pub fn has_record_header(&self) -> bool {
        header_matches(&self.header)
    }
}

/// Compare a header row against `RECORD_COLUMNS`
pub fn header_matches(header: &[String]) -> bool {
    header.len() == RECORD_COLUMNS.len()
        && header.iter().zip(RECORD_COLUMNS).all(|(h, c)| h == c)
}

pub fn record_header() -> Vec<String> {
    RECORD_COLUMNS.iter().map(|c| c.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_follows_column_order() {
        let record = Record::from_form("Bob", Some(Gender::Male)).unwrap();
        assert_eq!(record.to_row(), vec!["Bob", "Male"]);
    }

    #[test]
    fn test_name_kept_as_typed() {
        let record = Record::from_form("  Bob Smith ", Some(Gender::Male)).unwrap();
        assert_eq!(record.name, "  Bob Smith ");
    }

    #[test]
    fn test_incomplete_form() {
        assert!(matches!(
            Record::from_form("", Some(Gender::Other)),
            Err(FormsError::IncompleteInput(_))
        ));
        assert!(matches!(
            Record::from_form("   ", Some(Gender::Other)),
            Err(FormsError::IncompleteInput(_))
        ));
        assert!(matches!(
            Record::from_form("Bob", None),
            Err(FormsError::IncompleteInput(_))
        ));
    }

    #[test]
    fn test_gender_labels() {
        assert_eq!(Gender::from_label("Female"), Some(Gender::Female));
        assert_eq!(Gender::from_label("female"), None);
        assert_eq!(Gender::Other.to_string(), "Other");
    }

    #[test]
    fn test_table_split() {
        let table = RecordTable::from_rows(vec![
            record_header(),
            vec!["Bob".into(), "Male".into()],
        ]);
        assert!(table.has_record_header());
        assert_eq!(table.len(), 1);
        assert!(RecordTable::from_rows(vec![]).is_empty());
    }
}
