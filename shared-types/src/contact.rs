use serde::{Deserialize, Serialize};

/// Contact-type codes as stored in the contact manager tables.
///
/// Codes the directory export does not recognize are carried through
/// unchanged so they can be rendered as their own label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberType {
    Internal,
    Cell,
    Work,
    Home,
    Other,
    Unknown(String),
}

impl NumberType {
    pub fn from_code(code: &str) -> Self {
        match code {
            "internal" => NumberType::Internal,
            "cell" => NumberType::Cell,
            "work" => NumberType::Work,
            "home" => NumberType::Home,
            "other" => NumberType::Other,
            _ => NumberType::Unknown(code.to_string()),
        }
    }

    /// Display priority within a directory entry. Unrecognized codes keep
    /// the row default of 0.
    pub fn sort_rank(&self) -> u8 {
        match self {
            NumberType::Internal => 1,
            NumberType::Work => 2,
            NumberType::Cell => 3,
            NumberType::Other => 4,
            NumberType::Home => 5,
            NumberType::Unknown(_) => 0,
        }
    }
}

/// One phone number row from the contact manager, as returned by the
/// grouped directory query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactNumber {
    pub display_name: String,
    pub number: String,
    pub e164: String,
    pub type_code: NumberType,
}

/// All numbers sharing one display name, in query order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub numbers: Vec<ContactNumber>,
}
