use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Who a prayer request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Unbelievers,
    Brethren,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Unbelievers, Category::Brethren];

    /// Stored / wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unbelievers => "unbelievers",
            Category::Brethren => "brethren",
        }
    }

    /// Heading used when rendering a list section.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Unbelievers => "Unbelievers",
            Category::Brethren => "Brethren in Hardship",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unbelievers" => Ok(Category::Unbelievers),
            "brethren" => Ok(Category::Brethren),
            _ => Err(format!(
                "Invalid category '{}'. Valid options: unbelievers, brethren",
                s
            )),
        }
    }
}
