//! Navigation sections of the dashboard

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Overview,
    Cluster,
    Costs,
    Chat,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Overview,
        Section::Cluster,
        Section::Costs,
        Section::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Cluster => "cluster",
            Section::Costs => "costs",
            Section::Chat => "chat",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid section: {}", s))
    }
}
