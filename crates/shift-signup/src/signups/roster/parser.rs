use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RosterEntry {
    pub(crate) phone: String,
    pub(crate) name: String,
    pub(crate) is_coordinator: bool,
}

pub(crate) fn parse_roster<R: Read>(reader: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        if row.phone.is_empty() {
            continue;
        }

        entries.push(RosterEntry {
            phone: row.phone,
            name: row.name,
            is_coordinator: row.is_coordinator,
        });
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    phone: String,
    name: String,
    #[serde(default, deserialize_with = "flexible_bool")]
    is_coordinator: bool,
}

fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        raw.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("true" | "yes" | "y" | "1")
    ))
}
