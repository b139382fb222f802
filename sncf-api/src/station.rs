use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded gazetteer of TGV stations (name, latitude, longitude).
pub static STATIONS_CSV: &str = include_str!("../../fixtures/stations.csv");

const GARE_DE_PREFIX: &str = "GARE DE ";

/// A WGS84 position in decimal degrees.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StationRow {
    name: String,
    latitude: f64,
    longitude: f64,
}

/// Read-only lookup of canonical uppercase station names to coordinates.
///
/// Entries keep their insertion order, which decides the winner of the
/// substring fallback in [`StationTable::resolve`].
#[derive(Debug, Clone, Default)]
pub struct StationTable {
    entries: Vec<(String, Coordinates)>,
    index: HashMap<String, usize>,
}

impl StationTable {
    /// Build a table from `(name, coordinates)` pairs.
    ///
    /// Names are trimmed and uppercased. When a name appears twice the first
    /// coordinates win.
    pub fn from_entries<I, S>(entries: I) -> StationTable
    where
        I: IntoIterator<Item = (S, Coordinates)>,
        S: AsRef<str>,
    {
        let mut table = StationTable::default();
        for (name, coordinates) in entries {
            let key = name.as_ref().trim().to_uppercase();
            if key.is_empty() || table.index.contains_key(&key) {
                continue;
            }
            table.index.insert(key.clone(), table.entries.len());
            table.entries.push((key, coordinates));
        }
        table
    }

    /// Parse a CSV string of stations into a table.
    ///
    /// Expected CSV columns: name, latitude, longitude
    pub fn parse_station_csv(csv_object: &str) -> Result<StationTable, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let mut rows = Vec::new();
        for row in rdr.deserialize() {
            let station: StationRow = row?;
            rows.push((
                station.name,
                Coordinates::new(station.latitude, station.longitude),
            ));
        }
        Ok(StationTable::from_entries(rows))
    }

    /// The gazetteer shipped with the crate.
    pub fn embedded() -> StationTable {
        match StationTable::parse_station_csv(STATIONS_CSV) {
            Ok(table) => table,
            Err(e) => panic!("failed to parse embedded stations csv: {e}"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup on a canonical (uppercase) key.
    pub fn get(&self, key: &str) -> Option<Coordinates> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Coordinates)> {
        self.entries.iter().map(|(name, c)| (name.as_str(), *c))
    }

    /// Map a free-text station name to coordinates.
    ///
    /// Tried in order, the first hit wins:
    /// 1. the uppercased, trimmed name;
    /// 2. the name prefixed with `GARE DE `;
    /// 3. the name with its `GARE DE ` prefix removed;
    /// 4. the name with hyphens turned into spaces and double spaces collapsed;
    /// 5. the first entry where either name contains the other.
    ///
    /// Step 5 is approximate: a short name such as `PARIS` lands on whichever
    /// Paris station comes first in the table.
    pub fn resolve(&self, name: Option<&str>) -> Option<Coordinates> {
        let name = name?.trim().to_uppercase();
        if name.is_empty() {
            return None;
        }

        if let Some(c) = self.get(&name) {
            return Some(c);
        }

        if let Some(c) = self.get(&format!("{GARE_DE_PREFIX}{name}")) {
            return Some(c);
        }

        if name.starts_with(GARE_DE_PREFIX) {
            let stripped = name.replace(GARE_DE_PREFIX, "");
            if let Some(c) = self.get(&stripped) {
                return Some(c);
            }
        }

        let normalized = name.replace('-', " ").replace("  ", " ");
        if let Some(c) = self.get(&normalized) {
            return Some(c);
        }

        self.entries
            .iter()
            .find(|(key, _)| name.contains(key.as_str()) || key.contains(name.as_str()))
            .map(|(_, c)| *c)
    }
}
