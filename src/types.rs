use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire shapes returned by the upstream API. Only the fields the catalog reads
// are modeled; everything else is ignored during deserialization.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// `GET /pokemon?limit=..&offset=..`
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList {
    pub count: u64,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkSprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: ArtworkSprites,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cries {
    pub latest: Option<String>,
    pub legacy: Option<String>,
}

/// `GET /pokemon/{id or name}`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatureRecord {
    pub id: u32,
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub stats: Vec<StatEntry>,
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    pub species: NamedResource,
    #[serde(default)]
    pub cries: Option<Cries>,
}

impl CreatureRecord {
    pub fn total_stats(&self) -> u32 {
        self.stats.iter().map(|s| s.base_stat).sum()
    }

    /// Type names in slot order
    pub fn type_names(&self) -> Vec<String> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|t| t.slot);
        slots.into_iter().map(|t| t.kind.name.clone()).collect()
    }

    pub fn artwork(&self) -> Option<String> {
        self.sprites.other.official_artwork.front_default.clone()
    }

    pub fn cry(&self) -> Option<String> {
        self.cries
            .as_ref()
            .and_then(|c| c.latest.clone().or_else(|| c.legacy.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedResource,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesRecord {
    pub color: NamedResource,
    pub hatch_counter: Option<u32>,
    pub capture_rate: u32,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeMember {
    pub pokemon: NamedResource,
}

/// `GET /type/{name}`
#[derive(Debug, Clone, Deserialize)]
pub struct TypeRecord {
    pub pokemon: Vec<TypeMember>,
}

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// One row of the catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureSummary {
    pub id: u32,
    pub name: String,
    pub sprite: Option<String>,
    pub types: Vec<String>,
    pub total_stats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cry: Option<String>,
}

impl CreatureSummary {
    pub fn from_record(record: &CreatureRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            sprite: record.artwork(),
            types: record.type_names(),
            total_stats: record.total_stats(),
            cry: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub results: Vec<CreatureSummary>,
    /// Total number of records the upstream knows about
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub name: String,
    pub base_stat: u32,
}

/// Everything shown in the detail panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureDetails {
    pub id: u32,
    pub name: String,
    /// Decimetres
    pub height: u32,
    /// Hectograms
    pub weight: u32,
    pub stats: Vec<StatLine>,
    pub total_stats: u32,
    pub types: Vec<String>,
    pub description: Vec<String>,
    pub sprite: Option<String>,
    pub color: String,
    pub hatch_counter: Option<u32>,
    pub capture_rate: u32,
}

impl CreatureDetails {
    pub fn height_metres(&self) -> f64 {
        self.height as f64 / 10.0
    }

    pub fn weight_kilograms(&self) -> f64 {
        self.weight as f64 / 10.0
    }
}
