/// Public PokeAPI endpoint used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page sizes offered by the catalog table
pub const PAGE_SIZE_OPTIONS: [u32; 5] = [10, 20, 50, 100, 1025];

/// Maximum number of records resolved for a type filter or the unfiltered fallback list
pub const FILTER_RESULT_LIMIT: usize = 50;

/// Number of English flavor texts shown in the detail panel
pub const DESCRIPTION_ENTRIES: usize = 3;

pub const DESCRIPTION_LANGUAGE: &str = "en";

pub const DEFAULT_CONCURRENCY: usize = 8;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 512;

/// Creature types selectable in the type filter
pub const CREATURE_TYPES: [&str; 18] = [
    "bug", "dark", "dragon", "electric", "fairy", "fighting", "fire", "flying", "ghost", "grass",
    "ground", "ice", "normal", "poison", "psychic", "rock", "steel", "water",
];

// URL query parameter names kept in sync with the catalog state
pub const PARAM_PAGE: &str = "page";
pub const PARAM_SEARCH: &str = "search";
pub const PARAM_TYPE: &str = "type";
pub const PARAM_SIZE: &str = "size";
pub const PARAM_SORT: &str = "sort";

/// Normalize a user-supplied type name, returning it only if it is a known type
pub fn known_type(name: &str) -> Option<&'static str> {
    let wanted = name.trim().to_lowercase();
    CREATURE_TYPES.iter().copied().find(|t| *t == wanted)
}

pub fn is_allowed_page_size(size: u32) -> bool {
    PAGE_SIZE_OPTIONS.contains(&size)
}
