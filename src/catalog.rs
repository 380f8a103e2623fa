//! Enemy catalog — the two configuration tables and their joins.
//!
//! The catalog is populated from two independently loaded documents: the
//! enemy groups table and the enemy configuration table. Each document is a
//! JSON mapping from a decimal-string id to a record. Until both documents
//! have parsed, every lookup degrades to empty/`None`; a load or parse
//! failure is recorded per document and surfaced as a catalog-level error,
//! never as a panic or an `Err` from a lookup.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const GROUPS_FILE: &str = "enemy_groups.json";
pub const CONFIGS_FILE: &str = "enemy_configuration_table.json";

// ---------------------------------------------------------------------------
// Table records
// ---------------------------------------------------------------------------

/// One entry in a group's enemy list: a config id and how many appear.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyRef {
    #[serde(rename = "Enemy")]
    pub enemy: u32,
    #[serde(rename = "Amount")]
    pub amount: i32,
}

/// A group pairs a background combination with a weighted enemy list.
/// Several groups may share a background pair or reference the same config.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyGroup {
    #[serde(rename = "Background 1")]
    pub bg1: i32,
    #[serde(rename = "Background 2")]
    pub bg2: i32,
    #[serde(rename = "Enemies", default)]
    pub enemies: Vec<EnemyRef>,
}

/// A named enemy type. Descriptive fields beyond the name are carried
/// through untyped so richer documents still parse.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyConfig {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A group drawn at random, with its enemy list resolved to configs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup {
    pub id: u32,
    pub bg1: i32,
    pub bg2: i32,
    pub enemies: Vec<String>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct EnemyCatalog {
    groups: Option<BTreeMap<u32, EnemyGroup>>,
    configs: Option<BTreeMap<u32, EnemyConfig>>,
    groups_error: Option<String>,
    configs_error: Option<String>,
}

impl EnemyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both documents parsed; lookups return real data.
    pub fn ready(&self) -> bool {
        self.groups.is_some() && self.configs.is_some()
    }

    /// The most recent load/parse failure, if any document is in error.
    pub fn error(&self) -> Option<String> {
        match (&self.groups_error, &self.configs_error) {
            (None, None) => None,
            (Some(g), None) => Some(format!("groups: {g}")),
            (None, Some(c)) => Some(format!("configs: {c}")),
            (Some(g), Some(c)) => Some(format!("groups: {g}; configs: {c}")),
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn config_count(&self) -> usize {
        self.configs.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn group_ids(&self) -> Vec<u32> {
        self.groups
            .as_ref()
            .map_or_else(Vec::new, |g| g.keys().copied().collect())
    }

    pub fn ingest_groups(&mut self, text: &str) -> Result<()> {
        let table = parse_table::<EnemyGroup>(text).context("enemy groups document")?;
        self.groups = Some(table);
        self.groups_error = None;
        Ok(())
    }

    pub fn ingest_configs(&mut self, text: &str) -> Result<()> {
        let table = parse_table::<EnemyConfig>(text).context("enemy configuration document")?;
        self.configs = Some(table);
        self.configs_error = None;
        Ok(())
    }

    pub fn record_error(&mut self, doc: Document, message: String) {
        match doc {
            Document::Groups => self.groups_error = Some(message),
            Document::Configs => self.configs_error = Some(message),
        }
    }

    // -----------------------------------------------------------------------
    // Joins
    // -----------------------------------------------------------------------

    /// Enemies of one group, in document order, resolved through the config
    /// table. Entries with `Amount <= 0` and references to absent config ids
    /// are dropped. `None` when the catalog is not ready or the group id is
    /// absent. Id 0 is an ordinary id; presence is checked on the map, never
    /// on the value.
    pub fn enemies_in_group(&self, group_id: u32) -> Option<Vec<&EnemyConfig>> {
        let (groups, configs) = (self.groups.as_ref()?, self.configs.as_ref()?);
        let group = groups.get(&group_id)?;
        let enemies = group
            .enemies
            .iter()
            .filter(|entry| entry.amount > 0)
            .filter_map(|entry| configs.get(&entry.enemy))
            .collect();
        Some(enemies)
    }

    /// Deduplicated enemy names across every group whose background pair
    /// equals `(layer1, layer2)` exactly. Set semantics; returned sorted.
    /// Empty while the catalog is not ready.
    pub fn enemies_for_background_pair(&self, layer1: i32, layer2: i32) -> Vec<String> {
        if !self.ready() {
            return Vec::new();
        }
        let Some(groups) = self.groups.as_ref() else {
            return Vec::new();
        };
        let names: BTreeSet<String> = groups
            .iter()
            .filter(|(_, group)| group.bg1 == layer1 && group.bg2 == layer2)
            .flat_map(|(id, _)| self.enemies_in_group(*id).unwrap_or_default())
            .map(|config| config.name.clone())
            .collect();
        names.into_iter().collect()
    }

    /// A uniformly random group with its enemy list resolved, or `None`
    /// when no groups are loaded.
    pub fn random_enemy_group(&self, rng: &mut impl Rng) -> Option<ResolvedGroup> {
        let groups = self.groups.as_ref()?;
        if groups.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..groups.len());
        let (&id, group) = groups.iter().nth(index)?;
        let enemies = self
            .enemies_in_group(id)
            .unwrap_or_default()
            .into_iter()
            .map(|config| config.name.clone())
            .collect();
        Some(ResolvedGroup {
            id,
            bg1: group.bg1,
            bg2: group.bg2,
            enemies,
        })
    }
}

/// Parse a `{"<decimal id>": record, ...}` document into an integer-keyed
/// table.
fn parse_table<T: DeserializeOwned>(text: &str) -> Result<BTreeMap<u32, T>> {
    let raw: BTreeMap<String, T> = serde_json::from_str(text)?;
    let mut table = BTreeMap::new();
    for (key, record) in raw {
        let id: u32 = key
            .parse()
            .with_context(|| format!("record id {key:?} is not a decimal integer"))?;
        let _ = table.insert(id, record);
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Document loading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    Groups,
    Configs,
}

impl Document {
    pub fn file_name(self) -> &'static str {
        match self {
            Document::Groups => GROUPS_FILE,
            Document::Configs => CONFIGS_FILE,
        }
    }
}

/// Where document text comes from. The binary reads the filesystem; tests
/// substitute in-memory sources, including failing ones.
pub trait DocumentSource {
    fn fetch(&mut self, doc: Document) -> Result<String>;
}

pub struct FsSource {
    dir: PathBuf,
}

impl FsSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsSource { dir: dir.into() }
    }
}

impl DocumentSource for FsSource {
    fn fetch(&mut self, doc: Document) -> Result<String> {
        let path = self.dir.join(doc.file_name());
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Load both documents in one pass, without the retry schedule. Used by
/// `inspect`, where a missing file should fail loudly instead of degrading.
pub fn load_catalog(dir: &Path) -> Result<EnemyCatalog> {
    let mut source = FsSource::new(dir);
    let mut catalog = EnemyCatalog::new();
    catalog.ingest_groups(&source.fetch(Document::Groups)?)?;
    catalog.ingest_configs(&source.fetch(Document::Configs)?)?;
    Ok(catalog)
}

// ---------------------------------------------------------------------------
// Retrying loader
// ---------------------------------------------------------------------------

const MAX_ATTEMPTS: u32 = 5;
const MAX_BACKOFF_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    /// Waiting to (re)try at the given tick; `attempts` fetches have failed.
    Pending { attempts: u32, at_tick: u64 },
    Done,
    GaveUp,
}

/// Drives document fetches from the session tick loop. Each document is
/// fetched independently; a failure is recorded in the catalog and retried
/// on an exponential backoff schedule until the attempt budget is spent.
pub struct CatalogLoader<S: DocumentSource> {
    source: S,
    groups: FetchState,
    configs: FetchState,
}

impl<S: DocumentSource> CatalogLoader<S> {
    pub fn new(source: S) -> Self {
        let initial = FetchState::Pending {
            attempts: 0,
            at_tick: 0,
        };
        CatalogLoader {
            source,
            groups: initial,
            configs: initial,
        }
    }

    /// True once neither document has work left, loaded or given up.
    pub fn settled(&self) -> bool {
        !matches!(self.groups, FetchState::Pending { .. })
            && !matches!(self.configs, FetchState::Pending { .. })
    }

    /// Run any fetch attempts that are due at `tick`.
    pub fn step(&mut self, tick: u64, catalog: &mut EnemyCatalog) {
        self.groups = Self::step_doc(&mut self.source, Document::Groups, self.groups, tick, catalog);
        self.configs =
            Self::step_doc(&mut self.source, Document::Configs, self.configs, tick, catalog);
    }

    fn step_doc(
        source: &mut S,
        doc: Document,
        state: FetchState,
        tick: u64,
        catalog: &mut EnemyCatalog,
    ) -> FetchState {
        let FetchState::Pending { attempts, at_tick } = state else {
            return state;
        };
        if tick < at_tick {
            return state;
        }

        let outcome = source.fetch(doc).and_then(|text| match doc {
            Document::Groups => catalog.ingest_groups(&text),
            Document::Configs => catalog.ingest_configs(&text),
        });

        match outcome {
            Ok(()) => FetchState::Done,
            Err(e) => {
                catalog.record_error(doc, format!("{e:#}"));
                let attempts = attempts + 1;
                if attempts >= MAX_ATTEMPTS {
                    FetchState::GaveUp
                } else {
                    FetchState::Pending {
                        attempts,
                        at_tick: tick + backoff_secs(attempts),
                    }
                }
            }
        }
    }
}

/// 1, 2, 4, 8, ... seconds, capped.
fn backoff_secs(failed_attempts: u32) -> u64 {
    (1u64 << (failed_attempts - 1).min(63)).min(MAX_BACKOFF_SECS)
}
