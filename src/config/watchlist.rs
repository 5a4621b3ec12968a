// src/config/watchlist.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Watchlist, WatchlistEntry};

const ENV_PATH: &str = "WATCHLIST_PATH";
static DEFAULT_PATHS: [&str; 2] = ["config/watchlist.toml", "config/watchlist.json"];

/// Companies tracked when no watchlist file is configured (name, BSE scrip code).
const BUILTIN: &[(&str, &str)] = &[
    ("CENTUM ELECTRONICS", "517544"),
    ("SUPRIYA LIFESCIENCE", "543434"),
    ("STYLAM INDUSTRIES", "526951"),
    ("MRS BECTORS", "543253"),
    ("TIPS MUSIC", "532375"),
    ("CONTROL PRINT", "522295"),
    ("YATHARTH", "543950"),
    ("PRECISION WIRES", "523539"),
    ("WONDERLA", "538268"),
    ("UGRO CAPITAL", "511742"),
    ("ENVIRO INFRA", "544290"),
    ("RATEGAIN", "543417"),
    ("VENUS PIPES", "543528"),
    ("SJS ENTERPRISES", "543387"),
    ("SANGHVI MOVERS", "530073"),
    ("JASH ENGINEERING", "544402"),
    ("FINEOTEX", "533333"),
    ("ANTONY WASTE", "543254"),
];

pub fn builtin_watchlist() -> Watchlist {
    Watchlist::new(
        BUILTIN
            .iter()
            .map(|(name, code)| WatchlistEntry::new(*name, Some(*code)))
            .collect(),
    )
}

/// Load a watchlist file. `.toml`/`.json` decide the format; any other
/// extension is sniffed from the content.
pub fn load_watchlist_from(path: &Path) -> Result<Watchlist> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading watchlist from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);
    parse_watchlist(&content, ext.as_deref())
        .with_context(|| format!("parsing watchlist {}", path.display()))
}

/// `$WATCHLIST_PATH` if set (and it must exist), else the first of
/// `config/watchlist.toml` and `config/watchlist.json` found, else the
/// built-in table.
pub fn load_watchlist_default() -> Result<Watchlist> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let path = PathBuf::from(&p);
        if !path.exists() {
            return Err(anyhow!("{ENV_PATH}={p} does not exist"));
        }
        return load_watchlist_from(&path);
    }
    match DEFAULT_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        Some(path) => load_watchlist_from(path),
        None => {
            tracing::debug!("no watchlist file, using built-in companies");
            Ok(builtin_watchlist())
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    name: String,
    #[serde(default)]
    code: Option<String>,
}

fn parse_watchlist(s: &str, ext: Option<&str>) -> Result<Watchlist> {
    let is_json = match ext {
        Some("json") => true,
        Some("toml") => false,
        _ => {
            let head = s.trim_start();
            head.starts_with('{') || (head.starts_with('[') && !head.starts_with("[["))
        }
    };
    if is_json {
        parse_json(s)
    } else {
        parse_toml(s)
    }
}

fn parse_toml(s: &str) -> Result<Watchlist> {
    #[derive(Deserialize)]
    struct TomlWl {
        companies: Vec<RawEntry>,
    }
    let v: TomlWl = toml::from_str(s)?;
    Ok(clean_entries(v.companies))
}

/// JSON: `[{"name": .., "code": ..}]` or the flat `{"NAME": "CODE"}` table.
fn parse_json(s: &str) -> Result<Watchlist> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum JsonWl {
        List(Vec<RawEntry>),
        // sorted by name; use the list form to control match order
        Table(BTreeMap<String, Option<String>>),
    }
    let entries = match serde_json::from_str::<JsonWl>(s)? {
        JsonWl::List(v) => v,
        JsonWl::Table(m) => m
            .into_iter()
            .map(|(name, code)| RawEntry { name, code })
            .collect(),
    };
    Ok(clean_entries(entries))
}

fn clean_entries(items: Vec<RawEntry>) -> Watchlist {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let name = it.name.trim().to_uppercase();
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }
        let code = it
            .code
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        out.push(WatchlistEntry {
            display_name: name,
            exchange_code: code,
        });
    }
    Watchlist::new(out)
}
