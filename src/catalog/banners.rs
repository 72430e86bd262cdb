//! Banner catalog loader.
//!
//! Discovers the curated category banners from local image directories,
//! resolves display names through the alias tables, and pads the result with
//! fallback names so the storefront always has a full category grid. All
//! filesystem misses are treated as empty sources, never errors.

use crate::catalog::alias::{
    resolve_display_name, FALLBACK_CATEGORY_NAMES, PREFERRED_CATEGORY_SLUGS,
};
use crate::catalog::slug::to_game_slug;
use crate::sellauth::types::{Category, Group, ImageRef};
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const DEFAULT_BANNER_LIMIT: usize = 14;

/// Numeric bases keep banner ids well away from anything the provider hands
/// out, and stable across successive loads given identical input ordering.
pub const GROUP_ID_BASE: i64 = 52_000;
pub const CATEGORY_ID_BASE: i64 = 62_000;

/// Image used when no local banner art exists at all.
pub const FALLBACK_BANNER_IMAGE: &str = "/games/fortnite.svg";

const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "svg", "avif"];

/// A curated category banner: identity for one cell of the storefront grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalBanner {
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub group_id: i64,
    pub category_id: i64,
}

/// Pre-identity banner candidate while sources are being merged.
#[derive(Debug, Clone)]
struct SourceBanner {
    name: String,
    image_url: String,
}

fn has_supported_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// Image file names in a directory, sorted. Missing or non-directory paths
/// yield an empty list.
fn list_image_files(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| has_supported_extension(name))
        .collect();
    files.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    files
}

/// One-time migration shim: images that still live in the legacy root-level
/// `pd.png`/`pd` folders are copied into `public/pd.png` so the public scan
/// finds them. Files already present are skipped; copy failures are logged
/// and ignored.
fn sync_legacy_banner_dirs(root: &Path) {
    let root_candidates = [root.join("pd.png"), root.join("pd")];
    let public_pd_folder = root.join("public").join("pd.png");

    let source_files: Vec<String> = root_candidates
        .iter()
        .flat_map(|dir| list_image_files(dir))
        .unique()
        .collect();
    if source_files.is_empty() {
        return;
    }

    if let Err(error) = fs::create_dir_all(&public_pd_folder) {
        warn!(path = %public_pd_folder.display(), error = %error, "banners: cannot create public banner folder");
        return;
    }

    let existing: HashSet<String> = list_image_files(&public_pd_folder).into_iter().collect();
    for file_name in &source_files {
        if existing.contains(file_name) {
            continue;
        }
        let Some(source) = root_candidates
            .iter()
            .map(|dir| dir.join(file_name))
            .find(|path| path.exists())
        else {
            continue;
        };
        if let Err(error) = fs::copy(&source, public_pd_folder.join(file_name)) {
            warn!(file = %file_name, error = %error, "banners: failed to copy legacy banner image");
        }
    }
}

/// Display name for a banner file: alias resolution first, title-cased
/// segments as the last resort (short segments are treated as initialisms).
fn title_case_from_file_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);
    let raw = stem.to_lowercase().trim().to_string();

    if let Some(resolved) = resolve_display_name(&raw) {
        return resolved.to_string();
    }

    raw.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if segment.chars().count() <= 3 {
                segment.to_uppercase()
            } else {
                let mut chars = segment.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .join(" ")
}

/// First occurrence wins; candidates whose name slugs to nothing are dropped.
fn unique_by_slug(banners: Vec<SourceBanner>) -> Vec<SourceBanner> {
    banners
        .into_iter()
        .filter(|banner| !to_game_slug(&banner.name).is_empty())
        .unique_by(|banner| to_game_slug(&banner.name))
        .collect()
}

/// Named categories get their fixed rank; unknown slugs sort after,
/// alphabetically. The sort is stable so equal-rank entries keep file order.
fn prioritize_banners(mut banners: Vec<SourceBanner>) -> Vec<SourceBanner> {
    fn rank(slug: &str) -> usize {
        PREFERRED_CATEGORY_SLUGS
            .iter()
            .position(|preferred| *preferred == slug)
            .unwrap_or(usize::MAX)
    }

    banners.sort_by(|a, b| {
        let slug_a = to_game_slug(&a.name);
        let slug_b = to_game_slug(&b.name);
        rank(&slug_a)
            .cmp(&rank(&slug_b))
            .then_with(|| slug_a.cmp(&slug_b))
    });
    banners
}

// Product requirement: the grid always shows an Apex entry.
fn ensure_apex_banner(banners: &mut Vec<SourceBanner>) {
    let has_apex = banners
        .iter()
        .any(|banner| to_game_slug(&banner.name) == "apex");
    if has_apex {
        return;
    }
    let fallback_image = banners
        .first()
        .map(|banner| banner.image_url.clone())
        .unwrap_or_else(|| FALLBACK_BANNER_IMAGE.to_string());
    banners.push(SourceBanner {
        name: "Apex".to_string(),
        image_url: fallback_image,
    });
}

/// Pad with fallback category names (skipping slugs already present, reusing
/// the first banner's image) until `limit` is reached, then cap at `limit`.
fn with_fallback_names(mut banners: Vec<SourceBanner>, limit: usize) -> Vec<SourceBanner> {
    if banners.len() >= limit {
        banners.truncate(limit);
        return banners;
    }

    let mut used: HashSet<String> = banners
        .iter()
        .map(|banner| to_game_slug(&banner.name))
        .collect();
    let fallback_image = banners
        .first()
        .map(|banner| banner.image_url.clone())
        .unwrap_or_else(|| FALLBACK_BANNER_IMAGE.to_string());

    for name in FALLBACK_CATEGORY_NAMES {
        if banners.len() >= limit {
            break;
        }
        let slug = to_game_slug(name);
        if used.contains(&slug) {
            continue;
        }
        banners.push(SourceBanner {
            name: (*name).to_string(),
            image_url: fallback_image.clone(),
        });
        used.insert(slug);
    }

    banners.truncate(limit);
    banners
}

/// Scan the prioritized source locations and return the first non-empty set:
/// `public/pd` + `public/pd.png` (served as `/pd`), then the legacy root
/// folders (served as `/pd.png`), then `public/games` restricted to known
/// category names.
fn read_source_banners(root: &Path) -> Vec<SourceBanner> {
    sync_legacy_banner_dirs(root);

    let public_candidates = [
        (root.join("public").join("pd"), "/pd"),
        (root.join("public").join("pd.png"), "/pd"),
    ];
    let mut from_public = Vec::new();
    for (dir, public_path) in &public_candidates {
        for file_name in list_image_files(dir) {
            from_public.push(SourceBanner {
                name: title_case_from_file_name(&file_name),
                image_url: format!("{public_path}/{file_name}"),
            });
        }
    }
    let unique_public = unique_by_slug(from_public);
    if !unique_public.is_empty() {
        return prioritize_banners(unique_public);
    }

    let root_candidates = [root.join("pd.png"), root.join("pd")];
    let mut from_root = Vec::new();
    for dir in &root_candidates {
        for file_name in list_image_files(dir) {
            from_root.push(SourceBanner {
                name: title_case_from_file_name(&file_name),
                image_url: format!("/pd.png/{file_name}"),
            });
        }
    }
    let unique_root = unique_by_slug(from_root);
    if !unique_root.is_empty() {
        return prioritize_banners(unique_root);
    }

    let games_dir = root.join("public").join("games");
    let game_files = list_image_files(&games_dir);
    if !game_files.is_empty() {
        let fallback_slugs: HashSet<String> = FALLBACK_CATEGORY_NAMES
            .iter()
            .map(|name| to_game_slug(name))
            .collect();
        // File order retained here; these are last-resort placeholders.
        return game_files
            .into_iter()
            .map(|file_name| SourceBanner {
                name: title_case_from_file_name(&file_name),
                image_url: format!("/games/{file_name}"),
            })
            .filter(|banner| fallback_slugs.contains(&to_game_slug(&banner.name)))
            .collect();
    }

    Vec::new()
}

/// Load exactly `limit` banners (capped/padded), deterministic given
/// unchanged filesystem inputs. `root` is the asset root the image folders
/// live under.
pub fn load_local_banners(root: &Path, limit: usize) -> Vec<LocalBanner> {
    let mut source = read_source_banners(root);
    ensure_apex_banner(&mut source);
    let final_banners = with_fallback_names(source, limit);

    final_banners
        .into_iter()
        .enumerate()
        .map(|(index, banner)| {
            let name = if banner.name.is_empty() {
                format!("Category {}", index + 1)
            } else {
                banner.name
            };
            LocalBanner {
                slug: to_game_slug(&name),
                image_url: banner.image_url,
                group_id: GROUP_ID_BASE + index as i64 + 1,
                category_id: CATEGORY_ID_BASE + index as i64 + 1,
                name,
            }
        })
        .collect()
}

pub fn banners_to_groups(banners: &[LocalBanner]) -> Vec<Group> {
    banners
        .iter()
        .map(|banner| Group {
            id: banner.group_id,
            name: banner.name.clone(),
            description: format!("{} category", banner.name),
            image: Some(ImageRef::new(banner.image_url.clone())),
        })
        .collect()
}

pub fn banners_to_categories(banners: &[LocalBanner]) -> Vec<Category> {
    banners
        .iter()
        .map(|banner| Category {
            id: banner.category_id,
            name: banner.name.clone(),
            description: format!("{} products", banner.name),
            image: Some(ImageRef::new(banner.image_url.clone())),
        })
        .collect()
}
