//! Role → asset lookup.
//!
//! Every role tag resolves to a [`RoleAsset`]: a glyph for list chips, a
//! small piece of line art for the detail view, and the source the art
//! stands in for (built-in, an image file on disk, or a remote placeholder
//! URL). Unknown tags and unresolvable files fall back to the placeholder
//! asset.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::state::Role;

pub const PLACEHOLDER_GLYPH: &str = "?";
pub const PLACEHOLDER_REFERENCE: &str = "placeholder";
pub const DEFAULT_ICON_DIR: &str = "img";
pub const DEFAULT_ICON_EXT: &str = "png";
pub const DEFAULT_REMOTE_BASE: &str = "https://via.placeholder.com/150";

const TOP_ART: &[&str] = &["   /\\   ", "  /  \\  ", " /_/\\_\\ "];
const JUNGLA_ART: &[&str] = &["  \\|/   ", " --*--  ", "  /|\\   "];
const MEDIO_ART: &[&str] = &["   /\\   ", "  <  >  ", "   \\/   "];
const ADC_ART: &[&str] = &["  >>--> ", "  >>--> ", "  >>--> "];
const SUP_ART: &[&str] = &["   __   ", " _|  |_ ", "|_ ++ _|"];
const PLACEHOLDER_ART: &[&str] = &[" .----. ", " | ?? | ", " '----' "];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconScheme {
    Glyph,
    ImageFiles { dir: PathBuf, ext: String },
    Remote { base_url: String },
}

impl IconScheme {
    pub fn parse(value: &str, dir: PathBuf, ext: String, base_url: String) -> Option<IconScheme> {
        match value.trim().to_ascii_lowercase().as_str() {
            "glyph" | "svg" | "inline" => Some(IconScheme::Glyph),
            "files" | "file" | "images" => Some(IconScheme::ImageFiles { dir, ext }),
            "remote" | "url" => Some(IconScheme::Remote { base_url }),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IconScheme::Glyph => "glyph",
            IconScheme::ImageFiles { .. } => "files",
            IconScheme::Remote { .. } => "remote",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Builtin,
    File(PathBuf),
    Url(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAsset {
    pub glyph: &'static str,
    pub art: &'static [&'static str],
    pub source: AssetSource,
}

impl RoleAsset {
    pub fn placeholder() -> Self {
        Self {
            glyph: PLACEHOLDER_GLYPH,
            art: PLACEHOLDER_ART,
            source: AssetSource::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == AssetSource::Placeholder
    }

    pub fn reference(&self) -> String {
        match &self.source {
            AssetSource::Builtin => "built-in".to_string(),
            AssetSource::File(path) => path.display().to_string(),
            AssetSource::Url(url) => url.clone(),
            AssetSource::Placeholder => PLACEHOLDER_REFERENCE.to_string(),
        }
    }
}

pub trait RoleAssetResolver {
    /// Pure lookup; `None` when the tag is unknown or its asset is missing.
    fn resolve(&self, tag: &str, player_name: &str) -> Option<RoleAsset>;

    fn resolve_or_placeholder(&self, tag: &str, player_name: &str) -> RoleAsset {
        self.resolve(tag, player_name)
            .unwrap_or_else(RoleAsset::placeholder)
    }
}

/// Resolver configured by an [`IconScheme`]. Missing assets are reported
/// once per tag through [`AssetResolver::take_missing`].
#[derive(Debug)]
pub struct AssetResolver {
    scheme: IconScheme,
    missing: RefCell<BTreeSet<String>>,
    reported: RefCell<BTreeSet<String>>,
}

impl AssetResolver {
    pub fn new(scheme: IconScheme) -> Self {
        Self {
            scheme,
            missing: RefCell::new(BTreeSet::new()),
            reported: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn scheme(&self) -> &IconScheme {
        &self.scheme
    }

    /// Drains tags that fell back to the placeholder since the last call.
    pub fn take_missing(&self) -> Vec<String> {
        std::mem::take(&mut *self.missing.borrow_mut())
            .into_iter()
            .collect()
    }

    fn note_missing(&self, tag: &str) {
        if self.reported.borrow_mut().insert(tag.to_string()) {
            log::warn!("no {} asset for role tag {tag:?}", self.scheme.label());
            self.missing.borrow_mut().insert(tag.to_string());
        }
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new(IconScheme::Glyph)
    }
}

impl RoleAssetResolver for AssetResolver {
    fn resolve(&self, tag: &str, player_name: &str) -> Option<RoleAsset> {
        let role = Role::from_tag(tag)?;
        let (glyph, art) = builtin(role);
        let source = match &self.scheme {
            IconScheme::Glyph => AssetSource::Builtin,
            IconScheme::ImageFiles { dir, ext } => {
                let path = image_path(dir, tag, ext);
                if !path.is_file() {
                    return None;
                }
                AssetSource::File(path)
            }
            IconScheme::Remote { base_url } => {
                AssetSource::Url(remote_url(base_url, player_name, tag))
            }
        };
        Some(RoleAsset { glyph, art, source })
    }

    fn resolve_or_placeholder(&self, tag: &str, player_name: &str) -> RoleAsset {
        match self.resolve(tag, player_name) {
            Some(asset) => asset,
            None => {
                self.note_missing(tag);
                RoleAsset::placeholder()
            }
        }
    }
}

fn builtin(role: Role) -> (&'static str, &'static [&'static str]) {
    match role {
        Role::Top => ("▲", TOP_ART),
        Role::Jungla => ("♣", JUNGLA_ART),
        Role::Medio => ("◆", MEDIO_ART),
        Role::Adc => ("➶", ADC_ART),
        Role::Sup => ("✚", SUP_ART),
    }
}

/// `{dir}/{Tag}.{ext}` with the tag's first letter capitalized.
pub fn image_path(dir: &std::path::Path, tag: &str, ext: &str) -> PathBuf {
    dir.join(format!("{}.{}", capitalize(tag), ext.trim_start_matches('.')))
}

pub fn remote_url(base_url: &str, player_name: &str, tag: &str) -> String {
    let text = initials(player_name);
    let sep = if base_url.contains('?') { '&' } else { '?' };
    if text.is_empty() {
        format!("{base_url}{sep}text={tag}")
    } else {
        format!("{base_url}{sep}text={text}+{tag}")
    }
}

/// First letter of each word, uppercased: "Lee Sang-hyeok" -> "LS".
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_ascii_alphanumeric()))
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_handles_lowercase_tags() {
        assert_eq!(capitalize("sup"), "Sup");
        assert_eq!(capitalize("Adc"), "Adc");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn remote_url_uses_initials() {
        assert_eq!(
            remote_url("https://img.test/150", "Lee Sang-hyeok", "Medio"),
            "https://img.test/150?text=LS+Medio"
        );
        assert_eq!(
            remote_url("https://img.test/150", "  keria ", "Sup"),
            "https://img.test/150?text=K+Sup"
        );
        assert_eq!(
            remote_url("https://img.test/150?bg=000", "", "Top"),
            "https://img.test/150?bg=000&text=Top"
        );
    }

    #[test]
    fn unknown_tag_falls_back_and_is_reported_once() {
        let resolver = AssetResolver::default();
        assert!(resolver.resolve("Coach", "X").is_none());
        assert!(resolver.resolve_or_placeholder("Coach", "X").is_placeholder());
        assert!(resolver.resolve_or_placeholder("Coach", "X").is_placeholder());
        assert_eq!(resolver.take_missing(), vec!["Coach".to_string()]);
        assert!(resolver.take_missing().is_empty());
    }

    #[test]
    fn glyph_scheme_resolves_known_roles() {
        let resolver = AssetResolver::default();
        for role in Role::ALL {
            let asset = resolver.resolve(role.tag(), "Anyone").expect("known role");
            assert_eq!(asset.source, AssetSource::Builtin);
            assert_ne!(asset.glyph, PLACEHOLDER_GLYPH);
        }
    }
}
