//! Script-tag injection into a page's `<head>`

use anyhow::{Context, Result, bail};
use solis_core::SdkConfig;
use std::path::Path;
use tracing::{info, warn};

/// Hosted SDK script
pub const SDK_URL: &str = "https://cdn.solisgames.com/sdk/v1/solis-sdk.js";

/// Comment placed before the injected tag
pub const MARKER: &str = "<!-- Solis Games SDK -->";

/// The `<script>` element that loads the hosted SDK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    pub src: String,
    pub api_key: String,
    pub game_id: Option<String>,
}

impl ScriptTag {
    pub fn new(api_key: impl Into<String>, game_id: Option<String>) -> Self {
        Self {
            src: SDK_URL.to_string(),
            api_key: api_key.into(),
            game_id: game_id.filter(|id| !id.is_empty()),
        }
    }

    pub fn from_config(config: &SdkConfig) -> Self {
        Self::new(config.api_key.clone(), config.game_id.clone())
    }

    /// Marker comment and script element, one per line
    pub fn render(&self, indent: &str) -> String {
        let mut script = format!(
            r#"<script src="{}" data-api-key="{}""#,
            escape_attr(&self.src),
            escape_attr(&self.api_key)
        );
        if let Some(game_id) = &self.game_id {
            script.push_str(&format!(r#" data-game-id="{}""#, escape_attr(game_id)));
        }
        script.push_str(r#" data-environment="production"></script>"#);
        format!("{indent}{MARKER}\n{indent}{script}\n")
    }
}

/// Result of injecting into a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// Updated document
    Injected(String),
    /// The SDK URL is already referenced; nothing to do
    AlreadyPresent,
    /// No `</head>` to insert before
    MissingHead,
}

/// Insert `tag` immediately before `</head>`.
///
/// Idempotent: a document already mentioning the SDK URL is left untouched.
pub fn inject(html: &str, tag: &ScriptTag) -> Injection {
    if html.contains(&tag.src) {
        return Injection::AlreadyPresent;
    }
    // ASCII lowercasing keeps byte offsets valid for the original
    let Some(head_end) = html.to_ascii_lowercase().find("</head>") else {
        return Injection::MissingHead;
    };

    let mut out = String::with_capacity(html.len() + 256);
    out.push_str(&html[..head_end]);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&tag.render("    "));
    out.push_str(&html[head_end..]);
    Injection::Injected(out)
}

/// What `inject_file` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileInjection {
    Written,
    AlreadyPresent,
}

/// Inject `tag` into the page at `path`, rewriting it in place
pub fn inject_file(path: &Path, tag: &ScriptTag) -> Result<FileInjection> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match inject(&html, tag) {
        Injection::Injected(updated) => {
            std::fs::write(path, updated)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Injected Solis Games SDK into {}", path.display());
            Ok(FileInjection::Written)
        }
        Injection::AlreadyPresent => {
            info!("Solis Games SDK already present in {}", path.display());
            Ok(FileInjection::AlreadyPresent)
        }
        Injection::MissingHead => {
            warn!("No </head> in {}", path.display());
            bail!("{} has no </head> element", path.display())
        }
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}
