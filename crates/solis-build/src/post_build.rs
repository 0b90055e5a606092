//! Post-build step for web builds
//!
//! Runs after the engine has written its output directory: injects the SDK
//! script tag into `index.html` and checks that the files under `Build/`
//! carry the extension of the chosen compression.

use crate::html::{FileInjection, ScriptTag, inject_file};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Transfer compression of the build artifacts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Brotli,
}

impl Compression {
    /// Extension every compressed artifact must end with
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Compression::None => None,
            Compression::Gzip => Some("gz"),
            Compression::Brotli => Some("br"),
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "disabled" => Ok(Compression::None),
            "gzip" | "gz" => Ok(Compression::Gzip),
            "brotli" | "br" => Ok(Compression::Brotli),
            other => Err(format!("unknown compression '{}' (none, gzip, brotli)", other)),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
            Compression::Brotli => "brotli",
        })
    }
}

/// Where the build went and how it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    pub output_path: PathBuf,
    pub compression: Compression,
    pub development: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("Builds/WebGL"),
            compression: Compression::default(),
            development: false,
        }
    }
}

/// Outcome of `post_build`
#[derive(Debug, Clone)]
pub struct PostBuildReport {
    pub index_path: PathBuf,
    pub injection: FileInjection,
    /// Artifacts whose extension does not match the compression setting
    pub mismatched: Vec<PathBuf>,
}

/// Inject the SDK into the build at `options.output_path` and verify its artifacts
pub fn post_build(options: &BuildOptions, tag: &ScriptTag) -> Result<PostBuildReport> {
    let index_path = options.output_path.join("index.html");
    if !index_path.is_file() {
        bail!("index.html not found in {}", options.output_path.display());
    }
    if options.development {
        debug!("Development build at {}", options.output_path.display());
    }

    let injection = inject_file(&index_path, tag)?;
    let mismatched = check_compression(&options.output_path.join("Build"), options.compression)?;

    info!(
        "Post-build complete: {} ({:?}, {} compression issues)",
        index_path.display(),
        injection,
        mismatched.len()
    );
    Ok(PostBuildReport {
        index_path,
        injection,
        mismatched,
    })
}

fn check_compression(build_dir: &Path, compression: Compression) -> Result<Vec<PathBuf>> {
    let mut mismatched = Vec::new();
    if !build_dir.is_dir() {
        debug!("No Build directory at {}", build_dir.display());
        return Ok(mismatched);
    }

    for entry in std::fs::read_dir(build_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // The loader is never compressed
        if name.ends_with(".loader.js") {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str());
        let ok = match compression.extension() {
            Some(expected) => ext == Some(expected),
            None => !matches!(ext, Some("gz") | Some("br")),
        };
        if !ok {
            warn!("{} does not match {} compression", name, compression);
            mismatched.push(path);
        }
    }
    mismatched.sort();
    Ok(mismatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn build_dir(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<html><head><title>t</title></head><body></body></html>",
        )
        .unwrap();
        fs::create_dir(dir.path().join("Build")).unwrap();
        for file in files {
            fs::write(dir.path().join("Build").join(file), b"data").unwrap();
        }
        dir
    }

    #[test]
    fn test_parse_compression() {
        assert_eq!("Gzip".parse::<Compression>().unwrap(), Compression::Gzip);
        assert_eq!("br".parse::<Compression>().unwrap(), Compression::Brotli);
        assert_eq!("disabled".parse::<Compression>().unwrap(), Compression::None);
        assert!("zstd".parse::<Compression>().is_err());
    }

    #[test]
    fn test_brotli_build_checked() {
        let dir = build_dir(&["game.loader.js", "game.wasm.br", "game.data.br", "game.framework.js.gz"]);
        let options = BuildOptions {
            output_path: dir.path().to_path_buf(),
            compression: Compression::Brotli,
            development: false,
        };

        let report = post_build(&options, &ScriptTag::new("pk", None)).unwrap();
        assert_eq!(report.injection, FileInjection::Written);
        assert_eq!(report.mismatched.len(), 1);
        assert!(report.mismatched[0].ends_with("game.framework.js.gz"));

        // Running again leaves the page alone
        let again = post_build(&options, &ScriptTag::new("pk", None)).unwrap();
        assert_eq!(again.injection, FileInjection::AlreadyPresent);
    }

    #[test]
    fn test_uncompressed_build() {
        let dir = build_dir(&["game.loader.js", "game.wasm", "game.data.gz"]);
        let options = BuildOptions {
            output_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let report = post_build(&options, &ScriptTag::new("pk", None)).unwrap();
        assert_eq!(report.mismatched.len(), 1);
    }

    #[test]
    fn test_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        let options = BuildOptions {
            output_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(post_build(&options, &ScriptTag::new("pk", None)).is_err());
    }
}
