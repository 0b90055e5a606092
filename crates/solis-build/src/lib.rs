//! Build tooling for Solis Games web builds
//!
//! - `<script>` tag injection into the page head, idempotent by SDK URL
//! - Post-build step: injection plus a compression sanity check

pub mod html;
pub mod post_build;

pub use html::{FileInjection, Injection, MARKER, SDK_URL, ScriptTag, inject, inject_file};
pub use post_build::{BuildOptions, Compression, PostBuildReport, post_build};
