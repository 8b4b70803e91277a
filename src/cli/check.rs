//! `check` command: print the effective configuration.

use asset_finalizer::{FinalizerConfig, UrlRoot, log};
use owo_colors::OwoColorize;

/// Print effective settings (config was already validated while loading).
pub fn run(config: &FinalizerConfig) {
    if config.config_path.as_os_str().is_empty() {
        log!("check"; "no config file found, using defaults");
    } else {
        log!("check"; "config {}", config.config_path.display());
    }

    let assets = &config.assets;
    let url_root = match &assets.sourcemaps_url_root {
        UrlRoot::Identity => "false".to_string(),
        UrlRoot::FixedRoot(root) => format!("\"{root}\""),
        UrlRoot::Custom(_) => "<callback>".to_string(),
    };

    let rows = [
        ("public_dir", config.public_dir.display().to_string()),
        ("assets.prefix", assets.prefix.clone()),
        ("assets.uncompressed_prefix", assets.uncompressed_prefix.clone()),
        ("assets.sourcemaps_prefix", assets.sourcemaps_prefix.clone()),
        (
            "assets.sourcemaps_embed_source",
            assets.sourcemaps_embed_source.to_string(),
        ),
        ("assets.sourcemaps_url_root", url_root),
        ("gzip siblings", assets.gzip_artifacts().to_string()),
        ("assets.bundle_marker", assets.bundle_marker.clone()),
        ("assets.write_policy", format!("{:?}", assets.write_policy)),
        ("assets.terser", format!("{:?}", assets.terser)),
    ];
    for (key, value) in rows {
        eprintln!("  {} = {}", key.cyan(), value);
    }
    log!("check"; "{}", "ok".green());
}
