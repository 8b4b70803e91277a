//! `[assets.terser]` minifier pass-through options.
//!
//! # Example
//!
//! ```toml
//! [assets.terser]
//! mangle = true      # shorten local names
//! compress = true    # dead code removal, constant folding, ...
//! comments = false   # keep comments in output
//! module = false     # parse as ES module instead of script
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerserConfig {
    pub mangle: bool,
    pub compress: bool,
    pub comments: bool,
    pub module: bool,
}

impl Default for TerserConfig {
    fn default() -> Self {
        Self {
            mangle: true,
            compress: true,
            comments: false,
            module: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.assets.terser, TerserConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = test_parse_config("[assets.terser]\nmangle = false\nmodule = true");
        assert!(!config.assets.terser.mangle);
        assert!(config.assets.terser.compress);
        assert!(config.assets.terser.module);
    }
}
