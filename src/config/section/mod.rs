//! Configuration section definitions.
//!
//! Each module corresponds to a section in `finalizer.toml`:
//!
//! | Module   | TOML Section       | Purpose                                   |
//! |----------|--------------------|-------------------------------------------|
//! | `assets` | `[assets]`         | Prefixes, URL root, gzip, write policy    |
//! | `terser` | `[assets.terser]`  | Minifier pass-through options             |

pub mod assets;
mod terser;

pub use assets::{AssetsConfig, WritePolicy};
pub use terser::TerserConfig;
