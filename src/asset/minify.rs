//! JavaScript minification with source maps.
//!
//! The finalizer treats the minifier as an opaque capability behind
//! [`Minify`]; [`OxcMinifier`] is the default implementation.

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::error::{FinalizeError, Result};
use crate::config::TerserConfig;

/// Minified code plus its serialized source map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinifiedWithMap {
    pub code: String,
    pub map_json: String,
}

/// A JavaScript compressor that also produces a source map.
pub trait Minify: Send + Sync {
    /// Minify `source`. `filename` is recorded in the map's `sources`.
    fn compile_with_map(&self, source: &str, filename: &Path) -> Result<MinifiedWithMap>;
}

/// Minifier backed by oxc.
#[derive(Debug, Clone, Default)]
pub struct OxcMinifier {
    options: TerserConfig,
}

impl OxcMinifier {
    pub fn new(options: TerserConfig) -> Self {
        Self { options }
    }

    fn source_type(&self) -> SourceType {
        if self.options.module {
            SourceType::mjs()
        } else {
            SourceType::cjs()
        }
    }
}

impl Minify for OxcMinifier {
    fn compile_with_map(&self, source: &str, filename: &Path) -> Result<MinifiedWithMap> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, self.source_type()).parse();
        if let Some(first) = ret.errors.first() {
            return Err(FinalizeError::Minify {
                path: filename.to_path_buf(),
                message: first.to_string(),
            });
        }

        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: self.options.mangle.then(MangleOptions::default),
            compress: self.options.compress.then(CompressOptions::smallest),
        };
        let ret = Minifier::new(options).minify(&allocator, &mut program);

        let comments = if self.options.comments {
            CommentOptions::default()
        } else {
            CommentOptions::disabled()
        };
        let out = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments,
                source_map_path: Some(filename.to_path_buf()),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program);

        let map_json = out
            .map
            .map(|map| map.to_json_string())
            .ok_or_else(|| FinalizeError::Minify {
                path: filename.to_path_buf(),
                message: "no source map produced".into(),
            })?;

        Ok(MinifiedWithMap {
            code: out.code,
            map_json,
        })
    }
}
