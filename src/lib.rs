/*!
 * # yaomt - Yet Another Offline Machine Translator
 *
 * A Rust library for offline machine translation over installed
 * per-language-pair packages.
 *
 * ## Features
 *
 * - Build a translation graph from installed packages (tokenizer +
 *   translation model per language pair)
 * - Synthesize missing pairs by pivoting through intermediate languages
 * - Multi-hypothesis translation with deterministic ranking
 * - Paragraph-level caching for interactive editing workloads
 * - Sentence segmentation via bundled splitters or a heuristic chunker
 * - Inline-markup-preserving translation of tag trees
 * - Remote (LibreTranslate) and few-shot (completions API) backends
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `config`: Explicit configuration threaded into builders
 * - `package`: Installed-package descriptors and discovery
 * - `engine`: Opaque per-package capability traits (tokenizer, splitter,
 *   inference engine) and their mock implementations
 * - `translate`: The translation graph and composition engine:
 *   - `translate::graph`: Graph construction, closure, and lookups
 *   - `translate::core`: The `Translation` trait and synthesized edges
 *   - `translate::cache`: Paragraph-level caching
 *   - `translate::chunk`: Heuristic sentence chunking
 * - `tags`: Tag-tree-preserving translation
 * - `providers`: Clients for remote translation capabilities:
 *   - `providers::libretranslate`: LibreTranslate API client
 *   - `providers::openai`: Completions API client
 * - `similarity`: String-similarity ratio used by chunking and tags
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the library
 *
 * ## Concurrency
 *
 * A built graph is read-only and safe to share across threads; per-edge
 * caches guard their own state. Calls are synchronous and potentially
 * slow (model loads, inference, network); run them on a worker when
 * responsiveness matters.
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod config;
pub mod engine;
pub mod errors;
pub mod language_utils;
pub mod package;
pub mod providers;
pub mod similarity;
pub mod tags;
pub mod translate;

// Re-export main types for easier usage
pub use config::{Device, TranslateConfig};
pub use errors::{PackageError, TranslateError};
pub use language_utils::get_language_name;
pub use package::{installed_packages, Package, PackageKind, PackageMetadata};
pub use tags::{translate_tags, Tag, TagNode};
pub use translate::{
    installed_languages, CachedTranslation, CompositeTranslation, FewShotTranslation, Hypothesis,
    IdentityTranslation, Language, LanguageGraph, ModelTranslation, RemoteTranslation, Translation,
};
