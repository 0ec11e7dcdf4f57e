/*!
 * Opaque engine capabilities supplied per installed package.
 *
 * A package bundles a tokenizer, an inference engine, and optionally a
 * sentence splitter. None of them are implemented in this crate; callers
 * provide an `EngineLoader` that opens a package directory and returns the
 * bundle. A deterministic in-memory implementation lives in [`mock`] for
 * tests and benchmarks.
 */

use crate::config::Device;
use crate::errors::TranslateError;
use crate::package::Package;

/// Options for one batched inference call
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceOptions {
    /// Number of ranked hypotheses to produce per input
    pub num_hypotheses: usize,
    /// Beam width; at least as wide as the hypothesis count
    pub beam_size: usize,
    /// Positive bias toward longer outputs
    pub length_penalty: f32,
    /// Maximum number of inputs translated per engine batch
    pub max_batch_size: usize,
    /// Replace unknown tokens with their source counterpart
    pub replace_unknowns: bool,
    /// Decoder prefix token the model expects, if any
    pub target_prefix: Option<String>,
}

/// One ranked engine output: tokens plus a cumulative log-probability score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTokens {
    /// Output tokens, including the decoder prefix when one was requested
    pub tokens: Vec<String>,
    /// Higher is better
    pub score: f64,
}

/// Sub-word tokenizer bundled with a package
pub trait Tokenizer: Send + Sync {
    /// Encode one sentence into model tokens
    fn encode(&self, sentence: &str) -> Result<Vec<String>, TranslateError>;

    /// Decode model tokens back into text
    fn decode(&self, tokens: Vec<String>) -> Result<String, TranslateError>;
}

/// Optional package-supplied sentence segmentation
pub trait SentenceSplitter: Send + Sync {
    /// Split text into sentence-sized units
    fn split(&self, text: &str) -> Vec<String>;
}

/// Batched seq2seq inference engine
pub trait InferenceEngine: Send + Sync {
    /// Translate a batch of tokenized sentences, returning
    /// `options.num_hypotheses` ranked outputs per input, best first
    fn translate_batch(
        &self,
        batch: &[Vec<String>],
        options: &InferenceOptions,
    ) -> Result<Vec<Vec<ScoredTokens>>, TranslateError>;
}

/// The capability bundle opened from one package directory
pub struct LoadedEngine {
    /// Sub-word tokenizer
    pub tokenizer: Box<dyn Tokenizer>,
    /// Sentence splitter, when the package bundles one
    pub splitter: Option<Box<dyn SentenceSplitter>>,
    /// Inference engine
    pub engine: Box<dyn InferenceEngine>,
}

/// Opens package directories into engine bundles
///
/// Loading may be slow (model files are opened here); translations call it
/// lazily on first use and keep the bundle for their lifetime.
pub trait EngineLoader: Send + Sync {
    /// Open the given package on the given device
    fn load(&self, package: &Package, device: Device) -> Result<LoadedEngine, TranslateError>;
}

/// Deterministic mock engines for tests and benchmarks.
///
/// - `MockBehavior::Echo` - repeat the source tokens unchanged
/// - `MockBehavior::Uppercase` - uppercase the source text
/// - `MockBehavior::Map` - look the source text up in a fixed table
/// - `MockBehavior::Failing` - always fail with an inference error
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::{
        InferenceEngine, InferenceOptions, LoadedEngine, ScoredTokens, SentenceSplitter, Tokenizer,
    };
    use crate::config::Device;
    use crate::errors::TranslateError;
    use crate::package::Package;

    /// Behavior mode for the mock inference engine
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Repeat the source tokens unchanged
        Echo,
        /// Uppercase the joined source text
        Uppercase,
        /// Look the joined source text up in a fixed table, echo on miss
        Map(HashMap<String, String>),
        /// Always fail with an inference error
        Failing,
    }

    /// Mock inference engine with deterministic ranked outputs
    ///
    /// Rank 0 carries the transformed text; later ranks append an `(alt n)`
    /// marker and score strictly worse, so ranking stays observable.
    pub struct MockEngine {
        behavior: MockBehavior,
        request_count: Arc<AtomicUsize>,
    }

    impl MockEngine {
        /// Create a mock engine with the specified behavior
        pub fn new(behavior: MockBehavior) -> Self {
            Self::with_request_count(behavior, Arc::new(AtomicUsize::new(0)))
        }

        /// Create a mock engine sharing an external request counter
        pub fn with_request_count(behavior: MockBehavior, request_count: Arc<AtomicUsize>) -> Self {
            Self {
                behavior,
                request_count,
            }
        }

        /// Number of batch calls served so far
        pub fn request_count(&self) -> usize {
            self.request_count.load(Ordering::SeqCst)
        }
    }

    impl InferenceEngine for MockEngine {
        fn translate_batch(
            &self,
            batch: &[Vec<String>],
            options: &InferenceOptions,
        ) -> Result<Vec<Vec<ScoredTokens>>, TranslateError> {
            self.request_count.fetch_add(1, Ordering::SeqCst);

            if matches!(self.behavior, MockBehavior::Failing) {
                return Err(TranslateError::Inference(
                    "simulated engine failure".to_string(),
                ));
            }

            let mut results = Vec::with_capacity(batch.len());
            for tokens in batch {
                let source = tokens.join(" ");
                let translated = match &self.behavior {
                    MockBehavior::Echo => source.clone(),
                    MockBehavior::Uppercase => source.to_uppercase(),
                    MockBehavior::Map(table) => {
                        table.get(&source).cloned().unwrap_or_else(|| source.clone())
                    }
                    MockBehavior::Failing => unreachable!(),
                };

                let ranks = (0..options.num_hypotheses)
                    .map(|rank| {
                        let text = if rank == 0 {
                            translated.clone()
                        } else {
                            format!("{} (alt {})", translated, rank)
                        };

                        let mut out_tokens = Vec::new();
                        if let Some(prefix) = &options.target_prefix {
                            out_tokens.push(prefix.clone());
                        }
                        out_tokens.extend(text.split_whitespace().map(str::to_string));

                        ScoredTokens {
                            tokens: out_tokens,
                            score: -0.1 * (rank + 1) as f64,
                        }
                    })
                    .collect();
                results.push(ranks);
            }

            Ok(results)
        }
    }

    /// Mock whitespace tokenizer
    #[derive(Debug, Clone, Default)]
    pub struct MockTokenizer {
        leading_space: bool,
    }

    impl MockTokenizer {
        /// Create a plain whitespace tokenizer
        pub fn new() -> Self {
            Self {
                leading_space: false,
            }
        }

        /// Create a tokenizer whose decode emits the sub-word leading-space
        /// artifact real tokenizers produce
        pub fn with_leading_space() -> Self {
            Self {
                leading_space: true,
            }
        }
    }

    impl Tokenizer for MockTokenizer {
        fn encode(&self, sentence: &str) -> Result<Vec<String>, TranslateError> {
            Ok(sentence.split_whitespace().map(String::from).collect())
        }

        fn decode(&self, tokens: Vec<String>) -> Result<String, TranslateError> {
            let text = tokens.join(" ");
            if self.leading_space && !text.is_empty() {
                Ok(format!(" {}", text))
            } else {
                Ok(text)
            }
        }
    }

    /// Mock sentence splitter cutting after every '.'
    #[derive(Debug, Clone, Default)]
    pub struct MockSplitter;

    impl SentenceSplitter for MockSplitter {
        fn split(&self, text: &str) -> Vec<String> {
            text.split_inclusive('.').map(str::to_string).collect()
        }
    }

    /// Loader wiring mock engines per language pair
    pub struct MockLoader {
        behaviors: HashMap<String, MockBehavior>,
        include_splitter: bool,
        leading_space: bool,
        fail_loads: bool,
        load_count: Arc<AtomicUsize>,
        inference_count: Arc<AtomicUsize>,
    }

    impl MockLoader {
        /// Create a loader that echoes for every pair
        pub fn new() -> Self {
            Self {
                behaviors: HashMap::new(),
                include_splitter: false,
                leading_space: false,
                fail_loads: false,
                load_count: Arc::new(AtomicUsize::new(0)),
                inference_count: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Create a loader that fails to open every package
        pub fn failing() -> Self {
            Self {
                fail_loads: true,
                ..Self::new()
            }
        }

        /// Set the engine behavior for one language pair
        pub fn with_behavior(mut self, from: &str, to: &str, behavior: MockBehavior) -> Self {
            self.behaviors.insert(Self::pair_key(from, to), behavior);
            self
        }

        /// Set a fixed text mapping for one language pair
        pub fn with_mapping(self, from: &str, to: &str, entries: &[(&str, &str)]) -> Self {
            let table = entries
                .iter()
                .map(|(source, target)| (source.to_string(), target.to_string()))
                .collect();
            self.with_behavior(from, to, MockBehavior::Map(table))
        }

        /// Bundle a sentence splitter into every loaded engine
        pub fn with_splitter(mut self) -> Self {
            self.include_splitter = true;
            self
        }

        /// Emit the leading-space decode artifact from every tokenizer
        pub fn with_leading_space(mut self) -> Self {
            self.leading_space = true;
            self
        }

        /// Number of packages opened so far
        pub fn load_count(&self) -> usize {
            self.load_count.load(Ordering::SeqCst)
        }

        /// Number of batch inference calls served across all loaded engines
        pub fn inference_count(&self) -> usize {
            self.inference_count.load(Ordering::SeqCst)
        }

        fn pair_key(from: &str, to: &str) -> String {
            format!("{}-{}", from, to)
        }
    }

    impl Default for MockLoader {
        fn default() -> Self {
            Self::new()
        }
    }

    impl super::EngineLoader for MockLoader {
        fn load(&self, package: &Package, _device: Device) -> Result<LoadedEngine, TranslateError> {
            if self.fail_loads {
                return Err(TranslateError::ModelLoad {
                    package: package.label(),
                    reason: "simulated load failure".to_string(),
                });
            }

            self.load_count.fetch_add(1, Ordering::SeqCst);

            let key = Self::pair_key(
                package.from_code().unwrap_or(""),
                package.to_code().unwrap_or(""),
            );
            let behavior = self
                .behaviors
                .get(&key)
                .cloned()
                .unwrap_or(MockBehavior::Echo);

            let tokenizer = if self.leading_space {
                MockTokenizer::with_leading_space()
            } else {
                MockTokenizer::new()
            };

            Ok(LoadedEngine {
                tokenizer: Box::new(tokenizer),
                splitter: self
                    .include_splitter
                    .then(|| Box::new(MockSplitter) as Box<dyn SentenceSplitter>),
                engine: Box::new(MockEngine::with_request_count(
                    behavior,
                    Arc::clone(&self.inference_count),
                )),
            })
        }
    }

}
