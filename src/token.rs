use once_cell::sync::OnceCell;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;
use tracing::warn;

// Initialized once per process; building the BPE ranks is expensive.
static CL100K: OnceCell<Option<CoreBPE>> = OnceCell::new();

fn cl100k() -> Option<&'static CoreBPE> {
    CL100K
        .get_or_init(|| match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                warn!("Tokenizer unavailable, token counts will be 0: {}", e);
                None
            }
        })
        .as_ref()
}

/// Tokenizer to use for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenizerKind {
    /// cl100k_base BPE vocabulary (GPT-4 family)
    #[default]
    Bpe,
    /// No tokenizer; every count is 0
    None,
}

impl TokenizerKind {
    /// Creates a new counter instance of this kind.
    #[must_use]
    pub fn create(self) -> Arc<dyn TokenCounter> {
        match self {
            Self::Bpe => Arc::new(BpeTokenCounter),
            Self::None => Arc::new(NoopTokenCounter),
        }
    }
}

/// Trait for counting tokens in text.
///
/// Implementations must never fail: when the underlying vocabulary cannot be
/// loaded, the count degrades to 0 and the pipeline proceeds.
pub trait TokenCounter: Send + Sync {
    /// Counts the tokens in the given text.
    fn count(&self, text: &str) -> usize;
}

/// Subword counter over the cl100k_base vocabulary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BpeTokenCounter;

impl TokenCounter for BpeTokenCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        match cl100k() {
            Some(bpe) => bpe.encode_ordinary(text).len(),
            None => 0,
        }
    }
}

/// Counter that always returns 0.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NoopTokenCounter;

impl TokenCounter for NoopTokenCounter {
    fn count(&self, _text: &str) -> usize {
        0
    }
}
