use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::model::InferenceBackend;
use crate::rerank::Reranker;

/// Shared router state: the injected model handle and the inference gate.
pub struct HandlerState<B: InferenceBackend + 'static> {
    pub reranker: Arc<Reranker<B>>,

    pub inference_permits: Arc<Semaphore>,

    pub max_concurrent_inferences: usize,
}

impl<B: InferenceBackend + 'static> Clone for HandlerState<B> {
    fn clone(&self) -> Self {
        Self {
            reranker: Arc::clone(&self.reranker),
            inference_permits: Arc::clone(&self.inference_permits),
            max_concurrent_inferences: self.max_concurrent_inferences,
        }
    }
}

impl<B: InferenceBackend + 'static> HandlerState<B> {
    /// # Panics
    ///
    /// If `max_concurrent_inferences` is zero.
    pub fn new(backend: B, max_concurrent_inferences: usize) -> Self {
        Self::from_reranker(Arc::new(Reranker::new(backend)), max_concurrent_inferences)
    }

    pub fn from_reranker(reranker: Arc<Reranker<B>>, max_concurrent_inferences: usize) -> Self {
        assert!(
            max_concurrent_inferences > 0,
            "max_concurrent_inferences must be positive"
        );
        Self {
            reranker,
            inference_permits: Arc::new(Semaphore::new(max_concurrent_inferences)),
            max_concurrent_inferences,
        }
    }

    pub fn is_stub(&self) -> bool {
        self.reranker.backend().is_stub()
    }
}
