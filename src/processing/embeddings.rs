//! Sentence embeddings using Model2Vec, behind a lazily initialized shared handle

use crate::error::{Result, SkillGapError};
use model2vec_rs::model::StaticModel;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use log::info;

/// Dense text encoder. `encode` takes `&self` and must be safe to call from
/// several analyses at once.
pub trait TextEncoder: Send + Sync {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
    fn model_name(&self) -> &str;
}

pub struct Model2VecEncoder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEncoder {
    /// Load a model from a local directory or a Hugging Face repository id
    pub fn load(model: &str, models_dir: Option<&Path>) -> Result<Self> {
        let start_time = Instant::now();
        let source = Self::resolve_source(model, models_dir);

        info!("Loading Model2Vec embedding model from: {}", source.display());

        let static_model = StaticModel::from_pretrained(
            &source,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| e.context(format!("Failed to load model '{}'", model)))?;

        info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model: static_model,
            model_name: model.to_string(),
        })
    }

    /// A downloaded copy under the models directory wins over the hub id
    fn resolve_source(model: &str, models_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = models_dir {
            let local_path = dir.join(model);
            if local_path.exists() {
                return local_path;
            }
        }
        PathBuf::from(model)
    }
}

impl TextEncoder for Model2VecEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.model.encode(texts))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Process-lifetime handle to the embedding model.
///
/// The model is created on first use, at most once per handle, and never
/// mutated afterwards. Share the handle through `Arc` so every analysis uses
/// the same model instance.
pub struct EmbeddingHandle {
    model: Option<String>,
    models_dir: Option<PathBuf>,
    encoder: OnceCell<Arc<dyn TextEncoder>>,
}

impl EmbeddingHandle {
    /// Handle that loads `model` on first use
    pub fn new(model: impl Into<String>, models_dir: Option<PathBuf>) -> Self {
        Self {
            model: Some(model.into()),
            models_dir,
            encoder: OnceCell::new(),
        }
    }

    /// Handle with no model; semantic scoring through it fails
    pub fn unconfigured() -> Self {
        Self {
            model: None,
            models_dir: None,
            encoder: OnceCell::new(),
        }
    }

    /// Handle around an already constructed encoder
    pub fn with_encoder(encoder: Arc<dyn TextEncoder>) -> Self {
        let model = Some(encoder.model_name().to_string());
        Self {
            model,
            models_dir: None,
            encoder: OnceCell::with_value(encoder),
        }
    }

    /// The encoder, loading it on the first call. A failed load is not
    /// cached, so a later call may try again.
    pub fn encoder(&self) -> Result<Arc<dyn TextEncoder>> {
        self.encoder
            .get_or_try_init(|| {
                let model = self.model.as_deref().ok_or_else(|| {
                    SkillGapError::Embedding("No embedding model configured".to_string())
                })?;
                let encoder = Model2VecEncoder::load(model, self.models_dir.as_deref())?;
                Ok(Arc::new(encoder) as Arc<dyn TextEncoder>)
            })
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.encoder.get().is_some()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
    }

    impl TextEncoder for Counting {
        fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    #[test]
    fn test_injected_encoder_is_shared() {
        let encoder = Arc::new(Counting { calls: AtomicUsize::new(0) });
        let handle = EmbeddingHandle::with_encoder(encoder.clone());

        assert!(handle.is_initialized());
        assert_eq!(handle.model(), Some("counting"));

        let first = handle.encoder().unwrap();
        let second = handle.encoder().unwrap();
        first.encode(&["a".to_string()]).unwrap();
        second.encode(&["b".to_string()]).unwrap();

        assert_eq!(encoder.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unconfigured_handle_fails() {
        let handle = EmbeddingHandle::unconfigured();

        assert!(matches!(handle.encoder(), Err(SkillGapError::Embedding(_))));
        assert!(!handle.is_initialized());
    }
}
