/// The embedding capability the retrieval engine consumes.
///
/// Implementations may run a local model or call a remote service; the
/// engine only relies on every returned vector having `dim()` entries
/// for the lifetime of the instance.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
