//! Invalidation of geometry derived from node positions.

/// Implemented by structures that cache position-derived values (the mesh
/// bounding box). Every mutator that moves, adds or removes a node calls
/// [`invalidate_cache`](InvalidateCache::invalidate_cache) before returning.
pub trait InvalidateCache {
    /// Forget cached values; the next query recomputes them.
    fn invalidate_cache(&mut self);
}
