//! Pooled temporary render targets.
//!
//! The selection-outline stage needs a scratch color target each frame.
//! Acquisition is closure-scoped so a target can never leak past the hook
//! invocation that took it, even when the stage body fails.

/// Texture format of a pooled target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    #[default]
    Rgba8,
    Depth32,
}

/// Size and format of a render target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TargetDesc {
    pub width: u32,
    pub height: u32,
    pub format: TargetFormat,
}

impl TargetDesc {
    pub fn color(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            format: TargetFormat::Rgba8,
        }
    }
}

/// Handle to a render target owned by the pool or the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// A pooled render target.
#[derive(Clone, Copy, Debug)]
pub struct RenderTarget {
    pub id: TargetId,
    pub desc: TargetDesc,
}

/// Fixed-capacity pool of temporary render targets.
///
/// `capacity` bounds the *live* (handed-out) targets, not the lifetime total;
/// a released target returns its capacity and a stale-desc free target is
/// evicted rather than left pinning the pool (viewport resizes would
/// otherwise exhaust it permanently).
#[derive(Debug)]
pub struct RenderTargetPool {
    free: Vec<RenderTarget>,
    live: usize,
    capacity: usize,
    next_id: u64,
}

impl RenderTargetPool {
    /// Pool that will hand out at most `capacity` targets at a time.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            free: Vec::new(),
            live: 0,
            capacity,
            next_id: 1,
        }
    }

    /// Number of targets currently sitting in the free list.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of targets currently handed out.
    pub fn live_count(&self) -> usize {
        self.live
    }

    fn acquire(&mut self, desc: TargetDesc) -> Option<RenderTarget> {
        if self.live >= self.capacity {
            return None;
        }
        if let Some(pos) = self.free.iter().position(|t| t.desc == desc) {
            self.live += 1;
            return Some(self.free.swap_remove(pos));
        }
        // No reusable target; make room by dropping one with a stale desc.
        if self.live + self.free.len() >= self.capacity {
            self.free.pop();
        }
        self.live += 1;
        let target = RenderTarget {
            id: TargetId(self.next_id),
            desc,
        };
        self.next_id += 1;
        Some(target)
    }

    fn release(&mut self, target: RenderTarget) {
        debug_assert!(self.live > 0, "release without a matching acquire");
        self.live = self.live.saturating_sub(1);
        self.free.push(target);
    }

    /// Run `f` with a temporary target, releasing it back to the pool
    /// afterwards regardless of the closure's outcome.
    ///
    /// Returns `None` when the pool is exhausted; callers degrade rather
    /// than fail the frame.
    pub fn with_temporary<R>(
        &mut self,
        desc: TargetDesc,
        f: impl FnOnce(&mut Self, RenderTarget) -> R,
    ) -> Option<R> {
        let target = self.acquire(desc)?;
        let result = f(self, target);
        self.release(target);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_acquire_release() {
        let mut pool = RenderTargetPool::with_capacity(2);
        let desc = TargetDesc::color(64, 64);

        let id = pool.with_temporary(desc, |pool, target| {
            assert_eq!(pool.free_count(), 0);
            assert_eq!(pool.live_count(), 1);
            target.id
        });
        assert!(id.is_some());
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.live_count(), 0);

        // Reacquisition reuses the released target
        let id2 = pool.with_temporary(desc, |_, target| target.id).unwrap();
        assert_eq!(Some(id2), id);
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_released_even_when_closure_errors() {
        let mut pool = RenderTargetPool::with_capacity(1);
        let desc = TargetDesc::color(64, 64);

        let result: Option<Result<(), &str>> =
            pool.with_temporary(desc, |_, _| Err("copy failed"));
        assert!(matches!(result, Some(Err(_))));
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_exhaustion_returns_none() {
        let mut pool = RenderTargetPool::with_capacity(0);
        assert!(pool
            .with_temporary(TargetDesc::color(8, 8), |_, _| ())
            .is_none());
    }

    #[test]
    fn test_mismatched_desc_allocates_fresh() {
        let mut pool = RenderTargetPool::with_capacity(2);
        pool.with_temporary(TargetDesc::color(64, 64), |_, _| ());
        let got = pool.with_temporary(TargetDesc::color(128, 128), |_, target| target.desc);
        assert_eq!(got.unwrap().width, 128);
    }

    #[test]
    fn test_release_returns_capacity() {
        // A released target must not keep consuming capacity.
        let mut pool = RenderTargetPool::with_capacity(1);
        let desc = TargetDesc::color(64, 64);
        for _ in 0..3 {
            assert!(pool.with_temporary(desc, |_, _| ()).is_some());
        }
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_stale_desc_is_evicted_not_pinned() {
        // A stream of distinct descs (viewport resizes) must keep working
        // and must not grow the free list without bound.
        let mut pool = RenderTargetPool::with_capacity(1);
        for size in [64, 128, 256, 512] {
            let got = pool.with_temporary(TargetDesc::color(size, size), |_, target| target.desc);
            assert_eq!(got.unwrap().width, size);
        }
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.free_count() + pool.live_count(), 1);
    }
}
