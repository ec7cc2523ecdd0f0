//! 页面生命周期与异步任务
//!
//! - `PageScope`: 页面卸载后失效，迟到的异步结果与定时回调不再写入页面状态
//! - `InFlight`: 每个控件一个在途标记，请求未完成时禁止重复提交
//! - `TimerBackend`: 延时回调的调度方式，浏览器中为 `setTimeout`

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;

// ============================================================================
// 定时器后端
// ============================================================================

/// 定时器后端
pub trait TimerBackend: Send + Sync {
    fn schedule(&self, delay: Duration, f: Box<dyn FnOnce() + Send>);
}

/// 浏览器 `setTimeout`
pub struct BrowserTimer;

impl TimerBackend for BrowserTimer {
    fn schedule(&self, delay: Duration, f: Box<dyn FnOnce() + Send>) {
        set_timeout(f, delay);
    }
}

/// Context 中的定时器，未提供时使用 `BrowserTimer`
#[derive(Clone)]
pub struct Timers(Arc<dyn TimerBackend>);

impl Timers {
    pub fn new(backend: Arc<dyn TimerBackend>) -> Self {
        Self(backend)
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new(Arc::new(BrowserTimer))
    }
}

// ============================================================================
// 页面作用域
// ============================================================================

/// 页面作用域
#[derive(Clone)]
pub struct PageScope {
    alive: Arc<AtomicBool>,
    timers: Timers,
}

impl Default for PageScope {
    fn default() -> Self {
        Self::new()
    }
}

impl PageScope {
    /// 创建独立的作用域（不绑定组件）
    pub fn new() -> Self {
        Self::with_timers(Timers::default())
    }

    pub fn with_timers(timers: Timers) -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            timers,
        }
    }

    /// 绑定到当前组件：组件卸载时自动失效
    pub fn attach() -> Self {
        let scope = Self::with_timers(use_context::<Timers>().unwrap_or_default());
        let closing = scope.clone();
        on_cleanup(move || closing.close());
        scope
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn close(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// 页面仍存活时才把结果交给 `apply`，返回是否已交付
    pub fn deliver<T>(&self, value: T, apply: impl FnOnce(T)) -> bool {
        if self.is_alive() {
            apply(value);
            true
        } else {
            log!("[Page] page already closed, dropping late result");
            false
        }
    }

    /// 在当前线程运行异步任务，完成后经 `deliver` 回写
    pub fn spawn<F, T>(&self, fut: F, apply: impl FnOnce(T) + 'static)
    where
        F: Future<Output = T> + 'static,
        T: 'static,
    {
        let scope = self.clone();
        spawn_local(async move {
            let value = fut.await;
            scope.deliver(value, apply);
        });
    }

    /// 延时执行，页面已卸载则跳过
    pub fn after(&self, delay: Duration, f: impl FnOnce() + Send + 'static) {
        let scope = self.clone();
        self.timers.0.schedule(
            delay,
            Box::new(move || {
                scope.deliver((), |_| f());
            }),
        );
    }
}

/// 在途请求标记
#[derive(Debug, Clone, Copy)]
pub struct InFlight(RwSignal<bool>);

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

impl InFlight {
    pub fn new() -> Self {
        Self(RwSignal::new(false))
    }

    /// 响应式读取，用于按钮的 disabled 状态
    pub fn is_pending(&self) -> bool {
        self.0.get()
    }

    /// 开始一次请求；已有请求在途时返回 `None`
    pub fn begin(&self) -> Option<InFlightGuard> {
        if self.0.get_untracked() {
            return None;
        }
        self.0.set(true);
        Some(InFlightGuard(self.0))
    }
}

/// drop 时清除在途标记
#[derive(Debug)]
pub struct InFlightGuard(RwSignal<bool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        // 页面已卸载时信号可能已被回收
        let _ = self.0.try_set(false);
    }
}

// ============================================================================
// 测试工具: ManualTimer
// ============================================================================

#[cfg(test)]
pub use manual::ManualTimer;


#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn closed_scope_drops_results() {
        let scope = PageScope::new();
        let applied = Cell::new(0);

        assert!(scope.deliver(1, |v| applied.set(v)));
        scope.clone().close();
        assert!(!scope.deliver(2, |v| applied.set(v)));
        assert_eq!(applied.get(), 1);
    }

    #[test]
    fn in_flight_blocks_duplicate_submission() {
        let owner = Owner::new();
        owner.set();

        let pending = InFlight::new();
        let guard = pending.begin();
        assert!(guard.is_some());
        assert!(pending.begin().is_none());

        drop(guard);
        assert!(!pending.0.get_untracked());
        assert!(pending.begin().is_some());
    }

    #[test]
    fn delayed_callback_runs_only_while_page_is_alive() {
        let timer = ManualTimer::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let scope = PageScope::with_timers(Timers::new(timer.clone()));
        let counter = fired.clone();
        scope.after(Duration::from_millis(1500), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(timer.delays(), vec![Duration::from_millis(1500)]);
        assert_eq!(timer.fire_all(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let counter = fired.clone();
        scope.after(Duration::from_millis(1500), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        scope.close();
        assert_eq!(timer.fire_all(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn attached_scope_closes_on_cleanup() {
        let owner = Owner::new();
        let scope = owner.with(PageScope::attach);
        assert!(scope.is_alive());

        owner.cleanup();
        assert!(!scope.is_alive());
    }
}
