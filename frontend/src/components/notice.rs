//! 通知提示框

use std::time::Duration;

use leptos::prelude::*;

use crate::web::task::PageScope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    fn alert_class(&self) -> &'static str {
        match self {
            NoticeKind::Info => "alert alert-info shadow-lg",
            NoticeKind::Success => "alert alert-success shadow-lg",
            NoticeKind::Error => "alert alert-error shadow-lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// 页面上的一个通知位
///
/// 每次 `flash` 递增序号，旧的定时器只会清除自己显示的那条通知。
#[derive(Clone, Copy)]
pub struct NoticeSlot {
    current: RwSignal<Option<Notice>>,
    seq: RwSignal<u64>,
}

impl Default for NoticeSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl NoticeSlot {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            seq: RwSignal::new(0),
        }
    }

    pub fn get(&self) -> Option<Notice> {
        self.current.get()
    }

    fn push(&self, notice: Notice) -> u64 {
        self.seq.update(|s| *s += 1);
        self.current.set(Some(notice));
        self.seq.get_untracked()
    }

    /// 常驻显示，直到下一次 `show`/`flash`/`clear`
    pub fn show(&self, notice: Notice) {
        self.push(notice);
    }

    /// 显示并在 `duration` 后自动消失
    pub fn flash(&self, scope: &PageScope, notice: Notice, duration: Duration) {
        let id = self.push(notice);
        let slot = *self;
        scope.after(duration, move || slot.expire(id));
    }

    /// 仅当 `id` 仍是当前通知时清除
    fn expire(&self, id: u64) {
        if self.seq.get_untracked() == id {
            self.current.set(None);
        }
    }

    pub fn clear(&self) {
        self.seq.update(|s| *s += 1);
        self.current.set(None);
    }
}

/// 右上角的浮动提示
#[component]
pub fn NoticeToast(notice: NoticeSlot) -> impl IntoView {
    view! {
        {move || {
            notice.get()
                .map(|notice| {
                    view! {
                        <div class="toast toast-top toast-end z-50">
                            <div class=notice.kind.alert_class()>
                                <span>{notice.message}</span>
                            </div>
                        </div>
                    }
                })
        }}
    }
}

/// 表单内联提示
#[component]
pub fn InlineNotice(notice: NoticeSlot) -> impl IntoView {
    view! {
        {move || {
            notice.get()
                .map(|notice| {
                    view! {
                        <div role="alert" class=format!("{} text-sm py-2", notice.kind.alert_class())>
                            <span>{notice.message}</span>
                        </div>
                    }
                })
        }}
    }
}
