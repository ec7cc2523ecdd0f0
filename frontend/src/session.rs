//! 会话存储模块
//!
//! 对持久化键值存储的显式封装，取代直接访问全局 `localStorage`：
//! 路由与页面通过 Context 拿到同一个 `SessionStore`，测试中可替换为内存实现。

use crate::web::LocalStorage;
use budgetwise_shared::{
    SESSION_KEYS, STORAGE_USER_ID_KEY, STORAGE_USER_NAME_KEY, Session, UserId,
};
use leptos::logging::warn;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// 持久化键值存储后端
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    /// 写入成功返回 `true`
    fn set(&self, key: &str, value: &str) -> bool;
    /// 删除成功（或键本不存在）返回 `true`
    fn remove(&self, key: &str) -> bool;
}

/// 内存存储
///
/// 浏览器存储不可用时的后备实现，也用于测试。
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries().insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries().remove(key);
        true
    }
}

/// 会话存储服务
///
/// 只是本地缓存：没有过期时间，也不向服务器校验，直到显式 `clear()`。
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// 浏览器环境：优先使用 LocalStorage，不可用时退回内存存储
    pub fn browser() -> Self {
        if LocalStorage::is_available() {
            Self::new(LocalStorage)
        } else {
            warn!("[Session] localStorage unavailable, session will not survive a reload");
            Self::in_memory()
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.backend.get(key)
    }

    pub fn set(&self, key: &str, value: &str) {
        if !self.backend.set(key, value) {
            warn!("[Session] failed to persist key {}", key);
        }
    }

    /// 删除全部会话字段，先删 `user_id`
    pub fn clear(&self) {
        for key in SESSION_KEYS {
            if !self.backend.remove(key) {
                warn!("[Session] failed to remove key {}", key);
            }
        }
    }

    /// 读取完整会话，空字符串视为不存在
    pub fn load(&self) -> Session {
        let user_id = self
            .get(STORAGE_USER_ID_KEY)
            .map(UserId::new)
            .filter(|id| !id.is_empty());
        let user_name = self
            .get(STORAGE_USER_NAME_KEY)
            .filter(|name| !name.trim().is_empty());
        Session { user_id, user_name }
    }

    /// 两次独立写入：先 `user_id` 再 `user_name`，不保证原子性
    pub fn save(&self, session: &Session) {
        match &session.user_id {
            Some(id) => self.set(STORAGE_USER_ID_KEY, id.as_str()),
            None => {
                self.backend.remove(STORAGE_USER_ID_KEY);
            }
        }
        self.set_user_name(session.user_name.as_deref());
    }

    /// 缓存（或清除）用户名
    pub fn set_user_name(&self, name: Option<&str>) {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => self.set(STORAGE_USER_NAME_KEY, name),
            None => {
                self.backend.remove(STORAGE_USER_NAME_KEY);
            }
        }
    }
}

#[cfg(test)]
impl SessionStore {
    pub fn user_id(&self) -> Option<UserId> {
        self.load().user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.load().is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_is_unauthenticated() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());
        assert_eq!(store.load(), Session::default());
    }

    #[test]
    fn set_is_visible_to_later_reads() {
        let store = SessionStore::in_memory();
        store.set(STORAGE_USER_ID_KEY, "17");
        assert_eq!(store.get(STORAGE_USER_ID_KEY).as_deref(), Some("17"));
        assert!(store.is_authenticated());

        // 克隆共享同一个后端
        let other = store.clone();
        assert_eq!(other.user_id(), Some(UserId::from(17)));
    }

    #[test]
    fn blank_user_id_does_not_authenticate() {
        let store = SessionStore::in_memory();
        store.set(STORAGE_USER_ID_KEY, "   ");
        assert!(!store.is_authenticated());
        assert_eq!(store.user_id(), None);
    }

    #[test]
    fn save_then_load_round_trips_name() {
        let store = SessionStore::in_memory();
        store.save(&Session::new(UserId::from(5), Some("Ada".to_string())));
        let session = store.load();
        assert_eq!(session.user_id, Some(UserId::from(5)));
        assert_eq!(session.display_name(), Some("Ada"));
    }

    #[test]
    fn clear_removes_every_session_field_and_is_idempotent() {
        let store = SessionStore::in_memory();
        store.save(&Session::new(UserId::from(5), Some("Ada".to_string())));
        store.clear();
        assert_eq!(store.get(STORAGE_USER_ID_KEY), None);
        assert_eq!(store.get(STORAGE_USER_NAME_KEY), None);
        store.clear();
        assert_eq!(store.load(), Session::default());
    }

    #[test]
    fn clear_leaves_unrelated_keys() {
        let store = SessionStore::in_memory();
        store.set("theme", "dark");
        store.set(STORAGE_USER_ID_KEY, "1");
        store.clear();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }
}
