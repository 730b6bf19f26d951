//! 持久化键值存储
//!
//! 以 trait 的形式抽象浏览器 LocalStorage，
//! 会话与资源缓存通过该接口读写，测试注入内存实现即可。

/// 键值存储接口
///
/// 所有值都是字符串（JSON 序列化在调用方完成）。
/// 读写失败以 `None` / `false` 表达，不抛异常：
/// 浏览器禁用存储时应用照常运行，只是失去跨会话连续性。
pub trait KeyValueStore {
    /// 获取存储的字符串值；键不存在或发生错误返回 `None`
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值；返回操作是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除键值对；返回操作是否成功
    fn remove(&self, key: &str) -> bool;
}

// =========================================================
// 实现层: 浏览器 LocalStorage (Production)
// =========================================================

/// 浏览器 LocalStorage 封装
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

// =========================================================
// 实现层: 内存存储 (Tests)
// =========================================================

/// 测试用内存存储，模拟 LocalStorage 的键值语义
#[cfg(test)]
pub struct MemoryStore {
    map: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self {
            map: std::cell::RefCell::new(std::collections::HashMap::new()),
        }
    }

    /// 预置一个键值（模拟上一次会话留下的持久化状态）
    pub fn seed(&self, key: &str, value: &str) {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.borrow().contains_key(key)
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.map
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.map.borrow_mut().remove(key).is_some()
    }
}
