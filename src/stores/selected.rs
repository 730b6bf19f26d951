//! 选中记录的持久化镜像
//!
//! 每种实体一个固定存储键，把"当前选中"的那一条记录镜像到
//! 持久化存储：跳去编辑页再回来，列表页依然知道选中了哪一行，
//! 进程重启后也能恢复。
//!
//! 写入时接收拥有所有权的不可变快照——深拷贝由构造保证，
//! 不存在响应式代理别名问题。

use crate::logging::log_warn;
use crate::web::storage::KeyValueStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;

/// 单条记录的持久化槽位
pub struct SelectedSlot<S: KeyValueStore> {
    storage: Rc<S>,
    key: &'static str,
}

impl<S: KeyValueStore> SelectedSlot<S> {
    pub fn new(storage: Rc<S>, key: &'static str) -> Self {
        Self { storage, key }
    }

    /// 序列化写入持久化存储
    ///
    /// 序列化失败只记录警告：内存侧的选中状态仍然成立，
    /// 丢掉的只是跨会话连续性。
    pub fn persist<T: Serialize>(&self, record: &T) {
        match serde_json::to_string(record) {
            Ok(json) => {
                self.storage.set(self.key, &json);
            }
            Err(e) => {
                log_warn!("[Store] 选中记录序列化失败 ({}): {}", self.key, e);
            }
        }
    }

    /// 从持久化存储读回
    ///
    /// 键不存在返回 `None`。持久化数据损坏（外部篡改、版本漂移）
    /// 时按缺失处理并告警，不让一个坏键卡死页面。
    pub fn restore<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.storage.get(self.key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log_warn!("[Store] 持久化的选中记录已损坏，按缺失处理 ({}): {}", self.key, e);
                None
            }
        }
    }

    pub fn clear(&self) {
        self.storage.remove(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::MemoryStore;
    use dormdesk_shared::Room;

    fn room() -> Room {
        Room {
            id: 7,
            number: "204".to_string(),
            floor: 2,
            room_type_id: 1,
            capacity: 4,
            occupied: 3,
            notes: Some("靠楼梯".to_string()),
        }
    }

    #[test]
    fn persist_then_restore_round_trips() {
        let storage = Rc::new(MemoryStore::new());
        let slot = SelectedSlot::new(storage.clone(), "test_selected_room");

        let original = room();
        slot.persist(&original);

        // 新的槽位实例（模拟进程重启）恢复出深等价的值
        let fresh = SelectedSlot::new(storage, "test_selected_room");
        let restored: Room = fresh.restore().unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn clear_removes_persisted_value() {
        let storage = Rc::new(MemoryStore::new());
        let slot = SelectedSlot::new(storage.clone(), "test_selected_room");

        slot.persist(&room());
        slot.clear();

        assert!(!storage.contains("test_selected_room"));
        assert_eq!(slot.restore::<Room>(), None);
    }

    #[test]
    fn corrupted_payload_fails_soft() {
        let storage = Rc::new(MemoryStore::new());
        storage.seed("test_selected_room", "{not json at all");
        let slot = SelectedSlot::new(storage, "test_selected_room");

        assert_eq!(slot.restore::<Room>(), None);
    }

    #[test]
    fn restore_without_prior_write_is_absent() {
        let storage = Rc::new(MemoryStore::new());
        let slot = SelectedSlot::new(storage, "test_selected_room");
        assert_eq!(slot.restore::<Room>(), None);
    }
}
