//! 资源缓存层
//!
//! 每种实体一个 store：缓存最近一次拉取的列表，并把"当前选中"
//! 的单条记录镜像到持久化存储（跨页面导航、跨进程重启保持上下文）。
//! 模式对房间、房型、缴费、学生四种实体各复制一份。

pub mod selected;
pub mod stats;

use crate::web::storage::KeyValueStore;
use leptos::prelude::*;
use selected::SelectedSlot;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::rc::Rc;

// =========================================================
// 持久化键（每种实体一个固定键）
// =========================================================

pub const STORAGE_SELECTED_ROOM: &str = "dormdesk_selected_room";
pub const STORAGE_SELECTED_ROOM_TYPE: &str = "dormdesk_selected_room_type";
pub const STORAGE_SELECTED_PAYMENT: &str = "dormdesk_selected_payment";
pub const STORAGE_SELECTED_STUDENT: &str = "dormdesk_selected_student";

/// 带数值主键的实体（`get_by_id` 线性扫描用）
pub trait Identified {
    fn entity_id(&self) -> u64;
}

impl Identified for dormdesk_shared::Room {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identified for dormdesk_shared::RoomType {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identified for dormdesk_shared::Payment {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identified for dormdesk_shared::Student {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identified for dormdesk_shared::DormGuest {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

impl Identified for dormdesk_shared::Message {
    fn entity_id(&self) -> u64 {
        self.id
    }
}

// =========================================================
// 实体 Store
// =========================================================

/// 单实体资源 store
///
/// 列表与选中项都是信号，视图直接订阅；
/// 选中项同时镜像进持久化槽位，内存副本与持久化副本保持一致。
pub struct EntityStore<T, S>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: KeyValueStore,
{
    pub list: RwSignal<Vec<T>>,
    pub selected: RwSignal<Option<T>>,
    slot: Rc<SelectedSlot<S>>,
}

impl<T, S> Clone for EntityStore<T, S>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: KeyValueStore,
{
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            selected: self.selected,
            slot: self.slot.clone(),
        }
    }
}

impl<T, S> EntityStore<T, S>
where
    T: Clone + Serialize + DeserializeOwned + Identified + Send + Sync + 'static,
    S: KeyValueStore,
{
    pub fn new(storage: Rc<S>, key: &'static str) -> Self {
        Self {
            list: RwSignal::new(Vec::new()),
            selected: RwSignal::new(None),
            slot: Rc::new(SelectedSlot::new(storage, key)),
        }
    }

    /// 缓存最近一次拉取的列表
    pub fn set_list(&self, records: Vec<T>) {
        self.list.set(records);
    }

    /// 线性扫描缓存列表
    pub fn get_by_id(&self, id: u64) -> Option<T> {
        self.list
            .with_untracked(|list| list.iter().find(|r| r.entity_id() == id).cloned())
    }

    /// 记录"当前选中"
    ///
    /// 参数是拥有所有权的快照：内存副本与持久化副本由此保持
    /// 逐字节一致，调用方后续的修改不会透过别名影响缓存。
    pub fn set_selected(&self, record: T) {
        self.slot.persist(&record);
        self.selected.set(Some(record));
    }

    /// 从持久化存储恢复选中项；从未写入过则是 no-op
    pub fn restore_selected(&self) {
        if let Some(value) = self.slot.restore::<T>() {
            self.selected.set(Some(value));
        }
    }

    /// 清除选中项（内存与持久化一起清）
    pub fn clear_selected(&self) {
        self.selected.set(None);
        self.slot.clear();
    }
}

// =========================================================
// wasm 上下文：四个实体 store 的集合
// =========================================================

#[cfg(target_arch = "wasm32")]
pub use app_stores::*;

#[cfg(target_arch = "wasm32")]
mod app_stores {
    use super::*;
    use crate::web::storage::LocalStorage;
    use dormdesk_shared::{Payment, Room, RoomType, Student};

    pub type RoomStore = EntityStore<Room, LocalStorage>;
    pub type RoomTypeStore = EntityStore<RoomType, LocalStorage>;
    pub type PaymentStore = EntityStore<Payment, LocalStorage>;
    pub type StudentStore = EntityStore<Student, LocalStorage>;

    /// 全部资源 store，应用启动时创建一次并放入 Context
    #[derive(Clone)]
    pub struct Stores {
        pub rooms: RoomStore,
        pub room_types: RoomTypeStore,
        pub payments: PaymentStore,
        pub students: StudentStore,
    }

    impl Stores {
        pub fn new(storage: Rc<LocalStorage>) -> Self {
            Self {
                rooms: EntityStore::new(storage.clone(), STORAGE_SELECTED_ROOM),
                room_types: EntityStore::new(storage.clone(), STORAGE_SELECTED_ROOM_TYPE),
                payments: EntityStore::new(storage.clone(), STORAGE_SELECTED_PAYMENT),
                students: EntityStore::new(storage, STORAGE_SELECTED_STUDENT),
            }
        }
    }

    /// 从 Context 获取资源 store 集合
    pub fn use_stores() -> Stores {
        use_context::<Stores>().expect("Stores should be provided")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::MemoryStore;
    use dormdesk_shared::Room;

    fn room(id: u64, number: &str) -> Room {
        Room {
            id,
            number: number.to_string(),
            floor: 1,
            room_type_id: 1,
            capacity: 4,
            occupied: 1,
            notes: None,
        }
    }

    fn store(storage: Rc<MemoryStore>) -> EntityStore<Room, MemoryStore> {
        EntityStore::new(storage, STORAGE_SELECTED_ROOM)
    }

    #[test]
    fn set_clear_restore_yields_absent() {
        let storage = Rc::new(MemoryStore::new());
        let rooms = store(storage);

        rooms.set_selected(room(1, "101"));
        rooms.clear_selected();
        rooms.restore_selected();

        assert_eq!(rooms.selected.get_untracked(), None);
    }

    #[test]
    fn fresh_store_restores_deep_equal_value() {
        let storage = Rc::new(MemoryStore::new());
        let original = room(2, "202");

        store(storage.clone()).set_selected(original.clone());

        // 新实例（模拟进程重启）：恢复出的值与原值深等价，
        // 且是独立的拥有所有权副本
        let fresh = store(storage);
        assert_eq!(fresh.selected.get_untracked(), None);
        fresh.restore_selected();
        assert_eq!(fresh.selected.get_untracked(), Some(original));
    }

    #[test]
    fn restore_without_prior_write_is_noop() {
        let storage = Rc::new(MemoryStore::new());
        let rooms = store(storage);

        rooms.set_selected(room(3, "303"));
        // 槽位被外部清空后，restore 不得覆盖内存里已有的选中项
        rooms.slot.clear();
        rooms.restore_selected();
        assert_eq!(rooms.selected.get_untracked().map(|r| r.id), Some(3));
    }

    #[test]
    fn corrupted_slot_is_treated_as_absent() {
        let storage = Rc::new(MemoryStore::new());
        storage.seed(STORAGE_SELECTED_ROOM, r#"{"id":"not-a-number"}"#);
        let rooms = store(storage);

        rooms.restore_selected();
        assert_eq!(rooms.selected.get_untracked(), None);
    }

    #[test]
    fn memory_and_persisted_copies_agree() {
        let storage = Rc::new(MemoryStore::new());
        let rooms = store(storage.clone());
        let r = room(4, "404");

        rooms.set_selected(r.clone());

        let persisted: Room =
            serde_json::from_str(&storage.get(STORAGE_SELECTED_ROOM).unwrap()).unwrap();
        assert_eq!(persisted, r);
        assert_eq!(rooms.selected.get_untracked(), Some(r));
    }

    #[test]
    fn get_by_id_scans_cached_list() {
        let storage = Rc::new(MemoryStore::new());
        let rooms = store(storage);

        rooms.set_list(vec![room(1, "101"), room(2, "102"), room(3, "103")]);

        assert_eq!(rooms.get_by_id(2).map(|r| r.number), Some("102".to_string()));
        assert_eq!(rooms.get_by_id(99), None);
    }
}
