//! Application state shared across all pages.

use cumulus::Store;

/// The cloud store: a named counter and its doubled value.
///
/// Fields are private to this module, so `increment` is the only way to
/// change the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudStore {
    cloud_name: String,
    cloud_count: i64,
}

impl Store for CloudStore {
    const ID: &'static str = "cloud";

    fn init() -> Self {
        Self {
            cloud_name: "뭉게구름".to_string(),
            cloud_count: 5,
        }
    }
}

impl CloudStore {
    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    pub fn cloud_count(&self) -> i64 {
        self.cloud_count
    }

    /// Always `2 * cloud_count`, computed on read.
    pub fn double_cloud_count(&self) -> i64 {
        self.cloud_count * 2
    }

    pub fn increment(&mut self) {
        self.cloud_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cumulus::{AppConfig, AppContext};

    #[test]
    fn test_fresh_store() {
        let store = CloudStore::init();
        assert_eq!(store.cloud_name(), "뭉게구름");
        assert_eq!(store.cloud_count(), 5);
        assert_eq!(store.double_cloud_count(), 10);
    }

    #[test]
    fn test_single_increment() {
        let mut store = CloudStore::init();
        store.increment();
        assert_eq!(store.cloud_count(), 6);
        assert_eq!(store.double_cloud_count(), 12);
    }

    #[test]
    fn test_five_increments() {
        let mut store = CloudStore::init();
        for _ in 0..5 {
            store.increment();
        }
        assert_eq!(store.cloud_count(), 10);
        assert_eq!(store.double_cloud_count(), 20);
    }

    #[test]
    fn test_count_tracks_increments_and_double_never_drifts() {
        let mut store = CloudStore::init();
        for n in 0..200 {
            assert_eq!(store.cloud_count(), 5 + n);
            assert_eq!(store.double_cloud_count(), 2 * store.cloud_count());
            store.increment();
        }
    }

    #[test]
    fn test_reads_do_not_change_state() {
        let store = CloudStore::init();
        let before = store.clone();
        for _ in 0..10 {
            let _ = store.cloud_count();
            let _ = store.double_cloud_count();
            let _ = store.cloud_name();
        }
        assert_eq!(store, before);
    }

    #[test]
    fn test_session_store_is_shared_and_lazy() {
        let (cx, _rx) = AppContext::new(AppConfig::default());
        let a = cx.use_store::<CloudStore>().unwrap();
        let b = cx.use_store::<CloudStore>().unwrap();

        a.update(CloudStore::increment).unwrap();
        assert_eq!(b.read(CloudStore::cloud_count).unwrap(), 6);
        assert_eq!(b.read(CloudStore::double_cloud_count).unwrap(), 12);
    }

    #[test]
    fn test_observers_follow_every_increment() {
        let (cx, _rx) = AppContext::new(AppConfig::default());
        let store = cx.use_store::<CloudStore>().unwrap();
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        let sink = std::sync::Arc::clone(&seen);
        let _sub = store
            .observe(move |s| sink.lock().unwrap().push((s.cloud_count(), s.double_cloud_count())))
            .unwrap();
        for _ in 0..3 {
            store.update(CloudStore::increment).unwrap();
        }

        assert_eq!(*seen.lock().unwrap(), vec![(6, 12), (7, 14), (8, 16)]);
    }
}
