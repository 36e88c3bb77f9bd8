use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock, Weak};
use tokio::sync::watch;

/// Global counter for generating unique entity IDs.
static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for an entity across the application.
/// Guaranteed to be unique across the entire application lifetime.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(NonZeroU64);

impl EntityId {
    /// Generate a new unique EntityId.
    ///
    /// # Panics
    /// Panics if more than 2^64-1 entities are created.
    fn next() -> Self {
        let id = NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed);
        // The counter starts at 1 and only increments, so it's never zero.
        Self(NonZeroU64::new(id).unwrap_or_else(|| {
            panic!("EntityId overflow: created more than 2^64-1 entities")
        }))
    }

    /// Get the raw u64 value.
    pub fn as_u64(&self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Debug for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared state wrapper with RwLock.
/// Allows multiple concurrent readers or one exclusive writer.
pub type SharedState<T> = Arc<RwLock<T>>;

type ObserverFn<T> = Box<dyn FnMut(&T) + Send>;

/// Synchronous observers of one entity, called in registration order.
///
/// While a dispatch runs, `list` is taken out and only holds observers added
/// during the dispatch; removals are recorded in `removed` and applied when
/// the dispatched list is put back.
struct Observers<T: ?Sized> {
    next_id: u64,
    list: Vec<(u64, ObserverFn<T>)>,
    dispatching: bool,
    removed: Vec<u64>,
}

impl<T: ?Sized> Observers<T> {
    fn remove(&mut self, key: u64) {
        self.list.retain(|(id, _)| *id != key);
        if self.dispatching {
            self.removed.push(key);
        }
    }
}

type SharedObservers<T> = Arc<Mutex<Observers<T>>>;

/// Entity handle, inspired by GPUI.
/// Each entity has a unique ID and can be observed or subscribed to for change notifications.
pub struct Entity<T: Send + Sync> {
    id: EntityId,
    pub(crate) inner: SharedState<T>,
    observers: SharedObservers<T>,
    tx: watch::Sender<()>,
}

/// A weak handle to an entity.
pub struct WeakEntity<T: Send + Sync> {
    id: EntityId,
    pub(crate) inner: Weak<RwLock<T>>,
    observers: SharedObservers<T>,
    tx: watch::Sender<()>,
}

/// Keeps an observer registered. Dropping it unregisters the observer.
#[must_use = "the observer is removed as soon as the subscription is dropped"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Keep the observer registered for the rest of the entity's life.
    pub fn detach(mut self) {
        self.unsubscribe.take();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl<T: Send + Sync + 'static> Entity<T> {
    /// Create a new entity with the given initial value.
    pub fn new(value: T) -> Self {
        let (tx, _) = watch::channel(());
        Self {
            id: EntityId::next(),
            inner: Arc::new(RwLock::new(value)),
            observers: Arc::new(Mutex::new(Observers {
                next_id: 0,
                list: Vec::new(),
                dispatching: false,
                removed: Vec::new(),
            })),
            tx,
        }
    }

    /// Get the unique ID of this entity.
    pub fn entity_id(&self) -> EntityId {
        self.id
    }

    /// Update the inner value using a closure and notify observers and subscribers.
    ///
    /// Observers run synchronously while the write lock is still held, so
    /// concurrent updates are observed one at a time and in the order they
    /// were applied.
    pub fn update<F, R>(&self, f: F) -> crate::Result<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut guard = self.inner.write().map_err(|_| crate::Error::LockPoisoned)?;
        let res = f(&mut *guard);
        self.notify_observers(&*guard)?;
        drop(guard);
        let _ = self.tx.send(());
        Ok(res)
    }

    /// Read the inner value using a closure.
    pub fn read<F, R>(&self, f: F) -> crate::Result<R>
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.read().map_err(|_| crate::Error::LockPoisoned)?;
        Ok(f(&*guard))
    }

    /// Register a synchronous observer, called with the new value after every update.
    ///
    /// Observers receive the value and must not `read` or `update` the entity
    /// they observe through a handle. They may register further observers or
    /// drop subscriptions; such changes apply from the next update on.
    pub fn observe<F>(&self, f: F) -> crate::Result<Subscription>
    where
        F: FnMut(&T) + Send + 'static,
    {
        let mut observers = self.observers.lock().map_err(|_| crate::Error::LockPoisoned)?;
        let key = observers.next_id;
        observers.next_id += 1;
        observers.list.push((key, Box::new(f)));
        drop(observers);

        let weak = Arc::downgrade(&self.observers);
        Ok(Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(observers) = weak.upgrade() {
                    if let Ok(mut observers) = observers.lock() {
                        observers.remove(key);
                    }
                }
            })),
        })
    }

    /// Subscribe to changes of this entity.
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.tx.subscribe()
    }

    /// Downgrade this entity to a weak handle.
    pub fn downgrade(&self) -> WeakEntity<T> {
        WeakEntity {
            id: self.id,
            inner: Arc::downgrade(&self.inner),
            observers: Arc::clone(&self.observers),
            tx: watch::Sender::clone(&self.tx),
        }
    }

    /// Call every observer with `value`. The caller holds the write lock.
    fn notify_observers(&self, value: &T) -> crate::Result<()> {
        let mut dispatched = {
            let mut observers = self.observers.lock().map_err(|_| crate::Error::LockPoisoned)?;
            observers.dispatching = true;
            std::mem::take(&mut observers.list)
        };

        for (_, observer) in dispatched.iter_mut() {
            observer(value);
        }

        let mut observers = self.observers.lock().map_err(|_| crate::Error::LockPoisoned)?;
        let removed = std::mem::take(&mut observers.removed);
        dispatched.retain(|(id, _)| !removed.contains(id));
        dispatched.append(&mut observers.list);
        observers.list = dispatched;
        observers.dispatching = false;
        Ok(())
    }
}

impl<T: Send + Sync + 'static> WeakEntity<T> {
    /// Get the unique ID of this entity.
    pub fn entity_id(&self) -> EntityId {
        self.id
    }

    /// Upgrade this weak handle to a strong handle, if the entity is still alive.
    pub fn upgrade(&self) -> Option<Entity<T>> {
        self.inner.upgrade().map(|inner| Entity {
            id: self.id,
            inner,
            observers: Arc::clone(&self.observers),
            tx: watch::Sender::clone(&self.tx),
        })
    }

    /// Update the entity if it is still alive.
    pub fn update<F, R>(&self, f: F) -> Option<crate::Result<R>>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.upgrade().map(|entity| entity.update(f))
    }
}

impl<T: Send + Sync> Clone for Entity<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            observers: Arc::clone(&self.observers),
            tx: watch::Sender::clone(&self.tx),
        }
    }
}

impl<T: Send + Sync> Clone for WeakEntity<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Weak::clone(&self.inner),
            observers: Arc::clone(&self.observers),
            tx: watch::Sender::clone(&self.tx),
        }
    }
}
