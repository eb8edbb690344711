use std::sync::Arc;

use tooldeck::{AuthBroadcaster, FixedClock, Identity, ToolStore, backend::InMemory};

/// Creates a store over a fresh in-memory backend with a deterministic
/// clock. The backend handle is returned alongside for direct inspection
/// and fault injection.
pub fn test_store() -> (ToolStore, InMemory) {
    let backend = InMemory::new();
    let store = ToolStore::with_clock(
        Arc::new(backend.clone()),
        Arc::new(FixedClock::default()),
    );
    (store, backend)
}

/// Creates a broadcaster over a fresh test store.
pub fn test_broadcaster() -> (AuthBroadcaster, ToolStore, InMemory) {
    let (store, backend) = test_store();
    let broadcaster = AuthBroadcaster::new(store.clone());
    (broadcaster, store, backend)
}

/// An identity with display attributes filled in.
pub fn identity(uid: &str) -> Identity {
    Identity::new(uid)
        .with_display_name("Ada Lovelace")
        .with_email("ada@example.com")
        .with_company("Analytical Engines")
}
