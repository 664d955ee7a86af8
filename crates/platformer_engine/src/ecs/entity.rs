//! Entity implementation

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Generational: once an entity is despawned its identifier is never
    /// reported alive again, even when the slot is reused.
    pub struct Entity;
}
