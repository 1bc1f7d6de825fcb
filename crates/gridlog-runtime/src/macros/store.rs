#![forbid(unsafe_code)]

//! In-memory macro catalog.

use crate::ids::MacroId;

use super::macro_action::MacroItem;

/// Failure to add a macro to the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacroStoreError {
    #[error("a macro with id {0} is already stored")]
    DuplicateId(MacroId),
}

/// Recorded macros, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MacroStore {
    macros: Vec<MacroItem>,
}

impl MacroStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `candidate` if unused, otherwise the first free `"{candidate} N"`
    /// for N = 0, 1, 2, ...
    #[must_use]
    pub fn get_valid_name(&self, candidate: &str) -> String {
        if !self.contains_name(candidate) {
            return candidate.to_string();
        }
        (0u64..)
            .map(|n| format!("{candidate} {n}"))
            .find(|name| !self.contains_name(name))
            .unwrap_or_else(|| candidate.to_string())
    }

    fn contains_name(&self, name: &str) -> bool {
        self.macros.iter().any(|m| m.name() == name)
    }

    /// Store a macro. Existing entries are never replaced.
    pub fn add(&mut self, item: MacroItem) -> Result<MacroId, MacroStoreError> {
        let id = item.id();
        if self.get_by_id(id).is_some() {
            return Err(MacroStoreError::DuplicateId(id));
        }
        tracing::debug!(
            target: "gridlog.macros",
            macro_event = "stored",
            id = id.raw(),
            name = %item.name(),
            steps = item.len(),
        );
        self.macros.push(item);
        Ok(id)
    }

    #[must_use]
    pub fn get_by_id(&self, id: MacroId) -> Option<&MacroItem> {
        self.macros.iter().find(|m| m.id() == id)
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&MacroItem> {
        self.macros.iter().find(|m| m.name() == name)
    }

    #[must_use]
    pub fn list(&self) -> &[MacroItem] {
        &self.macros
    }

    pub fn remove(&mut self, id: MacroId) -> Option<MacroItem> {
        let index = self.macros.iter().position(|m| m.id() == id)?;
        Some(self.macros.remove(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::offset::ReferenceMode;

    fn item(id: u64, name: &str) -> MacroItem {
        MacroItem::new(
            MacroId(id),
            name.to_string(),
            "tester".to_string(),
            ReferenceMode::Relative,
            Vec::new(),
        )
    }

    #[test]
    fn test_valid_name_appends_counter() {
        let mut store = MacroStore::new();
        assert_eq!(store.get_valid_name("Totals"), "Totals");
        store.add(item(1, "Totals")).unwrap();
        assert_eq!(store.get_valid_name("Totals"), "Totals 0");
        store.add(item(2, "Totals 0")).unwrap();
        assert_eq!(store.get_valid_name("Totals"), "Totals 1");
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = MacroStore::new();
        store.add(item(1, "a")).unwrap();
        assert_eq!(
            store.add(item(1, "b")),
            Err(MacroStoreError::DuplicateId(MacroId(1)))
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_id(MacroId(1)).map(MacroItem::name), Some("a"));
    }

    #[test]
    fn test_list_remove() {
        let mut store = MacroStore::new();
        store.add(item(1, "a")).unwrap();
        store.add(item(2, "b")).unwrap();
        let names: Vec<_> = store.list().iter().map(MacroItem::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(store.remove(MacroId(1)).is_some());
        assert!(store.remove(MacroId(1)).is_none());
        assert_eq!(store.get_by_name("b").map(MacroItem::id), Some(MacroId(2)));
        assert!(!store.is_empty());
    }
}
