//! Ordered mapping with caller-chosen string indexes.

use kstring::KString;

/// Entries keep insertion order; re-setting an existing index replaces
/// the value but keeps the original position.
#[derive(Debug, Clone)]
pub struct IndexedMap<T> {
    entries: Vec<(KString, T)>,
}

impl<T> Default for IndexedMap<T> {
    fn default() -> Self {
        IndexedMap { entries: Vec::new() }
    }
}

impl<T> IndexedMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, index: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.as_str() == index)
    }

    pub fn set(&mut self, index: impl Into<KString>, value: T) {
        let index = index.into();
        match self.position(&index) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((index, value)),
        }
    }

    pub fn get(&self, index: &str) -> Option<&T> {
        self.position(index).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, index: &str) -> Option<&mut T> {
        self.position(index).map(move |i| &mut self.entries[i].1)
    }

    pub fn remove(&mut self, index: &str) -> Option<T> {
        self.position(index).map(|i| self.entries.remove(i).1)
    }

    // One past the highest numerical index in use; non-numerical
    // indexes don't participate.
    fn next_positional(&self) -> KString {
        let next = self
            .entries
            .iter()
            .filter_map(|(k, _)| k.parse::<usize>().ok())
            .map(|n| n + 1)
            .max()
            .unwrap_or(0);
        KString::from_string(next.to_string())
    }

    /// Appends under the next free numerical index, which is returned.
    pub fn append(&mut self, value: T) -> KString {
        let index = self.next_positional();
        self.entries.push((index.clone(), value));
        index
    }

    /// Inserts at the front under the next free numerical index, which
    /// is returned.
    pub fn prepend(&mut self, value: T) -> KString {
        let index = self.next_positional();
        self.entries.insert(0, (index.clone(), value));
        index
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KString, &T)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<&T> {
        self.entries.first().map(|(_, v)| v)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_insertion_order_and_overwrite() {
        let mut m: IndexedMap<u32> = IndexedMap::new();
        m.set("b", 1);
        m.set("a", 2);
        m.set("c", 3);
        m.set("a", 20); // overwrites, keeps position
        let keys: Vec<&str> = m.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(m.get("a"), Some(&20));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn t_remove_then_readd_appends() {
        let mut m: IndexedMap<u32> = IndexedMap::new();
        m.set("x", 1);
        m.set("y", 2);
        assert_eq!(m.remove("x"), Some(1));
        m.set("x", 3);
        let keys: Vec<&str> = m.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["y", "x"]);
    }

    #[test]
    fn t_append_prepend_numbering() {
        let mut m: IndexedMap<&str> = IndexedMap::new();
        assert_eq!(m.append("first").as_str(), "0");
        assert_eq!(m.append("second").as_str(), "1");
        assert_eq!(m.prepend("zeroth").as_str(), "2");
        let values: Vec<&str> = m.values().copied().collect();
        assert_eq!(values, vec!["zeroth", "first", "second"]);
    }
}
