//! Process-global string interning for node names, ids, classes and regions.
//!
//! Every distinct string is stored once; an [`Atom`] is a reference-counted
//! handle to that single copy, so equality and hashing only look at the
//! pointer.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

static INTERNER: Lazy<Mutex<HashSet<Arc<str>>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// An interned string.
#[derive(Clone)]
pub struct Atom(Arc<str>);

impl Atom {
    /// Intern `s`, returning the shared handle.
    pub fn new(s: &str) -> Atom {
        // A poisoned lock only means another thread panicked mid-insert; the
        // set itself is still consistent.
        let mut set = INTERNER.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(existing) = set.get(s) {
            return Atom(Arc::clone(existing));
        }
        let interned: Arc<str> = Arc::from(s);
        set.insert(Arc::clone(&interned));
        Atom(interned)
    }

    /// Look up `s` without interning it.
    pub fn try_get(s: &str) -> Option<Atom> {
        let set = INTERNER.lock().unwrap_or_else(|e| e.into_inner());
        set.get(s).map(|existing| Atom(Arc::clone(existing)))
    }

    /// The interned text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as *const u8 as usize).hash(state);
    }
}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by text, so sorted class sets read alphabetically.
impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else {
            self.as_str().cmp(other.as_str())
        }
    }
}

impl PartialEq<str> for Atom {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Deref for Atom {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Atom {
        Atom::new(s)
    }
}

impl From<&String> for Atom {
    fn from(s: &String) -> Atom {
        Atom::new(s)
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Atom {
        Atom::new(&s)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_pointer() {
        let a = Atom::new("button");
        let b = Atom::from(String::from("button"));
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn different_text_not_equal() {
        assert_ne!(Atom::new("check"), Atom::new("radio"));
    }

    #[test]
    fn try_get_does_not_intern() {
        assert!(Atom::try_get("intern-test-never-seen-before").is_none());
        let a = Atom::new("intern-test-seen");
        assert_eq!(Atom::try_get("intern-test-seen"), Some(a));
    }

    #[test]
    fn ordering_is_alphabetical() {
        let mut atoms = vec![Atom::new("zeta"), Atom::new("alpha"), Atom::new("mid")];
        atoms.sort();
        let names: Vec<&str> = atoms.iter().map(Atom::as_str).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn compares_with_str() {
        let a = Atom::new("label");
        assert!(a == "label");
        assert_eq!(&*a, "label");
        assert_eq!(a.to_string(), "label");
    }
}
