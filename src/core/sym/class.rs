use std::collections::BTreeSet;

/// Scanner-level alphabet class: a set of input characters compared by
/// value, independent of the symbol namespace.
pub type CharSet = BTreeSet<char>;

pub struct CharClass {
    pub id: usize,
    pub name: String,
    pub set: CharSet,
}

/// Name -> character-set registry with set-identity folding: downstream
/// scanner-table generation assumes one class per distinct character set,
/// so registering an already-present set returns the existing class.
pub struct CharClassRegistry {
    classes: Vec<CharClass>,
    anon_count: usize,
}

impl CharClassRegistry {
    pub fn new() -> CharClassRegistry {
        CharClassRegistry {
            classes: Vec::new(),
            anon_count: 0,
        }
    }

    pub fn register(&mut self, name: &str, set: CharSet) -> usize {
        if let Some(existing) = self.find_by_set(&set) {
            return existing;
        }
        let id = self.classes.len();
        self.classes.push(CharClass {
            id,
            name: name.to_string(),
            set,
        });
        id
    }

    /// Registers a set under a generated placeholder name, for character
    /// sets that appear inline in terminal definitions.
    pub fn register_anonymous(&mut self, set: CharSet) -> usize {
        let name = format!("#{}", self.anon_count);
        self.anon_count += 1;
        self.register(&name, set)
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.classes
            .iter()
            .find(|class| class.name == name)
            .map(|class| class.id)
    }

    pub fn find_by_set(&self, set: &CharSet) -> Option<usize> {
        self.classes
            .iter()
            .find(|class| class.set == *set)
            .map(|class| class.id)
    }

    pub fn get(&self, id: usize) -> &CharClass {
        &self.classes[id]
    }

    pub fn set_of(&self, id: usize) -> &CharSet {
        &self.classes[id].set
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> impl Iterator<Item = &CharClass> {
        self.classes.iter()
    }
}
