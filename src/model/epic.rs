use indexmap::IndexMap;
use serde::Serialize;

/// A user-defined grouping of tasks. Tasks refer to epics by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Epic {
    /// Short readable id, generated from the name but editable
    pub id: String,
    pub name: String,
}

impl Epic {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Epic {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Derive an id from an epic name (`"Home Repairs"` → `"home-repairs"`).
    pub fn id_from_name(name: &str) -> String {
        slug::slugify(name)
    }
}

/// An entry of the epic chooser: `id` is `None` for the "no epic" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicChoice {
    pub id: Option<String>,
    pub name: String,
}

/// Board-wide epic pool, keyed by epic id in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicPool {
    epics: IndexMap<String, Epic>,
}

impl EpicPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Epic> {
        self.epics.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.epics.contains_key(id)
    }

    pub fn insert(&mut self, epic: Epic) {
        self.epics.insert(epic.id.clone(), epic);
    }

    pub fn remove(&mut self, id: &str) -> Option<Epic> {
        self.epics.shift_remove(id)
    }

    pub fn len(&self) -> usize {
        self.epics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Epic> {
        self.epics.values()
    }

    /// Add an epic named `name`, generating an id that is unique in the pool.
    /// Returns the new id.
    pub fn add_named(&mut self, name: &str) -> String {
        let base = match Epic::id_from_name(name) {
            s if s.is_empty() => "epic".to_string(),
            s => s,
        };
        let mut id = base.clone();
        let mut n = 2;
        while self.epics.contains_key(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        self.insert(Epic::new(id.clone(), name));
        id
    }

    /// Chooser entries: the "no epic" sentinel first, then epics by name.
    pub fn choices(&self) -> Vec<EpicChoice> {
        let mut sorted: Vec<&Epic> = self.epics.values().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut out = Vec::with_capacity(sorted.len() + 1);
        out.push(EpicChoice {
            id: None,
            name: String::new(),
        });
        out.extend(sorted.into_iter().map(|e| EpicChoice {
            id: Some(e.id.clone()),
            name: e.name.clone(),
        }));
        out
    }
}
