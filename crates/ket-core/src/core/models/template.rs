use super::ids::TemplateId;
use super::molecule::Molecule;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateKind {
    /// An R-group: the set of fragments an R-site may stand for.
    RGroup { number: u32 },
    /// A T-group: a named reusable fragment such as a monomer.
    TGroup {
        class: String,
        alias: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub name: String,
    pub kind: TemplateKind,
    pub molecule: Molecule,
}

impl Template {
    pub fn rgroup(number: u32, molecule: Molecule) -> Self {
        Self {
            name: format!("rg{}", number),
            kind: TemplateKind::RGroup { number },
            molecule,
        }
    }

    pub fn tgroup(name: &str, class: &str, molecule: Molecule) -> Self {
        Self {
            name: name.to_string(),
            kind: TemplateKind::TGroup {
                class: class.to_string(),
                alias: None,
            },
            molecule,
        }
    }
}

/// Arena owning every fragment template of one molecule.
///
/// Atoms refer to templates by [`TemplateId`]; the pool is the only owner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplatePool {
    templates: Vec<Template>,
}

impl TemplatePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, template: Template) -> TemplateId {
        self.templates.push(template);
        TemplateId(self.templates.len() - 1)
    }

    pub fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.get(id.index())
    }

    pub fn get_mut(&mut self, id: TemplateId) -> Option<&mut Template> {
        self.templates.get_mut(id.index())
    }

    pub fn contains(&self, id: TemplateId) -> bool {
        id.index() < self.templates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TemplateId, &Template)> {
        self.templates
            .iter()
            .enumerate()
            .map(|(i, t)| (TemplateId(i), t))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Finds an R-group template by its number.
    pub fn find_rgroup(&self, number: u32) -> Option<TemplateId> {
        self.iter()
            .find(|(_, t)| t.kind == TemplateKind::RGroup { number })
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_returns_sequential_ids() {
        let mut pool = TemplatePool::new();
        let a = pool.add(Template::rgroup(1, Molecule::new()));
        let b = pool.add(Template::tgroup("Ala", "AA", Molecule::new()));
        assert_eq!(a, TemplateId(0));
        assert_eq!(b, TemplateId(1));
        assert_eq!(pool.len(), 2);
        assert!(pool.contains(b));
        assert!(!pool.contains(TemplateId(2)));
    }

    #[test]
    fn lookups_resolve_by_id_and_rgroup_number() {
        let mut pool = TemplatePool::new();
        pool.add(Template::tgroup("Gly", "AA", Molecule::new()));
        let rg = pool.add(Template::rgroup(7, Molecule::new()));
        assert_eq!(pool.find_rgroup(7), Some(rg));
        assert_eq!(pool.find_rgroup(1), None);
        assert_eq!(pool.get(rg).map(|t| t.name.as_str()), Some("rg7"));
        assert!(pool.get(TemplateId(5)).is_none());
    }
}
