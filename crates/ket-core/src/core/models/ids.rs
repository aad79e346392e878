use slotmap::new_key_type;

new_key_type! {
    pub struct SummaryId;
}

/// Position of a fragment template inside the [`TemplatePool`](super::template::TemplatePool)
/// of the molecule that owns it.
///
/// Template ids are only meaningful relative to that pool; copying an id into
/// another molecule does not carry the template with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub usize);

impl TemplateId {
    pub fn index(self) -> usize {
        self.0
    }
}
