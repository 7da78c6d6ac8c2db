use serde::Serialize;

use embedscape_core::PlacedRecord;

/// `layout --json` row. The embedding itself is left out.
#[derive(Serialize)]
pub(crate) struct LayoutEntryJson<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) position: [f32; 3],
}

impl<'a> From<&'a PlacedRecord> for LayoutEntryJson<'a> {
    fn from(p: &'a PlacedRecord) -> Self {
        Self {
            id: &p.record.id,
            name: &p.record.name,
            image_url: p.record.image_url(),
            position: p.position,
        }
    }
}
