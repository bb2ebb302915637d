/// Static lookup from the field names the API exposes to the physical
/// column names. Fields missing from the table are used verbatim.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> FieldMapping<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub fn column<'k>(&self, field: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}
