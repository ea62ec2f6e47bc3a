use crate::geo::{GeoRecord, GeoTable};

/// Records sorted by ascending capture timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedSequence {
    records: Vec<GeoRecord>,
}

impl OrderedSequence {
    /// Sort the table's keys and project each one back to its location.
    ///
    /// HashMap iteration order is arbitrary, so the keys are sorted explicitly.
    /// Keys are unique, which makes the result a total order of the input.
    pub fn from_table(table: GeoTable) -> Self {
        let mut timestamps: Vec<i64> = table.keys().copied().collect();
        timestamps.sort_unstable();

        let records = timestamps
            .into_iter()
            .map(|ts| GeoRecord::new(ts, table[&ts]))
            .collect();

        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[GeoRecord] {
        &self.records
    }
}

impl IntoIterator for OrderedSequence {
    type Item = GeoRecord;
    type IntoIter = std::vec::IntoIter<GeoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a OrderedSequence {
    type Item = &'a GeoRecord;
    type IntoIter = std::slice::Iter<'a, GeoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
