use crate::results::Record;

/// Ordered, append-only collection of the records found during a run.
///
/// Records keep their discovery order and are never deduplicated.
#[derive(Debug, Default, Clone)]
pub struct Accumulator {
    records: Vec<Record>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, records: Vec<Record>) {
        self.records.extend(records);
    }

    pub fn all(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(value: &str) -> Record {
        let columns: Arc<[String]> = vec!["Name".to_string()].into();
        Record::new(columns, vec![value.to_string()])
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let mut acc = Accumulator::new();
        assert!(acc.is_empty());
        acc.append(vec![record("a"), record("b")]);
        acc.append(vec![]);
        acc.append(vec![record("b"), record("c")]);

        assert_eq!(acc.len(), 4);
        let names: Vec<_> = acc.all().iter().map(|r| r.get("Name").unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "b", "c"]);
    }
}
