// src/transforms/prefix.rs

//! Implements a [`PrefixTransform`].

use crate::common::Record;

/// Default separator between the prefix and the record.
pub const PREFIX_SEP_DEFAULT: &str = " ";

/// Prepend a fixed prefix and separator to each record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrefixTransform {
    prefix: String,
    sep: String,
}

impl PrefixTransform {
    pub fn new(prefix: &str) -> PrefixTransform {
        PrefixTransform::new_with_sep(prefix, PREFIX_SEP_DEFAULT)
    }

    pub fn new_with_sep(
        prefix: &str,
        sep: &str,
    ) -> PrefixTransform {
        PrefixTransform {
            prefix: String::from(prefix),
            sep: String::from(sep),
        }
    }

    /// Returns `prefix`, `sep`, `record` joined.
    /// No record is still no record.
    pub fn transform(
        &self,
        record: Option<&str>,
    ) -> Option<Record> {
        let record = record?;
        let mut out: Record = Record::with_capacity(self.prefix.len() + self.sep.len() + record.len());
        out.push_str(&self.prefix);
        out.push_str(&self.sep);
        out.push_str(record);

        Some(out)
    }
}
