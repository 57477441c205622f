//! Payload carried by every graph node.

use crate::config::truncate_id;

/// Identity and display name of one person in the network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    id: String,
    name: String,
    max_len: usize,
}

impl Record {
    /// Both `id` and `name` are cut to `max_len` bytes.
    pub fn new(id: &str, name: &str, max_len: usize) -> Self {
        Self {
            id: truncate_id(id, max_len).to_owned(),
            name: truncate_id(name, max_len).to_owned(),
            max_len,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: &str) {
        self.name = truncate_id(name, self.max_len).to_owned();
    }
}
