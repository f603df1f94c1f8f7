//! Grouping of records by natural key
//!
//! Groups come out in first-seen order, and members keep their input
//! order inside each group.

use ahash::AHashMap;
use rutdedup_formats::Record;

/// Records sharing one natural-key value
#[derive(Debug, Clone)]
pub struct KeyGroup<'a> {
    pub key: String,
    pub members: Vec<&'a Record>,
}

impl KeyGroup<'_> {
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }
}

/// Group records by the string form of `key_field`
///
/// Records whose key is absent or falsy are left out.
pub fn group_by_key<'a, I>(records: I, key_field: &str) -> Vec<KeyGroup<'a>>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<KeyGroup<'a>> = Vec::new();

    for record in records {
        let Some(key) = record.truthy_str(key_field) else {
            continue;
        };

        match index.get(&*key) {
            Some(&slot) => groups[slot].members.push(record),
            None => {
                let key = key.into_owned();
                index.insert(key.clone(), groups.len());
                groups.push(KeyGroup {
                    key,
                    members: vec![record],
                });
            }
        }
    }

    groups
}
