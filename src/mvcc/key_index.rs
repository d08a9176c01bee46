//! Module implement per-key revision history.

use crate::{mvcc::Revision, Error, Result};

/// Generation, contiguous lifespan of one key, from its creation to an
/// optional terminating tombstone.
///
/// Revisions within a generation are strictly increasing. A generation
/// with no revisions is the _closed_ marker left behind by a tombstone,
/// waiting for the key's next creation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Generation {
    ver: i64,          // number of revisions in this generation
    created: Revision, // when the generation was created, i.e. its first revision
    revs: Vec<Revision>,
}

impl Generation {
    /// Return whether this generation holds any revision.
    pub fn is_empty(&self) -> bool {
        self.revs.is_empty()
    }

    /// Return the creation revision for this generation.
    pub fn to_created(&self) -> Revision {
        self.created
    }

    /// Return the number of revisions in this generation.
    pub fn to_ver(&self) -> i64 {
        self.ver
    }

    /// Return the ordered list of revisions in this generation.
    pub fn as_revs(&self) -> &[Revision] {
        &self.revs
    }
}

/// KeyIndex hold the full history of a single key as an ordered list of
/// generations, oldest first.
///
/// At most the trailing generation is open, all earlier generations are
/// terminated by a tombstone. KeyIndex is mutated only through [Self::put],
/// [Self::tombstone] and [Self::restore], and destroyed only by a full
/// index rebuild.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyIndex {
    key: Vec<u8>,
    modified: Revision, // the main rev of the last modification
    generations: Vec<Generation>,
}

impl KeyIndex {
    pub fn new(key: Vec<u8>) -> KeyIndex {
        KeyIndex {
            key,
            modified: Revision::default(),
            generations: Vec::default(),
        }
    }

    /// Append `(main, sub)` to the open generation, opening a new
    /// generation if none is open. Revisions for a key arrive in log
    /// order, strictly increasing.
    pub fn put(&mut self, main: i64, sub: i64) {
        let rev = Revision::new(main, sub);
        debug_assert!(rev > self.modified, "{:?} <= {:?}", rev, self.modified);

        if self.generations.is_empty() {
            self.generations.push(Generation::default());
        }
        match self.generations.last_mut() {
            Some(g) => {
                if g.revs.is_empty() {
                    // create a new key
                    g.created = rev;
                }
                g.revs.push(rev);
                g.ver += 1;
            }
            None => unreachable!(),
        }
        self.modified = rev;
    }

    /// Close the open generation by appending `(main, sub)` as its
    /// terminating revision. Fail with NoOpenGeneration when the key has
    /// no live generation, a log inconsistency to be reported by the
    /// caller, not a crash condition.
    pub fn tombstone(&mut self, main: i64, sub: i64) -> Result<()> {
        let open = match self.generations.last() {
            Some(g) => !g.is_empty(),
            None => false,
        };
        if !open {
            return err_at!(
                NoOpenGeneration,
                msg: "tombstone on {:?} at ({},{})",
                String::from_utf8_lossy(&self.key), main, sub
            );
        }

        self.put(main, sub);
        self.generations.push(Generation::default());
        Ok(())
    }

    /// Synthesize the open generation's initial state from a log record's
    /// metadata. Used by the restore pipeline on first encounter of a key,
    /// where the record's `create_revision` and `version` fields are the
    /// only available evidence of the generation's past.
    pub fn restore(&mut self, created: Revision, modified: Revision, ver: i64) {
        debug_assert!(self.generations.is_empty(), "restore on non-empty {:?}", self.key);

        self.modified = modified;
        self.generations.push(Generation {
            ver,
            created,
            revs: vec![modified],
        });
    }

    /// Point-in-time lookup. Scan generations from newest to oldest and
    /// return `(created, modified, ver)` from the generation whose
    /// lifespan contains `at_rev`. Keys deleted at or before `at_rev`,
    /// with no later re-creation, are KeyNotFound.
    pub fn get(&self, at_rev: i64) -> Result<(Revision, Revision, i64)> {
        let g = match self.find_generation(at_rev) {
            Some(g) => g,
            None => {
                let key = String::from_utf8_lossy(&self.key).to_string();
                return err_at!(KeyNotFound, msg: "{:?} at {}", key, at_rev);
            }
        };

        match g.revs.iter().rposition(|rev| rev.main <= at_rev) {
            Some(n) => {
                let modified = g.revs[n];
                let ver = g.ver - ((g.revs.len() - n - 1) as i64);
                Ok((g.created, modified, ver))
            }
            None => {
                let key = String::from_utf8_lossy(&self.key).to_string();
                err_at!(KeyNotFound, msg: "{:?} at {}", key, at_rev)
            }
        }
    }

    // Find the generation whose lifespan contains `rev`, newest first.
    // A closed generation whose tombstone is at or before `rev` ends the
    // walk, the key was dead at `rev`.
    fn find_generation(&self, rev: i64) -> Option<&Generation> {
        let lastg = self.generations.len().saturating_sub(1);

        for (i, g) in self.generations.iter().enumerate().rev() {
            if g.revs.is_empty() {
                continue;
            }
            if i != lastg {
                match g.revs.last() {
                    Some(tomb) if tomb.main <= rev => return None,
                    _ => (),
                }
            }
            if g.revs[0].main <= rev {
                return Some(g);
            }
        }
        None
    }
}

impl KeyIndex {
    /// Return the key indexed by this history.
    pub fn as_key(&self) -> &[u8] {
        &self.key
    }

    /// Return the revision of the latest modification.
    pub fn to_modified(&self) -> Revision {
        self.modified
    }

    /// Return the ordered list of generations, oldest first.
    pub fn as_generations(&self) -> &[Generation] {
        &self.generations
    }

    /// Return whether this key has any revision at all.
    pub fn is_empty(&self) -> bool {
        match self.generations.as_slice() {
            [] => true,
            [g] => g.is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "key_index_test.rs"]
mod key_index_test;
