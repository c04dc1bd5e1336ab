// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;
use std::io;

use crate::ev::{DecimalEncodedValue, EdgeFlags, OutOfRangeError};
use crate::{EdgeId, NodeId};

const MAGIC: &[u8; 4] = b"TCS1";

/// Identifies a turn from one edge onto another through their common node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnKey {
    pub from_edge: EdgeId,
    pub via_node: NodeId,
    pub to_edge: EdgeId,
}

impl TurnKey {
    pub const fn new(from_edge: EdgeId, via_node: NodeId, to_edge: EdgeId) -> Self {
        Self {
            from_edge,
            via_node,
            to_edge,
        }
    }
}

/// Single turn cost (in seconds, possibly infinite) computed during import.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnCostEntry {
    pub key: TurnKey,
    pub cost: f64,
}

/// Sparse store of per-turn [EdgeFlags] records, keyed by [TurnKey].
///
/// Only turns with a non-default value are kept; reading an absent
/// turn yields a zero cost. Iteration is ordered by the key, which keeps
/// any serialized form deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TurnCostStorage {
    words: usize,
    entries: BTreeMap<TurnKey, EdgeFlags>,
}

impl TurnCostStorage {
    /// Creates an empty storage of records with `words` words each.
    pub fn new(words: usize) -> Self {
        Self {
            words,
            entries: BTreeMap::new(),
        }
    }

    pub fn words(&self) -> usize {
        self.words
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrites the cost of a turn. On error, the storage is left untouched.
    pub fn set(
        &mut self,
        field: &DecimalEncodedValue,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
        cost: f64,
    ) -> Result<(), OutOfRangeError> {
        let key = TurnKey::new(from_edge, via_node, to_edge);
        let mut flags = self
            .entries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| EdgeFlags::new(self.words));
        field.set_decimal(false, &mut flags, cost)?;
        self.entries.insert(key, flags);
        Ok(())
    }

    /// Returns the stored cost of a turn, or zero if nothing was stored.
    pub fn get(
        &self,
        field: &DecimalEncodedValue,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
    ) -> f64 {
        self.entries
            .get(&TurnKey::new(from_edge, via_node, to_edge))
            .map(|flags| field.get_decimal(false, flags))
            .unwrap_or(0.0)
    }

    /// Adds `cost` to whatever is already stored for a turn, clamping the sum
    /// into the field's range. Forbidden (infinite) turns stay forbidden.
    /// Returns the newly stored value.
    pub fn add(
        &mut self,
        field: &DecimalEncodedValue,
        from_edge: EdgeId,
        via_node: NodeId,
        to_edge: EdgeId,
        cost: f64,
    ) -> Result<f64, OutOfRangeError> {
        let sum = field.clamp(self.get(field, from_edge, via_node, to_edge) + cost);
        self.set(field, from_edge, via_node, to_edge, sum)?;
        Ok(self.get(field, from_edge, via_node, to_edge))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TurnKey, &EdgeFlags)> {
        self.entries.iter().map(|(&k, v)| (k, v))
    }

    /// Serializes the storage: a 4-byte magic, the record width (u32),
    /// the amount of entries (u64), and then every entry as
    /// `from_edge, via_node, to_edge` followed by the record words, all little-endian.
    pub fn write_to<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        w.write_all(MAGIC)?;
        w.write_all(&(self.words as u32).to_le_bytes())?;
        w.write_all(&(self.entries.len() as u64).to_le_bytes())?;

        for (key, flags) in &self.entries {
            w.write_all(&key.from_edge.to_le_bytes())?;
            w.write_all(&key.via_node.to_le_bytes())?;
            w.write_all(&key.to_edge.to_le_bytes())?;
            for word in flags.words() {
                w.write_all(&word.to_le_bytes())?;
            }
        }

        w.flush()
    }

    /// Reads back a storage written by [write_to](Self::write_to).
    pub fn read_from<R: io::Read>(mut r: R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "not a turn cost storage",
            ));
        }

        let words = read_u32(&mut r)? as usize;
        let count = read_u64(&mut r)?;

        let mut storage = Self::new(words);
        for _ in 0..count {
            let key = TurnKey::new(read_u32(&mut r)?, read_u32(&mut r)?, read_u32(&mut r)?);
            let record = (0..words)
                .map(|_| read_u32(&mut r))
                .collect::<io::Result<Vec<u32>>>()?;
            storage.entries.insert(key, EdgeFlags::from_words(record));
        }

        Ok(storage)
    }
}

fn read_u32<R: io::Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: io::Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
