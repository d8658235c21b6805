/// Ordered block storage
///
/// Positional operations check their indices and fail with
/// `IndexOutOfBounds` instead of silently doing nothing.

use crate::db::Block;
use crate::error::{RecorderError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockList {
    blocks: Vec<Block>,
}

impl BlockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn as_slice(&self) -> &[Block] {
        &self.blocks
    }

    pub fn to_vec(&self) -> Vec<Block> {
        self.blocks.clone()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// First block whose value matches exactly
    pub fn find_by_value(&self, value: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.value == value)
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.find_by_value(value).is_some()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn unshift(&mut self, block: Block) {
        self.blocks.insert(0, block);
    }

    /// Insert at `index`, or append when the list is shorter than that
    pub fn insert_clamped(&mut self, index: usize, block: Block) {
        let at = index.min(self.blocks.len());
        self.blocks.insert(at, block);
    }

    pub fn remove(&mut self, index: usize) -> Result<Block> {
        self.check(index)?;
        Ok(self.blocks.remove(index))
    }

    /// Take the block at `from` and reinsert it at `to`, shifting the blocks between
    pub fn move_block(&mut self, from: usize, to: usize) -> Result<()> {
        self.check(from)?;
        self.check(to)?;
        let dragged = self.blocks.remove(from);
        self.blocks.insert(to, dragged);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Concatenate every value, each followed by a newline
    pub fn to_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| format!("{}\n", block.value))
            .collect()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.blocks.len() {
            Ok(())
        } else {
            Err(RecorderError::IndexOutOfBounds {
                index,
                len: self.blocks.len(),
            })
        }
    }
}

impl From<Vec<Block>> for BlockList {
    fn from(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

impl From<BlockList> for Vec<Block> {
    fn from(list: BlockList) -> Self {
        list.blocks
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: &[&str]) -> BlockList {
        values.iter().map(|v| Block::new(*v)).collect::<Vec<_>>().into()
    }

    fn values(list: &BlockList) -> Vec<&str> {
        list.iter().map(|b| b.value.as_str()).collect()
    }

    #[test]
    fn test_move_forward_and_back() {
        let mut blocks = list(&["a", "b", "c"]);
        blocks.move_block(0, 2).unwrap();
        assert_eq!(values(&blocks), vec!["b", "c", "a"]);

        blocks.move_block(2, 0).unwrap();
        assert_eq!(values(&blocks), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_out_of_bounds_leaves_list_alone() {
        let mut blocks = list(&["a", "b"]);

        let result = blocks.move_block(0, 2);
        assert!(matches!(
            result,
            Err(RecorderError::IndexOutOfBounds { index: 2, len: 2 })
        ));
        assert_eq!(values(&blocks), vec!["a", "b"]);
    }

    #[test]
    fn test_remove() {
        let mut blocks = list(&["a", "b", "c"]);
        let removed = blocks.remove(1).unwrap();

        assert_eq!(removed.value, "b");
        assert_eq!(values(&blocks), vec!["a", "c"]);
        assert!(blocks.remove(5).is_err());
    }

    #[test]
    fn test_insert_clamped() {
        let mut blocks = BlockList::new();
        blocks.insert_clamped(1, Block::new("first"));
        blocks.insert_clamped(1, Block::new("second"));
        blocks.insert_clamped(1, Block::new("middle"));

        assert_eq!(values(&blocks), vec!["first", "middle", "second"]);
    }

    #[test]
    fn test_to_text() {
        let blocks = list(&["one", "two"]);
        assert_eq!(blocks.to_text(), "one\ntwo\n");
        assert_eq!(BlockList::new().to_text(), "");
    }
}
