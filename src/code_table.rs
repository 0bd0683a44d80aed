//! Symbol to bit-string mapping derived from a [`CodeTree`].

use crate::tree::{CodeTree, Node};
use crate::ALPH_SIZE;
use std::fmt;

/// Root-to-leaf path: `false` for left, `true` for right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    /// Splits the code into `(bit_count, value)` words of at most 32 bits,
    /// most significant bit first. Leading zeros are kept by the bit count.
    pub fn words(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.bits.chunks(32).map(|chunk| {
            let value = chunk
                .iter()
                .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
            (chunk.len() as u32, value)
        })
    }

    fn child(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Code { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Codes indexed by symbol, `EOF_SYMBOL` included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn from_tree(tree: &CodeTree) -> Self {
        let mut codes = vec![None; ALPH_SIZE + 1];
        let mut stack = vec![(tree.root(), Code::default())];

        while let Some((id, path)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf { symbol } => {
                    if let Some(slot) = codes.get_mut(symbol as usize) {
                        *slot = Some(path);
                    }
                }
                Node::Internal { left, right } => {
                    stack.push((right, path.child(true)));
                    stack.push((left, path.child(false)));
                }
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: u16) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Assigned codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as u16, c)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::EOF_SYMBOL;

    fn table_for(data: &[u8]) -> CodeTable {
        CodeTable::from_tree(&CodeTree::build(&FrequencyTable::from_bytes(data)))
    }

    fn assert_prefix_free(table: &CodeTable) {
        let codes: Vec<_> = table.iter().collect();
        for (i, (sym_a, a)) in codes.iter().enumerate() {
            assert!(!a.is_empty(), "symbol {} has an empty code", sym_a);
            for (sym_b, b) in codes.iter().skip(i + 1) {
                assert!(
                    !a.is_prefix_of(b) && !b.is_prefix_of(a),
                    "codes for {} ({}) and {} ({}) overlap",
                    sym_a,
                    a,
                    sym_b,
                    b
                );
            }
        }
    }

    #[test]
    fn test_single_byte_codes() {
        let table = table_for(&[0x41]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0x41).unwrap().to_string(), "0");
        assert_eq!(table.get(EOF_SYMBOL).unwrap().to_string(), "1");
    }

    #[test]
    fn test_frequent_symbol_gets_shorter_code() {
        let table = table_for(&[0x00, 0x00, 0x00, 0x01]);
        let zero = table.get(0x00).unwrap();
        let one = table.get(0x01).unwrap();
        let eof = table.get(EOF_SYMBOL).unwrap();
        assert!(zero.len() < one.len());
        assert!(zero.len() < eof.len());
        assert_eq!(zero.bits(), &[true]);
        assert_eq!(zero.to_string(), "1");
        assert_eq!(one.to_string(), "00");
        assert_eq!(eof.to_string(), "01");
    }

    #[test]
    fn test_codes_are_prefix_free() {
        assert_prefix_free(&table_for(b"the quick brown fox jumps over the lazy dog"));
        assert_prefix_free(&table_for(&(0..=255).collect::<Vec<u8>>()));
        assert_prefix_free(&table_for(b""));
        let skewed: Vec<u8> = (0u8..10)
            .flat_map(|s| std::iter::repeat(s).take(1 << s))
            .collect();
        assert_prefix_free(&table_for(&skewed));
    }

    #[test]
    fn test_eof_always_has_code() {
        let inputs: [&[u8]; 4] = [b"", b"a", b"aaaa", b"abcabcabc"];
        for data in inputs {
            assert!(table_for(data).get(EOF_SYMBOL).is_some());
        }
    }

    #[test]
    fn test_unused_symbols_have_no_code() {
        let table = table_for(b"abc");
        assert!(table.get(b'd' as u16).is_none());
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_words_keep_leading_zeros() {
        let code = Code {
            bits: vec![false, false, true],
        };
        assert_eq!(code.words().collect::<Vec<_>>(), vec![(3, 1)]);

        let mut long = vec![true; 33];
        long[32] = false;
        let code = Code { bits: long };
        assert_eq!(
            code.words().collect::<Vec<_>>(),
            vec![(32, u32::MAX), (1, 0)]
        );
    }
}
