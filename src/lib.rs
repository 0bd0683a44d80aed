//! huff-tree: loss-less Huffman compression with a self-describing tree header.
//!
//! Compressed layout, most significant bit first:
//! - 32-bit magic number [`HUFF_TREE`]
//! - pre-order encoded code tree (see [`header`])
//! - one prefix code per input byte, then the code for [`EOF_SYMBOL`]
//! - zero padding up to the next byte boundary

pub mod bitio;
pub mod code_table;
pub mod config;
pub mod error;
pub mod frequency;
pub mod header;
pub mod tree;

use crate::bitio::{BitInputStream, BitOutputStream, BitSink, BitSource, Rewind};
use crate::code_table::CodeTable;
use crate::config::ProcessorConfig;
use crate::error::HuffError;
use crate::frequency::FrequencyTable;
use crate::tree::{CodeTree, Node};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, trace};

pub const BITS_PER_WORD: u32 = 8;
pub const BITS_PER_INT: u32 = 32;
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;
/// Marks the logical end of the payload. Never a real input byte.
pub const EOF_SYMBOL: u16 = ALPH_SIZE as u16;
pub const HUFF_NUMBER: u32 = 0xFACE_8200;
/// Magic number opening every compressed stream.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// The compression engine
pub struct HuffProcessor {
    config: ProcessorConfig,
}

impl Default for HuffProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl HuffProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// Configuration this processor runs with
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Compresses `input` into `output` and closes `output`.
    ///
    /// `input` is read twice, once to count and once to encode, so it must
    /// support rewinding.
    pub fn compress<I, O>(&self, input: &mut I, output: &mut O) -> Result<(), HuffError>
    where
        I: BitSource + Rewind,
        O: BitSink,
    {
        let freq = FrequencyTable::count(input)?;
        input.rewind()?;

        let tree = CodeTree::build(&freq);
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built code tree"
        );
        output.write_bits(BITS_PER_INT, HUFF_TREE)?;
        header::write_tree(&tree, output)?;

        input.rewind()?;
        let codes = CodeTable::from_tree(&tree);
        if self.config.debug {
            for (symbol, code) in codes.iter() {
                trace!(symbol, %code, "code assigned");
            }
        }

        while let Some(word) = input.read_bits(BITS_PER_WORD)? {
            write_code(&codes, word as u16, output)?;
        }
        write_code(&codes, EOF_SYMBOL, output)?;
        output.close()?;

        info!(bytes = freq.total(), "compressed");
        Ok(())
    }

    /// Rebuilds the original bytes from `input` into `output` and closes
    /// `output`.
    pub fn decompress<I, O>(&self, input: &mut I, output: &mut O) -> Result<(), HuffError>
    where
        I: BitSource,
        O: BitSink,
    {
        let magic = input
            .read_bits(BITS_PER_INT)?
            .ok_or(HuffError::Truncated { context: "magic number" })?;
        if magic != HUFF_TREE {
            return Err(HuffError::BadMagic { found: magic });
        }

        let tree = header::read_tree(input)?;
        debug!(leaves = tree.leaf_count(), "read code tree");

        let mut written: u64 = 0;
        let mut current = tree.root();
        loop {
            let bit = input
                .read_bits(1)?
                .ok_or(HuffError::Truncated { context: "payload" })?;
            current = match tree.node(current) {
                Node::Internal { left, right } => {
                    if bit == 0 {
                        left
                    } else {
                        right
                    }
                }
                // read_tree never yields a leaf root and we reset to the root
                // after every leaf
                Node::Leaf { .. } => unreachable!("walk resting on a leaf"),
            };
            if let Node::Leaf { symbol } = tree.node(current) {
                if symbol == EOF_SYMBOL {
                    break;
                }
                output.write_bits(BITS_PER_WORD, u32::from(symbol))?;
                written += 1;
                current = tree.root();
            }
        }
        output.close()?;

        info!(bytes = written, "decompressed");
        Ok(())
    }

    /// In-memory compression.
    pub fn compress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, HuffError> {
        let mut input = BitInputStream::new(Cursor::new(data));
        let mut output = BitOutputStream::new(Vec::new());
        self.compress(&mut input, &mut output)?;
        debug!(
            bits_read = input.bits_read(),
            bits_written = output.bits_written(),
            "compress_bytes"
        );
        Ok(output.into_inner())
    }

    /// In-memory decompression. Nothing is returned on failure.
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>, HuffError> {
        let mut input = BitInputStream::new(Cursor::new(data));
        let mut output = BitOutputStream::new(Vec::new());
        self.decompress(&mut input, &mut output)?;
        debug!(
            bits_read = input.bits_read(),
            bits_written = output.bits_written(),
            "decompress_bytes"
        );
        Ok(output.into_inner())
    }

    /// Compress the file at `src` into `dst`.
    ///
    /// Output is staged in a temporary file next to `dst` and only moved into
    /// place once compression succeeds.
    pub fn compress_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        src: P,
        dst: Q,
    ) -> Result<(), HuffError> {
        self.run_file(src.as_ref(), dst.as_ref(), "compressed file", |input, output| {
            self.compress(input, output)
        })
    }

    /// Decompress the file at `src` into `dst`. On failure `dst` is left
    /// untouched.
    pub fn decompress_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        src: P,
        dst: Q,
    ) -> Result<(), HuffError> {
        self.run_file(src.as_ref(), dst.as_ref(), "decompressed file", |input, output| {
            self.decompress(input, output)
        })
    }

    fn run_file<F>(&self, src: &Path, dst: &Path, label: &str, op: F) -> Result<(), HuffError>
    where
        F: FnOnce(
            &mut BitInputStream<BufReader<File>>,
            &mut BitOutputStream<BufWriter<&mut File>>,
        ) -> Result<(), HuffError>,
    {
        let capacity = self.config.io_buffer_size;
        let mut input =
            BitInputStream::new(BufReader::with_capacity(capacity, File::open(src)?));

        let dir = match dst.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        // dropped (and deleted) on any early return
        let mut staged = NamedTempFile::new_in(dir)?;
        let bits_written = {
            let mut output =
                BitOutputStream::new(BufWriter::with_capacity(capacity, staged.as_file_mut()));
            op(&mut input, &mut output)?;
            output.bits_written()
        };
        staged.persist(dst).map_err(|e| e.error)?;

        info!(bits_read = input.bits_read(), bits_written, "{}", label);
        Ok(())
    }
}

fn write_code<O: BitSink>(codes: &CodeTable, symbol: u16, output: &mut O) -> Result<(), HuffError> {
    let code = codes.get(symbol);
    debug_assert!(code.is_some(), "no code for symbol {}", symbol);
    let code = code.ok_or(HuffError::MissingCode(symbol))?;
    for (bits, value) in code.words() {
        output.write_bits(bits, value)?;
    }
    Ok(())
}

/// Compresses `data` with the default configuration.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, HuffError> {
    HuffProcessor::default().compress_bytes(data)
}

/// Decompresses `data` with the default configuration.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, HuffError> {
    HuffProcessor::default().decompress_bytes(data)
}
