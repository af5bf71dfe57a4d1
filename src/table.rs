//! The decoded sequence of every instruction, as a flat table an interpreter can load.
//!
//! The serialized table holds [INSTRUCTION_COUNT] sequences in identifier order, each
//! [MICRO_SEQUENCE_LEN] little-endian `u32` control words.

use std::fmt;
use std::io::Read;
use std::io::Write;

use anyhow::Context;
use log::info;

use crate::cpu::CpuOperation;
use crate::cpu::Decoder;
use crate::cpu::Instruction;
use crate::cpu::INSTRUCTION_COUNT;
use crate::cpu::MICRO_SEQUENCE_LEN;

const WORD_BYTES: usize = 4;

/// Size of a serialized table, 8256 bytes.
pub const TABLE_BYTES: usize = INSTRUCTION_COUNT * MICRO_SEQUENCE_LEN * WORD_BYTES;

type Sequence = [CpuOperation; MICRO_SEQUENCE_LEN];

#[derive(Debug, Eq, PartialEq)]
pub enum TableError {
    Length { expected: usize, actual: usize },
    InvalidOperation { instruction: Instruction, cycle: usize, bits: u32 },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::Length { expected, actual } => {
                write!(f, "table is {} bytes, expected {}", actual, expected)
            }
            TableError::InvalidOperation {
                instruction,
                cycle,
                bits,
            } => write!(
                f,
                "cycle {} of {} is not a valid operation: {:#010x}",
                cycle, instruction, bits
            ),
        }
    }
}

impl std::error::Error for TableError {}

#[derive(Clone, Eq, PartialEq)]
pub struct InstructionTable {
    sequences: Box<[Sequence]>,
}

impl InstructionTable {
    /// Decodes every instruction identifier.
    pub fn generate() -> Self {
        let mut decoder = Decoder::new();
        let sequences: Box<[Sequence]> = Instruction::all()
            .map(|instruction| *decoder.decode(instruction))
            .collect();

        let defined = sequences
            .iter()
            .filter(|sequence| sequence.iter().any(|op| !op.is_nop()))
            .count();
        info!(
            "Generated instruction table: {} of {} identifiers defined",
            defined, INSTRUCTION_COUNT
        );

        InstructionTable { sequences }
    }

    /// # Panics
    /// If the identifier is past [INSTRUCTION_COUNT].
    pub fn get(&self, instruction: Instruction) -> &Sequence {
        &self.sequences[instruction.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Instruction, &Sequence)> {
        Instruction::all().zip(self.sequences.iter())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.sequences
            .iter()
            .flatten()
            .flat_map(|op| op.bits().to_le_bytes())
            .collect()
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> anyhow::Result<()> {
        writer
            .write_all(&self.to_bytes())
            .context("Failed to write instruction table")
    }

    /// Loads a serialized table, rejecting words that name an unknown opcode or register.
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        if bytes.len() != TABLE_BYTES {
            return Err(TableError::Length {
                expected: TABLE_BYTES,
                actual: bytes.len(),
            })
            .context("Failed to load instruction table");
        }

        let mut words = bytes.chunks_exact(WORD_BYTES).map(|chunk| {
            let mut word = [0u8; WORD_BYTES];
            word.copy_from_slice(chunk);
            CpuOperation::from_bits(u32::from_le_bytes(word))
        });

        let mut sequences = Vec::with_capacity(INSTRUCTION_COUNT);
        for instruction in Instruction::all() {
            let mut sequence = [CpuOperation::NOP; MICRO_SEQUENCE_LEN];

            for (cycle, slot) in sequence.iter_mut().enumerate() {
                let op = words.next().unwrap_or_default();
                if op.data_operation().is_none() || op.memory_operation().is_none() {
                    return Err(TableError::InvalidOperation {
                        instruction,
                        cycle,
                        bits: op.bits(),
                    })
                    .context("Failed to load instruction table");
                }
                *slot = op;
            }

            sequences.push(sequence);
        }

        Ok(InstructionTable {
            sequences: sequences.into_boxed_slice(),
        })
    }

    pub fn read_from<R: Read>(mut reader: R) -> anyhow::Result<Self> {
        let mut bytes = Vec::with_capacity(TABLE_BYTES);
        reader
            .read_to_end(&mut bytes)
            .context("Failed to read instruction table")?;
        InstructionTable::from_bytes(&bytes)
    }
}

impl fmt::Debug for InstructionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstructionTable")
            .field("len", &self.sequences.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::instructions::*;
    use std::io::Cursor;

    #[test]
    fn table_holds_every_identifier_in_order() {
        let table = InstructionTable::generate();
        let mut decoder = Decoder::new();

        assert_eq!(table.iter().count(), INSTRUCTION_COUNT);
        for (instruction, sequence) in table.iter() {
            assert_eq!(sequence, decoder.decode(instruction), "{}", instruction);
        }
    }

    #[test]
    fn serialized_table_is_little_endian() {
        let table = InstructionTable::generate();
        let bytes = table.to_bytes();
        let start = (usize::from(LDA_IMMEDIATE.id()) * MICRO_SEQUENCE_LEN + 1) * WORD_BYTES;
        let fetch = table.get(LDA_IMMEDIATE)[1];

        assert_eq!(bytes.len(), TABLE_BYTES);
        assert_eq!(TABLE_BYTES, 8256);
        assert_eq!(bytes[start..start + WORD_BYTES], fetch.bits().to_le_bytes());
        assert_eq!(bytes[start + 2], 0x04);
    }

    #[test]
    fn table_survives_a_write_and_read() {
        let table = InstructionTable::generate();
        let mut buffer = Vec::new();

        table.write_to(&mut buffer).unwrap();
        let loaded = InstructionTable::read_from(Cursor::new(buffer)).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn short_table_is_rejected() {
        let error = InstructionTable::from_bytes(&[0; 16]).unwrap_err();

        assert_eq!(
            error.downcast_ref::<TableError>(),
            Some(&TableError::Length {
                expected: TABLE_BYTES,
                actual: 16,
            })
        );
    }

    #[test]
    fn unknown_register_is_rejected() {
        let mut bytes = InstructionTable::generate().to_bytes();
        // Register slot 9 is unused
        let bad = CpuOperation::read(crate::cpu::Register::A, crate::cpu::Register::Pcl).bits()
            & !(0xF << 28)
            | 9 << 28;
        bytes[..4].copy_from_slice(&bad.to_le_bytes());

        let error = InstructionTable::from_bytes(&bytes).unwrap_err();

        assert_eq!(
            error.downcast_ref::<TableError>(),
            Some(&TableError::InvalidOperation {
                instruction: BRK,
                cycle: 0,
                bits: bad,
            })
        );
    }
}
