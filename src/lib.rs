//! Cycle-accurate instruction decoder for the 6502 core of the NES.
//!
//! Every opcode, and the two hardware interrupts, decode to a short sequence of
//! [CpuOperation]s: one control word per clock cycle, each describing a bus transaction, an
//! internal register transfer and whether the program counter advances. An interpreter
//! executes these words one per cycle.
//!
//! ```
//! use nes_microcode::{instructions, Decoder};
//!
//! let mut decoder = Decoder::new();
//! let sequence = decoder.decode(instructions::LDA_IMMEDIATE);
//!
//! assert!(sequence[1].is_fetch());
//! assert!(sequence[2].is_nop());
//! ```

pub use crate::cpu::instructions;
pub use crate::cpu::AddressingMode;
pub use crate::cpu::AndRegister;
pub use crate::cpu::CpuOperation;
pub use crate::cpu::DataOpcode;
pub use crate::cpu::DataOperation;
pub use crate::cpu::Decoder;
pub use crate::cpu::Instruction;
pub use crate::cpu::MemoryOpcode;
pub use crate::cpu::MemoryOperation;
pub use crate::cpu::MicroSequence;
pub use crate::cpu::ReadOffset;
pub use crate::cpu::Register;
pub use crate::cpu::Status;
pub use crate::cpu::VectorOffset;
pub use crate::cpu::INSTRUCTION_COUNT;
pub use crate::cpu::MICRO_SEQUENCE_LEN;
pub use crate::table::InstructionTable;
pub use crate::table::TableError;
pub use crate::table::TABLE_BYTES;

mod cpu;
mod table;
