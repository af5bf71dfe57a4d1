mod addressing_modes;
mod decode;
mod instruction;
mod operation;
mod sequence;

pub use self::decode::Decoder;
pub use self::instruction::instructions;
pub use self::instruction::AddressingMode;
pub use self::instruction::Instruction;
pub use self::instruction::INSTRUCTION_COUNT;
pub use self::operation::AndRegister;
pub use self::operation::CpuOperation;
pub use self::operation::DataOpcode;
pub use self::operation::DataOperation;
pub use self::operation::MemoryOpcode;
pub use self::operation::MemoryOperation;
pub use self::operation::ReadOffset;
pub use self::operation::Register;
pub use self::operation::Status;
pub use self::operation::VectorOffset;
pub use self::sequence::MicroSequence;
pub use self::sequence::MICRO_SEQUENCE_LEN;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn decode(instruction: Instruction) -> [CpuOperation; MICRO_SEQUENCE_LEN] {
        *Decoder::new().decode(instruction)
    }

    /// Cycles that do anything at all.
    pub fn cycles(ops: &[CpuOperation]) -> usize {
        ops.iter().filter(|op| !op.is_nop()).count()
    }

    pub fn pc_increments(ops: &[CpuOperation]) -> usize {
        ops.iter().filter(|op| op.pc_increment()).count()
    }
}
