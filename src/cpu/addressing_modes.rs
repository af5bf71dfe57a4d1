//! Cycle sequences shared by every instruction with the same addressing mode.
//!
//! Each routine takes the instruction's core operation and appends the complete sequence,
//! ending with the fetch of the next opcode. Read routines merge the core operation into
//! the fetch cycle, since the 6502 finishes the internal work of a read instruction while
//! the next opcode is on the bus. Write routines take a complete write cycle as the core
//! operation. Read-modify-write routines apply the core operation during the dummy write
//! of the unmodified value.

use super::CpuOperation;
use super::DataOpcode;
use super::MicroSequence;
use super::ReadOffset;
use super::Register;
use super::Register::*;

const PC_INC: CpuOperation = CpuOperation::PC_INC;
const FETCH: CpuOperation = CpuOperation::FETCH;

fn add(dst: Register, src: Register) -> CpuOperation {
    CpuOperation::transfer(DataOpcode::Add, dst, src)
}

/// Carry of the last indexed add, which that add leaves in TMP2.
fn fix_high() -> CpuOperation {
    CpuOperation::transfer(DataOpcode::FixHigh, AddrH, Tmp2)
}

fn carry_high() -> CpuOperation {
    add(AddrH, Tmp2)
}

impl MicroSequence {
    // Reads

    pub(in crate::cpu) fn immediate(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(Tmp1, Pcl) | PC_INC);
        self.append(FETCH | op | PC_INC);
    }

    pub(in crate::cpu) fn zero_page(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read_zero_page(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL));
        self.append(FETCH | op | PC_INC);
    }

    /// The index is added to the low byte only, so the address wraps within the zero page.
    pub(in crate::cpu) fn zero_page_indexed(&mut self, op: CpuOperation, reg: Register) {
        self.append(CpuOperation::read_zero_page(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL) | add(AddrL, reg));
        self.append(CpuOperation::read(Tmp1, AddrL));
        self.append(FETCH | op | PC_INC);
    }

    pub(in crate::cpu) fn absolute(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrH, Pcl) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL));
        self.append(FETCH | op | PC_INC);
    }

    /// The operand read happens before the high byte is fixed. When the index crossed a
    /// page the interpreter repeats that read, making this 5 cycles instead of 4.
    pub(in crate::cpu) fn absolute_indexed(&mut self, op: CpuOperation, reg: Register) {
        self.append(CpuOperation::read(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrH, Pcl) | add(AddrL, reg) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL) | fix_high());
        self.append(FETCH | op | PC_INC);
    }

    pub(in crate::cpu) fn indexed_indirect(&mut self, op: CpuOperation) {
        self.indexed_indirect_address();
        self.append(CpuOperation::read(Tmp1, AddrL));
        self.append(FETCH | op | PC_INC);
    }

    pub(in crate::cpu) fn indirect_indexed(&mut self, op: CpuOperation) {
        self.indirect_indexed_address();
        self.append(CpuOperation::read(Tmp1, AddrL) | fix_high());
        self.append(FETCH | op | PC_INC);
    }

    fn indexed_indirect_address(&mut self) {
        self.append(CpuOperation::read_zero_page(Tmp1, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrL, Tmp1) | add(Tmp1, X));
        self.append(CpuOperation::read(AddrL, Tmp1));
        self.append(CpuOperation::read(AddrH, Tmp1).with_offset(ReadOffset::NEXT));
    }

    fn indirect_indexed_address(&mut self) {
        self.append(CpuOperation::read_zero_page(Tmp1, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrL, Tmp1));
        self.append(CpuOperation::read(AddrH, Tmp1).with_offset(ReadOffset::NEXT) | add(AddrL, Y));
    }

    // Read-modify-write

    pub(in crate::cpu) fn read_modify_write_zero_page(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read_zero_page(AddrL, Pcl) | PC_INC);
        self.modify(op);
    }

    pub(in crate::cpu) fn read_modify_write_zero_page_x(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read_zero_page(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL) | add(AddrL, X));
        self.modify(op);
    }

    pub(in crate::cpu) fn read_modify_write_absolute(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrH, Pcl) | PC_INC);
        self.modify(op);
    }

    /// Always 7 cycles: the high byte is carried unconditionally.
    pub(in crate::cpu) fn read_modify_write_absolute_x(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrH, Pcl) | add(AddrL, X) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL) | carry_high());
        self.modify(op);
    }

    fn modify(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(Tmp1, AddrL));
        self.append(CpuOperation::write(Tmp1, AddrL) | op);
        self.append(CpuOperation::write(Tmp1, AddrL));
        self.append(FETCH | PC_INC);
    }

    // Writes

    pub(in crate::cpu) fn write_zero_page(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read_zero_page(AddrL, Pcl) | PC_INC);
        self.store(op);
    }

    pub(in crate::cpu) fn write_zero_page_indexed(&mut self, op: CpuOperation, reg: Register) {
        self.append(CpuOperation::read_zero_page(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL) | add(AddrL, reg));
        self.store(op);
    }

    pub(in crate::cpu) fn write_absolute(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrH, Pcl) | PC_INC);
        self.store(op);
    }

    pub(in crate::cpu) fn write_absolute_indexed(&mut self, op: CpuOperation, reg: Register) {
        self.append(CpuOperation::read(AddrL, Pcl) | PC_INC);
        self.append(CpuOperation::read(AddrH, Pcl) | add(AddrL, reg) | PC_INC);
        self.append(CpuOperation::read(Tmp1, AddrL) | carry_high());
        self.store(op);
    }

    pub(in crate::cpu) fn write_indexed_indirect(&mut self, op: CpuOperation) {
        self.indexed_indirect_address();
        self.store(op);
    }

    pub(in crate::cpu) fn write_indirect_indexed(&mut self, op: CpuOperation) {
        self.indirect_indexed_address();
        self.append(CpuOperation::read(Tmp1, AddrL) | carry_high());
        self.store(op);
    }

    fn store(&mut self, op: CpuOperation) {
        self.append(op);
        self.append(FETCH | PC_INC);
    }

    // No memory operand

    /// The dummy read of the byte after the opcode is discarded.
    pub(in crate::cpu) fn implied(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(Tmp2, Pcl));
        self.append(FETCH | op | PC_INC);
    }

    pub(in crate::cpu) fn push(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(Tmp2, Pcl));
        self.append(op | CpuOperation::unary(DataOpcode::DecNoFlags, S));
        self.append(FETCH | PC_INC);
    }

    pub(in crate::cpu) fn pull(&mut self, op: CpuOperation) {
        self.append(CpuOperation::read(Tmp2, Pcl));
        self.append(CpuOperation::unary(DataOpcode::IncNoFlags, S));
        self.append(op);
        self.append(FETCH | PC_INC);
    }
}
