use log::debug;
use log::trace;

use super::instructions::*;
#[cfg(feature = "unofficial-opcodes")]
use super::AndRegister;
use super::CpuOperation;
use super::DataOpcode;
use super::DataOpcode::*;
use super::Instruction;
use super::MicroSequence;
use super::ReadOffset;
use super::Register;
use super::Register::*;
use super::Status;
use super::VectorOffset;
use super::MICRO_SEQUENCE_LEN;

const PC_INC: CpuOperation = CpuOperation::PC_INC;
const FETCH: CpuOperation = CpuOperation::FETCH;

/// Operation applied to the operand once it has been read into TMP1.
fn with_operand(opcode: DataOpcode, dst: Register) -> CpuOperation {
    CpuOperation::transfer(opcode, dst, Tmp1)
}

fn store(src: Register) -> CpuOperation {
    CpuOperation::write(src, AddrL)
}

fn push(src: Register) -> CpuOperation {
    CpuOperation::write(src, S) | CpuOperation::unary(DecNoFlags, S)
}

fn increment_stack() -> CpuOperation {
    CpuOperation::unary(IncNoFlags, S)
}

/// Stores `A & X`.
#[cfg(feature = "unofficial-opcodes")]
fn store_a_and_x() -> CpuOperation {
    CpuOperation::write_and(A, AndRegister::X, AddrL)
}

/// Turns instruction identifiers into the control words the interpreter runs, one per cycle.
///
/// The decoder owns the buffer it decodes into, so each result borrows the decoder and
/// must be dropped (or copied out) before the next instruction is decoded.
#[derive(Debug, Default)]
pub struct Decoder {
    sequence: MicroSequence,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an instruction into at most [MICRO_SEQUENCE_LEN] cycles, padded with no-ops.
    ///
    /// Identifiers with no defined instruction decode to an all-zero sequence.
    pub fn decode(&mut self, instruction: Instruction) -> &[CpuOperation; MICRO_SEQUENCE_LEN] {
        self.sequence.clear();
        self.decode_into_sequence(instruction);

        if self.sequence.is_empty() {
            debug!("No instruction for {}, decoding as no-op", instruction);
        } else {
            trace!("Decoded {} into {} cycles", instruction, self.sequence.len());
        }

        self.sequence.expose()
    }

    fn decode_into_sequence(&mut self, instruction: Instruction) {
        let s = &mut self.sequence;

        match instruction {
            // Loads
            LDA_IMMEDIATE => s.immediate(with_operand(Mov, A)),
            LDA_ZERO_PAGE => s.zero_page(with_operand(Mov, A)),
            LDA_ZERO_PAGE_X => s.zero_page_indexed(with_operand(Mov, A), X),
            LDA_ABSOLUTE => s.absolute(with_operand(Mov, A)),
            LDA_ABSOLUTE_X => s.absolute_indexed(with_operand(Mov, A), X),
            LDA_ABSOLUTE_Y => s.absolute_indexed(with_operand(Mov, A), Y),
            LDA_INDEXED_INDIRECT => s.indexed_indirect(with_operand(Mov, A)),
            LDA_INDIRECT_INDEXED => s.indirect_indexed(with_operand(Mov, A)),

            LDX_IMMEDIATE => s.immediate(with_operand(Mov, X)),
            LDX_ZERO_PAGE => s.zero_page(with_operand(Mov, X)),
            LDX_ZERO_PAGE_Y => s.zero_page_indexed(with_operand(Mov, X), Y),
            LDX_ABSOLUTE => s.absolute(with_operand(Mov, X)),
            LDX_ABSOLUTE_Y => s.absolute_indexed(with_operand(Mov, X), Y),

            LDY_IMMEDIATE => s.immediate(with_operand(Mov, Y)),
            LDY_ZERO_PAGE => s.zero_page(with_operand(Mov, Y)),
            LDY_ZERO_PAGE_X => s.zero_page_indexed(with_operand(Mov, Y), X),
            LDY_ABSOLUTE => s.absolute(with_operand(Mov, Y)),
            LDY_ABSOLUTE_X => s.absolute_indexed(with_operand(Mov, Y), X),

            // Stores
            STA_ZERO_PAGE => s.write_zero_page(store(A)),
            STA_ZERO_PAGE_X => s.write_zero_page_indexed(store(A), X),
            STA_ABSOLUTE => s.write_absolute(store(A)),
            STA_ABSOLUTE_X => s.write_absolute_indexed(store(A), X),
            STA_ABSOLUTE_Y => s.write_absolute_indexed(store(A), Y),
            STA_INDEXED_INDIRECT => s.write_indexed_indirect(store(A)),
            STA_INDIRECT_INDEXED => s.write_indirect_indexed(store(A)),

            STX_ZERO_PAGE => s.write_zero_page(store(X)),
            STX_ZERO_PAGE_Y => s.write_zero_page_indexed(store(X), Y),
            STX_ABSOLUTE => s.write_absolute(store(X)),

            STY_ZERO_PAGE => s.write_zero_page(store(Y)),
            STY_ZERO_PAGE_X => s.write_zero_page_indexed(store(Y), X),
            STY_ABSOLUTE => s.write_absolute(store(Y)),

            // Arithmetic and logic on the accumulator
            ORA_IMMEDIATE => s.immediate(with_operand(Or, A)),
            ORA_ZERO_PAGE => s.zero_page(with_operand(Or, A)),
            ORA_ZERO_PAGE_X => s.zero_page_indexed(with_operand(Or, A), X),
            ORA_ABSOLUTE => s.absolute(with_operand(Or, A)),
            ORA_ABSOLUTE_X => s.absolute_indexed(with_operand(Or, A), X),
            ORA_ABSOLUTE_Y => s.absolute_indexed(with_operand(Or, A), Y),
            ORA_INDEXED_INDIRECT => s.indexed_indirect(with_operand(Or, A)),
            ORA_INDIRECT_INDEXED => s.indirect_indexed(with_operand(Or, A)),

            AND_IMMEDIATE => s.immediate(with_operand(And, A)),
            AND_ZERO_PAGE => s.zero_page(with_operand(And, A)),
            AND_ZERO_PAGE_X => s.zero_page_indexed(with_operand(And, A), X),
            AND_ABSOLUTE => s.absolute(with_operand(And, A)),
            AND_ABSOLUTE_X => s.absolute_indexed(with_operand(And, A), X),
            AND_ABSOLUTE_Y => s.absolute_indexed(with_operand(And, A), Y),
            AND_INDEXED_INDIRECT => s.indexed_indirect(with_operand(And, A)),
            AND_INDIRECT_INDEXED => s.indirect_indexed(with_operand(And, A)),

            EOR_IMMEDIATE => s.immediate(with_operand(Xor, A)),
            EOR_ZERO_PAGE => s.zero_page(with_operand(Xor, A)),
            EOR_ZERO_PAGE_X => s.zero_page_indexed(with_operand(Xor, A), X),
            EOR_ABSOLUTE => s.absolute(with_operand(Xor, A)),
            EOR_ABSOLUTE_X => s.absolute_indexed(with_operand(Xor, A), X),
            EOR_ABSOLUTE_Y => s.absolute_indexed(with_operand(Xor, A), Y),
            EOR_INDEXED_INDIRECT => s.indexed_indirect(with_operand(Xor, A)),
            EOR_INDIRECT_INDEXED => s.indirect_indexed(with_operand(Xor, A)),

            ADC_IMMEDIATE => s.immediate(with_operand(Adc, A)),
            ADC_ZERO_PAGE => s.zero_page(with_operand(Adc, A)),
            ADC_ZERO_PAGE_X => s.zero_page_indexed(with_operand(Adc, A), X),
            ADC_ABSOLUTE => s.absolute(with_operand(Adc, A)),
            ADC_ABSOLUTE_X => s.absolute_indexed(with_operand(Adc, A), X),
            ADC_ABSOLUTE_Y => s.absolute_indexed(with_operand(Adc, A), Y),
            ADC_INDEXED_INDIRECT => s.indexed_indirect(with_operand(Adc, A)),
            ADC_INDIRECT_INDEXED => s.indirect_indexed(with_operand(Adc, A)),

            SBC_IMMEDIATE => s.immediate(with_operand(Sbc, A)),
            SBC_ZERO_PAGE => s.zero_page(with_operand(Sbc, A)),
            SBC_ZERO_PAGE_X => s.zero_page_indexed(with_operand(Sbc, A), X),
            SBC_ABSOLUTE => s.absolute(with_operand(Sbc, A)),
            SBC_ABSOLUTE_X => s.absolute_indexed(with_operand(Sbc, A), X),
            SBC_ABSOLUTE_Y => s.absolute_indexed(with_operand(Sbc, A), Y),
            SBC_INDEXED_INDIRECT => s.indexed_indirect(with_operand(Sbc, A)),
            SBC_INDIRECT_INDEXED => s.indirect_indexed(with_operand(Sbc, A)),

            CMP_IMMEDIATE => s.immediate(with_operand(Cmp, A)),
            CMP_ZERO_PAGE => s.zero_page(with_operand(Cmp, A)),
            CMP_ZERO_PAGE_X => s.zero_page_indexed(with_operand(Cmp, A), X),
            CMP_ABSOLUTE => s.absolute(with_operand(Cmp, A)),
            CMP_ABSOLUTE_X => s.absolute_indexed(with_operand(Cmp, A), X),
            CMP_ABSOLUTE_Y => s.absolute_indexed(with_operand(Cmp, A), Y),
            CMP_INDEXED_INDIRECT => s.indexed_indirect(with_operand(Cmp, A)),
            CMP_INDIRECT_INDEXED => s.indirect_indexed(with_operand(Cmp, A)),

            CPX_IMMEDIATE => s.immediate(with_operand(Cmp, X)),
            CPX_ZERO_PAGE => s.zero_page(with_operand(Cmp, X)),
            CPX_ABSOLUTE => s.absolute(with_operand(Cmp, X)),

            CPY_IMMEDIATE => s.immediate(with_operand(Cmp, Y)),
            CPY_ZERO_PAGE => s.zero_page(with_operand(Cmp, Y)),
            CPY_ABSOLUTE => s.absolute(with_operand(Cmp, Y)),

            BIT_ZERO_PAGE => s.zero_page(with_operand(Bit, A)),
            BIT_ABSOLUTE => s.absolute(with_operand(Bit, A)),

            // Shifts, increments and decrements
            ASL_ACCUMULATOR => s.implied(CpuOperation::unary(Asl, A)),
            ASL_ZERO_PAGE => s.read_modify_write_zero_page(CpuOperation::unary(Asl, Tmp1)),
            ASL_ZERO_PAGE_X => s.read_modify_write_zero_page_x(CpuOperation::unary(Asl, Tmp1)),
            ASL_ABSOLUTE => s.read_modify_write_absolute(CpuOperation::unary(Asl, Tmp1)),
            ASL_ABSOLUTE_X => s.read_modify_write_absolute_x(CpuOperation::unary(Asl, Tmp1)),

            LSR_ACCUMULATOR => s.implied(CpuOperation::unary(Lsr, A)),
            LSR_ZERO_PAGE => s.read_modify_write_zero_page(CpuOperation::unary(Lsr, Tmp1)),
            LSR_ZERO_PAGE_X => s.read_modify_write_zero_page_x(CpuOperation::unary(Lsr, Tmp1)),
            LSR_ABSOLUTE => s.read_modify_write_absolute(CpuOperation::unary(Lsr, Tmp1)),
            LSR_ABSOLUTE_X => s.read_modify_write_absolute_x(CpuOperation::unary(Lsr, Tmp1)),

            ROL_ACCUMULATOR => s.implied(CpuOperation::unary(Rol, A)),
            ROL_ZERO_PAGE => s.read_modify_write_zero_page(CpuOperation::unary(Rol, Tmp1)),
            ROL_ZERO_PAGE_X => s.read_modify_write_zero_page_x(CpuOperation::unary(Rol, Tmp1)),
            ROL_ABSOLUTE => s.read_modify_write_absolute(CpuOperation::unary(Rol, Tmp1)),
            ROL_ABSOLUTE_X => s.read_modify_write_absolute_x(CpuOperation::unary(Rol, Tmp1)),

            ROR_ACCUMULATOR => s.implied(CpuOperation::unary(Ror, A)),
            ROR_ZERO_PAGE => s.read_modify_write_zero_page(CpuOperation::unary(Ror, Tmp1)),
            ROR_ZERO_PAGE_X => s.read_modify_write_zero_page_x(CpuOperation::unary(Ror, Tmp1)),
            ROR_ABSOLUTE => s.read_modify_write_absolute(CpuOperation::unary(Ror, Tmp1)),
            ROR_ABSOLUTE_X => s.read_modify_write_absolute_x(CpuOperation::unary(Ror, Tmp1)),

            INC_ZERO_PAGE => s.read_modify_write_zero_page(CpuOperation::unary(Inc, Tmp1)),
            INC_ZERO_PAGE_X => s.read_modify_write_zero_page_x(CpuOperation::unary(Inc, Tmp1)),
            INC_ABSOLUTE => s.read_modify_write_absolute(CpuOperation::unary(Inc, Tmp1)),
            INC_ABSOLUTE_X => s.read_modify_write_absolute_x(CpuOperation::unary(Inc, Tmp1)),

            DEC_ZERO_PAGE => s.read_modify_write_zero_page(CpuOperation::unary(Dec, Tmp1)),
            DEC_ZERO_PAGE_X => s.read_modify_write_zero_page_x(CpuOperation::unary(Dec, Tmp1)),
            DEC_ABSOLUTE => s.read_modify_write_absolute(CpuOperation::unary(Dec, Tmp1)),
            DEC_ABSOLUTE_X => s.read_modify_write_absolute_x(CpuOperation::unary(Dec, Tmp1)),

            INX => s.implied(CpuOperation::unary(Inc, X)),
            INY => s.implied(CpuOperation::unary(Inc, Y)),
            DEX => s.implied(CpuOperation::unary(Dec, X)),
            DEY => s.implied(CpuOperation::unary(Dec, Y)),

            // Register transfers
            TAX => s.implied(CpuOperation::transfer(Mov, X, A)),
            TAY => s.implied(CpuOperation::transfer(Mov, Y, A)),
            TXA => s.implied(CpuOperation::transfer(Mov, A, X)),
            TYA => s.implied(CpuOperation::transfer(Mov, A, Y)),
            TSX => s.implied(CpuOperation::transfer(Mov, X, S)),
            TXS => s.implied(CpuOperation::transfer(MovNoFlags, S, X)),

            // Status flags
            CLC => s.implied(CpuOperation::clear_flags(Status::CARRY)),
            CLD => s.implied(CpuOperation::clear_flags(Status::DECIMAL)),
            CLI => s.implied(CpuOperation::clear_flags(Status::INTERRUPT_DISABLE)),
            CLV => s.implied(CpuOperation::clear_flags(Status::OVERFLOW)),
            SEC => s.implied(CpuOperation::set_flags(Status::CARRY)),
            SED => s.implied(CpuOperation::set_flags(Status::DECIMAL)),
            SEI => s.implied(CpuOperation::set_flags(Status::INTERRUPT_DISABLE)),

            NOP => s.implied(CpuOperation::NOP),

            // Stack
            PHA => s.push(CpuOperation::write(A, S)),
            PHP => s.push(CpuOperation::PUSH_STATUS),
            PLA => s.pull(CpuOperation::read(Tmp1, S) | with_operand(Mov, A)),
            PLP => s.pull(CpuOperation::PULL_STATUS),

            // Branches. The interpreter picks the condition from the opcode in INST and adds
            // the cycles for a taken branch.
            BPL | BMI | BVC | BVS | BCC | BCS | BNE | BEQ => {
                s.append(CpuOperation::read(Tmp1, Pcl) | PC_INC);
                s.append(CpuOperation::BRANCH);
            }

            // Jumps and subroutines
            JMP_ABSOLUTE => {
                s.append(CpuOperation::read(Tmp1, Pcl) | PC_INC);
                s.append(
                    CpuOperation::read(Pch, Pcl) | CpuOperation::transfer(MovNoFlags, Pcl, Tmp1),
                );
                s.append(FETCH | PC_INC);
            }
            JMP_INDIRECT => {
                // The pointer's high byte is read without carrying into the page, as the
                // 6502 does when the pointer ends a page.
                s.append(CpuOperation::read(Tmp1, Pcl) | PC_INC);
                s.append(CpuOperation::read(Tmp2, Pcl) | PC_INC);
                s.append(CpuOperation::read(Pcl, Tmp1));
                s.append(CpuOperation::read(Pch, Tmp1).with_offset(ReadOffset::NEXT));
                s.append(FETCH | PC_INC);
            }
            JSR => {
                s.append(CpuOperation::read(Tmp1, Pcl) | PC_INC);
                // Internal cycle, the bus reads the top of the stack
                s.append(CpuOperation::read(Tmp2, S));
                s.append(push(Pch));
                s.append(push(Pcl));
                s.append(
                    CpuOperation::read(Pch, Pcl) | CpuOperation::transfer(MovNoFlags, Pcl, Tmp1),
                );
                s.append(FETCH | PC_INC);
            }
            RTS => {
                s.append(CpuOperation::read(Tmp2, Pcl));
                s.append(increment_stack());
                s.append(CpuOperation::read(Pcl, S) | increment_stack());
                s.append(CpuOperation::read(Pch, S));
                s.append(PC_INC);
                s.append(FETCH | PC_INC);
            }
            RTI => {
                s.append(CpuOperation::read(Tmp2, Pcl));
                s.append(increment_stack());
                s.append(CpuOperation::PULL_STATUS | increment_stack());
                s.append(CpuOperation::read(Pcl, S) | increment_stack());
                s.append(CpuOperation::read(Pch, S));
                s.append(FETCH | PC_INC);
            }

            // Interrupts
            BRK => {
                s.append(CpuOperation::read(Tmp2, Pcl) | PC_INC);
                s.append(push(Pch));
                s.append(push(Pcl));
                s.append(CpuOperation::BRK | CpuOperation::unary(DecNoFlags, S));
                s.append(CpuOperation::read_vector(Pcl, VectorOffset::IrqLow));
                s.append(
                    CpuOperation::read_vector(Pch, VectorOffset::IrqHigh)
                        | CpuOperation::set_flags(Status::INTERRUPT_DISABLE),
                );
                s.append(FETCH | PC_INC);
            }
            NMI => {
                s.append(CpuOperation::read(Tmp2, Pcl));
                s.append(push(Pch));
                s.append(push(Pcl));
                s.append(push(P));
                s.append(CpuOperation::read_vector(Pcl, VectorOffset::NmiLow));
                s.append(
                    CpuOperation::read_vector(Pch, VectorOffset::NmiHigh)
                        | CpuOperation::set_flags(Status::INTERRUPT_DISABLE),
                );
                s.append(FETCH | PC_INC);
            }
            IRQ => {
                // The IRQ cycle pushes P, sets I and queues the vector load itself, so an NMI
                // arriving in time can take over the vector.
                s.append(CpuOperation::read(Tmp2, Pcl));
                s.append(push(Pch));
                s.append(push(Pcl));
                s.append(CpuOperation::IRQ | CpuOperation::unary(DecNoFlags, S));
            }

            // Undefined opcodes with a single operation per cycle
            #[cfg(feature = "unofficial-opcodes")]
            NOP_1A | NOP_3A | NOP_5A | NOP_7A | NOP_DA | NOP_FA => s.implied(CpuOperation::NOP),
            #[cfg(feature = "unofficial-opcodes")]
            SKB_80 | SKB_82 | SKB_89 | SKB_C2 | SKB_E2 => s.immediate(CpuOperation::NOP),
            #[cfg(feature = "unofficial-opcodes")]
            IGN_ZERO_PAGE_04 | IGN_ZERO_PAGE_44 | IGN_ZERO_PAGE_64 => {
                s.zero_page(CpuOperation::NOP)
            }
            #[cfg(feature = "unofficial-opcodes")]
            IGN_ZERO_PAGE_X_14 | IGN_ZERO_PAGE_X_34 | IGN_ZERO_PAGE_X_54 | IGN_ZERO_PAGE_X_74
            | IGN_ZERO_PAGE_X_D4 | IGN_ZERO_PAGE_X_F4 => {
                s.zero_page_indexed(CpuOperation::NOP, X)
            }
            #[cfg(feature = "unofficial-opcodes")]
            IGN_ABSOLUTE => s.absolute(CpuOperation::NOP),
            #[cfg(feature = "unofficial-opcodes")]
            IGN_ABSOLUTE_X_1C | IGN_ABSOLUTE_X_3C | IGN_ABSOLUTE_X_5C | IGN_ABSOLUTE_X_7C
            | IGN_ABSOLUTE_X_DC | IGN_ABSOLUTE_X_FC => s.absolute_indexed(CpuOperation::NOP, X),
            #[cfg(feature = "unofficial-opcodes")]
            SAX_ZERO_PAGE => s.write_zero_page(store_a_and_x()),
            #[cfg(feature = "unofficial-opcodes")]
            SAX_ZERO_PAGE_Y => s.write_zero_page_indexed(store_a_and_x(), Y),
            #[cfg(feature = "unofficial-opcodes")]
            SAX_ABSOLUTE => s.write_absolute(store_a_and_x()),
            #[cfg(feature = "unofficial-opcodes")]
            SAX_INDEXED_INDIRECT => s.write_indexed_indirect(store_a_and_x()),
            #[cfg(feature = "unofficial-opcodes")]
            SBC_IMMEDIATE_EB => s.immediate(with_operand(Sbc, A)),

            _ => {}
        }
    }
}
