//! Control words
//!
//! Every cycle of the CPU interpreter is described by one 32-bit [CpuOperation]:
//!
//! ```text
//!  31    28 27    24 23    20 19    16 15    12 11     8 7         1 0
//! +--------+--------+--------+--------+--------+--------+-----------+-+
//! |operand | offset |address | memop  |  dst   |  src   |  data op  |P|
//! +--------+--------+--------+--------+--------+--------+-----------+-+
//! ```
//!
//! Bit 0 increments the program counter. Bits 1-15 hold the data operation: a 7-bit
//! [DataOpcode] followed by the source and destination [Register]s. When the data opcode
//! clears or sets status flags, bits 8-15 are a [Status] mask instead.
//!
//! Bits 16-31 hold the memory operation: a 4-bit [MemoryOpcode], the register holding the
//! low byte of the address, a constant offset added to that address and the register the
//! byte is read into or written from. For writes the offset slot names a second register
//! which is AND-ed into the written byte, as some undefined opcodes require.

use std::fmt;
use std::ops::BitOr;
use std::ops::BitOrAssign;

use bitflags::bitflags;

const PC_INC_BIT: u32 = 0x0000_0001;

const DATA_OPCODE_SHIFT: u32 = 1;
const DATA_SRC_SHIFT: u32 = 8;
const DATA_DST_SHIFT: u32 = 12;
const MASK_SHIFT: u32 = 8;
const MEMORY_OPCODE_SHIFT: u32 = 16;
const ADDRESS_SHIFT: u32 = 20;
const OFFSET_SHIFT: u32 = 24;
const OPERAND_SHIFT: u32 = 28;

const DATA_OPCODE_MASK: u32 = 0x7F;
const NIBBLE_MASK: u32 = 0x0F;
const BYTE_MASK: u32 = 0xFF;

macro_rules! def_field_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$variant_meta:meta])* $variant:ident = $value:literal),* $(,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $(
            $(#[$variant_meta])*
            $variant = $value,
            )*
        }

        impl $name {
            pub const fn bits(self) -> u8 {
                self as u8
            }

            pub const fn from_bits(bits: u8) -> Option<Self> {
                match bits {
                    $(
                    $value => Some($name::$variant),
                    )*
                    _ => None,
                }
            }
        }
    };
}

def_field_enum! {
    /// Register locations addressable from a 4-bit field.
    ///
    /// When used as a memory address, a register names the low byte of a pair: PCL/PCH,
    /// ADDRL/ADDRH, TMP1/TMP2, S with the stack page and V with the vector page.
    Register {
        Pcl = 0,
        Pch = 1,
        AddrL = 2,
        AddrH = 3,
        Tmp1 = 4,
        Tmp2 = 5,
        S = 6,
        /// Base of the interrupt vector table, `$FFFA`.
        Vector = 8,
        A = 10,
        X = 11,
        Y = 12,
        P = 13,
        /// The opcode currently executing.
        Inst = 14,
    }
}

def_field_enum! {
    DataOpcode {
        Nop = 0,
        Inc = 1,
        IncNoFlags = 2,
        Dec = 3,
        DecNoFlags = 4,
        Mov = 5,
        MovNoFlags = 6,
        ClearFlags = 7,
        SetFlags = 8,
        Cmp = 9,
        Asl = 10,
        Lsr = 11,
        Rol = 12,
        Ror = 13,
        Xor = 14,
        Or = 15,
        And = 16,
        Add = 17,
        Adc = 18,
        Sbc = 19,
        Bit = 20,
        /// Adds the carry of the previous indexed add into the high byte, costing the
        /// interpreter an extra cycle when a page boundary was crossed.
        FixHigh = 21,
    }
}

def_field_enum! {
    MemoryOpcode {
        Nop = 0,
        Read = 1,
        /// Reads into the low byte of a register pair and zeroes the high byte.
        ReadZeroPage = 2,
        Write = 3,
        /// Fetches the next opcode, finishing the current instruction.
        Fetch = 4,
        /// Evaluates the branch condition selected by the current opcode.
        Branch = 5,
        /// Pushes P with the B flag set, post-decrementing S.
        PushStatus = 6,
        /// Pulls P from the stack.
        PullStatus = 7,
        /// Pushes P with the B flag set. An NMI may hijack the vector load on this cycle.
        Brk = 8,
        /// Pushes P with the B flag clear, sets I and loads the IRQ (or hijacking NMI) vector.
        Irq = 9,
    }
}

def_field_enum! {
    /// Offsets from [Register::Vector] to each byte of the interrupt vector table.
    VectorOffset {
        NmiLow = 0,
        NmiHigh = 1,
        ResetLow = 2,
        ResetHigh = 3,
        IrqLow = 4,
        IrqHigh = 5,
    }
}

def_field_enum! {
    /// Registers that can be AND-ed into a written byte.
    ///
    /// A zero second-operand slot marks a plain write, so [Register::Pcl] has no
    /// counterpart here. Every other variant shares its bits with the [Register] it names.
    AndRegister {
        Pch = 1,
        AddrL = 2,
        AddrH = 3,
        Tmp1 = 4,
        Tmp2 = 5,
        S = 6,
        Vector = 8,
        A = 10,
        X = 11,
        Y = 12,
        P = 13,
        Inst = 14,
    }
}

impl AndRegister {
    /// Returns `None` for [Register::Pcl].
    pub const fn from_register(register: Register) -> Option<Self> {
        AndRegister::from_bits(register.bits())
    }

    pub const fn register(self) -> Register {
        match self {
            AndRegister::Pch => Register::Pch,
            AndRegister::AddrL => Register::AddrL,
            AndRegister::AddrH => Register::AddrH,
            AndRegister::Tmp1 => Register::Tmp1,
            AndRegister::Tmp2 => Register::Tmp2,
            AndRegister::S => Register::S,
            AndRegister::Vector => Register::Vector,
            AndRegister::A => Register::A,
            AndRegister::X => Register::X,
            AndRegister::Y => Register::Y,
            AndRegister::P => Register::P,
            AndRegister::Inst => Register::Inst,
        }
    }
}

/// A constant from 0 to 15 added to the address of a read.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ReadOffset(u8);

impl ReadOffset {
    pub const ZERO: ReadOffset = ReadOffset(0);
    /// The byte after the address, where a pointer keeps its high byte.
    pub const NEXT: ReadOffset = ReadOffset(1);
    pub const MAX: ReadOffset = ReadOffset(NIBBLE_MASK as u8);

    /// Returns `None` if `offset` does not fit in four bits.
    pub const fn new(offset: u8) -> Option<Self> {
        if (offset as u32) <= NIBBLE_MASK {
            Some(ReadOffset(offset))
        } else {
            None
        }
    }

    pub const fn vector(offset: VectorOffset) -> Self {
        ReadOffset(offset.bits())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl From<VectorOffset> for ReadOffset {
    fn from(offset: VectorOffset) -> Self {
        ReadOffset::vector(offset)
    }
}

impl DataOpcode {
    pub const fn is_flag_operation(self) -> bool {
        matches!(self, DataOpcode::ClearFlags | DataOpcode::SetFlags)
    }
}

bitflags! {
    /// P - processor status.
    #[derive(Default, Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct Status: u8 {
        const NEGATIVE          = 0b1000_0000;
        const OVERFLOW          = 0b0100_0000;
        const BREAK             = 0b0011_0000;
        const DECIMAL           = 0b0000_1000;
        const INTERRUPT_DISABLE = 0b0000_0100;
        const ZERO              = 0b0000_0010;
        const CARRY             = 0b0000_0001;
    }
}

/// A single cycle of the CPU interpreter, packed into 32 bits.
///
/// The all-zero word does nothing. Words combine with `|` because the hardware performs
/// the memory access, the internal transfer and the program counter increment of a cycle
/// at the same time.
#[derive(Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CpuOperation(u32);

impl CpuOperation {
    pub const NOP: CpuOperation = CpuOperation(0);
    pub const PC_INC: CpuOperation = CpuOperation(PC_INC_BIT);

    pub const FETCH: CpuOperation = CpuOperation::memory(MemoryOpcode::Fetch);
    pub const BRANCH: CpuOperation = CpuOperation::memory(MemoryOpcode::Branch);
    pub const PUSH_STATUS: CpuOperation = CpuOperation::memory(MemoryOpcode::PushStatus);
    pub const PULL_STATUS: CpuOperation = CpuOperation::memory(MemoryOpcode::PullStatus);
    pub const BRK: CpuOperation = CpuOperation::memory(MemoryOpcode::Brk);
    pub const IRQ: CpuOperation = CpuOperation::memory(MemoryOpcode::Irq);

    pub const fn from_bits(bits: u32) -> Self {
        CpuOperation(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn with(self, other: CpuOperation) -> Self {
        CpuOperation(self.0 | other.0)
    }

    // Data operations

    /// `dst = dst <op> src`, or `dst = src` for moves.
    pub const fn transfer(opcode: DataOpcode, dst: Register, src: Register) -> Self {
        debug_assert!(!opcode.is_flag_operation());
        CpuOperation(
            (opcode.bits() as u32) << DATA_OPCODE_SHIFT
                | (src.bits() as u32) << DATA_SRC_SHIFT
                | (dst.bits() as u32) << DATA_DST_SHIFT,
        )
    }

    /// An operation on `dst` alone, such as an increment or a shift.
    pub const fn unary(opcode: DataOpcode, dst: Register) -> Self {
        CpuOperation::transfer(opcode, dst, Register::Pcl)
    }

    pub const fn clear_flags(mask: Status) -> Self {
        CpuOperation::flags(DataOpcode::ClearFlags, mask)
    }

    pub const fn set_flags(mask: Status) -> Self {
        CpuOperation::flags(DataOpcode::SetFlags, mask)
    }

    const fn flags(opcode: DataOpcode, mask: Status) -> Self {
        CpuOperation(
            (opcode.bits() as u32) << DATA_OPCODE_SHIFT | (mask.bits() as u32) << MASK_SHIFT,
        )
    }

    // Memory operations

    pub const fn memory(opcode: MemoryOpcode) -> Self {
        CpuOperation((opcode.bits() as u32) << MEMORY_OPCODE_SHIFT)
    }

    /// Read the byte at the address held in `addr` into `dst`.
    pub const fn read(dst: Register, addr: Register) -> Self {
        CpuOperation::memory(MemoryOpcode::Read).with(CpuOperation::access(dst, addr))
    }

    /// Read the byte at `addr` into `dst`, zeroing the high byte of the pair `dst` belongs to.
    pub const fn read_zero_page(dst: Register, addr: Register) -> Self {
        CpuOperation::memory(MemoryOpcode::ReadZeroPage).with(CpuOperation::access(dst, addr))
    }

    /// Read one byte of the interrupt vector table into `dst`.
    pub const fn read_vector(dst: Register, offset: VectorOffset) -> Self {
        CpuOperation::read(dst, Register::Vector).with_offset(ReadOffset::vector(offset))
    }

    /// Write `src` to the address held in `addr`.
    pub const fn write(src: Register, addr: Register) -> Self {
        CpuOperation::memory(MemoryOpcode::Write).with(CpuOperation::access(src, addr))
    }

    /// Write `src & and` to the address held in `addr`.
    pub const fn write_and(src: Register, and: AndRegister, addr: Register) -> Self {
        CpuOperation::write(src, addr).with(CpuOperation((and.bits() as u32) << OFFSET_SHIFT))
    }

    /// Adds a constant offset to the address of a read.
    pub const fn with_offset(self, offset: ReadOffset) -> Self {
        self.with(CpuOperation((offset.bits() as u32) << OFFSET_SHIFT))
    }

    const fn access(operand: Register, addr: Register) -> Self {
        CpuOperation(
            (operand.bits() as u32) << OPERAND_SHIFT | (addr.bits() as u32) << ADDRESS_SHIFT,
        )
    }

    // Raw fields

    pub const fn pc_increment(self) -> bool {
        self.0 & PC_INC_BIT != 0
    }

    pub const fn data_opcode_bits(self) -> u8 {
        ((self.0 >> DATA_OPCODE_SHIFT) & DATA_OPCODE_MASK) as u8
    }

    pub const fn data_src_bits(self) -> u8 {
        ((self.0 >> DATA_SRC_SHIFT) & NIBBLE_MASK) as u8
    }

    pub const fn data_dst_bits(self) -> u8 {
        ((self.0 >> DATA_DST_SHIFT) & NIBBLE_MASK) as u8
    }

    pub const fn mask_bits(self) -> u8 {
        ((self.0 >> MASK_SHIFT) & BYTE_MASK) as u8
    }

    pub const fn memory_opcode_bits(self) -> u8 {
        ((self.0 >> MEMORY_OPCODE_SHIFT) & NIBBLE_MASK) as u8
    }

    pub const fn address_bits(self) -> u8 {
        ((self.0 >> ADDRESS_SHIFT) & NIBBLE_MASK) as u8
    }

    pub const fn offset_bits(self) -> u8 {
        ((self.0 >> OFFSET_SHIFT) & NIBBLE_MASK) as u8
    }

    pub const fn operand_bits(self) -> u8 {
        ((self.0 >> OPERAND_SHIFT) & NIBBLE_MASK) as u8
    }

    // Typed fields

    pub fn is_nop(self) -> bool {
        self == CpuOperation::NOP
    }

    pub fn is_fetch(self) -> bool {
        self.memory_opcode() == Some(MemoryOpcode::Fetch)
    }

    pub fn data_opcode(self) -> Option<DataOpcode> {
        DataOpcode::from_bits(self.data_opcode_bits())
    }

    pub fn memory_opcode(self) -> Option<MemoryOpcode> {
        MemoryOpcode::from_bits(self.memory_opcode_bits())
    }

    /// Returns `None` if a field holds a value with no meaning.
    pub fn data_operation(self) -> Option<DataOperation> {
        let operation = match self.data_opcode()? {
            DataOpcode::Nop => DataOperation::Nop,
            DataOpcode::ClearFlags => {
                DataOperation::ClearFlags(Status::from_bits_retain(self.mask_bits()))
            }
            DataOpcode::SetFlags => {
                DataOperation::SetFlags(Status::from_bits_retain(self.mask_bits()))
            }
            opcode => DataOperation::Transfer {
                opcode,
                dst: Register::from_bits(self.data_dst_bits())?,
                src: Register::from_bits(self.data_src_bits())?,
            },
        };

        Some(operation)
    }

    /// Returns `None` if a field holds a value with no meaning.
    pub fn memory_operation(self) -> Option<MemoryOperation> {
        let operand = Register::from_bits(self.operand_bits());
        let addr = Register::from_bits(self.address_bits());

        let operation = match self.memory_opcode()? {
            MemoryOpcode::Nop => MemoryOperation::Nop,
            MemoryOpcode::Read => MemoryOperation::Read {
                dst: operand?,
                addr: addr?,
                offset: ReadOffset(self.offset_bits()),
            },
            MemoryOpcode::ReadZeroPage => MemoryOperation::ReadZeroPage {
                dst: operand?,
                addr: addr?,
            },
            MemoryOpcode::Write => {
                let and = match self.offset_bits() {
                    0 => None,
                    bits => Some(AndRegister::from_bits(bits)?),
                };
                MemoryOperation::Write {
                    src: operand?,
                    and,
                    addr: addr?,
                }
            }
            MemoryOpcode::Fetch => MemoryOperation::Fetch,
            MemoryOpcode::Branch => MemoryOperation::Branch,
            MemoryOpcode::PushStatus => MemoryOperation::PushStatus,
            MemoryOpcode::PullStatus => MemoryOperation::PullStatus,
            MemoryOpcode::Brk => MemoryOperation::Brk,
            MemoryOpcode::Irq => MemoryOperation::Irq,
        };

        Some(operation)
    }
}

impl BitOr for CpuOperation {
    type Output = CpuOperation;

    fn bitor(self, rhs: CpuOperation) -> CpuOperation {
        self.with(rhs)
    }
}

impl BitOrAssign for CpuOperation {
    fn bitor_assign(&mut self, rhs: CpuOperation) {
        *self = self.with(rhs);
    }
}

impl fmt::Debug for CpuOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CpuOperation({:#010x})", self.0)
    }
}

/// The internal transfer half of a cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DataOperation {
    Nop,
    Transfer {
        opcode: DataOpcode,
        dst: Register,
        src: Register,
    },
    ClearFlags(Status),
    SetFlags(Status),
}

impl From<DataOperation> for CpuOperation {
    fn from(operation: DataOperation) -> Self {
        match operation {
            DataOperation::Nop => CpuOperation::NOP,
            DataOperation::Transfer { opcode, dst, src } => {
                CpuOperation::transfer(opcode, dst, src)
            }
            DataOperation::ClearFlags(mask) => CpuOperation::clear_flags(mask),
            DataOperation::SetFlags(mask) => CpuOperation::set_flags(mask),
        }
    }
}

/// The bus transaction half of a cycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MemoryOperation {
    Nop,
    Read {
        dst: Register,
        addr: Register,
        offset: ReadOffset,
    },
    ReadZeroPage {
        dst: Register,
        addr: Register,
    },
    Write {
        src: Register,
        and: Option<AndRegister>,
        addr: Register,
    },
    Fetch,
    Branch,
    PushStatus,
    PullStatus,
    Brk,
    Irq,
}

impl From<MemoryOperation> for CpuOperation {
    fn from(operation: MemoryOperation) -> Self {
        match operation {
            MemoryOperation::Nop => CpuOperation::NOP,
            MemoryOperation::Read { dst, addr, offset } => {
                CpuOperation::read(dst, addr).with_offset(offset)
            }
            MemoryOperation::ReadZeroPage { dst, addr } => CpuOperation::read_zero_page(dst, addr),
            MemoryOperation::Write {
                src,
                and: Some(and),
                addr,
            } => CpuOperation::write_and(src, and, addr),
            MemoryOperation::Write {
                src,
                and: None,
                addr,
            } => CpuOperation::write(src, addr),
            MemoryOperation::Fetch => CpuOperation::FETCH,
            MemoryOperation::Branch => CpuOperation::BRANCH,
            MemoryOperation::PushStatus => CpuOperation::PUSH_STATUS,
            MemoryOperation::PullStatus => CpuOperation::PULL_STATUS,
            MemoryOperation::Brk => CpuOperation::BRK,
            MemoryOperation::Irq => CpuOperation::IRQ,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_word_is_a_true_no_op() {
        let op = CpuOperation::NOP;

        assert!(!op.pc_increment());
        assert_eq!(op.data_operation(), Some(DataOperation::Nop));
        assert_eq!(op.memory_operation(), Some(MemoryOperation::Nop));
    }

    #[test]
    fn every_nibble_field_round_trips() {
        for value in 0..=0x0Fu8 {
            let reg_value = u32::from(value);
            let op = CpuOperation::from_bits(
                reg_value << DATA_SRC_SHIFT
                    | reg_value << DATA_DST_SHIFT
                    | reg_value << MEMORY_OPCODE_SHIFT
                    | reg_value << ADDRESS_SHIFT
                    | reg_value << OFFSET_SHIFT
                    | reg_value << OPERAND_SHIFT,
            );

            assert_eq!(op.data_src_bits(), value);
            assert_eq!(op.data_dst_bits(), value);
            assert_eq!(op.memory_opcode_bits(), value);
            assert_eq!(op.address_bits(), value);
            assert_eq!(op.offset_bits(), value);
            assert_eq!(op.operand_bits(), value);
        }
    }

    #[test]
    fn every_data_opcode_and_mask_round_trips() {
        for value in 0..=0x7Fu8 {
            let op = CpuOperation::from_bits(u32::from(value) << DATA_OPCODE_SHIFT);
            assert_eq!(op.data_opcode_bits(), value);
            assert!(!op.pc_increment());
        }

        for mask in 0..=0xFFu8 {
            let op = CpuOperation::set_flags(Status::from_bits_retain(mask));
            assert_eq!(op.mask_bits(), mask);
            assert_eq!(
                op.data_operation(),
                Some(DataOperation::SetFlags(Status::from_bits_retain(mask)))
            );
        }
    }

    #[test]
    fn every_register_round_trips_through_every_slot() {
        for bits in 0..=0x0Fu8 {
            let Some(reg) = Register::from_bits(bits) else {
                continue;
            };
            assert_eq!(reg.bits(), bits);

            let op = CpuOperation::transfer(DataOpcode::Mov, reg, reg);
            assert_eq!(op.data_dst_bits(), bits);
            assert_eq!(op.data_src_bits(), bits);

            let op = CpuOperation::read(reg, reg);
            assert_eq!(op.operand_bits(), bits);
            assert_eq!(op.address_bits(), bits);
        }
    }

    #[test]
    fn unused_register_slots_do_not_decode() {
        assert_eq!(Register::from_bits(7), None);
        assert_eq!(Register::from_bits(9), None);
        assert_eq!(Register::from_bits(15), None);

        let op = CpuOperation::from_bits(
            u32::from(DataOpcode::Mov.bits()) << DATA_OPCODE_SHIFT | 9 << DATA_DST_SHIFT,
        );
        assert_eq!(op.data_operation(), None);
    }

    #[test]
    fn memory_and_data_operations_combine_into_one_cycle() {
        let op = CpuOperation::read(Register::AddrH, Register::Pcl)
            | CpuOperation::transfer(DataOpcode::Add, Register::AddrL, Register::X)
            | CpuOperation::PC_INC;

        assert!(op.pc_increment());
        assert_eq!(
            op.data_operation(),
            Some(DataOperation::Transfer {
                opcode: DataOpcode::Add,
                dst: Register::AddrL,
                src: Register::X,
            })
        );
        assert_eq!(
            op.memory_operation(),
            Some(MemoryOperation::Read {
                dst: Register::AddrH,
                addr: Register::Pcl,
                offset: ReadOffset::ZERO,
            })
        );
    }

    #[test]
    fn read_offset_and_write_operand_share_a_slot() {
        let read = CpuOperation::read_vector(Register::Pch, VectorOffset::NmiHigh);
        assert_eq!(read.offset_bits(), 1);
        assert_eq!(read.address_bits(), Register::Vector.bits());

        let write = CpuOperation::write_and(Register::A, AndRegister::X, Register::AddrL);
        assert_eq!(write.offset_bits(), Register::X.bits());
        assert_eq!(
            write.memory_operation(),
            Some(MemoryOperation::Write {
                src: Register::A,
                and: Some(AndRegister::X),
                addr: Register::AddrL,
            })
        );

        let write = CpuOperation::write(Register::A, Register::AddrL);
        assert_eq!(
            write.memory_operation(),
            Some(MemoryOperation::Write {
                src: Register::A,
                and: None,
                addr: Register::AddrL,
            })
        );
    }

    #[test]
    fn typed_operations_convert_to_and_from_words() {
        let data = [
            DataOperation::Nop,
            DataOperation::Transfer {
                opcode: DataOpcode::Sbc,
                dst: Register::A,
                src: Register::Tmp1,
            },
            DataOperation::ClearFlags(Status::CARRY),
            DataOperation::SetFlags(Status::INTERRUPT_DISABLE),
        ];

        for operation in data {
            assert_eq!(CpuOperation::from(operation).data_operation(), Some(operation));
        }

        let memory = [
            MemoryOperation::Nop,
            MemoryOperation::Read {
                dst: Register::Pcl,
                addr: Register::Vector,
                offset: ReadOffset::from(VectorOffset::IrqLow),
            },
            MemoryOperation::ReadZeroPage {
                dst: Register::AddrL,
                addr: Register::Pcl,
            },
            MemoryOperation::Write {
                src: Register::Tmp1,
                and: None,
                addr: Register::AddrL,
            },
            MemoryOperation::Fetch,
            MemoryOperation::Branch,
            MemoryOperation::PushStatus,
            MemoryOperation::PullStatus,
            MemoryOperation::Brk,
            MemoryOperation::Irq,
        ];

        for operation in memory {
            assert_eq!(CpuOperation::from(operation).memory_operation(), Some(operation));
        }
    }

    #[test]
    fn read_offsets_round_trip_up_to_the_top_of_the_slot() {
        for bits in 0..=0x0Fu8 {
            let offset = ReadOffset::new(bits).unwrap();
            let operation = MemoryOperation::Read {
                dst: Register::Tmp1,
                addr: Register::AddrL,
                offset,
            };

            let op = CpuOperation::from(operation);
            assert_eq!(op.offset_bits(), bits);
            assert_eq!(op.memory_operation(), Some(operation));
        }

        assert_eq!(ReadOffset::new(0x0F), Some(ReadOffset::MAX));
        assert_eq!(ReadOffset::new(0x10), None);
        assert_eq!(ReadOffset::new(0xFF), None);
    }

    #[test]
    fn every_and_register_round_trips_through_a_write() {
        assert_eq!(AndRegister::from_register(Register::Pcl), None);
        assert_eq!(AndRegister::from_bits(0), None);

        let mut count = 0;
        for bits in 0..=0x0Fu8 {
            let Some(register) = Register::from_bits(bits) else {
                assert_eq!(AndRegister::from_bits(bits), None);
                continue;
            };
            let Some(and) = AndRegister::from_register(register) else {
                continue;
            };
            assert_eq!(and.register(), register);
            assert_eq!(and.bits(), bits);

            let operation = MemoryOperation::Write {
                src: Register::A,
                and: Some(and),
                addr: Register::AddrL,
            };
            assert_eq!(CpuOperation::from(operation).memory_operation(), Some(operation));
            count += 1;
        }

        // Pch is the lowest, Inst the highest.
        assert_eq!(count, 12);
        assert_eq!(AndRegister::Pch.bits(), 1);
        assert_eq!(AndRegister::Inst.bits(), 14);
    }

    #[test]
    fn fetch_is_recognised() {
        assert!((CpuOperation::FETCH | CpuOperation::PC_INC).is_fetch());
        assert!(!CpuOperation::BRANCH.is_fetch());
        assert!(!CpuOperation::NOP.is_fetch());
    }

    #[test]
    fn debug_shows_packed_word() {
        let op = CpuOperation::FETCH | CpuOperation::PC_INC;
        assert_eq!(format!("{:?}", op), "CpuOperation(0x00040001)");
    }
}
