use std::fmt;

/// Number of instruction identifiers: every opcode byte, then NMI and IRQ.
pub const INSTRUCTION_COUNT: usize = 258;

/// Identifies an instruction to decode.
///
/// Values 0-255 are opcode bytes. 256 and 257 never appear on the bus: the interpreter
/// injects them when the NMI or IRQ line is asserted, so interrupt entry decodes through
/// the same interface as an opcode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Instruction(u16);

impl Instruction {
    pub const fn new(id: u16) -> Self {
        Instruction(id)
    }

    pub const fn from_opcode(opcode: u8) -> Self {
        Instruction(opcode as u16)
    }

    pub const fn id(self) -> u16 {
        self.0
    }

    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// The opcode byte, or `None` for the interrupt identifiers.
    pub fn opcode(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }

    pub fn is_interrupt(self) -> bool {
        self.opcode().is_none()
    }

    /// Every identifier, in ascending order.
    pub fn all() -> impl Iterator<Item = Instruction> {
        (0..INSTRUCTION_COUNT as u16).map(Instruction)
    }
}

impl From<u8> for Instruction {
    fn from(opcode: u8) -> Self {
        Instruction::from_opcode(opcode)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode() {
            Some(opcode) => write!(f, "${:02X} {}", opcode, self.mnemonic()),
            None => write!(f, "{}", self.mnemonic()),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
    Relative,
}

impl AddressingMode {
    /// Length in bytes of an instruction using this mode, including the opcode.
    pub fn bytes(self) -> u8 {
        use AddressingMode::*;

        match self {
            Implied | Accumulator => 1,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY | IndexedIndirect | IndirectIndexed
            | Relative => 2,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 3,
        }
    }
}

macro_rules! def_opcodes {
    ($($num:literal => $name:ident => $mnemonic:ident($mode:ident)),* $(,)*) => {
        pub mod instructions {
            use super::Instruction;

            $(
                pub const $name: Instruction = Instruction::new($num);
            )*
        }

        impl Instruction {
            /// Assembler mnemonic, or `"???"` for an identifier with no defined instruction.
            pub fn mnemonic(self) -> &'static str {
                match self.0 {
                    $(
                        $num => stringify!($mnemonic),
                    )*
                    _ => "???",
                }
            }

            pub fn addressing_mode(self) -> Option<AddressingMode> {
                match self.0 {
                    $(
                        $num => Some(AddressingMode::$mode),
                    )*
                    _ => None,
                }
            }
        }
    }
}

def_opcodes! {
    0x00 => BRK                  => BRK(Implied),
    0x01 => ORA_INDEXED_INDIRECT => ORA(IndexedIndirect),
    0x04 => IGN_ZERO_PAGE_04     => IGN(ZeroPage),
    0x05 => ORA_ZERO_PAGE        => ORA(ZeroPage),
    0x06 => ASL_ZERO_PAGE        => ASL(ZeroPage),
    0x08 => PHP                  => PHP(Implied),
    0x09 => ORA_IMMEDIATE        => ORA(Immediate),
    0x0A => ASL_ACCUMULATOR      => ASL(Accumulator),
    0x0C => IGN_ABSOLUTE         => IGN(Absolute),
    0x0D => ORA_ABSOLUTE         => ORA(Absolute),
    0x0E => ASL_ABSOLUTE         => ASL(Absolute),
    0x10 => BPL                  => BPL(Relative),
    0x11 => ORA_INDIRECT_INDEXED => ORA(IndirectIndexed),
    0x14 => IGN_ZERO_PAGE_X_14   => IGN(ZeroPageX),
    0x15 => ORA_ZERO_PAGE_X      => ORA(ZeroPageX),
    0x16 => ASL_ZERO_PAGE_X      => ASL(ZeroPageX),
    0x18 => CLC                  => CLC(Implied),
    0x19 => ORA_ABSOLUTE_Y       => ORA(AbsoluteY),
    0x1A => NOP_1A               => NOP(Implied),
    0x1C => IGN_ABSOLUTE_X_1C    => IGN(AbsoluteX),
    0x1D => ORA_ABSOLUTE_X       => ORA(AbsoluteX),
    0x1E => ASL_ABSOLUTE_X       => ASL(AbsoluteX),
    0x20 => JSR                  => JSR(Absolute),
    0x21 => AND_INDEXED_INDIRECT => AND(IndexedIndirect),
    0x24 => BIT_ZERO_PAGE        => BIT(ZeroPage),
    0x25 => AND_ZERO_PAGE        => AND(ZeroPage),
    0x26 => ROL_ZERO_PAGE        => ROL(ZeroPage),
    0x28 => PLP                  => PLP(Implied),
    0x29 => AND_IMMEDIATE        => AND(Immediate),
    0x2A => ROL_ACCUMULATOR      => ROL(Accumulator),
    0x2C => BIT_ABSOLUTE         => BIT(Absolute),
    0x2D => AND_ABSOLUTE         => AND(Absolute),
    0x2E => ROL_ABSOLUTE         => ROL(Absolute),
    0x30 => BMI                  => BMI(Relative),
    0x31 => AND_INDIRECT_INDEXED => AND(IndirectIndexed),
    0x34 => IGN_ZERO_PAGE_X_34   => IGN(ZeroPageX),
    0x35 => AND_ZERO_PAGE_X      => AND(ZeroPageX),
    0x36 => ROL_ZERO_PAGE_X      => ROL(ZeroPageX),
    0x38 => SEC                  => SEC(Implied),
    0x39 => AND_ABSOLUTE_Y       => AND(AbsoluteY),
    0x3A => NOP_3A               => NOP(Implied),
    0x3C => IGN_ABSOLUTE_X_3C    => IGN(AbsoluteX),
    0x3D => AND_ABSOLUTE_X       => AND(AbsoluteX),
    0x3E => ROL_ABSOLUTE_X       => ROL(AbsoluteX),
    0x40 => RTI                  => RTI(Implied),
    0x41 => EOR_INDEXED_INDIRECT => EOR(IndexedIndirect),
    0x44 => IGN_ZERO_PAGE_44     => IGN(ZeroPage),
    0x45 => EOR_ZERO_PAGE        => EOR(ZeroPage),
    0x46 => LSR_ZERO_PAGE        => LSR(ZeroPage),
    0x48 => PHA                  => PHA(Implied),
    0x49 => EOR_IMMEDIATE        => EOR(Immediate),
    0x4A => LSR_ACCUMULATOR      => LSR(Accumulator),
    0x4C => JMP_ABSOLUTE         => JMP(Absolute),
    0x4D => EOR_ABSOLUTE         => EOR(Absolute),
    0x4E => LSR_ABSOLUTE         => LSR(Absolute),
    0x50 => BVC                  => BVC(Relative),
    0x51 => EOR_INDIRECT_INDEXED => EOR(IndirectIndexed),
    0x54 => IGN_ZERO_PAGE_X_54   => IGN(ZeroPageX),
    0x55 => EOR_ZERO_PAGE_X      => EOR(ZeroPageX),
    0x56 => LSR_ZERO_PAGE_X      => LSR(ZeroPageX),
    0x58 => CLI                  => CLI(Implied),
    0x59 => EOR_ABSOLUTE_Y       => EOR(AbsoluteY),
    0x5A => NOP_5A               => NOP(Implied),
    0x5C => IGN_ABSOLUTE_X_5C    => IGN(AbsoluteX),
    0x5D => EOR_ABSOLUTE_X       => EOR(AbsoluteX),
    0x5E => LSR_ABSOLUTE_X       => LSR(AbsoluteX),
    0x60 => RTS                  => RTS(Implied),
    0x61 => ADC_INDEXED_INDIRECT => ADC(IndexedIndirect),
    0x64 => IGN_ZERO_PAGE_64     => IGN(ZeroPage),
    0x65 => ADC_ZERO_PAGE        => ADC(ZeroPage),
    0x66 => ROR_ZERO_PAGE        => ROR(ZeroPage),
    0x68 => PLA                  => PLA(Implied),
    0x69 => ADC_IMMEDIATE        => ADC(Immediate),
    0x6A => ROR_ACCUMULATOR      => ROR(Accumulator),
    0x6C => JMP_INDIRECT         => JMP(Indirect),
    0x6D => ADC_ABSOLUTE         => ADC(Absolute),
    0x6E => ROR_ABSOLUTE         => ROR(Absolute),
    0x70 => BVS                  => BVS(Relative),
    0x71 => ADC_INDIRECT_INDEXED => ADC(IndirectIndexed),
    0x74 => IGN_ZERO_PAGE_X_74   => IGN(ZeroPageX),
    0x75 => ADC_ZERO_PAGE_X      => ADC(ZeroPageX),
    0x76 => ROR_ZERO_PAGE_X      => ROR(ZeroPageX),
    0x78 => SEI                  => SEI(Implied),
    0x79 => ADC_ABSOLUTE_Y       => ADC(AbsoluteY),
    0x7A => NOP_7A               => NOP(Implied),
    0x7C => IGN_ABSOLUTE_X_7C    => IGN(AbsoluteX),
    0x7D => ADC_ABSOLUTE_X       => ADC(AbsoluteX),
    0x7E => ROR_ABSOLUTE_X       => ROR(AbsoluteX),
    0x80 => SKB_80               => SKB(Immediate),
    0x81 => STA_INDEXED_INDIRECT => STA(IndexedIndirect),
    0x82 => SKB_82               => SKB(Immediate),
    0x83 => SAX_INDEXED_INDIRECT => SAX(IndexedIndirect),
    0x84 => STY_ZERO_PAGE        => STY(ZeroPage),
    0x85 => STA_ZERO_PAGE        => STA(ZeroPage),
    0x86 => STX_ZERO_PAGE        => STX(ZeroPage),
    0x87 => SAX_ZERO_PAGE        => SAX(ZeroPage),
    0x88 => DEY                  => DEY(Implied),
    0x89 => SKB_89               => SKB(Immediate),
    0x8A => TXA                  => TXA(Implied),
    0x8C => STY_ABSOLUTE         => STY(Absolute),
    0x8D => STA_ABSOLUTE         => STA(Absolute),
    0x8E => STX_ABSOLUTE         => STX(Absolute),
    0x8F => SAX_ABSOLUTE         => SAX(Absolute),
    0x90 => BCC                  => BCC(Relative),
    0x91 => STA_INDIRECT_INDEXED => STA(IndirectIndexed),
    0x94 => STY_ZERO_PAGE_X      => STY(ZeroPageX),
    0x95 => STA_ZERO_PAGE_X      => STA(ZeroPageX),
    0x96 => STX_ZERO_PAGE_Y      => STX(ZeroPageY),
    0x97 => SAX_ZERO_PAGE_Y      => SAX(ZeroPageY),
    0x98 => TYA                  => TYA(Implied),
    0x99 => STA_ABSOLUTE_Y       => STA(AbsoluteY),
    0x9A => TXS                  => TXS(Implied),
    0x9D => STA_ABSOLUTE_X       => STA(AbsoluteX),
    0xA0 => LDY_IMMEDIATE        => LDY(Immediate),
    0xA1 => LDA_INDEXED_INDIRECT => LDA(IndexedIndirect),
    0xA2 => LDX_IMMEDIATE        => LDX(Immediate),
    0xA4 => LDY_ZERO_PAGE        => LDY(ZeroPage),
    0xA5 => LDA_ZERO_PAGE        => LDA(ZeroPage),
    0xA6 => LDX_ZERO_PAGE        => LDX(ZeroPage),
    0xA8 => TAY                  => TAY(Implied),
    0xA9 => LDA_IMMEDIATE        => LDA(Immediate),
    0xAA => TAX                  => TAX(Implied),
    0xAC => LDY_ABSOLUTE         => LDY(Absolute),
    0xAD => LDA_ABSOLUTE         => LDA(Absolute),
    0xAE => LDX_ABSOLUTE         => LDX(Absolute),
    0xB0 => BCS                  => BCS(Relative),
    0xB1 => LDA_INDIRECT_INDEXED => LDA(IndirectIndexed),
    0xB4 => LDY_ZERO_PAGE_X      => LDY(ZeroPageX),
    0xB5 => LDA_ZERO_PAGE_X      => LDA(ZeroPageX),
    0xB6 => LDX_ZERO_PAGE_Y      => LDX(ZeroPageY),
    0xB8 => CLV                  => CLV(Implied),
    0xB9 => LDA_ABSOLUTE_Y       => LDA(AbsoluteY),
    0xBA => TSX                  => TSX(Implied),
    0xBC => LDY_ABSOLUTE_X       => LDY(AbsoluteX),
    0xBD => LDA_ABSOLUTE_X       => LDA(AbsoluteX),
    0xBE => LDX_ABSOLUTE_Y       => LDX(AbsoluteY),
    0xC0 => CPY_IMMEDIATE        => CPY(Immediate),
    0xC1 => CMP_INDEXED_INDIRECT => CMP(IndexedIndirect),
    0xC2 => SKB_C2               => SKB(Immediate),
    0xC4 => CPY_ZERO_PAGE        => CPY(ZeroPage),
    0xC5 => CMP_ZERO_PAGE        => CMP(ZeroPage),
    0xC6 => DEC_ZERO_PAGE        => DEC(ZeroPage),
    0xC8 => INY                  => INY(Implied),
    0xC9 => CMP_IMMEDIATE        => CMP(Immediate),
    0xCA => DEX                  => DEX(Implied),
    0xCC => CPY_ABSOLUTE         => CPY(Absolute),
    0xCD => CMP_ABSOLUTE         => CMP(Absolute),
    0xCE => DEC_ABSOLUTE         => DEC(Absolute),
    0xD0 => BNE                  => BNE(Relative),
    0xD1 => CMP_INDIRECT_INDEXED => CMP(IndirectIndexed),
    0xD4 => IGN_ZERO_PAGE_X_D4   => IGN(ZeroPageX),
    0xD5 => CMP_ZERO_PAGE_X      => CMP(ZeroPageX),
    0xD6 => DEC_ZERO_PAGE_X      => DEC(ZeroPageX),
    0xD8 => CLD                  => CLD(Implied),
    0xD9 => CMP_ABSOLUTE_Y       => CMP(AbsoluteY),
    0xDA => NOP_DA               => NOP(Implied),
    0xDC => IGN_ABSOLUTE_X_DC    => IGN(AbsoluteX),
    0xDD => CMP_ABSOLUTE_X       => CMP(AbsoluteX),
    0xDE => DEC_ABSOLUTE_X       => DEC(AbsoluteX),
    0xE0 => CPX_IMMEDIATE        => CPX(Immediate),
    0xE1 => SBC_INDEXED_INDIRECT => SBC(IndexedIndirect),
    0xE2 => SKB_E2               => SKB(Immediate),
    0xE4 => CPX_ZERO_PAGE        => CPX(ZeroPage),
    0xE5 => SBC_ZERO_PAGE        => SBC(ZeroPage),
    0xE6 => INC_ZERO_PAGE        => INC(ZeroPage),
    0xE8 => INX                  => INX(Implied),
    0xE9 => SBC_IMMEDIATE        => SBC(Immediate),
    0xEA => NOP                  => NOP(Implied),
    0xEB => SBC_IMMEDIATE_EB     => SBC(Immediate),
    0xEC => CPX_ABSOLUTE         => CPX(Absolute),
    0xED => SBC_ABSOLUTE         => SBC(Absolute),
    0xEE => INC_ABSOLUTE         => INC(Absolute),
    0xF0 => BEQ                  => BEQ(Relative),
    0xF1 => SBC_INDIRECT_INDEXED => SBC(IndirectIndexed),
    0xF4 => IGN_ZERO_PAGE_X_F4   => IGN(ZeroPageX),
    0xF5 => SBC_ZERO_PAGE_X      => SBC(ZeroPageX),
    0xF6 => INC_ZERO_PAGE_X      => INC(ZeroPageX),
    0xF8 => SED                  => SED(Implied),
    0xF9 => SBC_ABSOLUTE_Y       => SBC(AbsoluteY),
    0xFA => NOP_FA               => NOP(Implied),
    0xFC => IGN_ABSOLUTE_X_FC    => IGN(AbsoluteX),
    0xFD => SBC_ABSOLUTE_X       => SBC(AbsoluteX),
    0xFE => INC_ABSOLUTE_X       => INC(AbsoluteX),

    // Interrupt entry
    0x100 => NMI                 => NMI(Implied),
    0x101 => IRQ                 => IRQ(Implied),
}

#[cfg(test)]
mod tests {
    use super::instructions::*;
    use super::*;

    #[test]
    fn identifiers_cover_opcodes_then_interrupts() {
        let all: Vec<Instruction> = Instruction::all().collect();

        assert_eq!(all.len(), INSTRUCTION_COUNT);
        assert_eq!(all[0], BRK);
        assert_eq!(all[0xA9], LDA_IMMEDIATE);
        assert_eq!(all[256], NMI);
        assert_eq!(all[257], IRQ);
    }

    #[test]
    fn interrupts_have_no_opcode() {
        assert_eq!(NMI.opcode(), None);
        assert_eq!(IRQ.opcode(), None);
        assert!(NMI.is_interrupt());
        assert_eq!(JSR.opcode(), Some(0x20));
        assert!(!JSR.is_interrupt());
    }

    #[test]
    fn instruction_knows_its_mnemonic_and_addressing_mode() {
        assert_eq!(LDA_INDIRECT_INDEXED.mnemonic(), "LDA");
        assert_eq!(
            LDA_INDIRECT_INDEXED.addressing_mode(),
            Some(AddressingMode::IndirectIndexed)
        );
        assert_eq!(JMP_INDIRECT.mnemonic(), "JMP");
        assert_eq!(JMP_INDIRECT.addressing_mode(), Some(AddressingMode::Indirect));
    }

    #[test]
    fn undefined_opcode_has_no_metadata() {
        let kil = Instruction::from_opcode(0x02);

        assert_eq!(kil.mnemonic(), "???");
        assert_eq!(kil.addressing_mode(), None);
    }

    #[test]
    fn instruction_displays_opcode_and_mnemonic() {
        assert_eq!(LDA_IMMEDIATE.to_string(), "$A9 LDA");
        assert_eq!(NMI.to_string(), "NMI");
    }

    #[test]
    fn official_opcode_count_is_151() {
        let official = Instruction::all()
            .filter(|instr| !instr.is_interrupt())
            .filter(|instr| !["IGN", "SKB", "SAX"].contains(&instr.mnemonic()))
            .filter(|instr| instr.mnemonic() != "???")
            .filter(|instr| {
                !matches!(instr.opcode(), Some(0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA | 0xEB))
            })
            .count();

        assert_eq!(official, 151);
    }
}
