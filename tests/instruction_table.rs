use std::io::Cursor;

use nes_microcode::instructions;
use nes_microcode::CpuOperation;
use nes_microcode::Decoder;
use nes_microcode::Instruction;
use nes_microcode::InstructionTable;
use nes_microcode::MemoryOperation;
use nes_microcode::Register;
use nes_microcode::TableError;
use nes_microcode::INSTRUCTION_COUNT;
use nes_microcode::MICRO_SEQUENCE_LEN;
use nes_microcode::TABLE_BYTES;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn cycles(sequence: &[CpuOperation]) -> usize {
    sequence.iter().filter(|op| !op.is_nop()).count()
}

#[test]
fn every_decoded_word_is_well_formed() {
    init_logger();

    let table = InstructionTable::generate();

    for (instruction, sequence) in table.iter() {
        let len = cycles(sequence);

        assert!(len <= MICRO_SEQUENCE_LEN, "{}", instruction);
        assert!(
            sequence[len..].iter().all(|op| op.is_nop()),
            "{} has a gap in its sequence",
            instruction
        );

        for op in sequence {
            assert!(op.data_operation().is_some(), "{}: {:?}", instruction, op);
            assert!(op.memory_operation().is_some(), "{}: {:?}", instruction, op);
        }
    }
}

#[test]
fn table_round_trips_through_bytes() {
    init_logger();

    let table = InstructionTable::generate();
    let mut bytes = Vec::new();
    table.write_to(&mut bytes).unwrap();

    assert_eq!(bytes.len(), TABLE_BYTES);
    assert_eq!(bytes.len(), INSTRUCTION_COUNT * MICRO_SEQUENCE_LEN * 4);

    let loaded = InstructionTable::read_from(Cursor::new(&bytes)).unwrap();
    assert_eq!(loaded, table);
    assert_eq!(loaded.get(instructions::JSR), table.get(instructions::JSR));
}

#[test]
fn truncated_table_fails_with_context() {
    init_logger();

    let bytes = InstructionTable::generate().to_bytes();
    let error = InstructionTable::read_from(Cursor::new(&bytes[..TABLE_BYTES - 1])).unwrap_err();

    assert_eq!(error.to_string(), "Failed to load instruction table");
    assert!(matches!(
        error.downcast_ref::<TableError>(),
        Some(TableError::Length { actual, .. }) if *actual == TABLE_BYTES - 1
    ));
}

#[test]
fn table_matches_a_fresh_decoder() {
    init_logger();

    let table = InstructionTable::generate();
    let mut decoder = Decoder::new();

    for id in (0..INSTRUCTION_COUNT as u16).rev() {
        let instruction = Instruction::new(id);
        assert_eq!(table.get(instruction), decoder.decode(instruction));
    }
}

#[test]
fn rts_returns_through_the_stack() {
    init_logger();

    let mut decoder = Decoder::new();
    let sequence = decoder.decode(instructions::RTS);

    let pulled: Vec<Register> = sequence
        .iter()
        .filter_map(|op| match op.memory_operation() {
            Some(MemoryOperation::Read {
                dst,
                addr: Register::S,
                ..
            }) => Some(dst),
            _ => None,
        })
        .collect();

    assert_eq!(pulled, vec![Register::Pcl, Register::Pch]);
    assert_eq!(cycles(sequence), 6);
}
