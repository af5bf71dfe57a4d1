use super::CpuOperation;

/// Longest instruction, in cycles.
pub const MICRO_SEQUENCE_LEN: usize = 8;

/// Fixed buffer a decoded instruction is written into, one control word per cycle.
///
/// Unused trailing slots stay zero.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct MicroSequence {
    operations: [CpuOperation; MICRO_SEQUENCE_LEN],
    len: usize,
}

impl MicroSequence {
    pub fn clear(&mut self) {
        self.operations = [CpuOperation::NOP; MICRO_SEQUENCE_LEN];
        self.len = 0;
    }

    pub fn append(&mut self, operation: CpuOperation) {
        debug_assert!(
            self.len < MICRO_SEQUENCE_LEN,
            "micro sequence overflow appending {:?}",
            operation
        );
        self.operations[self.len] = operation;
        self.len += 1;
    }

    pub fn expose(&self) -> &[CpuOperation; MICRO_SEQUENCE_LEN] {
        &self.operations
    }

    /// Number of cycles appended since the last clear.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::Register;

    #[test]
    fn new_sequence_is_empty_and_zeroed() {
        let sequence = MicroSequence::default();

        assert!(sequence.is_empty());
        assert_eq!(sequence.expose(), &[CpuOperation::NOP; MICRO_SEQUENCE_LEN]);
    }

    #[test]
    fn append_fills_slots_in_order() {
        let mut sequence = MicroSequence::default();
        let read = CpuOperation::read(Register::Tmp1, Register::Pcl) | CpuOperation::PC_INC;

        sequence.append(read);
        sequence.append(CpuOperation::FETCH);

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.expose()[0], read);
        assert_eq!(sequence.expose()[1], CpuOperation::FETCH);
        assert_eq!(sequence.expose()[2..], [CpuOperation::NOP; 6]);
    }

    #[test]
    fn clear_zeroes_every_slot() {
        let mut sequence = MicroSequence::default();
        for _ in 0..MICRO_SEQUENCE_LEN {
            sequence.append(CpuOperation::PC_INC);
        }

        sequence.clear();

        assert!(sequence.is_empty());
        assert_eq!(sequence.expose(), &[CpuOperation::NOP; MICRO_SEQUENCE_LEN]);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn appending_past_the_end_panics_in_debug_builds() {
        let mut sequence = MicroSequence::default();
        for _ in 0..=MICRO_SEQUENCE_LEN {
            sequence.append(CpuOperation::PC_INC);
        }
    }
}
