//! The central processing unit.
//!
//! The CPU owns the A and D registers and the program counter, and wires
//! them to the ALU through the decoded instruction. One tick executes one
//! instruction: condition the operands, run the ALU, route the result into
//! whichever registers the dest field names, and step or load the counter.
//!
//! The jump logic and the register inputs both read the ALU output of the
//! tick being executed, never a value latched earlier; a conditional jump
//! therefore tests exactly the value its own instruction computed.

pub mod decode;

use arbitrary_int::u15;

use crate::alu::{self, Control};
use crate::bits::Word;
use crate::cpu::decode::{Dest, Instruction, Jump};
use crate::fault::Fault;
use crate::gates::{and, mux16, not, or};
use crate::mem::cell::Register16;
use crate::mem::pc::ProgramCounter;

/// The processor state between two clock edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cpu {
    a: Register16,
    d: Register16,
    pc: ProgramCounter,
    out_m: Word,
    write_m: bool,
    zr: bool,
    ng: bool,
}

impl Cpu {
    /// Create a processor in its cold-start state: registers and counter
    /// zero, nothing to write.
    #[must_use]
    pub fn new() -> Self {
        Self {
            a: Register16::new(),
            d: Register16::new(),
            pc: ProgramCounter::new(),
            out_m: Word::ZERO,
            write_m: false,
            zr: true,
            ng: false,
        }
    }

    /// Return the A register contents.
    #[must_use]
    pub fn a(&self) -> Word {
        self.a.out()
    }

    /// Return the D register contents.
    #[must_use]
    pub fn d(&self) -> Word {
        self.d.out()
    }

    /// Return the instruction address to fetch next.
    #[must_use]
    pub fn pc_out(&self) -> u15 {
        self.pc.out().low15()
    }

    /// Return the ALU output of the last executed instruction, the word a
    /// memory write would store.
    #[must_use]
    pub const fn out_m(&self) -> Word {
        self.out_m
    }

    /// Check if the last executed instruction asks for a memory write.
    #[must_use]
    pub const fn write_m(&self) -> bool {
        self.write_m
    }

    /// Return the memory address the last executed instruction addressed,
    /// the low fifteen lines of A.
    #[must_use]
    pub fn address_m(&self) -> u15 {
        self.a().low15()
    }

    /// Check if the last ALU output was zero.
    #[must_use]
    pub const fn zr(&self) -> bool {
        self.zr
    }

    /// Check if the last ALU output was negative.
    #[must_use]
    pub const fn ng(&self) -> bool {
        self.ng
    }

    /// Execute one instruction.
    ///
    /// `in_m` is the memory word at the currently addressed slot. When
    /// `reset` is high the counter is forced to zero regardless of the
    /// instruction, which otherwise executes normally.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IllegalInstruction`] for a compute instruction
    /// outside the comp table. No state has advanced when this happens.
    pub fn tick(self, word: Word, in_m: Word, reset: bool) -> Result<Self, Fault> {
        let instruction = Instruction::decode(word)?;

        let (is_compute, dest, jump, reads_memory) = match instruction {
            Instruction::At(_) => (false, Dest::Null, Jump::Null, false),
            Instruction::Compute { comp, dest, jump } => (true, dest, jump, comp.reads_memory()),
        };

        // Operand conditioning: x is always D, y is A or the memory word.
        let y = mux16(self.a(), in_m, and(is_compute, reads_memory));
        let result = alu::eval(self.d(), y, Control::from_word(word));

        // An address load writes A from the word itself; a compute
        // instruction writes it from the ALU when the dest field says so.
        let load_a = or(not(is_compute), and(is_compute, dest.has_a()));
        let next_a = mux16(word, result.out, is_compute);

        // The jump target is A as it stood when the instruction started.
        let target = self.a();
        let should_jump = and(is_compute, jump.taken(result.zr, result.ng));

        Ok(Self {
            a: self.a.tick(next_a, load_a),
            d: self.d.tick(result.out, and(is_compute, dest.has_d())),
            pc: self.pc.tick(target, should_jump, true, reset),
            out_m: result.out,
            write_m: and(is_compute, dest.has_m()),
            zr: result.zr,
            ng: result.ng,
        })
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::Comp;

    /// Shorthand for an address load.
    fn at(addr: u16) -> Word {
        Instruction::At(u15::new(addr)).encode()
    }

    /// Shorthand for a compute instruction.
    fn compute(comp: Comp, dest: Dest, jump: Jump) -> Word {
        Instruction::Compute { comp, dest, jump }.encode()
    }

    /// Run a fresh processor through the given words with nothing on the
    /// memory line.
    fn cpu_after(words: &[Word]) -> Cpu {
        words.iter().fold(Cpu::new(), |cpu, &word| {
            cpu.tick(word, Word::ZERO, false).unwrap()
        })
    }

    #[test]
    fn cold_start_is_all_zero() {
        let cpu = Cpu::new();

        assert_eq!(cpu.a(), Word::ZERO);
        assert_eq!(cpu.d(), Word::ZERO);
        assert_eq!(cpu.pc_out().value(), 0);
        assert_eq!(cpu.out_m(), Word::ZERO);
        assert!(!cpu.write_m());
        assert!(cpu.zr());
        assert!(!cpu.ng());
    }

    #[test]
    fn address_loads_set_a_and_step_the_counter() {
        let cpu = cpu_after(&[at(5)]);

        assert_eq!(cpu.a(), Word::new(5));
        assert_eq!(cpu.d(), Word::ZERO);
        assert_eq!(cpu.pc_out().value(), 1);
        assert!(!cpu.write_m());
    }

    #[test]
    fn copying_a_into_d() {
        let cpu = cpu_after(&[at(5), compute(Comp::A, Dest::D, Jump::Null)]);

        assert_eq!(cpu.a(), Word::new(5));
        assert_eq!(cpu.d(), Word::new(5));
        assert_eq!(cpu.pc_out().value(), 2);
        assert!(!cpu.write_m());
    }

    #[test]
    fn dest_a_rewrites_a_from_the_alu() {
        let cpu = cpu_after(&[at(5), compute(Comp::APlusOne, Dest::A, Jump::Null)]);

        assert_eq!(cpu.a(), Word::new(6));
    }

    #[test]
    fn dest_m_only_raises_the_write_line() {
        let cpu = cpu_after(&[at(5), compute(Comp::One, Dest::M, Jump::Null)]);

        assert_eq!(cpu.a(), Word::new(5));
        assert_eq!(cpu.d(), Word::ZERO);
        assert!(cpu.write_m());
        assert_eq!(cpu.out_m(), Word::ONE);
        assert_eq!(cpu.address_m().value(), 5);
    }

    #[test]
    fn every_dest_subset_routes_exactly_its_members() {
        for bits in 0..8_u8 {
            let dest = Dest::decode(arbitrary_int::u3::new(bits));
            let cpu = cpu_after(&[at(9), compute(Comp::One, dest, Jump::Null)]);

            assert_eq!(cpu.a(), if dest.has_a() { Word::ONE } else { Word::new(9) });
            assert_eq!(cpu.d(), if dest.has_d() { Word::ONE } else { Word::ZERO });
            assert_eq!(cpu.write_m(), dest.has_m());
        }
    }

    #[test]
    fn the_memory_operand_reaches_the_alu() {
        let cpu = Cpu::new()
            .tick(at(3), Word::ZERO, false)
            .unwrap()
            .tick(
                compute(Comp::DPlusM, Dest::D, Jump::Null),
                Word::new(40),
                false,
            )
            .unwrap();

        assert_eq!(cpu.d(), Word::new(40));
    }

    #[test]
    fn jumps_test_the_value_their_own_instruction_computed() {
        // D starts at zero; D-1 is negative on the very tick that computes
        // it, so JLT must fire even though the previous status lines said
        // zero.
        let cpu = cpu_after(&[at(7), compute(Comp::DMinusOne, Dest::Null, Jump::Jlt)]);

        assert_eq!(cpu.pc_out().value(), 7);
    }

    #[test]
    fn every_jump_condition_matches_its_sign_class() {
        // Preludes leaving D negative, zero and positive.
        let negative = [compute(Comp::MinusOne, Dest::D, Jump::Null)];
        let zero = [compute(Comp::Zero, Dest::D, Jump::Null)];
        let positive = [compute(Comp::One, Dest::D, Jump::Null)];

        let table: [(Jump, [bool; 3]); 8] = [
            (Jump::Null, [false, false, false]),
            (Jump::Jgt, [false, false, true]),
            (Jump::Jeq, [false, true, false]),
            (Jump::Jge, [false, true, true]),
            (Jump::Jlt, [true, false, false]),
            (Jump::Jne, [true, false, true]),
            (Jump::Jle, [true, true, false]),
            (Jump::Jmp, [true, true, true]),
        ];

        for (jump, outcomes) in table {
            for (prelude, taken) in [&negative, &zero, &positive].into_iter().zip(outcomes) {
                let mut words = vec![at(40)];
                words.extend_from_slice(prelude);
                words.push(compute(Comp::D, Dest::Null, jump));

                let cpu = cpu_after(&words);
                let expected = if taken { 40 } else { 3 };

                assert_eq!(cpu.pc_out().value(), expected, "{jump:?}");
            }
        }
    }

    #[test]
    fn reset_forces_the_counter_to_zero() {
        let cpu = cpu_after(&[at(5), at(6), at(7)]);
        let cpu = cpu
            .tick(compute(Comp::Zero, Dest::Null, Jump::Jmp), Word::ZERO, true)
            .unwrap();

        assert_eq!(cpu.pc_out().value(), 0);
        // The instruction itself still executed.
        assert!(cpu.zr());
    }

    #[test]
    fn illegal_words_are_rejected() {
        let word = Word::new(0b1110_1010_1100_0000);

        assert_eq!(
            Cpu::new().tick(word, Word::ZERO, false),
            Err(Fault::IllegalInstruction {
                word: word.value()
            })
        );
    }

    #[test]
    fn the_sign_line_of_a_never_addresses_memory() {
        // A=-1 makes every A line high; the address drops the sign line.
        let cpu = cpu_after(&[compute(Comp::MinusOne, Dest::A, Jump::Null)]);

        assert_eq!(cpu.a(), Word::MINUS_ONE);
        assert_eq!(cpu.address_m().value(), 0x7fff);
    }
}
