use alloc::vec::Vec;
use super::alu::TernaryAlu;
use super::isa::{Instruction, Opcode};
use super::trit::Trit;
use super::tvm::Tvm;

pub const CALL_STACK_CAPACITY: usize = 64;
pub const DEFAULT_MEMORY_SIZE: usize = 1024;

/// Fetch-decode-execute loop over a loaded `T3-ISA` program. The program
/// counter and the CALL/RET return-address stack are owned here rather
/// than on `Tvm`, since they hold plain addresses, not trits.
pub struct Interpreter {
    pub alu: TernaryAlu,
    pub vm: Tvm,
    program: Vec<Instruction>,
    pc: usize,
    call_stack: Vec<usize>,
    running: bool,
    halted: bool,
    error: bool,
}

impl Interpreter {
    pub fn new(memory_size: usize) -> Self {
        Self {
            alu: TernaryAlu::new(),
            vm: Tvm::new(memory_size),
            program: Vec::new(),
            pc: 0,
            call_stack: Vec::with_capacity(CALL_STACK_CAPACITY),
            running: false,
            halted: false,
            error: false,
        }
    }

    pub fn load_program(&mut self, program: Vec<Instruction>) {
        self.program = program;
        self.pc = 0;
        self.call_stack.clear();
        self.running = true;
        self.halted = false;
        self.error = false;
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.halted && !self.error
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    fn fail(&mut self) {
        self.running = false;
        self.error = true;
    }

    /// Executes the instruction at `pc`, advancing it unless control flow
    /// branched. Returns `false` once the interpreter stops (halted or
    /// errored), `true` if it should keep stepping.
    pub fn step(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(ins) = self.program.get(self.pc).copied() else {
            self.fail();
            return false;
        };
        let mut next_pc = self.pc + 1;

        match ins.opcode {
            Opcode::Load => {
                // LOAD rd, src: operand1=rd, operand2=src (0 means "use imm").
                let value = if ins.operand2 == 0 {
                    Trit::from_value(ins.imm as i8)
                } else {
                    self.vm.get_register(ins.operand2)
                };
                if !self.vm.set_register(ins.operand1, value) {
                    self.fail();
                }
            }
            Opcode::Store => {
                // Per the documented source behavior, STORE copies register
                // to register rather than to a memory address; operand2
                // is conventionally a memory target in other register
                // machines, but this ISA's STORE does not touch memory.
                // STORE ra, rb: operand1=ra (source), operand2=rb (dest).
                let value = self.vm.get_register(ins.operand1);
                if !self.vm.set_register(ins.operand2, value) {
                    self.fail();
                }
            }
            Opcode::Add => self.ternary_reg_op(&ins, |alu, a, b| alu.add(a, b)),
            Opcode::Sub => self.ternary_reg_op(&ins, |alu, a, b| alu.sub(a, b)),
            Opcode::Mul => self.ternary_reg_op(&ins, |alu, a, b| alu.mul(a, b)),
            Opcode::Div => self.ternary_reg_op(&ins, |alu, a, b| alu.div(a, b)),
            Opcode::And => self.ternary_reg_op(&ins, |alu, a, b| alu.and(a, b)),
            Opcode::Or => self.ternary_reg_op(&ins, |alu, a, b| alu.or(a, b)),
            Opcode::Xor => self.ternary_reg_op(&ins, |alu, a, b| alu.xor(a, b)),
            Opcode::Cmp => {
                // CMP ra, rb: operand1=ra, operand2=rb; no register written.
                let a = self.vm.get_register(ins.operand1);
                let b = self.vm.get_register(ins.operand2);
                if !a.is_valid() || !b.is_valid() {
                    self.fail();
                } else {
                    self.alu.compare(a, b);
                }
            }
            Opcode::Not => {
                // NOT rd, ra: operand1=rd, operand2=ra.
                let a = self.vm.get_register(ins.operand2);
                let result = self.alu.not(a);
                if !self.vm.set_register(ins.operand1, result) {
                    self.fail();
                }
            }
            Opcode::Jmp => {
                next_pc = ins.imm as usize;
            }
            Opcode::Jz => {
                if self.vm.get_register(ins.operand1).is_neutral() {
                    next_pc = ins.imm as usize;
                }
            }
            Opcode::Jnz => {
                if !self.vm.get_register(ins.operand1).is_neutral() {
                    next_pc = ins.imm as usize;
                }
            }
            Opcode::Call => {
                if self.call_stack.len() >= CALL_STACK_CAPACITY {
                    self.fail();
                } else {
                    self.call_stack.push(self.pc + 1);
                    next_pc = ins.imm as usize;
                }
            }
            Opcode::Ret => match self.call_stack.pop() {
                Some(addr) => next_pc = addr,
                None => self.fail(),
            },
            Opcode::Push => {
                let value = self.vm.get_register(ins.operand1);
                if !self.vm.stack_push(value) {
                    self.fail();
                }
            }
            Opcode::Pop => match self.vm.stack_pop() {
                Some(value) => {
                    if !self.vm.set_register(ins.operand1, value) {
                        self.fail();
                    }
                }
                None => self.fail(),
            },
            Opcode::Halt => {
                self.running = false;
                self.halted = true;
                return false;
            }
        }

        if self.error {
            return false;
        }
        self.pc = next_pc;
        true
    }

    /// `rd = ra op rb`: operand1=rd, operand2=ra, operand3=rb.
    fn ternary_reg_op<F>(&mut self, ins: &Instruction, op: F)
    where
        F: Fn(&mut TernaryAlu, Trit, Trit) -> Trit,
    {
        let a = self.vm.get_register(ins.operand2);
        let b = self.vm.get_register(ins.operand3);
        let result = op(&mut self.alu, a, b);
        if !self.vm.set_register(ins.operand1, result) {
            self.fail();
        }
    }

    /// Runs to completion (halt or error), bounded by `max_steps` to
    /// guarantee termination against runaway programs.
    pub fn run(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if !self.step() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn load_immediate_then_halt() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![
            Instruction::new(Opcode::Load, 0, 0, 0, 1),
            Instruction::simple(Opcode::Halt),
        ]);
        interp.run(16);
        assert!(interp.is_halted());
        assert!(!interp.is_running());
        assert!(!interp.has_error());
        assert_eq!(interp.vm.get_register(0), Trit::Pos);
    }

    #[test_case]
    fn add_writes_into_a_third_register() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![
            Instruction::new(Opcode::Load, 0, 0, 0, 1),
            Instruction::new(Opcode::Load, 1, 0, 0, -1),
            Instruction::new(Opcode::Add, 2, 0, 1, 0),
            Instruction::simple(Opcode::Halt),
        ]);
        interp.run(16);
        assert_eq!(interp.vm.get_register(2), Trit::Neu);
        assert_eq!(interp.vm.get_register(0), Trit::Pos);
        assert_eq!(interp.vm.get_register(1), Trit::Neg);
    }

    #[test_case]
    fn jump_skips_instruction() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![
            Instruction::new(Opcode::Jmp, 0, 0, 0, 2),
            Instruction::new(Opcode::Load, 0, 0, 0, 1),
            Instruction::simple(Opcode::Halt),
        ]);
        interp.run(16);
        assert_eq!(interp.vm.get_register(0), Trit::Neu);
        assert!(interp.is_halted());
    }

    #[test_case]
    fn call_and_ret_round_trip_pc() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![
            Instruction::new(Opcode::Call, 0, 0, 0, 3),
            Instruction::simple(Opcode::Halt),
            Instruction::simple(Opcode::Halt),
            Instruction::new(Opcode::Load, 0, 0, 0, 1),
            Instruction::simple(Opcode::Ret),
        ]);
        interp.run(16);
        assert_eq!(interp.vm.get_register(0), Trit::Pos);
        assert!(interp.is_halted());
    }

    #[test_case]
    fn ret_without_call_errors() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![Instruction::simple(Opcode::Ret)]);
        interp.run(16);
        assert!(interp.has_error());
        assert!(!interp.is_halted());
    }

    #[test_case]
    fn push_pop_round_trips_through_vm_stack() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![
            Instruction::new(Opcode::Load, 0, 0, 0, -1),
            Instruction::new(Opcode::Push, 0, 0, 0, 0),
            Instruction::new(Opcode::Load, 0, 0, 0, 1),
            Instruction::new(Opcode::Pop, 1, 0, 0, 0),
            Instruction::simple(Opcode::Halt),
        ]);
        interp.run(16);
        assert_eq!(interp.vm.get_register(1), Trit::Neg);
    }

    #[test_case]
    fn running_past_end_of_program_is_an_error() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![Instruction::new(Opcode::Load, 0, 0, 0, 1)]);
        interp.run(16);
        assert!(interp.has_error());
    }

    #[test_case]
    fn cmp_with_out_of_range_operand_sets_error() {
        let mut interp = Interpreter::new(DEFAULT_MEMORY_SIZE);
        interp.load_program(alloc::vec![Instruction::new(Opcode::Cmp, 0, 99, 0, 0)]);
        interp.run(16);
        assert!(interp.has_error());
    }
}
