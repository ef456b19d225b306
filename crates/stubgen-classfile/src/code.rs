//! Straight-line bytecode emission.
//!
//! [`CodeBuilder`] knows the stack effect of every instruction it can emit, so max stack and
//! max locals fall out of the emission itself. It has no branch instructions, which means no
//! method it builds ever needs a `StackMapTable`.

use crate::constant_pool::ConstantPool;
use crate::descriptor::MethodDescriptor;
use crate::error::{ClassFileError, Result};

pub mod opcode {
    pub const LDC: u8 = 0x12;
    pub const LDC_W: u8 = 0x13;
    pub const ALOAD: u8 = 0x19;
    pub const ALOAD_0: u8 = 0x2a;
    pub const ALOAD_3: u8 = 0x2d;
    pub const DUP: u8 = 0x59;
    pub const RETURN: u8 = 0xb1;
    pub const INVOKESPECIAL: u8 = 0xb7;
    pub const NEW: u8 = 0xbb;
    pub const ATHROW: u8 = 0xbf;
    pub const WIDE: u8 = 0xc4;
}

const MAX_CODE_LEN: usize = u16::MAX as usize;

/// A finished method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub bytes: Vec<u8>,
}

pub struct CodeBuilder<'a> {
    pool: &'a mut ConstantPool,
    bytes: Vec<u8>,
    stack: u16,
    max_stack: u16,
    max_locals: u16,
}

impl<'a> CodeBuilder<'a> {
    /// `initial_locals` is the number of slots taken by the receiver and the arguments.
    pub fn new(pool: &'a mut ConstantPool, initial_locals: u16) -> Self {
        Self {
            pool,
            bytes: Vec::new(),
            stack: 0,
            max_stack: 0,
            max_locals: initial_locals,
        }
    }

    pub fn aload(&mut self, slot: u16) -> Result<&mut Self> {
        match slot {
            0..=3 => self.bytes.push(opcode::ALOAD_0 + slot as u8),
            4..=255 => {
                self.bytes.push(opcode::ALOAD);
                self.bytes.push(slot as u8);
            }
            _ => {
                self.bytes.push(opcode::WIDE);
                self.bytes.push(opcode::ALOAD);
                self.bytes.extend_from_slice(&slot.to_be_bytes());
            }
        }
        self.max_locals = self.max_locals.max(slot.saturating_add(1));
        self.push(1);
        Ok(self)
    }

    /// `new`: allocate an uninitialized instance of `class`.
    pub fn new_object(&mut self, class: &str) -> Result<&mut Self> {
        let idx = self.pool.class(class)?;
        self.bytes.push(opcode::NEW);
        self.bytes.extend_from_slice(&idx.to_be_bytes());
        self.push(1);
        Ok(self)
    }

    pub fn dup(&mut self) -> Result<&mut Self> {
        self.pop(1, "dup")?;
        self.bytes.push(opcode::DUP);
        self.push(2);
        Ok(self)
    }

    /// Push a string constant, using `ldc_w` once the pool index no longer fits a byte.
    pub fn ldc_string(&mut self, value: &str) -> Result<&mut Self> {
        let idx = self.pool.string(value)?;
        if idx <= u8::MAX as u16 {
            self.bytes.push(opcode::LDC);
            self.bytes.push(idx as u8);
        } else {
            self.bytes.push(opcode::LDC_W);
            self.bytes.extend_from_slice(&idx.to_be_bytes());
        }
        self.push(1);
        Ok(self)
    }

    pub fn invokespecial(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &MethodDescriptor,
    ) -> Result<&mut Self> {
        let idx = self
            .pool
            .methodref(class, name, &descriptor.to_string())?;
        self.bytes.push(opcode::INVOKESPECIAL);
        self.bytes.extend_from_slice(&idx.to_be_bytes());
        self.pop(1 + descriptor.param_slots(), "invokespecial")?;
        self.push(descriptor.return_slots());
        Ok(self)
    }

    pub fn return_void(&mut self) -> Result<&mut Self> {
        self.bytes.push(opcode::RETURN);
        self.stack = 0;
        Ok(self)
    }

    pub fn athrow(&mut self) -> Result<&mut Self> {
        self.pop(1, "athrow")?;
        self.bytes.push(opcode::ATHROW);
        self.stack = 0;
        Ok(self)
    }

    pub fn finish(self) -> Result<Code> {
        if self.bytes.len() > MAX_CODE_LEN {
            return Err(ClassFileError::LimitExceeded {
                what: "method code length",
                limit: MAX_CODE_LEN,
            });
        }
        Ok(Code {
            max_stack: self.max_stack,
            max_locals: self.max_locals,
            bytes: self.bytes,
        })
    }

    fn push(&mut self, slots: u16) {
        self.stack = self.stack.saturating_add(slots);
        self.max_stack = self.max_stack.max(self.stack);
    }

    fn pop(&mut self, slots: u16, insn: &'static str) -> Result<()> {
        self.stack = self
            .stack
            .checked_sub(slots)
            .ok_or(ClassFileError::StackUnderflow(insn))?;
        Ok(())
    }
}

/// Instructions understood by [`decode_instructions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Aload(u16),
    New(u16),
    Dup,
    Ldc(u16),
    InvokeSpecial(u16),
    Return,
    Athrow,
    /// An opcode outside the emitted subset; decoding stops here.
    Unknown { offset: usize, opcode: u8 },
}

/// Decode code emitted by [`CodeBuilder`]. Truncated operands decode as `Unknown`.
pub fn decode_instructions(code: &[u8]) -> Vec<Instruction> {
    let mut out = Vec::new();
    let mut pc = 0usize;
    let u16_at = |at: usize| -> Option<u16> {
        Some(u16::from_be_bytes([*code.get(at)?, *code.get(at + 1)?]))
    };

    while pc < code.len() {
        let op = code[pc];
        let decoded = match op {
            opcode::ALOAD_0..=opcode::ALOAD_3 => Some((Instruction::Aload((op - opcode::ALOAD_0) as u16), 1)),
            opcode::ALOAD => code.get(pc + 1).map(|slot| (Instruction::Aload(*slot as u16), 2)),
            opcode::WIDE if code.get(pc + 1) == Some(&opcode::ALOAD) => {
                u16_at(pc + 2).map(|slot| (Instruction::Aload(slot), 4))
            }
            opcode::NEW => u16_at(pc + 1).map(|idx| (Instruction::New(idx), 3)),
            opcode::DUP => Some((Instruction::Dup, 1)),
            opcode::LDC => code.get(pc + 1).map(|idx| (Instruction::Ldc(*idx as u16), 2)),
            opcode::LDC_W => u16_at(pc + 1).map(|idx| (Instruction::Ldc(idx), 3)),
            opcode::INVOKESPECIAL => u16_at(pc + 1).map(|idx| (Instruction::InvokeSpecial(idx), 3)),
            opcode::RETURN => Some((Instruction::Return, 1)),
            opcode::ATHROW => Some((Instruction::Athrow, 1)),
            _ => None,
        };
        match decoded {
            Some((insn, len)) => {
                out.push(insn);
                pc += len;
            }
            None => {
                out.push(Instruction::Unknown { offset: pc, opcode: op });
                break;
            }
        }
    }
    out
}
