mod instruction_batch;
pub use instruction_batch::{Instruction, InstructionBatch};
